//! # Stock Commands

use kirana_core::StockOp;
use serde_json::json;

use super::{Context, Reply};
use crate::cli::StockCommand;
use crate::error::CliResult;
use crate::render;

pub async fn run(ctx: &Context, cmd: StockCommand) -> CliResult<Reply> {
    let (id, op, amount) = match cmd {
        StockCommand::Show { id: Some(id) } => {
            let quantity = ctx.register.current_stock(id).await?;
            return Reply::new(
                format!("Item {}: {}", id, quantity),
                &json!({ "itemId": id, "quantity": quantity }),
            );
        }
        StockCommand::Show { id: None } => {
            let ledger = ctx.register.database().stock().load().await?;
            return Reply::new(render::stock_entries(ledger.entries()), ledger.entries());
        }
        StockCommand::Set { id, amount } => (id, StockOp::Set, amount),
        StockCommand::Add { id, amount } => (id, StockOp::Add, amount),
        StockCommand::Subtract { id, amount } => (id, StockOp::Subtract, amount),
    };

    let movement = ctx.register.adjust_stock(id, op, amount).await?;
    Reply::new(render::stock_movement(&movement), &movement)
}
