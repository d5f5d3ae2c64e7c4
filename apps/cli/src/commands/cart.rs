//! # Cart Commands
//!
//! The cart is persisted between invocations, so a sale can be built one
//! command at a time.

use kirana_core::Cart;
use serde::Serialize;

use super::{Context, Reply};
use crate::cli::CartCommand;
use crate::error::CliResult;
use crate::render;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartView<'a> {
    lines: &'a Cart,
    summary: kirana_core::CartSummary,
}

pub async fn run(ctx: &Context, cmd: CartCommand) -> CliResult<Reply> {
    let register = &ctx.register;

    let cart = match cmd {
        CartCommand::Show => register.cart_view().await?,
        CartCommand::Add { id, quantity } => register.cart_add(id, quantity).await?,
        CartCommand::Remove { id } => register.cart_remove(id).await?,
        CartCommand::Set { id, quantity } => register.cart_set(id, quantity).await?,
        CartCommand::Adjust { id, delta } => register.cart_adjust(id, delta).await?,
        CartCommand::Clear => {
            register.cart_clear().await?;
            Cart::new()
        }
    };

    let view = CartView {
        lines: &cart,
        summary: cart.summary(),
    };
    Reply::new(render::cart(&cart, &ctx.letterhead()), &view)
}
