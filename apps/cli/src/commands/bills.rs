//! # Bill Commands
//!
//! Listing the archive and working on one archived bill.

use serde_json::json;

use super::{Context, Reply};
use crate::cli::{BillCommand, RangeArgs};
use crate::error::{CliError, CliResult};
use crate::render::{self, BillView};

/// Bills in the selected range, newest first.
pub async fn list(ctx: &Context, args: &RangeArgs) -> CliResult<Reply> {
    let range = args.resolve(ctx.today)?;
    let bills = ctx.register.bills_in_range(&range).await?;

    Reply::new(render::bill_list(&bills, &ctx.letterhead()), &bills)
}

pub async fn run(ctx: &Context, cmd: BillCommand) -> CliResult<Reply> {
    match cmd {
        BillCommand::Show { number, internal } => {
            let bill = ctx.register.bill(&number).await?;
            let view = if internal {
                BillView::Internal
            } else {
                BillView::Customer
            };
            Reply::new(render::bill(&bill, view, &ctx.letterhead()), &bill)
        }

        BillCommand::Edit {
            number,
            lines,
            date,
        } => {
            if lines.is_empty() && date.is_none() {
                return Err(CliError::validation(
                    "Nothing to edit; pass --line or --date",
                ));
            }
            let bill = ctx.register.edit_bill(&number, &lines, date).await?;
            Reply::new(
                render::bill(&bill, BillView::Internal, &ctx.letterhead()),
                &bill,
            )
        }

        BillCommand::Delete { numbers } => {
            if let [number] = numbers.as_slice() {
                let bill = ctx.register.delete_bill(number).await?;
                return Reply::new(
                    format!("Deleted {}", bill.bill_number),
                    &json!({ "deleted": [bill.bill_number] }),
                );
            }

            let removed = ctx.register.delete_bills(&numbers).await?;
            Reply::new(
                format!("Deleted {} of {} bills", removed, numbers.len()),
                &json!({ "requested": numbers.len(), "deleted": removed }),
            )
        }
    }
}
