//! # Checkout Command
//!
//! Turns the persisted cart into a numbered bill, decrements stock, and
//! prints the customer copy.

use chrono::NaiveDate;

use super::{Context, Reply};
use crate::error::CliResult;
use crate::render::{self, BillView};

pub async fn run(ctx: &Context, date: Option<NaiveDate>) -> CliResult<Reply> {
    let bill = ctx
        .register
        .checkout_cart_on(date.unwrap_or(ctx.today))
        .await?;

    Reply::new(
        render::bill(&bill, BillView::Customer, &ctx.letterhead()),
        &bill,
    )
}
