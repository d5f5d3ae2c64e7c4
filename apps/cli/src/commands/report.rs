//! # Report Command
//!
//! Sales, cost and profit over a date range, with per-day totals.

use kirana_core::report::{DailyTotal, SalesSummary};
use serde::Serialize;

use super::{Context, Reply};
use crate::cli::RangeArgs;
use crate::error::CliResult;
use crate::render;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SalesReport {
    summary: SalesSummary,
    days: Vec<DailyTotal>,
}

pub async fn run(ctx: &Context, args: &RangeArgs) -> CliResult<Reply> {
    let range = args.resolve(ctx.today)?;

    let report = SalesReport {
        summary: ctx.register.sales_summary(&range).await?,
        days: ctx.register.daily_totals(&range).await?,
    };

    Reply::new(
        render::report(&report.summary, &report.days, &ctx.letterhead()),
        &report,
    )
}
