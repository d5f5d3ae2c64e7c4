//! # Plain-Text Rendering
//!
//! Everything the CLI prints without `--json`.
//!
//! ## Bill Views
//! ```text
//! Customer                                 Internal
//! ───────────────────────────────────      ──────────────────────────────────────────────────
//!  #  Item        Qty      Rate   Amount    #  Item        Qty     Rate  Amount  Cost  Profit
//!  1  TOOR DAL    2 KG    75.00   150.00    1  TOOR DAL    2 KG   75.00  150.00 120.00  30.00
//! ───────────────────────────────────      ──────────────────────────────────────────────────
//!  Grand Total              ₹225.00         Total / Cost / Profit
//! ```

use kirana_core::money::{format_currency_with, format_quantity};
use kirana_core::report::{DailyTotal, SalesSummary};
use kirana_core::stock::StockMovement;
use kirana_core::{Bill, Cart, Item, StockEntry};

/// Which columns a printed bill shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillView {
    /// Lines and grand total only.
    Customer,
    /// Adds cost and profit per line and overall.
    Internal,
}

/// Store details printed around bills and totals.
#[derive(Debug, Clone)]
pub struct Letterhead<'a> {
    pub store_name: &'a str,
    pub currency_symbol: &'a str,
}

impl Letterhead<'_> {
    fn money(&self, amount: f64) -> String {
        format_currency_with(amount, self.currency_symbol)
    }
}

const NAME_WIDTH: usize = 20;

fn rule(width: usize) -> String {
    "-".repeat(width)
}

fn clip(name: &str) -> String {
    name.chars().take(NAME_WIDTH).collect()
}

// =============================================================================
// Bills
// =============================================================================

pub fn bill(bill: &Bill, view: BillView, head: &Letterhead<'_>) -> String {
    let width = match view {
        BillView::Customer => 64,
        BillView::Internal => 84,
    };
    let mut out = Vec::new();

    out.push(head.store_name.to_string());
    out.push(format!("Bill: {:<20} Date: {}", bill.bill_number, bill.date_label()));
    out.push(rule(width));

    let mut header = format!(
        "{:>3}  {:<w$} {:>10} {:>12} {:>12}",
        "#",
        "Item",
        "Qty",
        "Rate",
        "Amount",
        w = NAME_WIDTH
    );
    if view == BillView::Internal {
        header.push_str(&format!(" {:>9} {:>9}", "Cost", "Profit"));
    }
    out.push(header);

    for (index, line) in bill.items.iter().enumerate() {
        let mut row = format!(
            "{:>3}  {:<w$} {:>10} {:>12} {:>12}",
            index + 1,
            clip(&line.name),
            format_quantity(line.quantity, &line.unit),
            head.money(line.store_rate),
            head.money(line.amount),
            w = NAME_WIDTH
        );
        if view == BillView::Internal {
            row.push_str(&format!(" {:>9.2} {:>9.2}", line.cost, line.profit));
        }
        out.push(row);
    }

    out.push(rule(width));
    out.push(format!("Grand Total: {}", head.money(bill.total_amount)));
    if view == BillView::Internal {
        out.push(format!("Total Cost:  {}", head.money(bill.total_cost)));
        out.push(format!("Profit:      {}", head.money(bill.profit)));
    }

    out.join("\n")
}

/// One line per bill.
pub fn bill_list(bills: &[Bill], head: &Letterhead<'_>) -> String {
    if bills.is_empty() {
        return "No bills".to_string();
    }

    bills
        .iter()
        .map(|b| {
            format!(
                "{:<10} {}  {:>3} lines  {:>12}",
                b.bill_number,
                b.date_label(),
                b.items.len(),
                head.money(b.total_amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Catalog, Stock, Cart
// =============================================================================

pub fn items(items: &[Item], head: &Letterhead<'_>) -> String {
    if items.is_empty() {
        return "No items".to_string();
    }

    items
        .iter()
        .map(|item| {
            format!(
                "{:>4}  {:<w$} {:<5} {:>10} {:>10} {:>10}",
                item.id,
                clip(&item.name),
                item.unit,
                head.money(item.store_rate),
                head.money(item.purchase_rate),
                head.money(item.profit_margin),
                w = NAME_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stock_entries(entries: &[StockEntry]) -> String {
    if entries.is_empty() {
        return "No stock entries".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{:>4}  {:<w$} {:>10}  {}",
                entry.item_id,
                clip(&entry.item_name),
                format_quantity(entry.quantity, ""),
                entry.last_updated.format("%d-%m-%Y %H:%M"),
                w = NAME_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stock_movement(movement: &StockMovement) -> String {
    format!(
        "{} (#{}) now {}",
        movement.item_name,
        movement.item_id,
        format_quantity(movement.quantity, "")
    )
}

pub fn cart(cart: &Cart, head: &Letterhead<'_>) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            format!(
                "{:>4}  {:<w$} {:>10} x {:>10} = {:>12}",
                line.id,
                clip(&line.name),
                format_quantity(line.quantity, &line.unit),
                head.money(line.store_rate),
                head.money(line.amount()),
                w = NAME_WIDTH
            )
        })
        .collect();

    let summary = cart.summary();
    out.push(rule(64));
    out.push(format!(
        "{} lines  Total: {}",
        summary.line_count,
        head.money(summary.total_amount)
    ));
    out.join("\n")
}

// =============================================================================
// Reports
// =============================================================================

pub fn report(summary: &SalesSummary, days: &[DailyTotal], head: &Letterhead<'_>) -> String {
    let mut out = vec![
        format!("Bills:  {}", summary.bill_count),
        format!("Sales:  {}", head.money(summary.total_sales)),
        format!("Cost:   {}", head.money(summary.total_cost)),
        format!("Profit: {}", head.money(summary.total_profit)),
    ];

    if !days.is_empty() {
        out.push(String::new());
        for day in days {
            out.push(format!(
                "{}  {:>12} {:>12} {:>12}",
                day.date.format("%d-%m-%Y"),
                head.money(day.sales),
                head.money(day.cost),
                head.money(day.profit)
            ));
        }
    }

    out.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================
