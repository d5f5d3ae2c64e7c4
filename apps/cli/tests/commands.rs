//! End-to-end command runs against an in-memory store.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use kirana_cli::cli::Cli;
use kirana_cli::commands::{execute, Context, Reply};
use kirana_cli::config::AppConfig;
use kirana_cli::error::{CliResult, ErrorCode};
use kirana_core::OversellPolicy;
use kirana_db::{Database, DbConfig, Register};

async fn context(oversell: OversellPolicy) -> Context {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let config = AppConfig {
        database_path: PathBuf::from(":memory:"),
        store_name: "Sri Lakshmi Stores".to_string(),
        currency_symbol: "₹".to_string(),
        oversell,
    };
    Context::new(Register::with_policy(db, oversell), config)
        .with_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

async fn run(ctx: &Context, args: &[&str]) -> CliResult<Reply> {
    let cli = Cli::try_parse_from(std::iter::once("kirana").chain(args.iter().copied()))
        .expect("arguments should parse");
    execute(ctx, cli.command).await
}

#[tokio::test]
async fn test_sale_from_seed_to_report() {
    let ctx = context(OversellPolicy::Clamp).await;

    let seeded = run(&ctx, &["item", "seed"]).await.unwrap();
    assert_eq!(seeded.json["seeded"], 27);

    run(&ctx, &["stock", "set", "1", "10"]).await.unwrap();
    run(&ctx, &["cart", "add", "1", "2"]).await.unwrap();
    let cart = run(&ctx, &["cart", "adjust", "1", "-0.5"]).await.unwrap();
    assert_eq!(cart.json["lines"][0]["quantity"], 1.5);

    let bill = run(&ctx, &["checkout"]).await.unwrap();
    assert_eq!(bill.json["billNumber"], "BILL-001");
    assert_eq!(bill.json["date"], "15-03-2024");
    assert!(bill.text.starts_with("Sri Lakshmi Stores"));

    let stock = run(&ctx, &["stock", "show", "1"]).await.unwrap();
    assert_eq!(stock.json["quantity"], 8.5);

    let cart = run(&ctx, &["cart", "show"]).await.unwrap();
    assert_eq!(cart.text, "Cart is empty");

    let report = run(&ctx, &["report", "--preset", "today"]).await.unwrap();
    assert_eq!(report.json["summary"]["billCount"], 1);

    let listed = run(&ctx, &["bills", "--from", "2024-03-16"]).await.unwrap();
    assert_eq!(listed.text, "No bills");
}

#[tokio::test]
async fn test_bill_show_edit_delete() {
    let ctx = context(OversellPolicy::Clamp).await;
    run(&ctx, &["item", "add", "TOOR DAL", "KG", "75", "60"]).await.unwrap();
    run(&ctx, &["cart", "add", "1", "2"]).await.unwrap();
    run(&ctx, &["checkout", "--date", "14-03-2024"]).await.unwrap();

    let customer = run(&ctx, &["bill", "show", "1"]).await.unwrap();
    assert!(customer.text.contains("Grand Total: ₹150.00"));
    assert!(!customer.text.contains("Profit"));

    let internal = run(&ctx, &["bill", "show", "BILL-001", "--internal"]).await.unwrap();
    assert!(internal.text.contains("Profit:      ₹30.00"));

    let edited = run(&ctx, &["bill", "edit", "1", "--line", "1:3"]).await.unwrap();
    assert_eq!(edited.json["totalAmount"], 225.0);
    assert_eq!(edited.json["profit"], 45.0);

    let err = run(&ctx, &["bill", "edit", "1"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    run(&ctx, &["bill", "delete", "1"]).await.unwrap();
    let err = run(&ctx, &["bill", "show", "1"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_error_codes() {
    let ctx = context(OversellPolicy::Reject).await;
    run(&ctx, &["item", "add", "SALT", "PKT", "20", "15"]).await.unwrap();

    let err = run(&ctx, &["checkout"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = run(&ctx, &["cart", "add", "9", "1"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    run(&ctx, &["cart", "add", "1", "2"]).await.unwrap();
    let err = run(&ctx, &["checkout"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    let err = run(&ctx, &["stock", "add", "9", "1"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_purchase_rate_file() {
    let ctx = context(OversellPolicy::Clamp).await;
    run(&ctx, &["item", "seed"]).await.unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rates.json");
    std::fs::write(&path, r#"{"AJINOMOTO": 140, "NOT IN CATALOG": 10}"#).unwrap();

    let reply = run(&ctx, &["item", "rates", path.to_str().unwrap()]).await.unwrap();
    assert_eq!(reply.json["updated"], 1);
    assert_eq!(reply.json["offered"], 2);

    std::fs::write(&path, "not json").unwrap();
    let err = run(&ctx, &["item", "rates", path.to_str().unwrap()]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}
