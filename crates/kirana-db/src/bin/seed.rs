//! # Starter Catalog Seeder
//!
//! Fills an empty database with the default kirana catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./kirana_dev.db with the 27 starter items
//! cargo run -p kirana-db --bin seed
//!
//! # Specify database path
//! cargo run -p kirana-db --bin seed -- --db ./data/kirana.db
//!
//! # Also give every item opening stock
//! cargo run -p kirana-db --bin seed -- --stock 25
//!
//! # Replace an existing catalog
//! cargo run -p kirana-db --bin seed -- --force
//! ```

use std::env;

use kirana_core::{OversellPolicy, StockOp};
use kirana_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kirana_dev.db");
    let mut opening_stock: Option<f64> = None;
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    opening_stock = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Kirana Starter Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kirana_dev.db)");
                println!("  -s, --stock <QTY>  Opening stock for every item");
                println!("  -f, --force        Replace an existing catalog");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kirana Starter Catalog Seeder");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let catalog = db.catalog();
    let existing = catalog.list().await?.len();
    if existing > 0 && !force {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to keep the current catalog.");
        println!("  Pass --force to replace it.");
        return Ok(());
    }

    let seeded = catalog.seed_defaults().await?;
    println!("✓ Seeded {} items", seeded);

    if let Some(quantity) = opening_stock {
        let stock = db.stock();
        for item in catalog.list().await? {
            stock
                .apply(item.id, &item.name, StockOp::Set, quantity, OversellPolicy::Clamp)
                .await?;
        }
        println!("✓ Opening stock set to {} for every item", quantity);
    }

    println!();
    println!("✓ Seed complete!");
    db.close().await;

    Ok(())
}
