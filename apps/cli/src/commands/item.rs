//! # Item Commands
//!
//! Catalog maintenance, including the starter catalog and purchase-rate
//! corrections.

use std::collections::HashMap;
use std::path::Path;

use kirana_core::{ItemDraft, ItemPatch};
use serde_json::json;
use tracing::info;

use super::{Context, Reply};
use crate::cli::ItemCommand;
use crate::error::{CliError, CliResult};
use crate::render;

pub async fn run(ctx: &Context, cmd: ItemCommand) -> CliResult<Reply> {
    let catalog = ctx.register.database().catalog();

    match cmd {
        ItemCommand::List => {
            let items = catalog.list().await?;
            Reply::new(render::items(&items, &ctx.letterhead()), &items)
        }

        ItemCommand::Add {
            name,
            unit,
            store_rate,
            purchase_rate,
            image_url,
        } => {
            let draft = ItemDraft {
                image_url,
                ..ItemDraft::new(&name, &unit, store_rate, purchase_rate)
            };
            let item = catalog.add(draft).await?;
            Reply::new(format!("Added item {} ({})", item.id, item.name), &item)
        }

        ItemCommand::Update {
            id,
            name,
            unit,
            store_rate,
            purchase_rate,
            image_url,
            clear_image,
        } => {
            let image_url = if clear_image {
                Some(None)
            } else {
                image_url.map(Some)
            };
            let patch = ItemPatch {
                name,
                unit,
                store_rate,
                purchase_rate,
                image_url,
            };
            let item = catalog.update(id, patch).await?;
            Reply::new(format!("Updated item {} ({})", item.id, item.name), &item)
        }

        ItemCommand::Remove { id } => {
            let removed = catalog.remove(id).await?;
            let text = if removed {
                format!("Removed item {}", id)
            } else {
                format!("Item {} was not in the catalog", id)
            };
            Reply::new(text, &json!({ "id": id, "removed": removed }))
        }

        ItemCommand::Seed { force } => {
            let existing = catalog.list().await?.len();
            if existing > 0 && !force {
                return Reply::new(
                    format!("Catalog already has {} items; pass --force to replace it", existing),
                    &json!({ "seeded": 0, "existing": existing }),
                );
            }
            let seeded = catalog.seed_defaults().await?;
            Reply::new(format!("Seeded {} items", seeded), &json!({ "seeded": seeded }))
        }

        ItemCommand::Rates { file } => {
            let rates = read_rates(&file)?;
            let updated = catalog.apply_purchase_rates(&rates).await?;
            info!(file = %file.display(), updated, "Purchase-rate file applied");
            Reply::new(
                format!("Updated purchase rates for {} of {} items", updated, rates.len()),
                &json!({ "offered": rates.len(), "updated": updated }),
            )
        }
    }
}

/// Reads an `item name -> purchase rate` map.
fn read_rates(path: &Path) -> CliResult<HashMap<String, f64>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::validation(format!("Cannot read {}: {}", path.display(), e)))?;

    serde_json::from_str(&raw).map_err(|e| {
        CliError::validation(format!(
            "{} is not a JSON object of item rates: {}",
            path.display(),
            e
        ))
    })
}
