//! Move one field of an object and persist the new order
//!
//! Reads `REORDER_API_URL` / `REORDER_API_TOKEN` and the `REORDER_*` settings
//! from the environment (or a `.env` file).
//!
//! Run: cargo run --example reorder_fields -- company 0 2

use anyhow::{Context, bail};
use reorder::{
    DragEvent, FieldListStore, Reconciler, ReorderConfig, ReorderOutcome, TableLayout,
    VisibleFilter, visible_items,
};
use reorder_client::{ClientConfig, FieldApi};
use shared::models::ObjectId;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(object), Some(from), Some(to)) = (args.next(), args.next(), args.next()) else {
        bail!("usage: reorder_fields <object-id> <from-index> <to-index>");
    };
    let object_id = ObjectId::new(object);
    let from: usize = from.parse().context("from-index must be a number")?;
    let to: usize = to.parse().context("to-index must be a number")?;

    let http = ClientConfig::from_env().build_http_client()?;
    let api = Arc::new(FieldApi::new(http));

    let store = FieldListStore::new();
    api.load_into(&store, &object_id).await?;

    if let Some(object) = api.cache().object(&object_id) {
        let columns: Vec<&str> = TableLayout::for_object(&object)
            .columns()
            .iter()
            .map(|c| c.label)
            .collect();
        println!("{} ({})", object.label_singular, columns.join(" | "));
    }

    let filter = VisibleFilter::default();
    let fields = store.get(&object_id).unwrap_or_default();
    let visible: Vec<_> = visible_items(&fields, &filter)
        .into_iter()
        .map(|f| f.id.clone())
        .collect();

    let reconciler = Reconciler::new(store.clone(), api.clone(), api.clone(), ReorderConfig::from_env());
    let outcome = reconciler
        .reconcile_reorder(&object_id, &visible, DragEvent::new(from, to))
        .await?;

    match &outcome {
        ReorderOutcome::Skipped(reason) => println!("Nothing to do: {:?}", reason),
        ReorderOutcome::Applied { moved, updated, total } => {
            println!("Moved {}: {} of {} fields updated", moved, updated, total)
        }
        ReorderOutcome::RolledBack { .. } => {
            if let Some(err) = outcome.notification() {
                println!(
                    "Reorder failed [{} {}] ({}): {}",
                    err.code.category().name(),
                    err.http_status(),
                    err.code,
                    err.message
                );
            }
        }
    }

    for field in visible_items(&store.get(&object_id).unwrap_or_default(), &filter) {
        println!("{:>6}  {}", field.position.unwrap_or_default(), field.label);
    }

    Ok(())
}
