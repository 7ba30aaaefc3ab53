use std::sync::Arc;

use cotiza::display::StatusBanner;
use cotiza::{CotizaConfig, SnapshotStore};
use cotiza_core::{FileStorage, SnapshotCache};
use cotiza_demos::common::build_cotiza;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Persist the last good snapshot next to other temp files so a later
    // offline run can fall back to it.
    let dir = std::env::temp_dir().join("cotiza-demos");
    let store = Arc::new(SnapshotCache::new(
        Arc::new(FileStorage::new(&dir)),
        cotiza::CotizaConfig::default().cache_key,
    ));
    if let Some(previous) = store.load() {
        println!("Cached snapshot from {} ({})", previous.provider(), previous.as_of());
    }

    let cotiza = build_cotiza(CotizaConfig::default(), Some(store as Arc<dyn SnapshotStore>))?;
    let mut sub = cotiza.resolve_rates();

    println!("state: {}", sub.current().status());
    while let Some(state) = sub.changed().await {
        print!("state: {}", state.status());
        if let Some(banner) = StatusBanner::from_state(&state) {
            print!(" ({banner})");
        }
        println!();
        if let Some(snapshot) = state.snapshot() {
            println!("{} rates from {}", snapshot.rates().len(), snapshot.provider());
        }
        if state.is_terminal() {
            break;
        }
    }

    Ok(())
}
