use cotiza::CotizaConfig;
use cotiza::display::{DEFAULT_CATALOG, StatusBanner, cards, fetched_at_label, reference_line};
use cotiza_demos::common::build_cotiza;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = CotizaConfig::default();
    let cotiza = build_cotiza(cfg.clone(), None)?;

    println!("Fetching {} rates...", cfg.base);
    let res = cotiza.resolve().await;

    if let Some(banner) = StatusBanner::from_state(&res.state) {
        println!("[{:?}] {banner}", banner.kind);
    }
    let snapshot = res.into_snapshot()?;

    println!("{}", reference_line(&snapshot));
    if let Some(at) = fetched_at_label(&snapshot) {
        println!("Fetched at: {at}");
    }
    for card in cards(&snapshot, &cfg.allow_list, DEFAULT_CATALOG) {
        println!("\n{card}");
    }

    Ok(())
}
