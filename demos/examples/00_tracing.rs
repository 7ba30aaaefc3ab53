use cotiza::CotizaConfig;
use cotiza_demos::common::build_cotiza;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,cotiza=trace,cotiza_providers=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let cotiza = build_cotiza(CotizaConfig::default(), None)?;
    let res = cotiza.resolve().await;
    for attempt in &res.attempts {
        tracing::info!(
            provider = attempt.provider,
            elapsed_ms = attempt.elapsed.as_millis(),
            accepted = attempt.accepted(),
            "attempt"
        );
    }
    println!("final status: {}", res.state.status());

    Ok(())
}
