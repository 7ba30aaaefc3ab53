use std::sync::Arc;
use std::time::Duration;

use cotiza::{AllowList, Cotiza, CotizaConfig, CotizaError, CurrencyCode};
use cotiza_mock::{MockTransport, StaticProvider};
use cotiza_providers::default_chain;

#[test]
fn build_requires_a_provider() {
    let err = Cotiza::builder()
        .transport(Arc::new(MockTransport::new()))
        .build()
        .err()
        .expect("missing provider must fail");
    assert!(matches!(err, CotizaError::InvalidArg(_)));
}

#[test]
fn build_requires_a_transport() {
    let err = Cotiza::builder()
        .with_provider(Arc::new(StaticProvider::new("A").unwrap()))
        .build()
        .err()
        .expect("missing transport must fail");
    assert!(matches!(err, CotizaError::InvalidArg(_)));
}

#[test]
fn build_validates_configuration() {
    let base = || {
        Cotiza::builder()
            .with_provider(Arc::new(StaticProvider::new("A").unwrap()))
            .transport(Arc::new(MockTransport::new()))
    };
    assert!(base().provider_timeout(Duration::ZERO).build().is_err());
    let empty = CotizaConfig {
        allow_list: AllowList::new([]),
        ..CotizaConfig::default()
    };
    assert!(base().config(empty).build().is_err());
    assert!(base().build().is_ok());
}

#[test]
fn registration_order_is_priority_order() {
    let cotiza = Cotiza::builder()
        .with_provider(Arc::new(StaticProvider::new("first").unwrap()))
        .with_providers([
            Arc::new(StaticProvider::new("x").unwrap()) as Arc<dyn cotiza::RateProvider>,
            Arc::new(StaticProvider::new("y").unwrap()) as Arc<dyn cotiza::RateProvider>,
        ])
        .transport(Arc::new(MockTransport::new()))
        .build()
        .unwrap();
    assert_eq!(cotiza.provider_names(), ["first", "x", "y"]);
}

#[test]
fn defaults_follow_the_configuration() {
    let cfg = CotizaConfig {
        base: CurrencyCode::EUR,
        provider_timeout: Duration::from_secs(3),
        ..CotizaConfig::default()
    };
    let cotiza = Cotiza::builder()
        .with_provider(Arc::new(StaticProvider::new("A").unwrap()))
        .transport(Arc::new(MockTransport::new()))
        .config(cfg.clone())
        .build()
        .unwrap();
    assert_eq!(cotiza.config(), &cfg);
    assert_eq!(cotiza.store().load(), None);
}

#[test]
fn provider_base_must_match_the_configured_base() {
    let usd_chain = default_chain(&CotizaConfig::default()).unwrap();
    let eur = CotizaConfig {
        base: CurrencyCode::EUR,
        ..CotizaConfig::default()
    };

    let err = Cotiza::builder()
        .with_providers(usd_chain)
        .transport(Arc::new(MockTransport::new()))
        .config(eur.clone())
        .build()
        .err()
        .expect("mismatched base must fail");
    assert!(matches!(err, CotizaError::InvalidArg(ref m) if m.contains("EUR")), "{err:?}");

    let cotiza = Cotiza::builder()
        .with_providers(default_chain(&eur).unwrap())
        .transport(Arc::new(MockTransport::new()))
        .config(eur)
        .build()
        .unwrap();
    assert_eq!(cotiza.config().base, CurrencyCode::EUR);
}

#[test]
fn unpinned_providers_accept_any_base() {
    let cfg = CotizaConfig {
        base: CurrencyCode::EUR,
        ..CotizaConfig::default()
    };
    assert!(
        Cotiza::builder()
            .with_provider(Arc::new(StaticProvider::new("A").unwrap()))
            .transport(Arc::new(MockTransport::new()))
            .config(cfg)
            .build()
            .is_ok()
    );
}
