use std::{collections::HashMap, time::Duration};

use inventory_reservation_api::config::AppConfig;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_when_only_database_url_is_set() {
    let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/app")])).unwrap();
    assert_eq!(config.database_url, "postgres://db/app");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.txn_timeout, Duration::from_millis(5_000));
}

#[test]
fn explicit_values_override_defaults() {
    let config = AppConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://db/app"),
        ("APP_HOST", "0.0.0.0"),
        ("APP_PORT", "8082"),
        ("DB_MAX_CONNECTIONS", "32"),
        ("TXN_TIMEOUT_MS", "750"),
    ]))
    .unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8082);
    assert_eq!(config.max_connections, 32);
    assert_eq!(config.txn_timeout, Duration::from_millis(750));
}

#[test]
fn unparsable_or_zero_values_fall_back() {
    let config = AppConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://db/app"),
        ("APP_PORT", "not-a-port"),
        ("DB_MAX_CONNECTIONS", "0"),
        ("TXN_TIMEOUT_MS", "0"),
    ]))
    .unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.txn_timeout, Duration::from_millis(5_000));
}

#[test]
fn missing_database_url_is_an_error() {
    assert!(AppConfig::from_lookup(lookup(&[])).is_err());
}
