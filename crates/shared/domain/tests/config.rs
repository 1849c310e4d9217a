use ohub_domain::config::{ApiConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 8080);
    assert!(server.address.is_unspecified());
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "ohub");
    assert_eq!(db.database, "orders");
    assert!(db.credentials.is_none());

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.directory.is_none());
    assert_eq!(logging.max_files, 10);
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "::", "port": 9090 },
        "database": { "url": "ws://db:8000", "credentials": { "username": "root", "password": "secret" } },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 9090);
    assert_eq!(cfg.database.url, "ws://db:8000");
    assert_eq!(cfg.database.namespace, "ohub");
    assert_eq!(cfg.database.credentials.as_ref().map(|c| c.username.as_str()), Some("root"));
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert!(cfg.logging.console);
}

#[test]
fn empty_document_yields_defaults() {
    let cfg: ApiConfig = serde_json::from_value(json!({})).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.database, "orders");
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 1234;

    assert_eq!(original.server.port, 8080);
    assert_eq!(changed.server.port, 1234);
}
