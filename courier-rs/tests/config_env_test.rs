//! Environment layering for configuration
//!
//! Kept in its own binary: it mutates process environment, which every
//! `Config::load_from` call in the same process would observe.

use courier_rs::config::Config;
use std::io::Write;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(b"[templates]\nfetch_timeout_secs = 3\n[smtp]\nhost = \"relay.internal\"\n")
        .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    std::env::set_var("COURIER_TEMPLATES__FETCH_TIMEOUT_SECS", "42");
    std::env::set_var("COURIER_SERVER__ALLOWED_TYPES", "text,handlebars");
    let config = Config::load_from(&path);
    std::env::remove_var("COURIER_TEMPLATES__FETCH_TIMEOUT_SECS");
    std::env::remove_var("COURIER_SERVER__ALLOWED_TYPES");

    let config = config.unwrap();
    assert_eq!(config.templates.fetch_timeout_secs, 42);
    assert_eq!(config.server.allowed_types, ["text", "handlebars"]);
    // Keys absent from the environment still come from the file
    assert_eq!(config.smtp.host, "relay.internal");
}
