use super::{load_settings_from, normalize_server_url, parse_server_url, ClientSettings};

use std::{
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

#[test]
fn normalizes_bare_host_to_http_url() {
    assert_eq!(
        normalize_server_url("localhost:8000/"),
        "http://localhost:8000"
    );
}

#[test]
fn keeps_explicit_scheme_and_strips_trailing_slashes() {
    assert_eq!(
        normalize_server_url("  https://swiftmaq.example.com//  "),
        "https://swiftmaq.example.com"
    );
}

#[test]
fn empty_server_url_falls_back_to_default() {
    assert_eq!(
        normalize_server_url("   "),
        ClientSettings::default().server_url
    );
}

#[test]
fn parse_rejects_garbage() {
    assert!(parse_server_url("http://exa mple.com").is_err());
    let url = parse_server_url("127.0.0.1:9000").expect("url");
    assert_eq!(url.port(), Some(9000));
}

#[test]
fn file_values_override_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("swiftmaq_client_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("client.toml");
    fs::write(
        &path,
        "poll_interval_secs = \"2\"\nrequest_timeout_secs = \"30\"\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path);
    assert_eq!(settings.poll_interval, Duration::from_secs(2));
    assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_file_keeps_default_timing() {
    let settings = load_settings_from(std::path::Path::new("/nonexistent/client.toml"));
    assert_eq!(settings.request_timeout, None);
}
