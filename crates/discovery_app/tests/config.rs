use std::path::PathBuf;
use std::time::Duration;

use discovery_app::AppConfig;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn missing_path_gives_defaults() {
    let config = AppConfig::load(None).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.engine.discovery.search.client.hl, "ja");
    assert_eq!(config.engine.discovery.related.client.gl, "US");
}

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let config = AppConfig::from_ron(
        r#"(
            output_dir: "runs",
            related_depth: 3,
            engine: (
                detail_concurrency: 8,
                fetch: (request_timeout: (secs: 5, nanos: 0)),
            ),
            yt_dlp: (program: "/opt/bin/yt-dlp"),
        )"#,
    )
    .unwrap();

    assert_eq!(config.output_dir, PathBuf::from("runs"));
    assert_eq!(config.related_depth, 3);
    assert_eq!(config.engine.detail_concurrency, 8);
    assert_eq!(config.engine.fetch.request_timeout, Duration::from_secs(5));
    assert_eq!(config.engine.fetch.redirect_limit, 5);
    assert_eq!(config.yt_dlp.program, "/opt/bin/yt-dlp");
    assert_eq!(config.yt_dlp.timeout, Duration::from_secs(120));
    assert_eq!(config.known_ids_path, PathBuf::from("known_channels.ron"));
}

#[test]
fn origin_override_is_read() {
    let config =
        AppConfig::from_ron(r#"(engine: (discovery: (origin: "http://127.0.0.1:9000")))"#)
            .unwrap();
    assert_eq!(
        config.engine.discovery.endpoint_url(discovery_core::DiscoveryMode::Search),
        "http://127.0.0.1:9000/youtubei/v1/search?prettyPrint=false"
    );
}

#[test]
fn unreadable_or_invalid_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(AppConfig::load(Some(&temp.path().join("missing.ron"))).is_err());

    let path = temp.path().join("broken.ron");
    std::fs::write(&path, "(output_dir: ").unwrap();
    assert!(AppConfig::load(Some(&path)).is_err());
}
