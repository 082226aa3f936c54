mod support;

use discovery_engine::{
    decode_page, extract_initial_data, DiscoveryError, FetchSettings, InitialStateLoader,
    ParseError, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{channel_renderer, search_document, seed_html};

#[test]
fn extracts_embedded_initial_data() {
    let document = search_document(vec![channel_renderer("UCabc123")], Some("TOK1"));
    let html = seed_html(&document);

    let parsed = extract_initial_data(&html).expect("marker present");
    assert_eq!(parsed.root(), &document);
}

#[test]
fn marker_spanning_lines_is_found() {
    let html = "<script>var ytInitialData = {\n  \"a\": {\"b\": 1}\n};</script><script>var other = {};</script>";
    let parsed = extract_initial_data(html).expect("marker present");
    assert_eq!(parsed.into_root(), json!({"a": {"b": 1}}));
}

#[test]
fn missing_marker_is_a_parse_failure() {
    let err = extract_initial_data("<html><body>consent wall</body></html>").unwrap_err();
    assert_eq!(err, ParseError::MarkerNotFound);
}

#[test]
fn malformed_json_is_a_parse_failure() {
    let err = extract_initial_data("var ytInitialData = {\"a\": };</script>").unwrap_err();
    assert!(matches!(err, ParseError::MalformedJson(_)));
}

#[test]
fn decode_prefers_bom_over_header() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("caf\u{e9}".as_bytes());
    let text = decode_page(&bytes, Some("text/html; charset=iso-8859-1")).unwrap();
    assert_eq!(text, "caf\u{e9}");
}

#[test]
fn decode_uses_header_charset() {
    let bytes = [b'c', b'a', b'f', 0xE9];
    let text = decode_page(&bytes, Some("text/html; charset=\"windows-1252\"")).unwrap();
    assert_eq!(text, "caf\u{e9}");
}

#[tokio::test]
async fn loader_fetches_and_parses_seed_page() {
    support::init_logging();
    let server = MockServer::start().await;
    let document = search_document(vec![channel_renderer("UCabc123")], None);
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(seed_html(&document), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let loader = InitialStateLoader::new(&fetcher);
    let loaded = loader
        .load(&format!("{}/results", server.uri()))
        .await
        .expect("seed page loads");
    assert_eq!(loaded.root(), &document);
}

#[tokio::test]
async fn loader_reports_marker_missing_without_panicking() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = InitialStateLoader::new(&fetcher)
        .load(&format!("{}/results", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err, DiscoveryError::Parse(ParseError::MarkerNotFound));
}

#[tokio::test]
async fn loader_reports_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = InitialStateLoader::new(&fetcher)
        .load(&format!("{}/results", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Transport(_)));
}
