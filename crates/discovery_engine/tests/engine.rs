mod support;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use discovery_core::{EntityReference, FollowUp, Seed};
use discovery_engine::{
    DetailError, DetailExtractor, DetailRecord, DiscoveryConfig, EngineConfig, EngineEvent,
    EngineHandle, FetchSettings, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{channel_renderer, search_document, seed_html};

struct EchoExtractor;

#[async_trait::async_trait]
impl DetailExtractor for EchoExtractor {
    async fn extract(&self, url: &str) -> Result<DetailRecord, DetailError> {
        Ok(DetailRecord {
            url: url.to_string(),
            payload: json!({"webpage_url": url}),
        })
    }
}

struct StuckExtractor;

#[async_trait::async_trait]
impl DetailExtractor for StuckExtractor {
    async fn extract(&self, _url: &str) -> Result<DetailRecord, DetailError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(DetailError::Timeout(Duration::from_secs(60)))
    }
}

fn engine(server: &MockServer, known: &[&str], detail: Arc<dyn DetailExtractor>) -> EngineHandle {
    let config = EngineConfig {
        discovery: DiscoveryConfig::with_origin(server.uri()),
        known_ids: known.iter().map(|id| id.to_string()).collect(),
        ..EngineConfig::default()
    };
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    EngineHandle::with_fetcher(config, fetcher, detail).expect("runtime starts")
}

/// Collects events until `done` says so or the deadline passes.
fn collect_until(
    engine: &EngineHandle,
    mut done: impl FnMut(&EngineEvent) -> bool,
) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            let stop = done(&event);
            events.push(event);
            if stop {
                break;
            }
        }
    }
    events
}

#[test]
fn discovery_runs_share_the_known_set() {
    support::init_logging();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                seed_html(&search_document(
                    vec![channel_renderer("UCold0001"), channel_renderer("UCnew0001")],
                    None,
                )),
                "text/html",
            ))
            .mount(&server)
            .await;
        server
    });

    let engine = engine(&server, &["UCold0001"], Arc::new(EchoExtractor));
    engine.discover(1, Seed::SearchQuery("vlog".to_string()));
    let first = collect_until(&engine, |e| matches!(e, EngineEvent::RunFinished { .. }));
    engine.discover(2, Seed::SearchQuery("vlog".to_string()));
    let second = collect_until(&engine, |e| matches!(e, EngineEvent::RunFinished { .. }));

    let emitted = |events: &[EngineEvent]| -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::FollowUp {
                    item: FollowUp::ChannelDetail { channel, .. },
                    ..
                } => Some(channel.id().to_string()),
                _ => None,
            })
            .collect()
    };
    assert_eq!(emitted(&first), vec!["UCnew0001"]);
    assert!(emitted(&second).is_empty());

    let expected: BTreeSet<String> = ["UCnew0001", "UCold0001"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(engine.known_ids(), expected);
}

#[test]
fn detail_extraction_reports_payload() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    let engine = engine(&server, &[], Arc::new(EchoExtractor));
    let channel = EntityReference::from_channel_id("UCabc123").unwrap();

    engine.extract_detail(9, channel.clone());
    let events = collect_until(&engine, |e| matches!(e, EngineEvent::DetailCompleted { .. }));

    let expected = EngineEvent::DetailCompleted {
        run_id: 9,
        channel: channel.clone(),
        result: Ok(DetailRecord {
            url: channel.url().to_string(),
            payload: json!({"webpage_url": "https://www.youtube.com/channel/UCabc123"}),
        }),
    };
    assert_eq!(events.last(), Some(&expected));
}

#[test]
fn stop_cancels_pending_extractions() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    let engine = engine(&server, &[], Arc::new(StuckExtractor));
    let channel = EntityReference::from_channel_id("UCabc123").unwrap();

    engine.extract_detail(3, channel);
    std::thread::sleep(Duration::from_millis(100));
    engine.stop();
    assert!(engine.is_stopped());

    let events = collect_until(&engine, |e| matches!(e, EngineEvent::DetailCompleted { .. }));
    assert!(matches!(
        events.last(),
        Some(EngineEvent::DetailCompleted {
            result: Err(DetailError::Cancelled),
            ..
        })
    ));
}
