//! JSON fixtures shaped like the platform's search and watch-next documents.
#![allow(dead_code)]

use std::sync::{Mutex, Once};

use discovery_engine::{EngineEvent, EventSink};
use serde_json::{json, Value};

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        engine_logging::initialize_for_tests();
    });
}

pub fn browse_endpoint(channel_id: &str, path: Option<&str>) -> Value {
    let mut endpoint = json!({"browseId": channel_id});
    if let Some(path) = path {
        endpoint["canonicalBaseUrl"] = json!(path);
    }
    json!({"browseEndpoint": endpoint})
}

pub fn channel_renderer(channel_id: &str) -> Value {
    json!({
        "channelRenderer": {
            "channelId": channel_id,
            "navigationEndpoint": browse_endpoint(channel_id, Some("/@handle")),
        }
    })
}

pub fn byline(channel_id: &str) -> Value {
    json!({"runs": [{"text": "Someone", "navigationEndpoint": browse_endpoint(channel_id, None)}]})
}

pub fn video_renderer(channel_id: &str) -> Value {
    json!({"videoRenderer": {"videoId": "v1", "longBylineText": byline(channel_id)}})
}

pub fn ad_slot(channel_id: &str) -> Value {
    json!({
        "searchPyvRenderer": {
            "ads": [{
                "adSlotRenderer": {
                    "fulfillmentContent": {
                        "fulfilledLayout": {
                            "inFeedAdLayoutRenderer": {
                                "renderingContent": {
                                    "promotedVideoRenderer": {
                                        "videoId": "ad1",
                                        "longBylineText": byline(channel_id),
                                    }
                                }
                            }
                        }
                    }
                }
            }]
        }
    })
}

pub fn compact_video(video_id: &str, channel_id: &str) -> Value {
    json!({
        "compactVideoRenderer": {
            "videoId": video_id,
            "shortBylineText": byline(channel_id),
        }
    })
}

pub fn continuation_item(token: &str) -> Value {
    json!({
        "continuationItemRenderer": {
            "continuationEndpoint": {"continuationCommand": {"token": token}}
        }
    })
}

pub fn item_section(items: Vec<Value>) -> Value {
    json!({"itemSectionRenderer": {"contents": items}})
}

/// Initial search document: one item section plus an optional trailing token.
pub fn search_document(items: Vec<Value>, token: Option<&str>) -> Value {
    let mut sections = vec![item_section(items)];
    sections.extend(token.map(continuation_item));
    json!({
        "contents": {
            "twoColumnSearchResultsRenderer": {
                "primaryContents": {"sectionListRenderer": {"contents": sections}}
            }
        }
    })
}

/// Search continuation response.
pub fn search_continuation(items: Vec<Value>, token: Option<&str>) -> Value {
    let mut batch = items;
    batch.extend(token.map(continuation_item));
    json!({
        "onResponseReceivedCommands": [
            {"appendContinuationItemsAction": {"continuationItems": batch}}
        ]
    })
}

/// Initial watch document with the secondary results list.
pub fn watch_document(results: Vec<Value>, token: Option<&str>) -> Value {
    let mut results = results;
    results.extend(token.map(continuation_item));
    json!({
        "contents": {
            "twoColumnWatchNextResults": {
                "secondaryResults": {"secondaryResults": {"results": results}}
            }
        }
    })
}

/// Watch-next continuation response.
pub fn watch_continuation(items: Vec<Value>, token: Option<&str>) -> Value {
    let mut batch = items;
    batch.extend(token.map(continuation_item));
    json!({
        "onResponseReceivedEndpoints": [
            {"appendContinuationItemsAction": {"continuationItems": batch}}
        ]
    })
}

/// Wraps a document the way a seed page embeds it.
pub fn seed_html(document: &Value) -> String {
    format!(
        "<!DOCTYPE html><html><head><script nonce=\"x\">var ytInitialData = {document};</script></head><body></body></html>"
    )
}

#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl CollectingSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
