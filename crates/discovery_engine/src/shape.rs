//! Defensive traversal over platform JSON and the document templates known to
//! carry item nodes. Every lookup may come back empty; nothing here panics or
//! errors on an unexpected shape.

use discovery_core::DiscoveryMode;
use serde_json::Value;

/// Generic wrappers are followed this many levels deep.
pub(crate) const MAX_NESTING: usize = 4;

/// Follows object keys; a missing key or a non-object node yields `None`.
pub(crate) fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

/// Array at `path`, empty when absent or not an array.
pub(crate) fn items<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    at(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Non-blank string at `path`.
pub(crate) fn text<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    at(value, path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Items wrapped in `itemSectionRenderer`.
pub(crate) fn section_items(item: &Value) -> &[Value] {
    items(item, &["itemSectionRenderer", "contents"])
}

/// A document shape known to carry item nodes.
#[derive(Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    locate: fn(&Value) -> Option<Vec<&Value>>,
}

impl Template {
    /// `None` when the document does not have this shape at all.
    pub fn locate<'a>(&self, root: &'a Value) -> Option<Vec<&'a Value>> {
        (self.locate)(root)
    }
}

const SEARCH_TEMPLATES: &[Template] = &[
    Template {
        name: "two-column search results",
        locate: search_sections,
    },
    Template {
        name: "appended search items",
        locate: appended_search_items,
    },
];

const RELATED_TEMPLATES: &[Template] = &[
    Template {
        name: "appended watch-next items",
        locate: appended_watch_items,
    },
    Template {
        name: "watch-next secondary results",
        locate: watch_next_results,
    },
];

/// Watch-next pages put the token in the inline list before appended batches.
const RELATED_TOKEN_TEMPLATES: &[Template] = &[
    Template {
        name: "watch-next secondary results",
        locate: watch_next_results,
    },
    Template {
        name: "appended watch-next items",
        locate: appended_watch_items,
    },
];

/// Templates for a mode, in priority order.
pub fn templates(mode: DiscoveryMode) -> &'static [Template] {
    match mode {
        DiscoveryMode::Search => SEARCH_TEMPLATES,
        DiscoveryMode::RelatedVideo => RELATED_TEMPLATES,
    }
}

/// Item lists searched for a continuation token, in priority order.
pub(crate) fn token_templates(mode: DiscoveryMode) -> &'static [Template] {
    match mode {
        DiscoveryMode::Search => SEARCH_TEMPLATES,
        DiscoveryMode::RelatedVideo => RELATED_TOKEN_TEMPLATES,
    }
}

fn array_at<'a>(root: &'a Value, path: &[&str]) -> Option<Vec<&'a Value>> {
    at(root, path)
        .and_then(Value::as_array)
        .map(|array| array.iter().collect())
}

fn search_sections(root: &Value) -> Option<Vec<&Value>> {
    array_at(
        root,
        &[
            "contents",
            "twoColumnSearchResultsRenderer",
            "primaryContents",
            "sectionListRenderer",
            "contents",
        ],
    )
}

pub(crate) fn watch_next_results(root: &Value) -> Option<Vec<&Value>> {
    array_at(
        root,
        &[
            "contents",
            "twoColumnWatchNextResults",
            "secondaryResults",
            "secondaryResults",
            "results",
        ],
    )
}

fn appended_search_items(root: &Value) -> Option<Vec<&Value>> {
    appended_items(root, "onResponseReceivedCommands")
}

fn appended_watch_items(root: &Value) -> Option<Vec<&Value>> {
    appended_items(root, "onResponseReceivedEndpoints")
}

/// Items of every `appendContinuationItemsAction` under `commands_key`. Matches
/// only if at least one command carries an item array.
fn appended_items<'a>(root: &'a Value, commands_key: &str) -> Option<Vec<&'a Value>> {
    let commands = root.get(commands_key)?.as_array()?;
    let mut matched = false;
    let mut found = Vec::new();
    for command in commands {
        if let Some(batch) = at(command, &["appendContinuationItemsAction", "continuationItems"])
            .and_then(Value::as_array)
        {
            matched = true;
            found.extend(batch.iter());
        }
    }
    matched.then_some(found)
}
