use discovery_core::{ContinuationToken, DiscoveryMode};
use engine_logging::engine_debug;
use serde_json::Value;

use crate::shape::{section_items, text, token_templates, MAX_NESTING};

const TOKEN_PATH: [&str; 4] = [
    "continuationItemRenderer",
    "continuationEndpoint",
    "continuationCommand",
    "token",
];

/// Finds the opaque token for the next page inside the mode's item lists. The
/// first non-blank token found wins.
#[derive(Debug, Clone, Copy)]
pub struct ContinuationLocator {
    mode: DiscoveryMode,
}

impl ContinuationLocator {
    pub fn for_mode(mode: DiscoveryMode) -> Self {
        Self { mode }
    }

    /// `None` ends pagination. Absence is a normal outcome, not an error.
    pub fn locate(&self, root: &Value) -> Option<ContinuationToken> {
        let mut matched_any = false;
        for template in token_templates(self.mode) {
            let Some(nodes) = template.locate(root) else {
                continue;
            };
            matched_any = true;
            if let Some(token) = nodes.into_iter().find_map(|node| token_in(node, 0)) {
                return Some(token);
            }
        }
        if !matched_any {
            engine_debug!(
                "structural miss: no {} item list to search for a continuation",
                self.mode
            );
        }
        None
    }
}

fn token_in(item: &Value, depth: usize) -> Option<ContinuationToken> {
    if let Some(token) = text(item, &TOKEN_PATH).and_then(ContinuationToken::new) {
        return Some(token);
    }
    if depth >= MAX_NESTING {
        return None;
    }
    section_items(item)
        .iter()
        .find_map(|nested| token_in(nested, depth + 1))
}
