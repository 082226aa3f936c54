use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::Regex;
use serde_json::Value;

use crate::fetch::PageFetcher;
use crate::{DiscoveryError, ParseError};

static INITIAL_DATA_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)var ytInitialData = (\{.*?\});</script>")
        .expect("initial data marker regex is valid")
});

/// The JSON state a seed page embeds for its first render.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapDocument {
    root: Value,
}

impl BootstrapDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }
}

/// Locates `var ytInitialData = {...};</script>` and parses the captured object.
pub fn extract_initial_data(html: &str) -> Result<BootstrapDocument, ParseError> {
    let captures = INITIAL_DATA_MARKER
        .captures(html)
        .ok_or(ParseError::MarkerNotFound)?;
    let raw = captures.get(1).ok_or(ParseError::MarkerNotFound)?.as_str();
    let root = serde_json::from_str(raw).map_err(|err| ParseError::MalformedJson(err.to_string()))?;
    Ok(BootstrapDocument::new(root))
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng fallback.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<String, ParseError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(bytes, encoding)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<String, ParseError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ParseError::Undecodable {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

/// Initial-State Loader: one GET, decode, locate the bootstrap JSON.
pub struct InitialStateLoader<'a> {
    fetcher: &'a dyn PageFetcher,
}

impl<'a> InitialStateLoader<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn load(&self, url: &str) -> Result<BootstrapDocument, DiscoveryError> {
        let output = self.fetcher.get(url).await?;
        let html = decode_page(&output.bytes, output.metadata.content_type.as_deref())?;
        Ok(extract_initial_data(&html)?)
    }
}
