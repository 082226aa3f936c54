use discovery_core::Seed;
use sha2::{Digest, Sha256};

/// Output file for the detail records of one root seed:
/// `{sanitized_label}--{short_hash(seed_url)}.jsonl`. Same seed, same file.
pub fn seed_filename(seed: &Seed, origin: &str) -> String {
    let sanitized = sanitize_label(&seed.label());
    let hash = short_hash(&seed.seed_url(origin));
    format!("{sanitized}--{hash}.jsonl")
}

fn sanitize_label(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| {
            if is_forbidden(c) || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "seed".to_string();
    }
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut final_name = compacted;
    if final_name.len() > 80 {
        let mut end = 80;
        while !final_name.is_char_boundary(end) {
            end -= 1;
        }
        final_name.truncate(end);
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
