//! Embedded-payload location
//!
//! The video site inlines its data as a JS assignment
//! (`var ytInitialData = {...};`) with no machine-friendly terminator, so
//! the only way to find the end of the object is to scan forward balancing
//! braces. Both the resolver and the search client use this one utility
//! rather than carrying their own copy of the scan.

use crate::error::{Error, Result};
use serde_json::Value;

/// Markers the initial-data assignment is known to appear under
const INITIAL_DATA_MARKERS: &[&str] = &["var ytInitialData = ", "window[\"ytInitialData\"] = "];

/// Returns the first balanced top-level JSON object following `marker`
/// in `haystack`, or `None` if the marker or a balanced object cannot be
/// found.
///
/// The scan counts `{`/`}` bytes without interpreting string literals;
/// a brace inside a JSON string can therefore truncate the slice early.
/// Callers parse the result and treat a parse failure like a missing
/// payload, which keeps that (rare) case harmless.
pub fn balanced_json_object<'a>(haystack: &'a str, marker: &str) -> Option<&'a str> {
    let after = &haystack[haystack.find(marker)? + marker.len()..];
    let start = after.find('{')?;

    let mut depth = 0usize;
    for (i, b) in after.bytes().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&after[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extracts and parses the `ytInitialData` payload from a page.
pub fn initial_data(html: &str) -> Result<Value> {
    for marker in INITIAL_DATA_MARKERS {
        if let Some(raw) = balanced_json_object(html, marker) {
            return Ok(serde_json::from_str(raw)?);
        }
    }
    Err(Error::Payload("initial data payload not found"))
}
