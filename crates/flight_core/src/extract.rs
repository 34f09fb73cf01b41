//! Extraction of the embedded trackpoll bootstrap blob
//!
//! The tracking page inlines its structured flight state as a JavaScript
//! variable assignment. This module scans for that fixed marker and parses
//! the JSON object literal that follows it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::LookupError;

/// First `var trackpollBootstrap = {...};` assignment, non-greedy across lines
static TRACKPOLL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)var trackpollBootstrap = (\{.*?\});").unwrap());

/// Extract the `flights` mapping from the raw tracking-page HTML
///
/// # Arguments
/// * `html` - Raw response body of the tracking page
///
/// # Returns
/// * `Ok(mapping)` of flight keys to flight records; empty when the blob
///   parses but carries no `flights` object
/// * `Err(LookupError::NoData)` when the marker is absent or the captured
///   JSON fails to parse
pub fn extract_flights(html: &str) -> Result<Map<String, Value>, LookupError> {
    let captures = TRACKPOLL_RE.captures(html).ok_or_else(|| {
        debug!("No trackpollBootstrap marker in page");
        LookupError::NoData
    })?;

    let bootstrap: Value = serde_json::from_str(&captures[1]).map_err(|e| {
        debug!("trackpollBootstrap blob is not valid JSON: {}", e);
        LookupError::NoData
    })?;

    let flights = bootstrap
        .get("flights")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    debug!("Extracted {} flight record(s)", flights.len());
    Ok(flights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_blob(blob: &str) -> String {
        format!(
            "<html><head><script>var trackpollBootstrap = {blob};</script></head>\
             <body>tracking</body></html>"
        )
    }

    #[test]
    fn test_missing_marker_is_no_data() {
        let html = "<html><body><p>Flight DL400</p></body></html>";
        assert!(matches!(extract_flights(html), Err(LookupError::NoData)));

        // Well-formed document with unrelated scripts still has no data
        let html = "<html><script>var somethingElse = {\"a\": 1};</script></html>";
        assert!(matches!(extract_flights(html), Err(LookupError::NoData)));
    }

    #[test]
    fn test_malformed_blob_is_no_data() {
        let html = page_with_blob("{not json at all");
        assert!(matches!(extract_flights(&html), Err(LookupError::NoData)));
    }

    #[test]
    fn test_extracts_flights_mapping() {
        let html = page_with_blob(
            r#"{"flights": {"DAL400-1700000000": {"flightStatus": "en route"}}}"#,
        );
        let flights = extract_flights(&html).unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(
            flights["DAL400-1700000000"]["flightStatus"],
            Value::String("en route".to_string())
        );
    }

    #[test]
    fn test_blob_without_flights_key_is_empty_mapping() {
        let html = page_with_blob(r#"{"config": {"poll": 30}}"#);
        let flights = extract_flights(&html).unwrap();
        assert!(flights.is_empty());
    }

    #[test]
    fn test_multiline_blob() {
        let html = page_with_blob("{\n  \"flights\": {\n    \"UAL1\": {}\n  }\n}");
        let flights = extract_flights(&html).unwrap();
        assert_eq!(flights.len(), 1);
    }

    #[test]
    fn test_first_assignment_wins() {
        let html = format!(
            "{}{}",
            page_with_blob(r#"{"flights": {"FIRST": {}}}"#),
            page_with_blob(r#"{"flights": {"SECOND": {}}}"#)
        );
        let flights = extract_flights(&html).unwrap();
        assert!(flights.contains_key("FIRST"));
        assert!(!flights.contains_key("SECOND"));
    }
}
