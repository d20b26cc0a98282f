//! Parsing helpers for classification responses
//!
//! Models are asked to respond with a JSON object keyed by the 1-based
//! position of each merchant in the submitted list. Keying by ordinal instead
//! of merchant name tolerates free-text responses that would otherwise
//! reorder, rename or drop entries. Responses often arrive wrapped in
//! markdown fences or surrounded by prose.

use std::collections::HashMap;

use crate::categories::{is_allowed_category, DEFAULT_CATEGORY};
use crate::error::{Error, Result};

/// Strip markdown code fences and surrounding prose from a model response,
/// leaving the JSON object payload.
fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in classification response | Raw: {}",
            if response.len() > 200 {
                format!("{}...", &response[..200])
            } else {
                response.to_string()
            }
        ))),
    }
}

/// Parse a numbered classification response back into merchant -> category.
///
/// Keys are 1-based ordinals as strings (`"1"`, `"2"`, ...); out-of-range or
/// non-numeric keys are dropped. Labels outside the closed category set are
/// coerced to the default category rather than rejected.
pub fn parse_numbered_categories(
    response: &str,
    merchants: &[String],
) -> Result<HashMap<String, String>> {
    let json_str = extract_json(response)?;

    let numbered: HashMap<String, String> = serde_json::from_str(json_str).map_err(|e| {
        let truncated = if json_str.len() > 200 {
            format!("{}...", &json_str[..200])
        } else {
            json_str.to_string()
        };
        Error::InvalidData(format!(
            "Invalid classification JSON: {} | Raw: {}",
            e, truncated
        ))
    })?;

    let mut result = HashMap::new();
    for (num_str, label) in numbered {
        let idx: usize = match num_str.trim().parse() {
            Ok(i) => i,
            Err(_) => continue,
        };
        if idx < 1 || idx > merchants.len() {
            continue;
        }

        let category = if is_allowed_category(&label) {
            label
        } else {
            DEFAULT_CATEGORY.to_string()
        };
        result.insert(merchants[idx - 1].clone(), category);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchants(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_plain_json() {
        let m = merchants(&["KOI THE", "GRAB"]);
        let result =
            parse_numbered_categories(r#"{"1": "drinks", "2": "transport"}"#, &m).unwrap();
        assert_eq!(result["KOI THE"], "drinks");
        assert_eq!(result["GRAB"], "transport");
    }

    #[test]
    fn test_parse_fenced_json() {
        let m = merchants(&["KOI THE"]);
        let response = "```json\n{\"1\": \"drinks\"}\n```";
        let result = parse_numbered_categories(response, &m).unwrap();
        assert_eq!(result["KOI THE"], "drinks");
    }

    #[test]
    fn test_parse_json_with_prose() {
        let m = merchants(&["KOI THE"]);
        let response = "Here are the categories:\n{\"1\": \"drinks\"}\nHope that helps!";
        let result = parse_numbered_categories(response, &m).unwrap();
        assert_eq!(result["KOI THE"], "drinks");
    }

    #[test]
    fn test_unknown_label_coerced_to_default() {
        let m = merchants(&["MYSTERY SHOP"]);
        let result =
            parse_numbered_categories(r#"{"1": "entertainment"}"#, &m).unwrap();
        assert_eq!(result["MYSTERY SHOP"], DEFAULT_CATEGORY);
    }

    #[test]
    fn test_out_of_range_and_junk_keys_dropped() {
        let m = merchants(&["KOI THE"]);
        let result = parse_numbered_categories(
            r#"{"1": "drinks", "2": "food", "0": "misc", "abc": "misc"}"#,
            &m,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["KOI THE"], "drinks");
    }

    #[test]
    fn test_no_json_is_error() {
        let m = merchants(&["KOI THE"]);
        assert!(parse_numbered_categories("sorry, I cannot help", &m).is_err());
    }
}
