//! Result parsing for quote lookup payloads.
//!
//! Turns the service's JSON body (`{"docs": [{"title", "year", "phrase"}, ...]}`)
//! into an ordered [`ResultSet`].

use serde::Deserialize;
use serde_json::Value;

use quotefinder_core::{ResultItem, ResultSet};

use crate::error::LookupError;

#[derive(Debug, Deserialize)]
struct SearchPayload {
    docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    title: String,
    year: Value,
    phrase: String,
}

/// Parse a raw lookup payload.
///
/// An empty (or whitespace-only) payload is zero results, not an error. Any
/// structural problem is a [`LookupError::ParseFailure`].
pub fn parse(raw: &str) -> Result<ResultSet, LookupError> {
    if raw.trim().is_empty() {
        return Ok(ResultSet::empty());
    }

    let payload: SearchPayload =
        serde_json::from_str(raw).map_err(|e| LookupError::ParseFailure(e.to_string()))?;

    payload
        .docs
        .into_iter()
        .enumerate()
        .map(|(i, doc)| {
            let year = parse_year(&doc.year).ok_or_else(|| {
                LookupError::ParseFailure(format!("docs[{}].year is not a number: {}", i, doc.year))
            })?;
            Ok(ResultItem {
                quote: doc.phrase,
                title: doc.title,
                year,
            })
        })
        .collect()
}

/// Accept a year as a JSON integer, an integral float, or a numeric string.
fn parse_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| integral(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| integral(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
