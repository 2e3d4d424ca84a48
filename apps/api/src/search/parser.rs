//! Strict parsing of extracted payloads into the listing / insight shapes,
//! plus post-parse normalization (id uniqueness, sentinel defaults).
//!
//! Parse failures are `PipelineError::Format` — deliberately distinct from
//! transport failures so the fallback policy can message them differently.
//! A value that parses but is not a non-empty array is `NoResults`, which is
//! "nothing matched", not "something broke".

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::PipelineError;
use crate::models::{InsightReport, JobListing, POSTED_UNKNOWN, SALARY_NOT_SPECIFIED};

/// Cap on the diagnostic excerpt carried in `Format` errors.
const SNIPPET_CHARS: usize = 120;

/// Listing ids arrive as integers or strings depending on model mood.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Wire shape of one listing before normalization. Optional fields stay
/// optional here; sentinels are applied in [`normalize_listings`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListing {
    #[serde(default)]
    id: Option<RawId>,
    title: String,
    company: String,
    location: String,
    #[serde(rename = "type", default)]
    job_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    company_url: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    posted: Option<String>,
}

/// Parses a candidate substring as an array of listings.
///
/// - malformed JSON → `Format`
/// - valid JSON that is not an array, or an empty array → `NoResults`
/// - an array whose elements do not match the listing shape → `Format`
pub fn parse_listings(candidate: &str) -> Result<Vec<JobListing>, PipelineError> {
    let value: Value = serde_json::from_str(candidate).map_err(|_| PipelineError::Format {
        snippet: snippet(candidate),
    })?;

    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Err(PipelineError::NoResults),
    };

    let raw: Vec<RawListing> = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|_| PipelineError::Format {
            snippet: snippet(candidate),
        })?;

    Ok(normalize_listings(raw))
}

/// Parses a candidate substring as a single insight object.
pub fn parse_insights(candidate: &str) -> Result<InsightReport, PipelineError> {
    serde_json::from_str(candidate).map_err(|_| PipelineError::Format {
        snippet: snippet(candidate),
    })
}

/// Applies the result-set invariants:
/// - ids unique within the set (missing/duplicate ids get a synthetic id
///   keyed by position)
/// - sentinel defaults for omitted `salary` / `posted`
/// - listings without a `url` are RETAINED; actionability is decided at
///   render time by `JobListing::actionable_url`
fn normalize_listings(raw: Vec<RawListing>) -> Vec<JobListing> {
    let mut seen: HashSet<String> = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(position, listing)| {
            let id = listing
                .id
                .map(RawId::into_string)
                .filter(|id| !id.is_empty() && seen.insert(id.clone()))
                .unwrap_or_else(|| synthetic_id(position, &mut seen));

            JobListing {
                id,
                title: listing.title,
                company: listing.company,
                location: listing.location,
                job_type: listing.job_type,
                description: listing.description,
                url: listing.url,
                company_url: listing.company_url,
                salary: listing.salary.unwrap_or_else(|| SALARY_NOT_SPECIFIED.into()),
                posted: listing.posted.unwrap_or_else(|| POSTED_UNKNOWN.into()),
            }
        })
        .collect()
}

fn synthetic_id(position: usize, seen: &mut HashSet<String>) -> String {
    let mut n = position + 1;
    loop {
        let candidate = format!("listing-{n}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn snippet(candidate: &str) -> String {
    candidate.chars().take(SNIPPET_CHARS).collect()
}
