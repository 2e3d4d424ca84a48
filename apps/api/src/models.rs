//! Data model for the search pipeline: criteria in, listings and insights out.
//!
//! Everything here is transient — listings live only in the caller's result
//! holder until the next search overwrites them. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;

/// Sentinel shown when the model omits a salary.
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";
/// Sentinel shown when the model omits a posting date.
pub const POSTED_UNKNOWN: &str = "N/A";

/// Employment type filter. Serialized with the human-readable labels the
/// UI form and the model prompt both use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Internship => "Internship",
            JobType::Contract => "Contract",
        }
    }
}

/// User-supplied search criteria. Immutable per request — constructed fresh
/// from form state for every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub location: String,
    #[serde(default)]
    pub include_keywords: Vec<String>,
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
    #[serde(default)]
    pub job_types: Vec<JobType>,
}

/// One job listing as surfaced to the rendering collaborator.
///
/// `id` is unique within its result set (synthesized on receipt when the
/// model omits or duplicates one). `url` stays optional: a listing without
/// a syntactically absolute link is retained but never presented as
/// clickable — see [`JobListing::actionable_url`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub company_url: Option<String>,
    pub salary: String,
    pub posted: String,
}

impl JobListing {
    /// Returns the listing URL only when it is safe to render as a link.
    /// Relative, schemeless, or missing URLs come back as `None` so the
    /// collaborator can never present a dead link as clickable.
    pub fn actionable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| is_absolute_http(u))
    }

    /// Same actionability rule, applied to the company page link.
    pub fn actionable_company_url(&self) -> Option<&str> {
        self.company_url.as_deref().filter(|u| is_absolute_http(u))
    }
}

fn is_absolute_http(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

/// Search-quality analysis derived from the criteria and result count.
/// One per search, transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub analysis: String,
    pub suggestions: String,
    #[serde(default)]
    pub keywords_to_add: Vec<String>,
    #[serde(default)]
    pub keywords_to_remove: Vec<String>,
}

/// Whether the listings came from the live pipeline or the fixed dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Live,
    Fallback,
}

/// Tagged result at the pipeline boundary. The fallback policy guarantees
/// the caller always has listings to render; `ok` is false exactly when
/// they are fallback-sourced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub ok: bool,
    pub source: ResultSource,
    pub listings: Vec<JobListing>,
    pub insights: Option<InsightReport>,
    /// Failure class when fallback-sourced; `None` on the live edge.
    pub kind: Option<ErrorKind>,
    /// Human-readable diagnostic for the UI banner.
    pub notice: Option<String>,
}
