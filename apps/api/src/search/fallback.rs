//! Fixed substitute dataset served whenever the live pipeline cannot
//! produce usable output, plus the per-error-kind notice strings.

use crate::errors::PipelineError;
use crate::models::{InsightReport, JobListing, POSTED_UNKNOWN};

/// Banner shown in forced-fallback / testing mode.
pub const FORCED_FALLBACK_NOTICE: &str =
    "Running in offline test mode — showing sample listings.";

/// Banner shown when live listings arrived but the insight stage failed.
pub const INSIGHTS_UNAVAILABLE_NOTICE: &str = "Insights are unavailable for this search.";

/// Deterministic sample listings. Built fresh per call so callers own them.
pub fn fallback_listings() -> Vec<JobListing> {
    vec![
        JobListing {
            id: "sample-1".into(),
            title: "Backend Engineer (Rust)".into(),
            company: "Orbit Systems".into(),
            location: "Vienna, Austria".into(),
            job_type: "Full-time".into(),
            description: "Build and operate async services on a small platform team."
                .into(),
            url: Some("https://jobs.example.com/orbit/backend-rust".into()),
            company_url: Some("https://orbit.example.com".into()),
            salary: "EUR 60,000 - 75,000".into(),
            posted: "1 week ago".into(),
        },
        JobListing {
            id: "sample-2".into(),
            title: "Software Engineering Intern".into(),
            company: "Fernweh Labs".into(),
            location: "Graz, Austria".into(),
            job_type: "Internship".into(),
            description: "Six-month internship on data tooling; mentorship included.".into(),
            url: Some("https://jobs.example.com/fernweh/intern".into()),
            company_url: Some("https://fernweh.example.com".into()),
            salary: "EUR 2,100 / month".into(),
            posted: "3 days ago".into(),
        },
        JobListing {
            id: "sample-3".into(),
            title: "Platform Engineer (Contract)".into(),
            company: "Nordwind GmbH".into(),
            location: "Remote (EU)".into(),
            job_type: "Contract".into(),
            description: "Nine-month contract hardening a CI/CD platform.".into(),
            url: Some("https://jobs.example.com/nordwind/platform".into()),
            company_url: Some("https://nordwind.example.com".into()),
            salary: "Not specified".into(),
            posted: POSTED_UNKNOWN.into(),
        },
    ]
}

/// Canned insight served without a network call in forced-fallback mode.
pub fn fallback_insights() -> InsightReport {
    InsightReport {
        analysis: "These are sample listings, so no live analysis was performed.".into(),
        suggestions: "Configure a valid API credential to enable live search and insights."
            .into(),
        keywords_to_add: Vec::new(),
        keywords_to_remove: Vec::new(),
    }
}

/// Human-readable diagnostic for the fallback edge, distinguishing the three
/// cases the UI messages differently: credential rejection, no matches, and
/// everything that actually broke.
pub fn notice_for(error: &PipelineError) -> String {
    match error {
        PipelineError::Auth => {
            "Authentication failed — check the configured API credential. Showing sample listings."
                .to_string()
        }
        PipelineError::NoResults => {
            "No listings matched your criteria — try broadening your search. Showing sample listings."
                .to_string()
        }
        other => format!("Live search is unavailable ({other}). Showing sample listings."),
    }
}
