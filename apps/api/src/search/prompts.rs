//! Prompt builders for the two pipeline stages. Pure functions: same
//! criteria in, same string out, no I/O.

use crate::models::SearchCriteria;

/// System prompt for the listing search — enforces a single fenced block.
pub const SEARCH_SYSTEM: &str = "You are a job-search assistant with access to live web search. \
    Find real, currently open job listings. \
    You MUST respond with exactly one fenced code block tagged `json`. \
    Do NOT include any text outside the fenced block. \
    Do NOT invent listings, companies, or URLs.";

/// System prompt for search-quality insights — same output discipline.
pub const INSIGHTS_SYSTEM: &str = "You are a job-search coach analyzing search criteria. \
    You MUST respond with exactly one fenced code block tagged `json` \
    containing a single JSON object. \
    Do NOT include any text outside the fenced block.";

/// Builds the listing-search instruction from user criteria.
///
/// Embeds the location, joined keyword lists, joined job-type list, and the
/// schema directive (fixed key set, mandatory `url`/`companyUrl`, omit the
/// record rather than inventing a value).
pub fn build_search_prompt(criteria: &SearchCriteria) -> String {
    format!(
        r#"Find current job listings matching these criteria.

Location: {location}
Must-have keywords: {include}
Exclude listings mentioning: {exclude}
Job types: {job_types}

Return exactly one fenced code block tagged `json` containing a JSON array of listing objects with EXACTLY these keys:
[
  {{
    "id": 1,
    "title": "Job title",
    "company": "Company name",
    "location": "City, Country",
    "type": "Full-time",
    "description": "One-paragraph summary of the role",
    "url": "https://example.com/jobs/1",
    "companyUrl": "https://example.com",
    "salary": "EUR 55,000 - 65,000",
    "posted": "3 days ago"
  }}
]

HARD RULES:
1. `url` and `companyUrl` are mandatory and must be absolute http/https links — omit the record rather than inventing a value
2. `id` must be a unique sequential integer starting at 1
3. `type` must be one of: Full-time, Part-time, Internship, Contract
4. `salary` and `posted` may be omitted when unknown
5. Output nothing outside the single fenced block"#,
        location = criteria.location,
        include = join_or(&criteria.include_keywords, "(none)"),
        exclude = join_or(&criteria.exclude_keywords, "(none)"),
        job_types = if criteria.job_types.is_empty() {
            "Any".to_string()
        } else {
            criteria
                .job_types
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(", ")
        },
    )
}

/// Builds the insight-analysis instruction from the same criteria plus the
/// number of listings the search stage produced.
pub fn build_insights_prompt(criteria: &SearchCriteria, result_count: usize) -> String {
    format!(
        r#"A job search with the following criteria returned {result_count} listing(s).

Location: {location}
Must-have keywords: {include}
Excluded keywords: {exclude}

Analyze how effective these criteria are and suggest improvements.

Return exactly one fenced code block tagged `json` containing a single JSON object with EXACTLY these keys:
{{
  "analysis": "How well the criteria performed and why",
  "suggestions": "Concrete changes to improve result quality",
  "keywordsToAdd": ["keyword"],
  "keywordsToRemove": ["keyword"]
}}

HARD RULES:
1. `keywordsToAdd` and `keywordsToRemove` must be arrays of strings (empty arrays are allowed)
2. Output nothing outside the single fenced block"#,
        location = criteria.location,
        include = join_or(&criteria.include_keywords, "(none)"),
        exclude = join_or(&criteria.exclude_keywords, "(none)"),
    )
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobType;

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            location: "Vienna".into(),
            include_keywords: vec!["rust".into(), "backend".into()],
            exclude_keywords: vec!["crypto".into()],
            job_types: vec![JobType::FullTime, JobType::Internship],
        }
    }

    #[test]
    fn test_search_prompt_embeds_all_criteria() {
        let prompt = build_search_prompt(&criteria());
        assert!(prompt.contains("Location: Vienna"));
        assert!(prompt.contains("rust, backend"));
        assert!(prompt.contains("crypto"));
        assert!(prompt.contains("Full-time, Internship"));
    }

    #[test]
    fn test_search_prompt_carries_schema_directive() {
        let prompt = build_search_prompt(&criteria());
        assert!(prompt.contains("fenced code block tagged `json`"));
        assert!(prompt.contains("companyUrl"));
        assert!(prompt.contains("omit the record rather than inventing a value"));
    }

    #[test]
    fn test_search_prompt_is_deterministic() {
        let c = criteria();
        assert_eq!(build_search_prompt(&c), build_search_prompt(&c));
    }

    #[test]
    fn test_empty_lists_render_placeholders() {
        let c = SearchCriteria {
            location: "Graz".into(),
            include_keywords: vec![],
            exclude_keywords: vec![],
            job_types: vec![],
        };
        let prompt = build_search_prompt(&c);
        assert!(prompt.contains("Must-have keywords: (none)"));
        assert!(prompt.contains("Job types: Any"));
    }

    #[test]
    fn test_insights_prompt_embeds_result_count_and_keys() {
        let prompt = build_insights_prompt(&criteria(), 4);
        assert!(prompt.contains("returned 4 listing(s)"));
        assert!(prompt.contains("keywordsToAdd"));
        assert!(prompt.contains("keywordsToRemove"));
        assert!(prompt.contains("single JSON object"));
    }
}
