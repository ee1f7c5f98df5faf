//! Raw source record → canonical job candidate.

use jobfeed_core::CanonicalJob;
use serde_json::Value;

use crate::raw;
use crate::sanitize::strip_tags;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_COMPANY: &str = "Unknown Company";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";

/// A normalized record that has not been through the filter yet.
///
/// Every text field is already defaulted; only `id` may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCandidate {
    pub id: Option<i64>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
    pub salary: String,
}

impl JobCandidate {
    /// Convert into a persisted job. `None` when there is no id.
    pub fn into_job(self) -> Option<CanonicalJob> {
        Some(CanonicalJob {
            id: self.id?,
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            apply_link: self.apply_link,
            salary: self.salary,
        })
    }
}

/// Map one raw record onto the canonical shape. Never fails: every field
/// falls back to a default when the raw value is falsy.
pub fn normalize(raw: &Value) -> JobCandidate {
    let title = raw::text(raw, "position")
        .or_else(|| raw::text(raw, "title"))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let description = raw::text(raw, "description")
        .map(|d| strip_tags(&d))
        .unwrap_or_default();

    let salary = if raw::is_truthy(raw.get("salary")) {
        format!(
            "{} - {}",
            raw::render(raw.get("salary_min")),
            raw::render(raw.get("salary_max"))
        )
    } else {
        SALARY_NOT_SPECIFIED.to_string()
    };

    JobCandidate {
        id: raw::job_id(raw),
        title,
        company: raw::text(raw, "company").unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
        location: raw::text(raw, "location").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        description,
        apply_link: raw::text(raw, "url").unwrap_or_default(),
        salary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_record() {
        let raw = json!({
            "id": "1092345",
            "position": "Senior Rust Engineer",
            "title": "ignored when position is set",
            "company": "Acme",
            "location": "Berlin",
            "description": "<p>Great <b>role</b></p>",
            "url": "https://remoteok.test/1092345",
            "salary": true,
            "salary_min": 90000,
            "salary_max": 120000
        });
        let c = normalize(&raw);
        assert_eq!(c.id, Some(1092345));
        assert_eq!(c.title, "Senior Rust Engineer");
        assert_eq!(c.company, "Acme");
        assert_eq!(c.location, "Berlin");
        assert_eq!(c.description, "Great role");
        assert_eq!(c.apply_link, "https://remoteok.test/1092345");
        assert_eq!(c.salary, "90000 - 120000");
    }

    #[test]
    fn empty_record_gets_every_default() {
        let c = normalize(&json!({}));
        assert_eq!(c.id, None);
        assert_eq!(c.title, DEFAULT_TITLE);
        assert_eq!(c.company, DEFAULT_COMPANY);
        assert_eq!(c.location, DEFAULT_LOCATION);
        assert_eq!(c.description, "");
        assert_eq!(c.apply_link, "");
        assert_eq!(c.salary, SALARY_NOT_SPECIFIED);
        assert!(c.into_job().is_none());
    }

    #[test]
    fn title_falls_back_to_title_field() {
        let c = normalize(&json!({"id": 2, "position": "", "title": "x"}));
        assert_eq!(c.title, "x");
    }

    #[test]
    fn salary_flag_without_bounds_passes_through_undefined() {
        let c = normalize(&json!({"id": 3, "salary": 1}));
        assert_eq!(c.salary, "undefined - undefined");

        let c = normalize(&json!({"id": 3, "salary": "yes", "salary_min": "50k", "salary_max": null}));
        assert_eq!(c.salary, "50k - null");
    }

    #[test]
    fn falsy_salary_flag_means_not_specified() {
        for flag in [json!(0), json!(false), json!(""), json!(null)] {
            let c = normalize(&json!({"id": 4, "salary": flag, "salary_min": 1, "salary_max": 2}));
            assert_eq!(c.salary, SALARY_NOT_SPECIFIED);
        }
    }

    #[test]
    fn non_string_fields_are_rendered_as_text() {
        let c = normalize(&json!({"id": 5, "company": 3, "location": ["EU"]}));
        assert_eq!(c.company, "3");
        assert_eq!(c.location, r#"["EU"]"#);
    }

    #[test]
    fn into_job_keeps_fields() {
        let job = normalize(&json!({"id": 6, "position": "Dev", "company": "Co"}))
            .into_job()
            .unwrap();
        assert_eq!(job.id, 6);
        assert_eq!(job.title, "Dev");
        assert_eq!(job.company, "Co");
    }
}
