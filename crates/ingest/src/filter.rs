//! Mandatory-field filter.
//!
//! Under [`ValidationPolicy::Strict`] the check runs against the raw record,
//! so a posting without a company or title is dropped even though the
//! normalizer would have given it a default. [`ValidationPolicy::Lenient`]
//! checks the normalized candidate instead; title and company are never empty
//! there, so only the id can drop a record.

use jobfeed_core::ValidationPolicy;
use serde_json::Value;

use crate::normalize::JobCandidate;
use crate::raw;

/// Keep/drop decision for one record.
pub fn keep(policy: ValidationPolicy, raw_record: &Value, candidate: &JobCandidate) -> bool {
    match policy {
        ValidationPolicy::Strict => raw_has_mandatory_fields(raw_record),
        ValidationPolicy::Lenient => candidate_has_mandatory_fields(candidate),
    }
}

fn raw_has_mandatory_fields(raw_record: &Value) -> bool {
    let has_id = raw::job_id(raw_record).is_some_and(|id| id != 0);
    let has_title = raw::is_truthy(raw_record.get("position"))
        || raw::is_truthy(raw_record.get("title"));
    let has_company = raw::is_truthy(raw_record.get("company"));
    has_id && has_title && has_company
}

fn candidate_has_mandatory_fields(candidate: &JobCandidate) -> bool {
    candidate.id.is_some_and(|id| id != 0)
        && !candidate.title.is_empty()
        && !candidate.company.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn check(policy: ValidationPolicy, raw_record: Value) -> bool {
        let candidate = normalize(&raw_record);
        keep(policy, &raw_record, &candidate)
    }

    #[test]
    fn complete_record_passes_both_policies() {
        let rec = json!({"id": 1, "position": "Engineer", "company": "Acme"});
        assert!(check(ValidationPolicy::Strict, rec.clone()));
        assert!(check(ValidationPolicy::Lenient, rec));
    }

    #[test]
    fn missing_or_zero_id_drops_under_both_policies() {
        for rec in [
            json!({"position": "Engineer", "company": "Acme"}),
            json!({"id": 0, "position": "Engineer", "company": "Acme"}),
            json!({"id": "not-a-number", "position": "Engineer", "company": "Acme"}),
        ] {
            assert!(!check(ValidationPolicy::Strict, rec.clone()));
            assert!(!check(ValidationPolicy::Lenient, rec));
        }
    }

    #[test]
    fn missing_company_only_drops_under_strict() {
        let rec = json!({"id": 2, "title": "x"});
        assert!(!check(ValidationPolicy::Strict, rec.clone()));
        assert!(check(ValidationPolicy::Lenient, rec));
    }

    #[test]
    fn missing_title_only_drops_under_strict() {
        let rec = json!({"id": 3, "company": "Acme", "position": ""});
        assert!(!check(ValidationPolicy::Strict, rec.clone()));
        assert!(check(ValidationPolicy::Lenient, rec));
    }

    #[test]
    fn title_field_satisfies_strict() {
        assert!(check(ValidationPolicy::Strict, json!({"id": 4, "title": "Dev", "company": "Co"})));
    }
}
