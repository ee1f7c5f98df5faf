//! HTTP client for the jobfeed server.

use std::time::Duration;

use jobfeed_core::CanonicalJob;
use serde::Deserialize;

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Refresh waits for a full ingestion run.
const REFRESH_TIMEOUT: Duration = Duration::from_secs(120);

/// Body of a successful `GET /refresh-jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshSummary {
    pub message: String,
    pub inserted: u64,
}

pub struct JobsClient {
    base_url: String,
    http: reqwest::Client,
}

impl JobsClient {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::new();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_jobs(&self) -> Result<Vec<CanonicalJob>, ClientError> {
        let url = format!("{}/jobs", self.base_url);
        let resp = self.http.get(&url).timeout(REQUEST_TIMEOUT).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn refresh(&self) -> Result<RefreshSummary, ClientError> {
        let url = format!("{}/refresh-jobs", self.base_url);
        let resp = self.http.get(&url).timeout(REFRESH_TIMEOUT).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn fetch_jobs_decodes_camel_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1, "title": "Engineer", "company": "Acme", "location": "NYC",
                "description": "Great role", "applyLink": "https://x/1", "salary": "Not specified"
            }])))
            .mount(&server)
            .await;

        let client = JobsClient::new(&format!("{}/", server.uri()));
        let jobs = client.fetch_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].apply_link, "https://x/1");
    }

    #[tokio::test]
    async fn server_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Error fetching jobs"})))
            .mount(&server)
            .await;

        let err = JobsClient::new(&server.uri()).fetch_jobs().await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("Error fetching jobs"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_reports_inserted_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/refresh-jobs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "Jobs refreshed successfully!", "inserted": 42})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let summary = JobsClient::new(&server.uri()).refresh().await.unwrap();
        assert_eq!(summary.inserted, 42);
        assert_eq!(summary.message, "Jobs refreshed successfully!");
    }
}
