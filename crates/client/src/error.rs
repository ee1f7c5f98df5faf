use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("no credentials configured (set CLIENT_USERNAME and CLIENT_PASSWORD)")]
    NotConfigured,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to fetch jobs")]
    NoCachedJobs,

    #[error("not logged in (run `jobfeed-client login` first)")]
    NotLoggedIn,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("local state error: {0}")]
    State(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_what_users_see() {
        assert_eq!(ClientError::NoCachedJobs.to_string(), "Failed to fetch jobs");
        assert_eq!(ClientError::from(AuthError::InvalidCredentials).to_string(), "Invalid Credentials");
        let status = ClientError::Status { status: 500, body: "{}".into() };
        assert_eq!(status.to_string(), "server returned 500: {}");
    }
}
