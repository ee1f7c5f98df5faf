//! Session-gated job browsing with a last-known-good cache.

use jobfeed_core::CanonicalJob;
use tracing::{info, warn};

use crate::api::{JobsClient, RefreshSummary};
use crate::auth::{Authenticator, Credentials, Session};
use crate::error::ClientError;
use crate::local_state::{LocalState, JOBS_KEY, USER_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOrigin {
    /// Fetched from the server just now.
    Live,
    /// The server was unreachable; these are the last jobs fetched successfully.
    Cached,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub jobs: Vec<CanonicalJob>,
    pub origin: JobOrigin,
}

impl Listing {
    pub fn find(&self, id: i64) -> Option<&CanonicalJob> {
        self.jobs.iter().find(|job| job.id == id)
    }
}

pub struct JobBrowser {
    api: JobsClient,
    state: LocalState,
    auth: Box<dyn Authenticator>,
}

impl JobBrowser {
    pub fn new(api: JobsClient, state: LocalState, auth: Box<dyn Authenticator>) -> Self {
        Self { api, state, auth }
    }

    /// Authenticate and persist the session marker.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let session = self.auth.authenticate(credentials).await?;
        self.state.set(USER_KEY, &session)?;
        info!(user = %session.user, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.state.remove(USER_KEY)
    }

    pub fn session(&self) -> Result<Option<Session>, ClientError> {
        self.state.get(USER_KEY)
    }

    fn require_session(&self) -> Result<Session, ClientError> {
        self.session()?.ok_or(ClientError::NotLoggedIn)
    }

    /// Fetch the listing, falling back to the cached copy on any failure.
    pub async fn jobs(&self) -> Result<Listing, ClientError> {
        self.require_session()?;

        match self.api.fetch_jobs().await {
            Ok(jobs) => {
                if let Err(e) = self.state.set(JOBS_KEY, &jobs) {
                    warn!(error = %e, "failed to cache fetched jobs");
                }
                Ok(Listing {
                    jobs,
                    origin: JobOrigin::Live,
                })
            }
            Err(fetch_err) => {
                warn!(url = %self.api.base_url(), error = %fetch_err, "fetch failed, trying cached jobs");
                match self.state.get::<Vec<CanonicalJob>>(JOBS_KEY) {
                    Ok(Some(jobs)) => Ok(Listing {
                        jobs,
                        origin: JobOrigin::Cached,
                    }),
                    Ok(None) => Err(ClientError::NoCachedJobs),
                    Err(e) => {
                        warn!(error = %e, "cached jobs are unreadable");
                        Err(ClientError::NoCachedJobs)
                    }
                }
            }
        }
    }

    pub async fn job(&self, id: i64) -> Result<(Option<CanonicalJob>, JobOrigin), ClientError> {
        let listing = self.jobs().await?;
        Ok((listing.find(id).cloned(), listing.origin))
    }

    pub async fn refresh(&self) -> Result<RefreshSummary, ClientError> {
        self.api.refresh().await
    }
}
