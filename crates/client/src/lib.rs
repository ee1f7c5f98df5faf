//! Headless jobfeed client: delegated login, a local session marker, and job
//! browsing that falls back to the last successful fetch when the server is
//! unreachable.

pub mod api;
pub mod auth;
pub mod browser;
pub mod error;
pub mod local_state;

pub use api::{JobsClient, RefreshSummary};
pub use auth::{Authenticator, Credentials, Session, StaticAuthenticator};
pub use browser::{JobBrowser, JobOrigin, Listing};
pub use error::{AuthError, ClientError};
pub use local_state::LocalState;
