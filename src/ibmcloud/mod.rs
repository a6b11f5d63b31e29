//! IBM Cloud API interaction module
//!
//! Credential exchange, service-ID account lookup and the PowerVS session
//! that resource calls are scoped to.
//!
//! # Module Structure
//!
//! - [`auth`] - IAM authenticator with token caching
//! - [`iam`] - Service-ID client resolving the account behind a lease API key
//! - [`session`] - PowerVS session and the [`session::PowerTransport`] seam
//! - [`http`] - HTTP utilities for REST API calls
//! - [`backend`] - Collaborators bundle used during client bootstrap

pub mod auth;
pub mod backend;
pub mod http;
pub mod iam;
pub mod session;

pub use auth::Authenticator;
pub use backend::{CloudBackend, IbmCloud};
pub use iam::{ApiKey, ServiceIdClient};
pub use session::{PowerTransport, Session, SessionOptions};
