//! Sistema 911/1619 Registry Client
//!
//! Everything that talks to the registry backend or the identity provider:
//! - [`AuthenticatedFetch`]: bearer-token requests and `{success, data}`
//!   envelope normalization
//! - [`ApiClient`]: one typed method per resource operation
//! - [`store`]: list and medical-info stores a UI binds to
//! - [`dashboard`]: concurrent, failure-tolerant dashboard load
//! - [`access`]: route guards by request credentials or session state
//!
//! The HTTP stack and the identity provider sit behind the [`Transport`] and
//! [`IdentityProvider`] traits. The `test-utils` feature adds an in-memory
//! backend and a fake identity provider.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sistema911_client::{ApiClient, ApiConfig, ReqwestTransport, SessionUser, TokenSession};
//!
//! # async fn run() -> Result<(), sistema911_client::ApiError> {
//! let config = ApiConfig::from_env()?;
//! let identity = Arc::new(TokenSession::new("id-token", SessionUser::new("uid-1")));
//! let api = ApiClient::new(config, Arc::new(ReqwestTransport::new()), identity);
//!
//! for address in api.get_addresses().await? {
//!     println!("{} {}", address.street, address.city);
//! }
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod fetch;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use access::{decide, guard_request, watch_session, Redirect, RouteClass, SessionGuard};
pub use api::ApiClient;
pub use config::ApiConfig;
pub use dashboard::{load_dashboard, DashboardSnapshot};
pub use error::ApiError;
pub use fetch::{AuthenticatedFetch, RequestOptions};
pub use session::{IdentityError, IdentityProvider, SessionState, SessionUser, TokenSession};
pub use store::{
    AddressStore, BankAccountStore, EmergencyContactStore, EmergencyEventStore, HealthInsuranceStore,
    ListStore, MedicalInfoStore,
};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
