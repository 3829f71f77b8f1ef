//! Uyuni provider plugin
//!
//! Exposes Uyuni user management to the calling orchestrator:
//!
//! - `UyuniProvider` - resolves connection settings from configuration or
//!   the `UYUNI_HOST` / `UYUNI_USERNAME` / `UYUNI_PASSWORD` environment
//!   variables and connects the shared API client once per plugin lifecycle
//! - `UserResource` (`uyuni_user`) - create / read / delete of one user,
//!   keyed by login; update is not applied remotely
//! - `UsersDataSource` (`uyuni_users`) - read-only listing of all users
//!
//! Every operation is one synchronous remote call with no retry; errors
//! are surfaced to the orchestrator as diagnostics or operation errors.

pub mod provider;
pub mod user_resource;
pub mod users_data_source;

// Re-export main types for convenience
pub use provider::{ENV_HOST, ENV_PASSWORD, ENV_USERNAME, UyuniProvider};
pub use user_resource::UserResource;
pub use users_data_source::UsersDataSource;
