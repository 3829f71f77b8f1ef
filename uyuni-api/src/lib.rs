//! Uyuni API Client
//!
//! This crate provides a thin HTTP client for the Uyuni server API. It
//! performs the `auth/login` handshake once at initialization, keeps the
//! session cookie in a cookie store, and exposes typed `get`/`post`
//! helpers that unwrap the `{success, result, message}` response envelope
//! every endpoint returns.
//!
//! # Example
//!
//! ```ignore
//! use uyuni_api::{ConnectionDetails, init};
//!
//! let details = ConnectionDetails::new("uyuni.example.com", "admin", "secret")
//!     .with_insecure(true);
//! let client = init(&details).await?;
//!
//! let users: Vec<UserListItem> = client.get("user/listUsers").await?;
//! ```
//!
//! The client carries no mutable per-call state and is safe to share
//! across concurrent callers behind an `Arc`.

pub mod client;
pub mod error;

// Re-export main types for convenience
pub use client::{ConnectionDetails, HttpClient, init};
pub use error::{ApiError, ApiResult};
