//! Provider - Traits abstracting resource and data source operations
//!
//! A Provider turns a validated configuration block into a set of resource
//! and data source handlers that share one remote client. Every operation
//! is async, performs exactly one remote round trip and surfaces the first
//! error it hits; there is no retry and no internal concurrency.

use async_trait::async_trait;
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;
use crate::value::Attributes;

/// Boxed error cause carried inside an `OperationError`
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by remote resource and data source operations
///
/// Each variant wraps exactly one underlying transport or API error plus
/// the operation context (resource type and lookup key).
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Could not create {type_name} \"{key}\": {source}")]
    Create {
        type_name: &'static str,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Could not read {type_name} \"{key}\": {source}")]
    Read {
        type_name: &'static str,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Could not delete {type_name} \"{key}\": {source}")]
    Delete {
        type_name: &'static str,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Could not list {type_name}: {source}")]
    List {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },
}

impl OperationError {
    pub fn create(
        type_name: &'static str,
        key: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Create {
            type_name,
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn read(
        type_name: &'static str,
        key: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Read {
            type_name,
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn delete(
        type_name: &'static str,
        key: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Delete {
            type_name,
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn list(type_name: &'static str, source: impl Into<BoxError>) -> Self {
        Self::List {
            type_name,
            source: source.into(),
        }
    }
}

/// Result type for remote operations
pub type OperationResult<T> = Result<T, OperationError>;

/// A managed resource type (create / read / update / delete)
///
/// Plans and states are attribute maps already validated against
/// `schema()` by the orchestrator before any method here runs.
#[async_trait]
pub trait ManagedResource: Send + Sync {
    /// Fully qualified type name (e.g., "uyuni_user")
    fn type_name(&self) -> &'static str;

    /// Attribute schema for this resource type
    fn schema(&self) -> Schema;

    /// Create the remote entity from the planned attributes
    ///
    /// Returns the attributes to persist as state. A failed create leaves
    /// the resource absent.
    async fn create(&self, plan: &Attributes) -> OperationResult<Attributes>;

    /// Refresh state from the remote entity
    ///
    /// A failed read leaves the passed state untouched at the caller.
    async fn read(&self, state: &Attributes) -> OperationResult<Attributes>;

    /// Reconcile the remote entity with a changed plan
    async fn update(&self, state: &Attributes, plan: &Attributes) -> OperationResult<Attributes>;

    /// Delete the remote entity
    ///
    /// State removal on success is handled by the orchestrator.
    async fn delete(&self, state: &Attributes) -> OperationResult<()>;
}

/// A read-only data source
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fully qualified type name (e.g., "uyuni_users")
    fn type_name(&self) -> &'static str;

    /// Attribute schema for this data source
    fn schema(&self) -> Schema;

    /// Fetch the computed attributes in one remote call, all or nothing
    async fn read(&self) -> OperationResult<Attributes>;
}

/// Main Provider trait
///
/// `configure` runs once at plugin startup; on success the returned
/// handle owns the resource and data source handlers, each holding the
/// shared remote client injected at construction.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider type name (e.g., "uyuni")
    fn name(&self) -> &'static str;

    /// Schema of the provider configuration block
    fn schema(&self) -> Schema;

    /// Validate the configuration and connect the remote client
    ///
    /// All independent validation failures are accumulated into the
    /// returned diagnostics before aborting.
    async fn configure(&self, config: &Attributes) -> Result<ConfiguredProvider, Diagnostics>;
}

/// Handlers produced by a successful `Provider::configure`
#[derive(Default)]
pub struct ConfiguredProvider {
    resources: Vec<Box<dyn ManagedResource>>,
    data_sources: Vec<Box<dyn DataSource>>,
}

impl std::fmt::Debug for ConfiguredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredProvider")
            .field("resources", &self.resource_type_names())
            .field("data_sources", &self.data_source_type_names())
            .finish()
    }
}

impl ConfiguredProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: Box<dyn ManagedResource>) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_data_source(mut self, data_source: Box<dyn DataSource>) -> Self {
        self.data_sources.push(data_source);
        self
    }

    /// Look up a resource handler by type name
    pub fn resource(&self, type_name: &str) -> Option<&dyn ManagedResource> {
        self.resources
            .iter()
            .find(|r| r.type_name() == type_name)
            .map(|r| r.as_ref())
    }

    /// Look up a data source handler by type name
    pub fn data_source(&self, type_name: &str) -> Option<&dyn DataSource> {
        self.data_sources
            .iter()
            .find(|d| d.type_name() == type_name)
            .map(|d| d.as_ref())
    }

    pub fn resource_type_names(&self) -> Vec<&'static str> {
        self.resources.iter().map(|r| r.type_name()).collect()
    }

    pub fn data_source_type_names(&self) -> Vec<&'static str> {
        self.data_sources.iter().map(|d| d.type_name()).collect()
    }
}
