//! User resource (`uyuni_user`)
//!
//! Maps one Uyuni user between the declared attributes and the remote API.
//! The login is the primary key for read and delete; no separate server id
//! is tracked. Update is accepted locally but never applied remotely.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use uyuni_api::HttpClient;
use uyuni_provider_core::{
    AttributeSchema, AttributeType, Attributes, ManagedResource, OperationError, OperationResult,
    Schema, Value,
};

const TYPE_NAME: &str = "uyuni_user";

/// Error context label, reads as `Could not create user "sgiertz"`
const KIND: &str = "user";

/// Record returned by `user/getDetails`
///
/// Only first name, last name and email flow back into state; the
/// server-only fields are logged and dropped.
#[derive(Debug, Deserialize)]
struct UserDetails {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    org_id: i64,
    #[serde(default)]
    org_name: String,
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    last_login_date: String,
    #[serde(default)]
    created_date: String,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    use_pam: bool,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    errata_notification: bool,
}

fn user_schema() -> Schema {
    Schema::new()
        .attribute(AttributeSchema::new("login", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("password", AttributeType::String)
                .required()
                .sensitive(),
        )
        .attribute(AttributeSchema::new("firstname", AttributeType::String).required())
        .attribute(AttributeSchema::new("lastname", AttributeType::String).required())
        .attribute(AttributeSchema::new("email", AttributeType::String).required())
}

/// Managed resource for a single Uyuni user
pub struct UserResource {
    client: Arc<HttpClient>,
}

impl UserResource {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManagedResource for UserResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        user_schema()
    }

    async fn create(&self, plan: &Attributes) -> OperationResult<Attributes> {
        let login = plan.get_string("login").unwrap_or_default().to_string();
        let body = json!({
            "login": login,
            "password": plan.get_string("password").unwrap_or_default(),
            "firstName": plan.get_string("firstname").unwrap_or_default(),
            "lastName": plan.get_string("lastname").unwrap_or_default(),
            "email": plan.get_string("email").unwrap_or_default(),
        });

        // The password stays out of the log on purpose.
        info!(login, "creating user");

        let _: i64 = self
            .client
            .post("user/create", &body)
            .await
            .map_err(|e| OperationError::create(KIND, &login, e))?;

        info!(login, "user created");

        // The submitted plan becomes the state as-is; server-side
        // normalization only shows up on the next read.
        Ok(plan.clone())
    }

    async fn read(&self, state: &Attributes) -> OperationResult<Attributes> {
        let login = state.get_string("login").unwrap_or_default().to_string();
        debug!(login, "reading user details");

        let details: UserDetails = self
            .client
            .get(&format!("user/getDetails?login={login}"))
            .await
            .map_err(|e| OperationError::read(KIND, &login, e))?;

        // Server-only attributes are observed here and dropped.
        debug!(
            org_id = details.org_id,
            org_name = %details.org_name,
            prefix = %details.prefix,
            last_login_date = %details.last_login_date,
            created_date = %details.created_date,
            enabled = details.enabled,
            use_pam = details.use_pam,
            read_only = details.read_only,
            errata_notification = details.errata_notification,
            "user details returned from API"
        );

        // Login and password are never refreshed from the server.
        let mut next = state.clone();
        next.set("firstname", Value::String(details.first_name));
        next.set("lastname", Value::String(details.last_name));
        next.set("email", Value::String(details.email));
        Ok(next)
    }

    async fn update(&self, _state: &Attributes, plan: &Attributes) -> OperationResult<Attributes> {
        // Remote update is not implemented. The changed plan is accepted
        // locally and the server copy is left as-is.
        warn!(
            login = plan.get_string("login").unwrap_or_default(),
            "update is not applied to the remote user"
        );
        Ok(plan.clone())
    }

    async fn delete(&self, state: &Attributes) -> OperationResult<()> {
        let login = state.get_string("login").unwrap_or_default().to_string();
        info!(login, "deleting user");

        let _: i64 = self
            .client
            .post(&format!("user/delete?login={login}"), &json!({}))
            .await
            .map_err(|e| OperationError::delete(KIND, &login, e))?;

        info!(login, "user deleted");
        Ok(())
    }
}
