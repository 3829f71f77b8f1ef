//! Users listing data source (`uyuni_users`)
//!
//! One bulk `user/listUsers` call, mapped into a computed list of
//! `{id, login}` entries in the order the server returned them. No inputs,
//! no pagination, no filtering.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use uyuni_api::HttpClient;
use uyuni_provider_core::{
    AttributeSchema, AttributeType, Attributes, DataSource, OperationError, OperationResult,
    Schema, Value,
};

const TYPE_NAME: &str = "uyuni_users";

/// Record returned by `user/listUsers`
///
/// The server also sends `login_UC` and `enabled`; only id and login are
/// mapped into state.
#[derive(Debug, Deserialize)]
struct UserListItem {
    id: i64,
    login: String,
}

fn users_schema() -> Schema {
    let entry = Schema::new()
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("login", AttributeType::String).computed());
    Schema::new().attribute(
        AttributeSchema::new(
            "users",
            AttributeType::List(Box::new(AttributeType::Object(Box::new(entry)))),
        )
        .computed(),
    )
}

/// Read-only listing of all users known to the server
pub struct UsersDataSource {
    client: Arc<HttpClient>,
}

impl UsersDataSource {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for UsersDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        users_schema()
    }

    async fn read(&self) -> OperationResult<Attributes> {
        let items: Vec<UserListItem> = self
            .client
            .get("user/listUsers")
            .await
            .map_err(|e| OperationError::list("users", e))?;

        debug!(users = ?items, "users returned from API");

        let entries: Vec<Value> = items
            .into_iter()
            .map(|item| {
                let mut entry = HashMap::new();
                entry.insert("id".to_string(), Value::Int(item.id));
                entry.insert("login".to_string(), Value::String(item.login));
                Value::Map(entry)
            })
            .collect();

        Ok(Attributes::new().with("users", Value::List(entries)))
    }
}
