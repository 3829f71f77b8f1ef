//! Schema - Attribute schemas for provider, resource and data source blocks
//!
//! Each block declares its attributes with a type, requiredness and a
//! sensitivity flag. Validation of a planned configuration against the
//! schema happens before any remote call and accumulates every violation
//! instead of stopping at the first.

use std::collections::HashMap;
use std::fmt;

use crate::value::{Attributes, Value};

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// 64-bit integer
    Int,
    /// Boolean
    Bool,
    /// List of a single element type
    List(Box<AttributeType>),
    /// Nested object described by its own schema
    Object(Box<Schema>),
}

impl AttributeType {
    /// Check if a value conforms to this type
    ///
    /// Unknown values pass every type check; their concrete type is only
    /// established once the orchestrator resolves them.
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        if value.is_unknown() {
            return Ok(());
        }
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Object(schema), Value::Map(map)) => {
                let attrs: Attributes = map
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                schema
                    .validate(&attrs)
                    .map_err(|errors| TypeError::ObjectError { errors })
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value_type_name(value),
            }),
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Object(_) => "Object".to_string(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

fn value_type_name(value: &Value) -> String {
    match value {
        Value::String(_) => "String".to_string(),
        Value::Int(_) => "Int".to_string(),
        Value::Bool(_) => "Bool".to_string(),
        Value::List(_) => "List".to_string(),
        Value::Map(_) => "Map".to_string(),
        Value::Null => "Null".to_string(),
        Value::Unknown => "Unknown".to_string(),
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Nested object invalid: {}", errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    ObjectError { errors: Vec<TypeError> },
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    /// Populated by the provider rather than the configuration
    pub computed: bool,
    /// Never shown in plans or logs in cleartext
    pub sensitive: bool,
    pub description: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            computed: false,
            sensitive: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Schema of one provider, resource or data source block
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub attributes: HashMap<String, AttributeSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    /// Validate attributes against this schema
    ///
    /// Accumulates all violations. Required attributes must be present and
    /// non-null (unknown is accepted at plan time). Attributes the schema
    /// does not declare are rejected.
    pub fn validate(&self, attributes: &Attributes) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        for (name, schema) in &self.attributes {
            if schema.required && attributes.is_null(name) {
                errors.push(TypeError::MissingRequired { name: name.clone() });
            }
        }

        for (name, value) in attributes.iter() {
            match self.attributes.get(name) {
                Some(schema) => {
                    if !value.is_null()
                        && let Err(e) = schema.attr_type.validate(value)
                    {
                        errors.push(e);
                    }
                }
                None => errors.push(TypeError::UnknownAttribute { name: name.clone() }),
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
