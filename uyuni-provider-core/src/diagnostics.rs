//! Diagnostics - Accumulating, attribute-scoped error reporting
//!
//! Provider configuration must report every independent validation failure
//! in one pass, so errors are collected into a `Diagnostics` bag instead of
//! short-circuiting on the first one.

use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One user-visible problem, optionally scoped to a configuration attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Configuration attribute this diagnostic points at, if any
    pub attribute: Option<String>,
    pub summary: String,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "[{}] {}: {}", attr, self.summary, self.detail),
            None => write!(f, "{}: {}", self.summary, self.detail),
        }
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a global error
    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Error,
            attribute: None,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    /// Add an error scoped to one configuration attribute
    pub fn add_attribute_error(
        &mut self,
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.items.push(Diagnostic {
            severity: Severity::Error,
            attribute: Some(attribute.into()),
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Warning,
            attribute: None,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Only the error-severity diagnostics, in insertion order
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_accumulate_in_order() {
        let mut diags = Diagnostics::new();
        diags.add_attribute_error("host", "Missing Uyuni API Host", "set host or UYUNI_HOST");
        diags.add_attribute_error("username", "Missing Uyuni API Username", "set username");
        diags.add_error("Unable to Create Uyuni API Client", "connection refused");

        assert!(diags.has_errors());
        assert_eq!(diags.len(), 3);
        let attrs: Vec<_> = diags.iter().map(|d| d.attribute.as_deref()).collect();
        assert_eq!(attrs, vec![Some("host"), Some("username"), None]);
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut diags = Diagnostics::new();
        diags.add_warning("Update not applied", "remote user left unchanged");

        assert!(!diags.has_errors());
        assert_eq!(diags.errors().count(), 0);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_display_includes_attribute_scope() {
        let mut diags = Diagnostics::new();
        diags.add_attribute_error("password", "Missing Uyuni API Password", "set it");
        let rendered = diags.to_string();
        assert!(rendered.contains("[password]"));
        assert!(rendered.contains("Missing Uyuni API Password"));
    }
}
