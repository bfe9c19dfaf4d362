//! Problems reported by rules.
//!
//! Visit callbacks receive a [`UserContext`] that already knows which rule
//! and severity it runs under, so a rule only supplies the message.

use serde::Serialize;
use serde_json::Value;

use super::rule::Severity;

/// Position of a node: the document it came from and a JSON pointer into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub source: String,
    pub pointer: String,
}

impl Location {
    /// Location of the document root.
    pub fn root(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            pointer: "#/".to_string(),
        }
    }

    /// Location of the child `key` of this node.
    pub fn child(&self, key: impl std::fmt::Display) -> Self {
        let escaped = key.to_string().replace('~', "~0").replace('/', "~1");
        let separator = if self.pointer.ends_with('/') { "" } else { "/" };
        Self {
            source: self.source.clone(),
            pointer: format!("{}{}{}", self.pointer, separator, escaped),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.source, self.pointer)
    }
}

/// A finding produced by a rule.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    pub suggestions: Vec<String>,
}

impl Problem {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            suggestions: vec![],
        }
    }

    /// Add a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// Context passed to visit callbacks.
pub struct UserContext<'a> {
    /// Location of the node being visited.
    pub location: &'a Location,
    /// Target of the reference, for `ref` visitors.
    pub resolved: Option<&'a Value>,
    rule_id: &'a str,
    severity: Severity,
    problems: &'a mut Vec<Problem>,
}

impl<'a> UserContext<'a> {
    pub fn new(
        rule_id: &'a str,
        severity: Severity,
        location: &'a Location,
        problems: &'a mut Vec<Problem>,
    ) -> Self {
        Self {
            location,
            resolved: None,
            rule_id,
            severity,
            problems,
        }
    }

    /// Attach the dereferenced target of a reference node.
    pub fn with_resolved(mut self, resolved: &'a Value) -> Self {
        self.resolved = Some(resolved);
        self
    }

    pub fn rule_id(&self) -> &str {
        self.rule_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Report a problem at the current node.
    pub fn report(&mut self, message: impl Into<String>) {
        let location = self.location.clone();
        self.report_at(location, message);
    }

    /// Report a problem at an explicit location.
    pub fn report_at(&mut self, location: Location, message: impl Into<String>) {
        let problem = Problem::new(self.rule_id, self.severity, message, location);
        self.problems.push(problem);
    }

    /// Report a fully built problem; its rule id and severity are overwritten
    /// with the ones this context runs under.
    pub fn push(&mut self, mut problem: Problem) {
        problem.rule_id = self.rule_id.to_string();
        problem.severity = self.severity;
        self.problems.push(problem);
    }
}
