//! The ordered classification rules.
//!
//! Rules are evaluated in order and the first match wins; a failure no rule
//! matches is `UNKNOWN`. Rules added with [`RuleSet::push`] run after the
//! built-in ones, so they never change the precedence of existing rules.
use super::failure::Failure;
use crate::types::ErrorCategory;

/// A named predicate that assigns `category` when it matches.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub category: ErrorCategory,
    pub matches: fn(&Failure, bool) -> bool,
}

fn transport_or_offline(failure: &Failure, online: bool) -> bool {
    failure.is_transport_failure() || !online
}

fn unauthorized(failure: &Failure, _online: bool) -> bool {
    matches!(failure.status, Some(401 | 403))
}

fn client_error(failure: &Failure, _online: bool) -> bool {
    matches!(failure.status, Some(400..=499))
}

fn server_error(failure: &Failure, _online: bool) -> bool {
    matches!(failure.status, Some(status) if status >= 500)
}

pub const DEFAULT_RULES: [Rule; 4] = [
    Rule {
        name: "transport-or-offline",
        category: ErrorCategory::Network,
        matches: transport_or_offline,
    },
    Rule {
        name: "unauthorized",
        category: ErrorCategory::Auth,
        matches: unauthorized,
    },
    Rule {
        name: "client-error",
        category: ErrorCategory::Validation,
        matches: client_error,
    },
    Rule {
        name: "server-error",
        category: ErrorCategory::Server,
        matches: server_error,
    },
];

#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl RuleSet {
    /// Appends `rule` after every existing rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// The first rule matching `failure`, if any.
    pub fn first_match(&self, failure: &Failure, online: bool) -> Option<&Rule> {
        self.rules.iter().find(|rule| (rule.matches)(failure, online))
    }

    pub fn classify(&self, failure: &Failure, online: bool) -> ErrorCategory {
        self.first_match(failure, online)
            .map_or(ErrorCategory::Unknown, |rule| rule.category)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }
}
