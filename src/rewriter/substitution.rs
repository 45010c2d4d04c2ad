//! Subquery substitution rules.
//!
//! The legacy export embeds foreign-key lookups as correlated subqueries,
//! e.g. `(SELECT user_id FROM xf_user WHERE username = 'alice')`. The lookup
//! tables are not guaranteed to exist in the target database, so each known
//! shape is replaced with a fixed sentinel value that keeps column arity.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// Tail shared by the built-in lookup patterns: anything up to the first
/// unescaped closing parenthesis
const LOOKUP_TAIL: &str = r"(?:\\.|[^\\)])*\)";

/// A single pattern -> replacement rule
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pub name: String,
    pattern: Regex,
    replacement: String,
}

impl SubstitutionRule {
    pub fn new(name: &str, pattern: &str, replacement: &str) -> anyhow::Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid pattern for rule '{}': {}", name, e))?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            replacement: replacement.to_string(),
        })
    }

    /// Rule replacing `(SELECT user_id FROM <users_table> WHERE username ...)`
    pub fn user_lookup(users_table: &str, sentinel: i64) -> anyhow::Result<Self> {
        Self::new(
            "user_lookup",
            &format!(
                r"(?i)\(\s*SELECT\s+user_id\s+FROM\s+`?{}`?\s+WHERE\s+username\b{}",
                regex::escape(users_table),
                LOOKUP_TAIL
            ),
            &sentinel.to_string(),
        )
    }

    /// Rule replacing `(SELECT thread_id FROM <threads_table> WHERE ...)`
    pub fn thread_lookup(threads_table: &str, sentinel: i64) -> anyhow::Result<Self> {
        Self::new(
            "thread_lookup",
            &format!(
                r"(?i)\(\s*SELECT\s+thread_id\s+FROM\s+`?{}`?\s+WHERE\b{}",
                regex::escape(threads_table),
                LOOKUP_TAIL
            ),
            &sentinel.to_string(),
        )
    }

    /// Replace every match in `text`. The replacement is taken literally.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned()
    }
}

/// Rule definition as written in the YAML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    /// Regular expression matched against the value list
    pub pattern: String,
    /// Literal text substituted for each match
    pub replacement: String,
}

impl RuleSpec {
    pub fn compile(&self) -> anyhow::Result<SubstitutionRule> {
        if self.name.is_empty() {
            anyhow::bail!("Substitution rule name cannot be empty");
        }
        SubstitutionRule::new(&self.name, &self.pattern, &self.replacement)
    }
}

/// Ordered table of substitution rules, applied first to last
#[derive(Debug, Clone, Default)]
pub struct SubstitutionRules {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two legacy lookup shapes, both mapped to `sentinel`
    pub fn defaults(users_table: &str, threads_table: &str, sentinel: i64) -> anyhow::Result<Self> {
        Ok(Self::new()
            .with_rule(SubstitutionRule::user_lookup(users_table, sentinel)?)
            .with_rule(SubstitutionRule::thread_lookup(threads_table, sentinel)?))
    }

    pub fn with_rule(mut self, rule: SubstitutionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: SubstitutionRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}
