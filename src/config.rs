//! Configuration for a rewrite run.
//!
//! Values come from three layers, highest precedence first: CLI flags, an
//! optional YAML file, and the built-in defaults below.

use crate::progress::ProgressMode;
use crate::rewriter::RuleSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "cleaned_sql_files/04_posts_cleaned.sql";
pub const DEFAULT_OUTPUT: &str = "cleaned_sql_files/04_posts_cleaned_final.sql";
pub const DEFAULT_TABLE: &str = "xf_post";
pub const DEFAULT_USERS_TABLE: &str = "xf_user";
pub const DEFAULT_THREADS_TABLE: &str = "xf_thread";
pub const DEFAULT_SENTINEL: i64 = 9999;
pub const DEFAULT_HEADER: &str = "Cleaned and transformed posts for XenForo 2.x";

/// Runtime configuration for a rewrite run
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// Input SQL file
    pub input: PathBuf,
    /// Output SQL file
    pub output: PathBuf,
    /// Table whose INSERT statements are rewritten
    pub table: String,
    /// Table targeted by the username lookup subquery
    pub users_table: String,
    /// Table targeted by the thread lookup subquery
    pub threads_table: String,
    /// Value substituted for unresolved lookups
    pub sentinel: i64,
    /// First line of the output header comment
    pub header: String,
    /// Rules applied after the built-in lookups
    pub extra_rules: Vec<RuleSpec>,
    /// How progress is reported
    pub progress: ProgressMode,
    /// Dry run mode
    pub dry_run: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            table: DEFAULT_TABLE.to_string(),
            users_table: DEFAULT_USERS_TABLE.to_string(),
            threads_table: DEFAULT_THREADS_TABLE.to_string(),
            sentinel: DEFAULT_SENTINEL,
            header: DEFAULT_HEADER.to_string(),
            extra_rules: Vec::new(),
            progress: ProgressMode::Hidden,
            dry_run: false,
        }
    }
}

impl RewriteConfig {
    /// Create a new builder
    pub fn builder() -> RewriteConfigBuilder {
        RewriteConfigBuilder::default()
    }

    /// Validate table names and rule patterns
    pub fn validate(&self) -> anyhow::Result<()> {
        for (what, name) in [
            ("table", &self.table),
            ("users_table", &self.users_table),
            ("threads_table", &self.threads_table),
        ] {
            if name.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", what);
            }
        }

        for rule in &self.extra_rules {
            rule.compile()?;
        }

        Ok(())
    }
}

/// Builder for RewriteConfig
#[derive(Default)]
pub struct RewriteConfigBuilder {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config_file: Option<PathBuf>,
    table: Option<String>,
    sentinel: Option<i64>,
    extra_rules: Vec<RuleSpec>,
    progress: ProgressMode,
    dry_run: bool,
}

impl RewriteConfigBuilder {
    pub fn input(mut self, path: Option<PathBuf>) -> Self {
        self.input = path;
        self
    }

    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn table(mut self, table: Option<String>) -> Self {
        self.table = table;
        self
    }

    pub fn sentinel(mut self, sentinel: Option<i64>) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn extra_rules(mut self, rules: Vec<RuleSpec>) -> Self {
        self.extra_rules = rules;
        self
    }

    pub fn progress(mut self, progress: ProgressMode) -> Self {
        self.progress = progress;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the RewriteConfig
    pub fn build(self) -> anyhow::Result<RewriteConfig> {
        let yaml = match self.config_file {
            Some(ref path) => RewriteYamlConfig::load(path)?,
            None => RewriteYamlConfig::default(),
        };
        let defaults = RewriteConfig::default();

        // YAML rules first, then rules passed in directly
        let mut extra_rules = yaml.rules;
        extra_rules.extend(self.extra_rules);

        let config = RewriteConfig {
            input: self.input.unwrap_or(defaults.input),
            output: self.output.unwrap_or(defaults.output),
            table: self.table.or(yaml.table).unwrap_or(defaults.table),
            users_table: yaml.users_table.unwrap_or(defaults.users_table),
            threads_table: yaml.threads_table.unwrap_or(defaults.threads_table),
            sentinel: self.sentinel.or(yaml.sentinel).unwrap_or(defaults.sentinel),
            header: yaml.header.unwrap_or(defaults.header),
            extra_rules,
            progress: self.progress,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteYamlConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_table: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads_table: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<i64>,

    /// First header line written to the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Extra substitution rules, applied after the built-in lookups
    pub rules: Vec<RuleSpec>,
}

impl RewriteYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }
}
