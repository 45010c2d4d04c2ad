//! Statement rewriter.
//!
//! Turns one legacy `INSERT INTO <table> (<cols>) SELECT v1, v2, ...`
//! statement into `INSERT IGNORE INTO <table> (<cols>) VALUES (v1, v2, ...);`:
//! - lookup subqueries are replaced through [`SubstitutionRules`]
//! - values are split with [`tokenize`], respecting strings and parentheses
//! - string literals are normalized with [`escape_literal`]
//! - missing trailing values are padded with `NULL`

mod columns;
mod escape;
mod substitution;
mod tokenizer;
mod warnings;

pub use columns::{extract_columns, ColumnExtractor, InsertHeader};
pub use escape::{escape_literal, is_quoted, NULL_MARKER};
pub use substitution::{RuleSpec, SubstitutionRule, SubstitutionRules};
pub use tokenizer::{
    find_select_keyword, find_unresolved_subquery, find_unterminated_string, tokenize,
};
pub use warnings::RewriteWarning;

use crate::config::RewriteConfig;

/// Longest fragment kept when reporting an unresolved subquery
const FRAGMENT_LEN: usize = 80;

/// Rewrites statements for one target table
#[derive(Debug, Clone)]
pub struct StatementRewriter {
    table: String,
    columns: ColumnExtractor,
    rules: SubstitutionRules,
}

impl StatementRewriter {
    pub fn new(table: &str, rules: SubstitutionRules) -> anyhow::Result<Self> {
        Ok(Self {
            table: table.to_string(),
            columns: ColumnExtractor::new(table)?,
            rules,
        })
    }

    /// Build a rewriter from the table names, sentinel and extra rules in
    /// `config`
    pub fn from_config(config: &RewriteConfig) -> anyhow::Result<Self> {
        let mut rules =
            SubstitutionRules::defaults(&config.users_table, &config.threads_table, config.sentinel)?;
        for spec in &config.extra_rules {
            rules.push(spec.compile()?);
        }
        Self::new(&config.table, rules)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn rules(&self) -> &SubstitutionRules {
        &self.rules
    }

    /// Rewrite a single statement
    pub fn rewrite(&self, statement: &str) -> Result<String, RewriteWarning> {
        let header = self
            .columns
            .parse(statement)
            .ok_or_else(|| RewriteWarning::MissingColumns {
                table: self.table.clone(),
            })?;

        let after_header = &statement[header.end..];
        let select_end = find_select_keyword(after_header).ok_or(RewriteWarning::MissingSelect)?;
        let select_part = strip_terminator(after_header[select_end..].trim_start());

        let substituted = self.rules.apply(select_part);

        if let Some(pos) = find_unresolved_subquery(&substituted) {
            return Err(RewriteWarning::UnresolvedSubquery {
                fragment: fragment_at(&substituted, pos),
            });
        }

        // A lookup cut short at a `)` inside its own string leaves a dangling quote
        if let Some(pos) = find_unterminated_string(&substituted) {
            let fragment = fragment_at(&substituted, pos);
            return Err(if find_unterminated_string(select_part).is_none() {
                RewriteWarning::UnresolvedSubquery { fragment }
            } else {
                RewriteWarning::UnterminatedString { fragment }
            });
        }

        let mut values: Vec<String> = tokenize(&substituted)
            .into_iter()
            .map(|token| {
                if is_quoted(token) || token == NULL_MARKER {
                    escape_literal(token)
                } else {
                    token.to_string()
                }
            })
            .collect();

        let column_count = header.columns.len();
        if values.len() > column_count {
            return Err(RewriteWarning::TooManyValues {
                columns: column_count,
                values: values.len(),
            });
        }
        values.resize(column_count, NULL_MARKER.to_string());

        Ok(format!(
            "INSERT IGNORE INTO {} ({}) VALUES ({});",
            self.table,
            header.columns.join(", "),
            values.join(", ")
        ))
    }
}

fn fragment_at(text: &str, pos: usize) -> String {
    text[pos..].chars().take(FRAGMENT_LEN).collect()
}

/// Drop trailing whitespace and statement terminators
fn strip_terminator(text: &str) -> &str {
    text.trim_end().trim_end_matches(';').trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> StatementRewriter {
        let rules = SubstitutionRules::defaults("xf_user", "xf_thread", 9999).unwrap();
        StatementRewriter::new("xf_post", rules).unwrap()
    }

    #[test]
    fn test_rewrite_user_lookup() {
        let out = rewriter()
            .rewrite(
                "INSERT INTO xf_post (post_id, user_id, message) SELECT 1, \
                 (SELECT user_id FROM xf_user WHERE username = 'alice'), 'hi there';",
            )
            .unwrap();
        assert_eq!(
            out,
            "INSERT IGNORE INTO xf_post (post_id, user_id, message) VALUES (1, 9999, 'hi there');"
        );
    }

    #[test]
    fn test_rewrite_pads_missing_values() {
        let out = rewriter()
            .rewrite("INSERT INTO xf_post (a, b, c, d, e) SELECT 1, 2, 'x', 4;")
            .unwrap();
        assert_eq!(
            out,
            "INSERT IGNORE INTO xf_post (a, b, c, d, e) VALUES (1, 2, 'x', 4, NULL);"
        );
    }

    #[test]
    fn test_rewrite_quoted_null() {
        let out = rewriter()
            .rewrite("INSERT INTO xf_post (a, b) SELECT 'NULL', NULL")
            .unwrap();
        assert_eq!(out, "INSERT IGNORE INTO xf_post (a, b) VALUES (NULL, NULL);");
    }

    #[test]
    fn test_rewrite_without_terminator() {
        let out = rewriter()
            .rewrite("INSERT INTO xf_post (a) SELECT 'x'  ")
            .unwrap();
        assert_eq!(out, "INSERT IGNORE INTO xf_post (a) VALUES ('x');");
    }

    #[test]
    fn test_missing_columns() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_thread (a) SELECT 1;")
            .unwrap_err();
        assert!(matches!(err, RewriteWarning::MissingColumns { .. }));
    }

    #[test]
    fn test_missing_select() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (a) VALUES (1);")
            .unwrap_err();
        assert_eq!(err, RewriteWarning::MissingSelect);
    }

    #[test]
    fn test_select_inside_column_list_is_not_used() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (selected) VALUES (1);")
            .unwrap_err();
        assert_eq!(err, RewriteWarning::MissingSelect);
    }

    #[test]
    fn test_select_word_inside_string_is_not_the_keyword() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (a, b) VALUES (1, 'please select one');")
            .unwrap_err();
        assert_eq!(err, RewriteWarning::MissingSelect);
    }

    #[test]
    fn test_select_word_inside_value_string_kept() {
        let out = rewriter()
            .rewrite("INSERT INTO xf_post (a, b) select 1, 'select me';")
            .unwrap();
        assert_eq!(out, "INSERT IGNORE INTO xf_post (a, b) VALUES (1, 'select me');");
    }

    #[test]
    fn test_lookup_cut_at_paren_in_username_rejected() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (a, b, c) SELECT (SELECT user_id FROM xf_user WHERE username = 'a)b'), 2;")
            .unwrap_err();
        assert_eq!(
            err,
            RewriteWarning::UnresolvedSubquery {
                fragment: "'), 2".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_string_rejected() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (a, b) SELECT 1, 'never closed")
            .unwrap_err();
        assert_eq!(
            err,
            RewriteWarning::UnterminatedString {
                fragment: "'never closed".to_string()
            }
        );
    }

    #[test]
    fn test_too_many_values() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (a, b) SELECT 1, 2, 3;")
            .unwrap_err();
        assert_eq!(
            err,
            RewriteWarning::TooManyValues {
                columns: 2,
                values: 3
            }
        );
    }

    #[test]
    fn test_unknown_subquery_rejected() {
        let err = rewriter()
            .rewrite("INSERT INTO xf_post (a, b) SELECT 1, (SELECT node_id FROM xf_node WHERE x = 1, 2);")
            .unwrap_err();
        match err {
            RewriteWarning::UnresolvedSubquery { fragment } => {
                assert!(fragment.starts_with("(SELECT node_id"));
            }
            other => panic!("unexpected warning: {other:?}"),
        }
    }

    #[test]
    fn test_select_text_inside_string_is_fine() {
        let out = rewriter()
            .rewrite("INSERT INTO xf_post (a) SELECT '(SELECT 1)';")
            .unwrap();
        assert_eq!(out, "INSERT IGNORE INTO xf_post (a) VALUES ('(SELECT 1)');");
    }

    #[test]
    fn test_from_config_uses_sentinel_and_extra_rules() {
        let config = RewriteConfig::builder()
            .sentinel(Some(42))
            .extra_rules(vec![RuleSpec {
                name: "node_lookup".to_string(),
                pattern: r"\(SELECT node_id FROM xf_node WHERE [^)]*\)".to_string(),
                replacement: "7".to_string(),
            }])
            .build()
            .unwrap();
        let rewriter = StatementRewriter::from_config(&config).unwrap();
        assert_eq!(rewriter.rules().len(), 3);

        let out = rewriter
            .rewrite(
                "INSERT INTO xf_post (a, b) SELECT (SELECT user_id FROM xf_user WHERE username = 'x'), \
                 (SELECT node_id FROM xf_node WHERE title = 'y');",
            )
            .unwrap();
        assert_eq!(out, "INSERT IGNORE INTO xf_post (a, b) VALUES (42, 7);");
    }
}
