//! Column list extraction from `INSERT INTO <table> (<cols>)` headers.

use regex::Regex;

/// Matches the INSERT header for one target table and pulls out its columns
#[derive(Debug, Clone)]
pub struct ColumnExtractor {
    header_re: Regex,
}

/// Columns found in an INSERT header, plus where the header ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertHeader {
    pub columns: Vec<String>,
    /// Byte offset just past the closing parenthesis of the column list
    pub end: usize,
}

impl ColumnExtractor {
    /// Build an extractor for `table` (matched case-insensitively, optionally
    /// backtick-quoted)
    pub fn new(table: &str) -> anyhow::Result<Self> {
        let pattern = format!(
            r"(?is)\bINSERT\s+INTO\s+`?{}`?\s*\(([^)]*)\)",
            regex::escape(table)
        );
        Ok(Self {
            header_re: Regex::new(&pattern)?,
        })
    }

    /// Parse the header of `statement`. Returns `None` when the statement does
    /// not target the table or its column list is empty.
    pub fn parse(&self, statement: &str) -> Option<InsertHeader> {
        let caps = self.header_re.captures(statement)?;
        let whole = caps.get(0)?;
        let columns: Vec<String> = caps
            .get(1)?
            .as_str()
            .split(',')
            .map(|c| c.trim().to_string())
            .collect();

        if columns.iter().all(|c| c.is_empty()) {
            return None;
        }

        Some(InsertHeader {
            columns,
            end: whole.end(),
        })
    }

    /// Column names of `statement`, or an empty list when it does not match
    pub fn extract(&self, statement: &str) -> Vec<String> {
        self.parse(statement)
            .map(|header| header.columns)
            .unwrap_or_default()
    }
}

/// One-shot column extraction for a given table.
pub fn extract_columns(statement: &str, table: &str) -> Vec<String> {
    ColumnExtractor::new(table)
        .map(|extractor| extractor.extract(statement))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic() {
        let cols = extract_columns(
            "INSERT INTO xf_post (post_id, user_id, message) SELECT 1, 2, 'x';",
            "xf_post",
        );
        assert_eq!(cols, vec!["post_id", "user_id", "message"]);
    }

    #[test]
    fn test_case_insensitive_keywords_and_table() {
        let cols = extract_columns("insert into XF_POST (Post_Id,  Message) select 1, 'x'", "xf_post");
        assert_eq!(cols, vec!["Post_Id", "Message"]);
    }

    #[test]
    fn test_backtick_table_and_multiline() {
        let cols = extract_columns("INSERT INTO `xf_post`\n(post_id,\n message)\nSELECT 1, 'x'", "xf_post");
        assert_eq!(cols, vec!["post_id", "message"]);
    }

    #[test]
    fn test_other_table_has_no_columns() {
        assert!(extract_columns("INSERT INTO xf_thread (thread_id) SELECT 1;", "xf_post").is_empty());
        assert!(extract_columns("INSERT INTO xf_posts (post_id) SELECT 1;", "xf_post").is_empty());
    }

    #[test]
    fn test_missing_column_list() {
        assert!(extract_columns("INSERT INTO xf_post SELECT 1, 2;", "xf_post").is_empty());
        assert!(extract_columns("INSERT INTO xf_post () SELECT 1;", "xf_post").is_empty());
    }

    #[test]
    fn test_header_end_offset() {
        let stmt = "INSERT INTO xf_post (a, b) SELECT 1, 2";
        let header = ColumnExtractor::new("xf_post").unwrap().parse(stmt).unwrap();
        assert_eq!(&stmt[header.end..], " SELECT 1, 2");
    }
}
