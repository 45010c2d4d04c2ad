//! Statement segmenter.
//!
//! Splits a dump into INSERT statements for one table. Statements may span
//! several lines; their lines are trimmed and joined with a single space.
//! A statement closes when its current line ends with `;`, `'` or `"` and
//! the very next line starts another INSERT, or when input runs out.

/// SQL line comment marker
const COMMENT_PREFIX: &str = "--";

/// Result of segmenting a document
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Segmented {
    /// Joined statements, in input order
    pub statements: Vec<String>,
    /// Non-blank, non-comment lines seen before any statement started
    pub orphan_lines: usize,
}

/// Splits raw text into statements for a target table
#[derive(Debug, Clone)]
pub struct Segmenter {
    prefix: String,
}

impl Segmenter {
    /// Segmenter for `INSERT INTO <table>` statements
    pub fn new(table: &str) -> Self {
        Self {
            prefix: format!("INSERT INTO {}", table),
        }
    }

    fn starts_statement(&self, line: &str) -> bool {
        line.trim().starts_with(&self.prefix)
    }

    /// Split `text` into statements
    pub fn segment(&self, text: &str) -> Segmented {
        let lines: Vec<&str> = text.lines().collect();
        let mut result = Segmented::default();
        let mut current = String::new();
        let mut in_statement = false;

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();

            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            if line.starts_with(&self.prefix) {
                if !current.is_empty() {
                    result.statements.push(std::mem::take(&mut current));
                }
                current.push_str(line);
                in_statement = true;
            } else if in_statement {
                current.push(' ');
                current.push_str(line);

                let at_boundary = line.ends_with(';') || line.ends_with('\'') || line.ends_with('"');
                if at_boundary
                    && lines
                        .get(i + 1)
                        .is_some_and(|next| self.starts_statement(next))
                {
                    result.statements.push(std::mem::take(&mut current));
                    in_statement = false;
                }
            } else {
                result.orphan_lines += 1;
            }
        }

        if !current.is_empty() {
            result.statements.push(current);
        }

        result
    }
}

/// Segment `text` into `INSERT INTO <table>` statements.
pub fn segment(text: &str, table: &str) -> Vec<String> {
    Segmenter::new(table).segment(text).statements
}
