//! String literal normalization for rewritten values.

/// Null marker used for quoted-null artifacts and padding
pub const NULL_MARKER: &str = "NULL";

/// Normalize a single value token into a MySQL-safe literal.
///
/// - `'NULL'` and `NULL` become the bare keyword `NULL`
/// - quoted strings are decoded and re-escaped, always single-quoted
/// - anything else (numbers, the sentinel, expressions) passes through
///
/// Decoding before re-escaping means already-escaped input is not escaped a
/// second time, so the function is idempotent on its own output.
pub fn escape_literal(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed == "'NULL'" || trimmed == NULL_MARKER {
        return NULL_MARKER.to_string();
    }

    match string_body(trimmed) {
        Some((body, quote)) => format_mysql_string(&decode_string_body(body, quote)),
        None => token.to_string(),
    }
}

/// Whether a token is delimited by matching single or double quotes
pub fn is_quoted(token: &str) -> bool {
    string_body(token.trim()).is_some()
}

fn string_body(token: &str) -> Option<(&str, char)> {
    let quote = token.chars().next()?;
    if (quote == '\'' || quote == '"') && token.len() >= 2 && token.ends_with(quote) {
        Some((&token[1..token.len() - 1], quote))
    } else {
        None
    }
}

/// Decode MySQL backslash escapes and doubled quotes
fn decode_string_body(body: &str, quote: char) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        } else if c == quote && chars.peek() == Some(&quote) {
            chars.next();
            result.push(quote);
        } else {
            result.push(c);
        }
    }

    result
}

/// Format a raw string value as a single-quoted MySQL literal
fn format_mysql_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped.push('\'');
    escaped
}
