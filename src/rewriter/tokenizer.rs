//! Value list tokenizer.
//!
//! Splits the text following `SELECT` into individual value tokens. Commas
//! only separate values at nesting depth zero and outside string literals,
//! so `'a, b'` and `(1, 2)` each stay a single token.

/// Scanner state while walking a value list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal
    Normal,
    /// Inside a string literal opened by `quote`
    InString { quote: char },
    /// Just saw a backslash inside a string literal
    Escaped { quote: char },
}

impl ScanState {
    /// Advance the state by one character, adjusting `depth` for parentheses
    /// seen outside strings.
    fn step(self, c: char, depth: &mut i32) -> ScanState {
        match self {
            ScanState::Normal => match c {
                '\'' | '"' => ScanState::InString { quote: c },
                '(' => {
                    *depth += 1;
                    ScanState::Normal
                }
                ')' => {
                    *depth -= 1;
                    ScanState::Normal
                }
                _ => ScanState::Normal,
            },
            ScanState::InString { quote } => {
                if c == '\\' {
                    ScanState::Escaped { quote }
                } else if c == quote {
                    ScanState::Normal
                } else {
                    self
                }
            }
            ScanState::Escaped { quote } => ScanState::InString { quote },
        }
    }
}

/// Split a value list into trimmed tokens.
///
/// Never fails: unbalanced parentheses or an unterminated string simply
/// produce a best-effort split. Empty tokens between two separators are kept
/// so positions still line up with the column list; a trailing empty token
/// is dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut state = ScanState::Normal;
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if c == ',' && depth == 0 && state == ScanState::Normal {
            tokens.push(text[start..i].trim());
            start = i + 1;
            continue;
        }
        state = state.step(c, &mut depth);
    }

    let last = text[start..].trim();
    if !last.is_empty() {
        tokens.push(last);
    }

    tokens
}

/// Byte offset of the first `(SELECT` found outside string literals, if any.
///
/// Used after subquery substitution to catch lookup shapes no rule knows
/// about, which would otherwise be emitted verbatim.
pub fn find_unresolved_subquery(text: &str) -> Option<usize> {
    let mut state = ScanState::Normal;
    let mut depth = 0i32;

    for (i, c) in text.char_indices() {
        if c == '(' && state == ScanState::Normal && starts_select(&text[i + 1..]) {
            return Some(i);
        }
        state = state.step(c, &mut depth);
    }

    None
}

/// Byte offset just past the first `SELECT` keyword found outside string
/// literals. The keyword must stand alone as a word and be followed by
/// whitespace.
pub fn find_select_keyword(text: &str) -> Option<usize> {
    let mut state = ScanState::Normal;
    let mut depth = 0i32;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        if state == ScanState::Normal
            && prev.map_or(true, |p| !is_ident_char(p))
            && keyword_at(&text[i..], "SELECT")
            && text[i + 6..].chars().next().is_some_and(char::is_whitespace)
        {
            return Some(i + 6);
        }
        state = state.step(c, &mut depth);
        prev = Some(c);
    }

    None
}

/// Byte offset of the quote opening a string literal that is never closed
pub fn find_unterminated_string(text: &str) -> Option<usize> {
    let mut state = ScanState::Normal;
    let mut depth = 0i32;
    let mut opened_at = 0;

    for (i, c) in text.char_indices() {
        let next = state.step(c, &mut depth);
        if state == ScanState::Normal && next != ScanState::Normal {
            opened_at = i;
        }
        state = next;
    }

    (state != ScanState::Normal).then_some(opened_at)
}

fn starts_select(rest: &str) -> bool {
    let rest = rest.trim_start();
    keyword_at(rest, "SELECT") && rest[6..].chars().next().map_or(true, |c| !is_ident_char(c))
}

fn keyword_at(rest: &str, keyword: &str) -> bool {
    rest.len() >= keyword.len()
        && rest.is_char_boundary(keyword.len())
        && rest[..keyword.len()].eq_ignore_ascii_case(keyword)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
