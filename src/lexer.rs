/// The kinds of lines that can appear inside a skill header.
/// Every line is classified after trimming surrounding whitespace, so
/// indentation never changes its meaning.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LineKind<'a> {
    /// A `key: value` line whose key matches `^[a-z][a-z0-9_-]*$`.
    /// The value is trimmed and may be empty.
    Entry { key: &'a str, value: &'a str },
    /// A `- item` line. The associated text is the trimmed item.
    ListItem(&'a str),
    /// A line containing only whitespace.
    Blank,
    /// Anything else: comments, uppercase keys, stray text.
    Other(&'a str),
}

/// A classified header line with its 1-based line number.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct HeaderLine<'a> {
    pub kind: LineKind<'a>,
    pub line: usize,
}

/// Splits header text into classified lines.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn lex(&self) -> Vec<HeaderLine<'a>> {
        self.source
            .lines()
            .enumerate()
            .map(|(i, raw)| HeaderLine {
                kind: classify_line(raw),
                line: i + 1,
            })
            .collect()
    }
}

/// Classifies a single raw header line.
pub fn classify_line(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(item) = line.strip_prefix("- ") {
        return LineKind::ListItem(item.trim());
    }
    if let Some((key, value)) = split_entry(line) {
        return LineKind::Entry { key, value };
    }
    LineKind::Other(line)
}

/// Returns true when `key` is a valid header key.
pub fn is_header_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let key = &line[..colon];
    if !is_header_key(key) {
        return None;
    }
    Some((key, line[colon + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lines() {
        assert_eq!(
            classify_line("name: demo"),
            LineKind::Entry {
                key: "name",
                value: "demo"
            }
        );
        assert_eq!(
            classify_line("  allowed-tools:   "),
            LineKind::Entry {
                key: "allowed-tools",
                value: ""
            }
        );
        assert_eq!(
            classify_line("url:http://example.com"),
            LineKind::Entry {
                key: "url",
                value: "http://example.com"
            }
        );
    }

    #[test]
    fn test_list_items_and_blanks() {
        assert_eq!(classify_line("  - Read  "), LineKind::ListItem("Read"));
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("-"), LineKind::Other("-"));
    }

    #[test]
    fn test_rejected_keys() {
        assert_eq!(classify_line("Name: demo"), LineKind::Other("Name: demo"));
        assert_eq!(classify_line("1st: x"), LineKind::Other("1st: x"));
        assert_eq!(classify_line("# comment"), LineKind::Other("# comment"));
        assert_eq!(
            classify_line("two words: x"),
            LineKind::Other("two words: x")
        );
    }

    #[test]
    fn test_is_header_key() {
        assert!(is_header_key("a"));
        assert!(is_header_key("user-invocable"));
        assert!(is_header_key("x_1"));
        assert!(!is_header_key(""));
        assert!(!is_header_key("-x"));
        assert!(!is_header_key("aB"));
    }

    #[test]
    fn test_lexer_numbers_lines() {
        let lines = Lexer::new("name: a\n\n- b").lex();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].line, 3);
        assert_eq!(lines[1].kind, LineKind::Blank);
    }
}
