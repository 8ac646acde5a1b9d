use crate::ast::{Header, HeaderValue};
use crate::lexer::{classify_line, LineKind};
use crate::parser::{is_block_marker, DELIMITER};

/// Scalars longer than this are re-wrapped into a folded block.
pub const FOLD_WIDTH: usize = 80;

const INDENT: &str = "  ";

/// Renders a header back into delimited text.
///
/// The output re-parses to the same values, but is not guaranteed to be
/// byte-identical to whatever text the header was originally parsed from.
pub fn to_header_text(header: &Header) -> String {
    let mut lines = vec![DELIMITER.to_string()];

    for (key, value) in header.iter() {
        match value {
            HeaderValue::List(items) => {
                lines.push(format!("{key}:"));
                lines.extend(items.iter().map(|item| format!("{INDENT}- {item}")));
            }
            HeaderValue::Scalar(text) if text.len() > FOLD_WIDTH && foldable(text) => {
                lines.push(format!("{key}: >"));
                lines.extend(fold(text));
            }
            HeaderValue::Scalar(text) => lines.push(format!("{key}: {}", render_scalar(text))),
        }
    }

    lines.push(DELIMITER.to_string());
    lines.join("\n")
}

fn render_scalar(text: &str) -> String {
    if text.eq_ignore_ascii_case("true") {
        return "true".to_string();
    }
    if text.eq_ignore_ascii_case("false") {
        return "false".to_string();
    }
    if text.is_empty() {
        return "''".to_string();
    }
    let wrapped_in = |q: char| text.len() >= 2 && text.starts_with(q) && text.ends_with(q);
    if is_block_marker(text) || wrapped_in('"') {
        format!("'{text}'")
    } else if wrapped_in('\'') {
        format!("\"{text}\"")
    } else {
        text.to_string()
    }
}

/// A folded block whose first line reads as a `key:` entry would close
/// immediately on re-parse, so such values stay on one line.
fn foldable(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(first) => !matches!(classify_line(first), LineKind::Entry { .. }),
        None => true,
    }
}

/// Word-wraps `text` into indented continuation lines.
///
/// A continuation line must never look like a `key:` entry, otherwise it would
/// end the block on re-parse; such words stay on the previous line.
fn fold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::from(INDENT);

    for word in text.split_whitespace() {
        let fits = current.len() + word.len() + 1 <= FOLD_WIDTH;
        let starts_entry = matches!(classify_line(word), LineKind::Entry { .. });
        if current.len() > INDENT.len() && !fits && !starts_entry {
            lines.push(std::mem::replace(&mut current, format!("{INDENT}{word}")));
        } else {
            if current.len() > INDENT.len() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if current.len() > INDENT.len() {
        lines.push(current);
    }
    lines
}
