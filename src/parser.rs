use crate::ast::{Document, Header, HeaderValue};
use crate::error::ParseError;
use crate::lexer::{HeaderLine, Lexer, LineKind};
use log::debug;
use miette::NamedSource;

pub const DELIMITER: &str = "---";

/// Parses a skill document into its header and body.
pub fn parse_document(source: &str, file_name: &str) -> Result<Document, ParseError> {
    let (header_text, body) = split_sections(source, file_name)?;
    let header = Parser::new(header_text).parse_header();
    debug!("{file_name}: parsed {} header keys", header.len());
    Ok(Document {
        header,
        body: body.trim().to_string(),
    })
}

/// Splits the raw text at the opening and closing delimiter lines.
fn split_sections<'a>(source: &'a str, file_name: &str) -> Result<(&'a str, &'a str), ParseError> {
    let named = || NamedSource::new(file_name, source.to_string());

    if !source.starts_with(DELIMITER) {
        let first_line = source.lines().next().map_or(0, str::len);
        return Err(ParseError::MissingOpeningDelimiter {
            src: named(),
            span: (0, first_line).into(),
        });
    }

    let after_open = match source.find('\n') {
        Some(newline) => newline + 1,
        None => source.len(),
    };

    let mut offset = after_open;
    let mut closing = None;
    for line in source[after_open..].split_inclusive('\n') {
        if line.trim() == DELIMITER {
            closing = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((close_start, close_end)) = closing else {
        return Err(ParseError::MissingClosingDelimiter {
            src: named(),
            span: (0, DELIMITER.len()).into(),
        });
    };

    let header_text = &source[after_open..close_start];
    if header_text.trim().is_empty() {
        return Err(ParseError::EmptyHeader {
            src: named(),
            span: (after_open, close_start - after_open).into(),
        });
    }

    Ok((header_text, &source[close_end..]))
}

/// Parser states. Pending values live inside the state that accumulates them.
#[derive(Debug)]
enum State {
    Scalar,
    BlockScalar { key: String, parts: Vec<String> },
    List { key: String, items: Vec<String> },
}

/// A line-oriented state machine over the restricted header grammar:
/// plain scalars, `>`/`|` block scalars and flat `- item` lists.
pub struct Parser<'a> {
    lines: Vec<HeaderLine<'a>>,
    state: State,
    header: Header,
}

impl<'a> Parser<'a> {
    pub fn new(header_text: &'a str) -> Self {
        Self {
            lines: Lexer::new(header_text).lex(),
            state: State::Scalar,
            header: Header::new(),
        }
    }

    pub fn parse_header(mut self) -> Header {
        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            self.step(line.kind);
        }
        self.flush();
        self.header
    }

    fn step(&mut self, kind: LineKind<'_>) {
        match &mut self.state {
            State::BlockScalar { parts, .. } => match kind {
                LineKind::Entry { .. } => {
                    self.flush();
                    self.scalar_line(kind);
                }
                LineKind::Blank => {}
                LineKind::ListItem(text) => parts.push(format!("- {text}")),
                LineKind::Other(text) => parts.push(text.to_string()),
            },
            State::List { items, .. } => match kind {
                LineKind::ListItem(text) => items.push(text.to_string()),
                _ => {
                    self.flush();
                    self.scalar_line(kind);
                }
            },
            State::Scalar => self.scalar_line(kind),
        }
    }

    fn scalar_line(&mut self, kind: LineKind<'_>) {
        let LineKind::Entry { key, value } = kind else {
            return;
        };
        let key = key.to_string();
        if is_block_marker(value) {
            self.state = State::BlockScalar {
                key,
                parts: Vec::new(),
            };
        } else if value.is_empty() {
            self.state = State::List {
                key,
                items: Vec::new(),
            };
        } else {
            self.header
                .insert(key, HeaderValue::Scalar(unquote(value).to_string()));
        }
    }

    /// Commits whatever value the current state is holding and returns to `Scalar`.
    fn flush(&mut self) {
        match std::mem::replace(&mut self.state, State::Scalar) {
            State::Scalar => {}
            State::BlockScalar { key, parts } => {
                let folded = parts.join(" ");
                self.header
                    .insert(key, HeaderValue::Scalar(folded.trim().to_string()));
            }
            State::List { key, items } => {
                // An empty list is a key with no value at all.
                if !items.is_empty() {
                    self.header.insert(key, HeaderValue::List(items));
                }
            }
        }
    }
}

pub(crate) fn is_block_marker(value: &str) -> bool {
    matches!(value, ">" | "|" | ">-" | "|-" | ">+" | "|+")
}

/// Strips one layer of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
