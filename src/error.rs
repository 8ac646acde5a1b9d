use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ForgeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid target: {name}")]
    #[diagnostic(
        code(forge::unknown_target),
        help("Supported targets are codex, gemini, antigravity, cursor, or all.")
    )]
    UnknownTarget { name: String },

    #[error("SKILL.md not found in {}", path.display())]
    #[diagnostic(code(forge::missing_document))]
    MissingDocument { path: PathBuf },

    #[error("Failed to render {file}")]
    #[diagnostic(code(forge::render))]
    Render {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    #[diagnostic(code(forge::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ForgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ForgeError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParseError {
    #[error("Missing opening '---' delimiter")]
    #[diagnostic(
        code(parser::missing_opening_delimiter),
        help("A skill document must start with a '---' line followed by its header.")
    )]
    MissingOpeningDelimiter {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected '---' here")]
        span: SourceSpan,
    },

    #[error("Missing closing '---' delimiter")]
    #[diagnostic(
        code(parser::missing_closing_delimiter),
        help("Close the header with a line containing only '---'.")
    )]
    MissingClosingDelimiter {
        #[source_code]
        src: NamedSource<String>,
        #[label("header opened here but never closed")]
        span: SourceSpan,
    },

    #[error("Empty frontmatter")]
    #[diagnostic(
        code(parser::empty_header),
        help("Add at least a 'name' and a 'description' between the delimiters.")
    )]
    EmptyHeader {
        #[source_code]
        src: NamedSource<String>,
        #[label("nothing between the delimiters")]
        span: SourceSpan,
    },
}
