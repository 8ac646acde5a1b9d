pub mod adapt;
pub mod api;
pub mod ast;
pub mod classify;
pub mod error;
pub mod generator;
pub mod installer;
pub mod layout;
pub mod lexer;
pub mod mcp;
pub mod parser;
pub mod serialization;
pub mod target;

pub use api::{convert, ConvertOptions, Converter, Report, TargetOutcome};
pub use parser::parse_document;
pub use target::Target;
