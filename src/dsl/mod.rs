//! Expression front end — source text → tokens → AST.

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod note;
pub mod parser;
pub mod token;
pub mod unit;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use token::{SourcePos, Token, TokenKind, TokenList, TokenStream};

use lexer::Lexer;
use parser::Parser;

use crate::config::ParserConfig;

/// The expression compiler front end.
///
/// Runs source text through lexer → parser → AST.
pub struct Compiler;

impl Compiler {
    /// Parse source into a Block with the default limits.
    pub fn parse(source: &str) -> Result<Block, ParseError> {
        Self::parse_with(source, &ParserConfig::default())
    }

    /// Parse source into a Block with the given limits.
    #[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
    pub fn parse_with(source: &str, config: &ParserConfig) -> Result<Block, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        tracing::trace!(tokens = tokens.len(), "tokenized");
        let mut stream = TokenList::new(tokens);
        Parser::with_config(&mut stream, config).parse()
    }
}
