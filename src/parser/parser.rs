//! Parser state and the program entry point.
//!
//! This module contains the main Parser struct. The parser pulls tokens from
//! the lexer one at a time and only ever looks at two of them: `current` and
//! `peek`. It never rewinds.
//!
//! It also owns:
//! - the statement handler lookup table
//! - the scope chain that identifiers are resolved against

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    scope::ScopeChain,
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Source of tokens, pulled on demand
    lexer: Lexer,
    /// The token being looked at
    current: Token,
    /// One token of lookahead
    peek: Token,
    /// The name of the source being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Bindings visible at the current point of the parse
    scopes: ScopeChain,
}

impl Parser {
    /// Creates a new Parser reading from `lexer`, with an empty top-level scope.
    ///
    /// The statement lookup table is left empty; [`parse`] fills it in.
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        Parser {
            file: lexer.file(),
            lexer,
            current,
            peek,
            stmt_lookup: HashMap::new(),
            scopes: ScopeChain::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let peek = std::mem::replace(&mut self.peek, next);
        std::mem::replace(&mut self.current, peek)
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// The consumed token if the current token matches, otherwise the error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current.kind == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) => Err(error),
            None => Err(self.unexpected_token(&format!("expected {}", expected_kind))),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the `;` ending a statement. The final statement of the input
    /// may leave it out.
    pub fn expect_statement_end(&mut self) -> Result<(), Error> {
        if self.current.kind == TokenKind::EOF {
            return Ok(());
        }

        self.expect(TokenKind::Semicolon).map(|_| ())
    }

    /// Builds the error for a token that cannot appear at this point.
    ///
    /// Illegal tokens always report as lexical errors.
    pub fn unexpected_token(&self, message: &str) -> Error {
        let token = &self.current;
        let error = match token.kind {
            TokenKind::Illegal => ErrorImpl::UnrecognisedToken {
                token: token.value.clone(),
            },
            _ => ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: format!("{}, found {}", message, token.kind),
            },
        };

        Error::new(error, token.span.start.clone())
    }

    /// Like [`Parser::unexpected_token`], for a token that cannot start anything here.
    pub fn stray_token(&self) -> Error {
        let token = &self.current;
        let error = match token.kind {
            TokenKind::Illegal => ErrorImpl::UnrecognisedToken {
                token: token.value.clone(),
            },
            _ => ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
        };

        Error::new(error, token.span.start.clone())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Registers a statement handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind that starts the statement
    /// * `stmt_fn` - The handler function for this statement type
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeChain {
        &mut self.scopes
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    /// Parses statements until end of input.
    ///
    /// The first error aborts the whole parse.
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let start = Position(0, Rc::clone(&self.file));
        let mut statements = vec![];

        while self.has_tokens() {
            if let Some(stmt) = parse_stmt(self)? {
                statements.push(stmt);
            }
        }

        debug!(file = %self.file, statements = statements.len(), "parsed program");

        Ok(Program {
            statements,
            span: Span {
                start,
                end: self.get_position(),
            },
        })
    }
}

/// Parses source text into a [`Program`].
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, and parses all statements until EOF.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance, whose top-level scope holds the program's bindings
/// - Result containing either the Program or the first Error
pub fn parse(source: String, file: Option<String>) -> (Parser, Result<Program, Error>) {
    let mut parser = Parser::new(Lexer::new(source, file));
    create_token_lookups(&mut parser);

    let program = parser.parse_program();
    (parser, program)
}
