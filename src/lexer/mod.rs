//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - On-demand tokenization driven by an anchored regex table
//! - Recognition of keywords, identifiers, literals and operators
//! - Token span tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
