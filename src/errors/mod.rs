//! Error types and error handling for the parser and evaluator.
//!
//! This module defines the error types used from tokenization through
//! evaluation. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexical, syntax, scope and evaluation failures
//! - Helpful error messages and suggestions for the CLI

pub mod errors;
