//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. Binary expressions are built by a
//! precedence-climbing state machine rather than by recursion, and handles:
//!
//! - Statement parsing (variable declarations, functions, blocks, returns)
//! - Expression parsing (binary and unary operators, parentheses, literals)
//! - Identifier resolution against the scope chain
//!
//! Parsing stops at the first error.

pub mod binary;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod scope;
pub mod stmt;

#[cfg(test)]
mod tests;
