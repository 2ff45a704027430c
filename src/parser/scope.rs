//! Lexical scopes used while parsing.
//!
//! Scopes live on a stack owned by the parser. The scope below the top is the
//! outer scope of the one above it, so a child can never outlive its parent:
//! closing a scope pops and drops it.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::ast::Stmt,
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Name reserved for discarded values.
pub const DISCARD: &str = "_";

/// One level of the chain: identifier to declaring statement.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    bindings: HashMap<String, Stmt>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Stmt> {
        self.bindings.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScopeChain {
    // Never empty; index 0 is the top-level scope.
    scopes: Vec<Scope>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![Scope::new()],
        }
    }

    /// Number of scopes on the chain, the top-level one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    /// Opens a child of the current scope and makes it current.
    pub fn open(&mut self) {
        self.scopes.push(Scope::new());
        trace!(depth = self.depth(), "opened scope");
    }

    /// Drops the current scope, making its parent current again.
    ///
    /// The top-level scope is never closed; `None` is returned instead.
    pub fn close(&mut self) -> Option<Scope> {
        if self.scopes.len() == 1 {
            return None;
        }

        let closed = self.scopes.pop();
        trace!(depth = self.depth(), "closed scope");
        closed
    }

    /// Binds `name` to `stmt` in the current scope.
    ///
    /// Fails if the current scope already holds `name` as a constant. Outer
    /// scopes are not consulted, so shadowing an outer constant is allowed.
    pub fn declare(&mut self, name: &str, stmt: Stmt, position: Position) -> Result<(), Error> {
        if name == DISCARD {
            return Ok(());
        }

        let depth = self.depth();
        let scope = &mut self.scopes[depth - 1];

        if scope.get(name).is_some_and(Stmt::is_constant) {
            return Err(Error::new(
                ErrorImpl::ConstReassignment {
                    variable: name.to_string(),
                },
                position,
            ));
        }

        debug!(name, depth, constant = stmt.is_constant(), "declared binding");
        scope.bindings.insert(name.to_string(), stmt);
        Ok(())
    }

    /// Searches the current scope, then each outer scope in turn.
    pub fn lookup(&self, name: &str) -> Option<&Stmt> {
        if name == DISCARD {
            return None;
        }

        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
