use std::collections::HashMap;

use crate::ast::Type;
use crate::error::{PipelineError, PipelineErrorKind, Position, WhyResult};

/// Static mirror of [`crate::interpreter::env::Frame`]: a stack of lexical
/// scopes, but storing `(Type, mutable)` instead of a runtime `Slot`.
pub struct Scopes {
    scopes: Vec<HashMap<String, (Type, bool)>>,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes { scopes: vec![] }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn declare(&mut self, name: String, ty: Type, mutable: bool) {
        self.scopes.last_mut().expect("scope stack is never empty while analyzing").insert(name, (ty, mutable));
    }

    /// Like [`Self::declare`], but rejects shadowing a name already bound in
    /// the *same* scope (§4.5.6): nested scopes are still free to shadow an
    /// outer binding.
    pub fn declare_checked(&mut self, name: String, ty: Type, mutable: bool, position: Position, file: &str) -> WhyResult<()> {
        let innermost = self.scopes.last_mut().expect("scope stack is never empty while analyzing");
        if innermost.contains_key(&name) {
            return Err(PipelineError::new(
                PipelineErrorKind::VariableNameCollision,
                format!("Variable '{name}' is already declared in this scope"),
                file.to_owned(),
                position,
            )
            .into());
        }
        innermost.insert(name, (ty, mutable));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<(Type, bool)> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).cloned())
    }
}
