use std::collections::HashMap;

use super::value::Slot;

/// One function activation record: a stack of lexical scopes, innermost
/// last. Blocks (`if`/`while`/`do` bodies) push and pop a scope; the
/// function body itself is the bottom scope (§4.5.6, §4.7).
pub struct Frame {
    scopes: Vec<HashMap<String, Slot>>,
}

impl Frame {
    pub fn new() -> Self {
        Frame { scopes: vec![HashMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn declare(&mut self, name: impl Into<String>, slot: Slot) {
        self.scopes.last_mut().expect("frame always has a scope").insert(name.into(), slot);
    }

    pub fn get(&self, name: &str) -> Option<Slot> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).cloned())
    }
}
