use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::value::Value;

#[derive(Default)]
pub struct Scope {
    variables: HashMap<String, Value>,
    parent: Option<Environment>,
}

/// A chain of scopes. Cloning shares the chain, which is how closures keep
/// seeing (and updating) the variables they were created next to.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            variables: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Binds `name` in the innermost scope, shadowing outer bindings.
    pub fn declare(&self, name: &str, value: Value) {
        self.0.borrow_mut().variables.insert(name.to_owned(), value);
    }

    /// Rebinds the nearest existing `name`. Returns false if no scope has it.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut scope = self.0.borrow_mut();
        if let Some(slot) = scope.variables.get_mut(name) {
            *slot = value;
            return true;
        }
        match &scope.parent {
            Some(parent) => parent.assign(name, value),
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.variables.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    /// Every name visible from this scope.
    pub fn names(&self) -> Vec<String> {
        let scope = self.0.borrow();
        let mut names = scope.variables.keys().cloned().collect::<Vec<_>>();
        if let Some(parent) = &scope.parent {
            names.extend(parent.names());
        }
        names
    }
}
