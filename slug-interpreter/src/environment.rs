use crate::value::{EvaluationError, Value};
use gc::{Finalize, Gc, GcCell, Trace};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Trace, Finalize)]
struct Binding {
    value: Value,
    constant: bool,
}

#[derive(Debug, Trace, Finalize)]
pub struct Scope {
    store: HashMap<Rc<str>, Binding>,
    outer: Option<Environment>,
}

/// Shared handle to one scope. Clones point at the same scope, so a closure
/// and the block that created it observe each other's writes.
#[derive(Debug, Clone, Trace, Finalize)]
pub struct Environment {
    scope: Gc<GcCell<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scope: Gc::new(GcCell::new(Scope {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: Environment) -> Environment {
        Environment {
            scope: Gc::new(GcCell::new(Scope {
                store: HashMap::new(),
                outer: Some(outer),
            })),
        }
    }

    pub fn child(&self) -> Environment {
        Environment::new_enclosed(self.clone())
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Gc::ptr_eq(&self.scope, &other.scope)
    }

    /// Innermost scope, starting here and walking outward, that holds `name`.
    fn find(&self, name: &str) -> Option<Environment> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.scope.borrow();
            if scope.store.contains_key(name) {
                drop(scope);
                return Some(env);
            }
            current = scope.outer.clone();
        }
        None
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let env = self.find(name)?;
        let scope = env.scope.borrow();
        scope.store.get(name).map(|binding| binding.value.clone())
    }

    /// `let` / `const`: an existing binding anywhere in the chain is
    /// overwritten in place, constant flag included. Only when the name is
    /// unknown is a new binding created, in this scope.
    pub fn declare(&self, name: Rc<str>, value: Value, constant: bool) -> Result<(), EvaluationError> {
        match self.find(&name) {
            Some(env) => {
                let mut scope = env.scope.borrow_mut();
                let Some(binding) = scope.store.get_mut(&name) else {
                    return Err(EvaluationError::UndefinedVariable(name));
                };
                if binding.constant {
                    return Err(EvaluationError::AssignToConstant(name));
                }
                if !env.ptr_eq(self) {
                    tracing::debug!(%name, constant, "declaration overwrites outer binding");
                }
                binding.value = value;
                binding.constant = constant;
            }
            None => {
                self.bind_local(name, value, constant);
            }
        }
        Ok(())
    }

    /// Returns `Ok(false)` when no scope in the chain holds `name`.
    pub fn assign(&self, name: &str, value: Value) -> Result<bool, EvaluationError> {
        let Some(env) = self.find(name) else {
            return Ok(false);
        };
        let mut scope = env.scope.borrow_mut();
        match scope.store.get_mut(name) {
            Some(binding) if binding.constant => Err(EvaluationError::AssignToConstant(name.into())),
            Some(binding) => {
                binding.value = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Binds in this scope only, replacing any binding of the same name here
    /// and leaving outer scopes untouched. Used for call parameters.
    pub fn bind_local(&self, name: Rc<str>, value: Value, constant: bool) {
        self.scope
            .borrow_mut()
            .store
            .insert(name, Binding { value, constant });
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
