use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::value::{Closure, Value};

/// One lexical scope. Lookups walk the parent chain outward.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn child(parent: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Binds `name` in this scope only.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().get(name)),
        }
    }

    /// Updates the nearest existing binding of `name`, or defines it here when
    /// no enclosing scope has one.
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Err(value) = self.update(name, value) {
            self.define(name, value);
        }
    }

    fn update(&mut self, name: &str, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().update(name, value),
            None => Err(value),
        }
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Drops every binding, and with them the functions declared here.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// True when `scope` is kept alive only by functions declared in it, and
    /// those functions are bound nowhere but in `scope` itself. The caller's
    /// handle is the one reference allowed from outside.
    pub fn is_self_contained(scope: &Rc<RefCell<Environment>>) -> bool {
        let env = scope.borrow();

        let mut closures: Vec<&Rc<Closure>> = vec![];
        for value in env.values.values() {
            if let Value::Function(closure) = value {
                if Rc::ptr_eq(&closure.env, scope)
                    && !closures.iter().any(|seen| Rc::ptr_eq(seen, closure))
                {
                    closures.push(closure);
                }
            }
        }
        if closures.is_empty() || Rc::strong_count(scope) != closures.len() + 1 {
            return false;
        }

        closures.iter().all(|closure| {
            let bound_here = env
                .values
                .values()
                .filter(|value| matches!(value, Value::Function(other) if Rc::ptr_eq(other, closure)))
                .count();
            Rc::strong_count(closure) == bound_here
        })
    }
}
