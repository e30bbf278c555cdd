use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// A single lexical scope. The environment chain is reference counted and shared between
/// closures, call frames and the block they were opened for; cycles through class/method
/// closures are expected and tolerated (no parent ever owns its children exclusively).
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    pub enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment { values: HashMap::new(), enclosing }))
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }
        Err(RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme)))
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }
        Err(RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme)))
    }

    /// Walks `distance` enclosing links up from `start`. Panics if the resolver recorded a
    /// distance deeper than the live chain, which would mean the resolver and interpreter
    /// have fallen out of sync with each other — a programming error, not a user error.
    pub fn ancestor(start: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut env = Rc::clone(start);
        for _ in 0..distance {
            let next = env
                .borrow()
                .enclosing
                .clone()
                .expect("resolved distance exceeds live environment chain");
            env = next;
        }
        env
    }

    pub fn get_at(start: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Value {
        let env = Environment::ancestor(start, distance);
        let value = env.borrow().values.get(name).cloned();
        value.expect("resolved variable missing from its resolved scope")
    }

    pub fn assign_at(
        start: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Value,
    ) {
        let env = Environment::ancestor(start, distance);
        env.borrow_mut().values.insert(name.lexeme.clone(), value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literal;
    use crate::token::Type;

    fn tok(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, 1)
    }

    #[test]
    fn define_and_get_in_same_scope() {
        let env = Environment::new(None);
        env.borrow_mut().define("a", Value::Literal(Literal::Number(1.0)));
        assert_eq!(env.borrow().get(&tok("a")).unwrap(), Value::Literal(Literal::Number(1.0)));
    }

    #[test]
    fn get_falls_through_to_enclosing() {
        let outer = Environment::new(None);
        outer.borrow_mut().define("a", Value::Literal(Literal::Number(1.0)));
        let inner = Environment::new(Some(Rc::clone(&outer)));
        assert_eq!(inner.borrow().get(&tok("a")).unwrap(), Value::Literal(Literal::Number(1.0)));
    }

    #[test]
    fn undefined_variable_is_runtime_error() {
        let env = Environment::new(None);
        assert!(env.borrow().get(&tok("missing")).is_err());
    }

    #[test]
    fn assign_at_writes_ancestor_scope() {
        let outer = Environment::new(None);
        outer.borrow_mut().define("a", Value::Literal(Literal::Number(1.0)));
        let inner = Environment::new(Some(Rc::clone(&outer)));
        Environment::assign_at(&inner, 1, &tok("a"), Value::Literal(Literal::Number(2.0)));
        assert_eq!(outer.borrow().get(&tok("a")).unwrap(), Value::Literal(Literal::Number(2.0)));
    }
}
