use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::FunctionExprData;
use crate::interpreter::{Interpreter, Signal};
use crate::literal::Literal;
use crate::stmt::{FunctionData, Stmt};
use crate::token::Token;
use crate::value::{Callable, Value};

/// Either a named declaration (`def name(...) {...}`) or an anonymous function expression
/// (`def (...) {...}`). Both share the same call machinery; only the printable name differs.
#[derive(Debug, Clone)]
pub enum Declaration {
    Named(Rc<FunctionData>),
    Anonymous(Rc<FunctionExprData>),
}

impl Declaration {
    fn params(&self) -> &[Token] {
        match self {
            Declaration::Named(d) => &d.params,
            Declaration::Anonymous(d) => &d.params,
        }
    }

    fn body(&self) -> &[Stmt] {
        match self {
            Declaration::Named(d) => &d.body,
            Declaration::Anonymous(d) => &d.body,
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Declaration::Named(d) => Some(&d.name.lexeme),
            Declaration::Anonymous(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Declaration,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(
        declaration: Declaration,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Produces a new function whose closure wraps `self.closure` with one extra scope
    /// defining `self` as `instance`. This is how a bare method becomes a bound method
    /// when read off an instance.
    pub fn bind(&self, instance: Value) -> Function {
        let env = Environment::new(Some(Rc::clone(&self.closure)));
        env.borrow_mut().define("self", instance);
        Function::new(self.declaration.clone(), env, self.is_initializer)
    }
}

impl Callable for Function {
    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let env = Environment::new(Some(Rc::clone(&self.closure)));
        for (param, arg) in self.declaration.params().iter().zip(arguments.into_iter()) {
            env.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(self.declaration.body(), env) {
            Ok(()) => {
                if self.is_initializer {
                    Ok(Environment::get_at(&self.closure, 0, "self"))
                } else {
                    Ok(Value::Literal(Literal::Nil))
                }
            }
            Err(Signal::Return(value)) => {
                if self.is_initializer {
                    Ok(Environment::get_at(&self.closure, 0, "self"))
                } else {
                    Ok(value)
                }
            }
            Err(Signal::Error(e)) => Err(e),
            Err(Signal::Break(token)) => {
                Err(RuntimeError::new(&token, "Cannot break outside of a loop."))
            }
            Err(Signal::Continue(token)) => {
                Err(RuntimeError::new(&token, "Cannot continue outside of a loop."))
            }
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params().len()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.declaration.name() {
            Some(name) => write!(f, "<fn>{name}"),
            None => write!(f, "<fn>anonymous"),
        }
    }
}

/// Built-in callables that are not implemented in the language itself. The language only
/// defines one: `clock`.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(Vec<Value>) -> Result<Value, RuntimeError>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Callable for NativeFunction {
    fn call(
        &self,
        _interpreter: &mut Interpreter,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        (self.function)(arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>{}", self.name)
    }
}

pub fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock",
        arity: 0,
        function: |_args| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs_f64();
            Ok(Value::Literal(Literal::Number(now)))
        },
    }
}
