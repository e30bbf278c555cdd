use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Error, RuntimeError};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, FunctionExprData, GetData, GroupingData,
    LiteralData, LogicalData, NodeId, SelfData, SetData, SuperData, UnaryData, VariableData,
};
use crate::function::{self, Declaration, Function};
use crate::literal::Literal;
use crate::stmt::{
    BlockData, BreakData, ClassData, ContinueData, ExpressionData, FunctionData, IfData,
    PrintData, ReturnData, Stmt, StmtVisitor, VarData, WhileData,
};
use crate::token::{Token, Type};
use crate::value::{Callable, Value};

/// A Rust function can't panic and unwind past another crate's stack frame, so `return`,
/// `break` and `continue` are modeled as an `Err` variant rather than a real exception.
/// Only `Error` is a diagnostic; the other three are ordinary control flow that some
/// enclosing construct is expected to catch.
#[derive(Debug)]
pub enum Signal {
    Error(RuntimeError),
    Return(Value),
    Break(Token),
    Continue(Token),
}

impl From<RuntimeError> for Signal {
    fn from(e: RuntimeError) -> Self {
        Signal::Error(e)
    }
}

pub type Flow<T> = Result<T, Signal>;

/// Recursion guard. Without it a pathological `def f() { f(); }` would overflow the real
/// Rust stack before any RuntimeError could be raised.
const MAX_CALL_DEPTH: usize = 255;

pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: Rc<RefCell<dyn Write>>,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(output: Rc<RefCell<dyn Write>>) -> Self {
        let globals = Environment::new(None);
        globals.borrow_mut().define("clock", Value::NativeFunction(Rc::new(function::clock())));

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
            call_depth: 0,
        }
    }

    /// Recorded by the resolver: `id` reads/writes its variable `depth` environments out
    /// from wherever it is evaluated.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(signal) = self.execute(statement) {
                match signal {
                    Signal::Error(e) => {
                        e.throw();
                        return;
                    }
                    Signal::Return(_) => {
                        RuntimeError::at_line(0, "Cannot return outside of a function.").throw();
                        return;
                    }
                    Signal::Break(token) => {
                        RuntimeError::new(&token, "Cannot break outside of a loop.").throw();
                        return;
                    }
                    Signal::Continue(token) => {
                        RuntimeError::new(&token, "Cannot continue outside of a loop.").throw();
                        return;
                    }
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Flow<()> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Flow<Value> {
        expr.accept(self)
    }

    /// Runs `statements` in a fresh environment, restoring the caller's environment on
    /// every exit path - normal completion, a control-flow signal, or an error.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Flow<()> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, name: &Token, id: NodeId) -> Flow<Value> {
        match self.locals.get(&id) {
            Some(&depth) => Ok(Environment::get_at(&self.environment, depth, &name.lexeme)),
            None => Ok(self.globals.borrow().get(name)?),
        }
    }
}

impl ExprVisitor<Flow<Value>> for Interpreter {
    fn visit_literal_expr(&mut self, data: &LiteralData) -> Flow<Value> {
        Ok(Value::Literal(data.value.clone()))
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Flow<Value> {
        self.lookup_variable(&data.name, data.id)
    }

    fn visit_self_expr(&mut self, data: &SelfData) -> Flow<Value> {
        self.lookup_variable(&data.keyword, data.id)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Flow<Value> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&depth) => Environment::assign_at(&self.environment, depth, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Flow<Value> {
        let right = self.evaluate(&data.right)?;

        match data.operator.kind {
            Type::Minus => {
                let n = as_number(&right, &data.operator)?;
                Ok(Value::Literal(Literal::Number(-n)))
            }
            Type::Bang => Ok(Value::Literal(Literal::Bool(!right.is_truthy()))),
            _ => unreachable!("unary operator restricted to Minus/Bang by the parser"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Flow<Value> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        match data.operator.kind {
            Type::Plus => match (&left, &right) {
                (Value::Literal(Literal::String(a)), Value::Literal(Literal::String(b))) => {
                    Ok(Value::Literal(Literal::String(format!("{a}{b}"))))
                }
                (Value::Literal(Literal::String(a)), _) => {
                    Ok(Value::Literal(Literal::String(format!("{a}{right}"))))
                }
                (_, Value::Literal(Literal::String(b))) => {
                    Ok(Value::Literal(Literal::String(format!("{left}{b}"))))
                }
                (Value::Literal(Literal::Number(a)), Value::Literal(Literal::Number(b))) => {
                    Ok(Value::Literal(Literal::Number(a + b)))
                }
                _ => Err(RuntimeError::new(&data.operator, "Operands must be numbers.").into()),
            },
            Type::Minus => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                Ok(Value::Literal(Literal::Number(a - b)))
            }
            Type::Star => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                Ok(Value::Literal(Literal::Number(a * b)))
            }
            Type::Slash => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                if b == 0.0 {
                    return Err(RuntimeError::new(&data.operator, "Division by zero is not allowed.").into());
                }
                Ok(Value::Literal(Literal::Number(a / b)))
            }
            Type::Greater => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                Ok(Value::Literal(Literal::Bool(a > b)))
            }
            Type::GreaterEqual => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                Ok(Value::Literal(Literal::Bool(a >= b)))
            }
            Type::Less => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                Ok(Value::Literal(Literal::Bool(a < b)))
            }
            Type::LessEqual => {
                let (a, b) = as_number_pair(&left, &right, &data.operator)?;
                Ok(Value::Literal(Literal::Bool(a <= b)))
            }
            Type::EqualEqual => Ok(Value::Literal(Literal::Bool(left == right))),
            Type::BangEqual => Ok(Value::Literal(Literal::Bool(left != right))),
            _ => unreachable!("binary operator restricted to the above set by the parser"),
        }
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Flow<Value> {
        let left = self.evaluate(&data.left)?;

        match data.operator.kind {
            Type::Or if left.is_truthy() => Ok(left),
            Type::Or => self.evaluate(&data.right),
            Type::And if !left.is_truthy() => Ok(left),
            Type::And => self.evaluate(&data.right),
            _ => unreachable!("logical operator restricted to Or/And by the parser"),
        }
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Flow<Value> {
        self.evaluate(&data.expression)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Flow<Value> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let Some(callable) = callee.as_callable() else {
            return Err(RuntimeError::new(&data.paren, "Can only call functions and classes.").into());
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError::new(
                &data.paren,
                format!("Expected {} arguments but got {}.", callable.arity(), arguments.len()),
            )
            .into());
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::new(&data.paren, "Stack overflow.").into());
        }

        self.call_depth += 1;
        let result = callee.as_callable().unwrap().call(self, arguments);
        self.call_depth -= 1;

        Ok(result?)
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Flow<Value> {
        let object = self.evaluate(&data.object)?;

        match object {
            Value::Instance(instance) => Ok(Instance::get(&instance, &data.name)?),
            _ => Err(RuntimeError::new(&data.name, "Only instances have properties.").into()),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Flow<Value> {
        let object = self.evaluate(&data.object)?;

        let Value::Instance(instance) = object else {
            return Err(RuntimeError::new(&data.name, "Only instances have fields.").into());
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Flow<Value> {
        let distance = *self
            .locals
            .get(&data.id)
            .expect("resolver always records a distance for 'super'");

        let superclass = Environment::get_at(&self.environment, distance, "super");
        let Value::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to a class");
        };

        let instance = Environment::get_at(&self.environment, distance - 1, "self");

        let method = superclass.borrow().find_method(&data.method.lexeme);
        match method {
            Some(method) => Ok(Value::Function(Rc::new(method.bind(instance)))),
            None => Err(RuntimeError::new(
                &data.method,
                format!("Undefined property '{}'.", data.method.lexeme),
            )
            .into()),
        }
    }

    fn visit_function_expr(&mut self, data: &FunctionExprData) -> Flow<Value> {
        let function = Function::new(
            Declaration::Anonymous(Rc::new(data.clone())),
            Rc::clone(&self.environment),
            false,
        );
        Ok(Value::Function(Rc::new(function)))
    }
}

impl StmtVisitor<Flow<()>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Flow<()> {
        self.evaluate(&data.expression)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Flow<()> {
        let value = self.evaluate(&data.expression)?;
        let _ = writeln!(self.output.borrow_mut(), "{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Flow<()> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Value::Literal(Literal::Nil),
        };
        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Flow<()> {
        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Flow<()> {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Flow<()> {
        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body) {
                Ok(()) => {}
                Err(Signal::Break(_)) => break,
                Err(Signal::Continue(_)) => continue,
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionData>) -> Flow<()> {
        let function = Function::new(Declaration::Named(Rc::clone(data)), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Value::Function(Rc::new(function)));
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Flow<()> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Value::Literal(Literal::Nil),
        };
        Err(Signal::Return(value))
    }

    fn visit_break_stmt(&mut self, data: &BreakData) -> Flow<()> {
        Err(Signal::Break(data.keyword.clone()))
    }

    fn visit_continue_stmt(&mut self, data: &ContinueData) -> Flow<()> {
        Err(Signal::Continue(data.keyword.clone()))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Flow<()> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Value::Class(class) = value else {
                    let name = match expr {
                        Expr::Variable(v) => v.name.clone(),
                        _ => unreachable!("superclass expression is always a Variable"),
                    };
                    return Err(RuntimeError::new(&name, "Superclass must be a class.").into());
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Value::Literal(Literal::Nil));

        let method_environment = match &superclass {
            Some(superclass) => {
                let env = Environment::new(Some(Rc::clone(&self.environment)));
                env.borrow_mut().define("super", Value::Class(Rc::clone(superclass)));
                env
            }
            None => Rc::clone(&self.environment),
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(method_data) = method else {
                unreachable!("class bodies only ever contain Function statements");
            };
            let is_initializer = method_data.name.lexeme == "init";
            let function = Function::new(
                Declaration::Named(Rc::clone(method_data)),
                Rc::clone(&method_environment),
                is_initializer,
            );
            methods.insert(method_data.name.lexeme.clone(), Rc::new(function));
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), superclass, methods)));
        self.environment.borrow_mut().assign(&data.name, Value::Class(class))?;
        Ok(())
    }
}

fn as_number(value: &Value, operator: &Token) -> Result<f64, RuntimeError> {
    match value {
        Value::Literal(Literal::Number(n)) => Ok(*n),
        _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
    }
}

fn as_number_pair(left: &Value, right: &Value, operator: &Token) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Literal(Literal::Number(a)), Value::Literal(Literal::Number(b))) => Ok((*a, *b)),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> String {
        let output = Rc::new(RefCell::new(Vec::new()));
        let mut interpreter = Interpreter::new(Rc::clone(&output) as Rc<RefCell<dyn Write>>);

        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        let mut resolver = Resolver::new(&mut interpreter);
        resolver.resolve(&statements);

        interpreter.interpret(&statements);

        String::from_utf8(output.borrow().clone()).unwrap()
    }

    #[test]
    fn evaluates_arithmetic() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation_with_numbers() {
        assert_eq!(run("print \"count: \" + 3;"), "count: 3\n");
    }

    #[test]
    fn integer_valued_numbers_print_without_trailing_zero() {
        assert_eq!(run("print 6 / 2;"), "3\n");
    }

    #[test]
    fn division_by_zero_is_runtime_error() {
        assert_eq!(run("print 1 / 0;"), "");
    }

    #[test]
    fn block_scoping_shadows_and_restores() {
        let out = run("var a = \"outer\"; { var a = \"inner\"; print a; } print a;");
        assert_eq!(out, "inner\nouter\n");
    }

    #[test]
    fn while_loop_break_and_continue() {
        let out = run(
            "var i = 0; var sum = 0; while (i < 5) { i = i + 1; if (i == 3) continue; if (i == 5) break; sum = sum + i; } print sum;",
        );
        assert_eq!(out, "7\n");
    }

    #[test]
    fn for_loop_desugars_and_sums() {
        let out = run("var total = 0; for (var i = 0; i < 4; i = i + 1) total = total + i; print total;");
        assert_eq!(out, "6\n");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let out = run(
            "def makeCounter() { var i = 0; def counter() { i = i + 1; print i; } return counter; } var c = makeCounter(); c(); c();",
        );
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn classes_construct_and_call_methods() {
        let out = run(
            "class Greeter { init(name) { self.name = name; } greet() { print \"hi \" + self.name; } } var g = Greeter(\"a\"); g.greet();",
        );
        assert_eq!(out, "hi a\n");
    }

    #[test]
    fn inheritance_and_super_dispatch() {
        let out = run(
            "class Base { greet() { print \"base\"; } } class Derived : Base { greet() { super.greet(); print \"derived\"; } } Derived().greet();",
        );
        assert_eq!(out, "base\nderived\n");
    }

    #[test]
    fn anonymous_function_expression_is_callable() {
        let out = run("var add = def(a, b) { return a + b; }; print add(2, 3);");
        assert_eq!(out, "5\n");
    }

    #[test]
    fn undefined_variable_reports_runtime_error() {
        assert_eq!(run("print undefined;"), "");
    }
}
