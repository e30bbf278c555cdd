use std::collections::HashMap;

use crate::error::{Error, ResolveError};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, FunctionExprData, GetData, GroupingData,
    LiteralData, LogicalData, SelfData, SetData, SuperData, UnaryData, VariableData,
};
use crate::interpreter::Interpreter;
use crate::stmt::{
    BlockData, BreakData, ClassData, ContinueData, ExpressionData, FunctionData, IfData,
    PrintData, ReturnData, Stmt, StmtVisitor, VarData, WhileData,
};
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static pre-pass over the AST that resolves every variable reference to a lexical
/// distance, so the interpreter never has to search an environment chain at runtime.
/// Scopes are pushed for blocks, function bodies, and the synthetic `super`/`self`
/// scopes a class wraps around its methods; the global scope is never pushed here, so a
/// name that resolves to nothing in this stack is left for the interpreter to treat as
/// a global lookup.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            ResolveError {
                line: name.line,
                message: format!("Already a variable named '{}' in this scope.", name.lexeme),
            }
            .throw();
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.lexeme.clone(), true);
    }

    fn resolve_local(&mut self, id: crate::expr::NodeId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}

impl ExprVisitor<()> for Resolver<'_> {
    fn visit_literal_expr(&mut self, _data: &LiteralData) {}

    fn visit_variable_expr(&mut self, data: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&data.name.lexeme) == Some(&false) {
                ResolveError {
                    line: data.name.line,
                    message: "Cannot read local variable in its own initializer.".to_string(),
                }
                .throw();
            }
        }

        self.resolve_local(data.id, &data.name);
    }

    fn visit_assign_expr(&mut self, data: &AssignData) {
        self.resolve_expr(&data.value);
        self.resolve_local(data.id, &data.name);
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) {
        self.resolve_expr(&data.right);
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_call_expr(&mut self, data: &CallData) {
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) {
        self.resolve_expr(&data.object);
    }

    fn visit_set_expr(&mut self, data: &SetData) {
        self.resolve_expr(&data.value);
        self.resolve_expr(&data.object);
    }

    fn visit_self_expr(&mut self, data: &SelfData) {
        if self.current_class == ClassType::None {
            ResolveError {
                line: data.keyword.line,
                message: "Cannot use 'self' outside of a class.".to_string(),
            }
            .throw();
            return;
        }

        self.resolve_local(data.id, &data.keyword);
    }

    fn visit_super_expr(&mut self, data: &SuperData) {
        match self.current_class {
            ClassType::None => {
                ResolveError {
                    line: data.keyword.line,
                    message: "Cannot use 'super' outside of a class.".to_string(),
                }
                .throw();
            }
            ClassType::Class => {
                ResolveError {
                    line: data.keyword.line,
                    message: "Cannot use 'super' in a class with no superclass.".to_string(),
                }
                .throw();
            }
            ClassType::Subclass => {}
        }

        self.resolve_local(data.id, &data.keyword);
    }

    fn visit_function_expr(&mut self, data: &FunctionExprData) {
        self.resolve_function(&data.params, &data.body, FunctionType::Function);
    }
}

impl StmtVisitor<()> for Resolver<'_> {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_print_stmt(&mut self, data: &PrintData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_var_stmt(&mut self, data: &VarData) {
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_block_stmt(&mut self, data: &BlockData) {
        self.begin_scope();
        self.resolve(&data.statements);
        self.end_scope();
    }

    fn visit_if_stmt(&mut self, data: &IfData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }

    fn visit_function_stmt(&mut self, data: &std::rc::Rc<FunctionData>) {
        self.declare(&data.name);
        self.define(&data.name);
        self.resolve_function(&data.params, &data.body, FunctionType::Function);
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) {
        if self.current_function == FunctionType::None {
            ResolveError {
                line: data.keyword.line,
                message: "Cannot return from top-level code.".to_string(),
            }
            .throw();
        }

        if let Some(value) = &data.value {
            if self.current_function == FunctionType::Initializer {
                ResolveError {
                    line: data.keyword.line,
                    message: "Cannot return a value from an initializer.".to_string(),
                }
                .throw();
            }
            self.resolve_expr(value);
        }
    }

    fn visit_break_stmt(&mut self, _data: &BreakData) {}

    fn visit_continue_stmt(&mut self, _data: &ContinueData) {}

    fn visit_class_stmt(&mut self, data: &ClassData) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            if let Expr::Variable(superclass_data) = superclass {
                if superclass_data.name.lexeme == data.name.lexeme {
                    ResolveError {
                        line: superclass_data.name.line,
                        message: "A class cannot inherit from itself.".to_string(),
                    }
                    .throw();
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("self".to_string(), true);

        for method in &data.methods {
            let Stmt::Function(method_data) = method else {
                unreachable!("class bodies only ever contain Function statements");
            };

            let kind = if method_data.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(&method_data.params, &method_data.body, kind);
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
