use crate::literal::Literal;
use crate::token::Token;

/// Stable identity for an expression node, assigned once at parse time.
///
/// Two syntactically identical variable uses at different source positions are distinct
/// nodes; the resolver's side-table is keyed on this id rather than on structural
/// equality or on the address of a `Box`, which would move under reallocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct LiteralData {
    pub id: NodeId,
    pub value: Literal,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub id: NodeId,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub id: NodeId,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub id: NodeId,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub id: NodeId,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub id: NodeId,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub id: NodeId,
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub id: NodeId,
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub id: NodeId,
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub id: NodeId,
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct SelfData {
    pub id: NodeId,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub id: NodeId,
    pub keyword: Token,
    pub method: Token,
}

#[derive(Debug, Clone)]
pub struct FunctionExprData {
    pub id: NodeId,
    pub params: Vec<Token>,
    pub body: Vec<crate::stmt::Stmt>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralData),
    Variable(VariableData),
    Assign(AssignData),
    Unary(UnaryData),
    Binary(BinaryData),
    Logical(LogicalData),
    Grouping(GroupingData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    SelfExpr(SelfData),
    Super(SuperData),
    FunctionExpr(FunctionExprData),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Literal(d) => d.id,
            Expr::Variable(d) => d.id,
            Expr::Assign(d) => d.id,
            Expr::Unary(d) => d.id,
            Expr::Binary(d) => d.id,
            Expr::Logical(d) => d.id,
            Expr::Grouping(d) => d.id,
            Expr::Call(d) => d.id,
            Expr::Get(d) => d.id,
            Expr::Set(d) => d.id,
            Expr::SelfExpr(d) => d.id,
            Expr::Super(d) => d.id,
            Expr::FunctionExpr(d) => d.id,
        }
    }

    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(d) => visitor.visit_literal_expr(d),
            Expr::Variable(d) => visitor.visit_variable_expr(d),
            Expr::Assign(d) => visitor.visit_assign_expr(d),
            Expr::Unary(d) => visitor.visit_unary_expr(d),
            Expr::Binary(d) => visitor.visit_binary_expr(d),
            Expr::Logical(d) => visitor.visit_logical_expr(d),
            Expr::Grouping(d) => visitor.visit_grouping_expr(d),
            Expr::Call(d) => visitor.visit_call_expr(d),
            Expr::Get(d) => visitor.visit_get_expr(d),
            Expr::Set(d) => visitor.visit_set_expr(d),
            Expr::SelfExpr(d) => visitor.visit_self_expr(d),
            Expr::Super(d) => visitor.visit_super_expr(d),
            Expr::FunctionExpr(d) => visitor.visit_function_expr(d),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, data: &LiteralData) -> T;
    fn visit_variable_expr(&mut self, data: &VariableData) -> T;
    fn visit_assign_expr(&mut self, data: &AssignData) -> T;
    fn visit_unary_expr(&mut self, data: &UnaryData) -> T;
    fn visit_binary_expr(&mut self, data: &BinaryData) -> T;
    fn visit_logical_expr(&mut self, data: &LogicalData) -> T;
    fn visit_grouping_expr(&mut self, data: &GroupingData) -> T;
    fn visit_call_expr(&mut self, data: &CallData) -> T;
    fn visit_get_expr(&mut self, data: &GetData) -> T;
    fn visit_set_expr(&mut self, data: &SetData) -> T;
    fn visit_self_expr(&mut self, data: &SelfData) -> T;
    fn visit_super_expr(&mut self, data: &SuperData) -> T;
    fn visit_function_expr(&mut self, data: &FunctionExprData) -> T;
}
