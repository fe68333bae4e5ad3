use strata_diagnostics::Token;

use crate::expr::Expr;
use crate::types::VarType;

/// Statement node variants of spec §3 "AST". `Statement` wraps each one
/// exactly once at the top level (spec: "Each statement node is wrapped
/// once in `Statement(inner)` at the top level"), mirroring the original's
/// `Statement.code` indirection that the checker dispatches through
/// (`checker.py`'s `@visitor(Statement)` arm).
#[derive(Clone, Debug, PartialEq)]
pub struct Statement(pub Stmt);

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
  ExpressionStatement(Expr),
  VarDeclaration { name: Token, ty: Option<VarType>, init: Expr },
  AttrDeclaration { name: Token, ty: Option<VarType>, init: Expr },
  Assignment { lvalue: Expr, rhs: Expr, line: u32 },
  If { cond: Expr, then_branch: Vec<Statement>, else_branch: Vec<Statement> },
  While { cond: Expr, body: Vec<Statement> },
  For { var: Token, iterable: Expr, body: Vec<Statement> },
  Return { expr: Option<Expr>, line: u32 },
  Break(Token),
  Continue(Token),
  Switch { var: Token, cases: Vec<(VarType, Vec<Statement>)>, default: Vec<Statement> },
  Comment,
}
