use strata_diagnostics::Token;

use crate::stmt::Statement;
use crate::types::VarType;

/// `Function(name, params:[(name,type)], return_type, body)` (spec §3
/// "Top-level"). Used both for free functions and for class methods
/// (`Class::methods`) — the checker tells the two apart by which scope a
/// `Function` value got registered into, not by a different node shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
  pub name: Token,
  pub params: Vec<(Token, VarType)>,
  pub return_type: VarType,
  pub body: Vec<Statement>,
}

/// `Class(name, superclass?, methods)` (spec §3 "Top-level").
#[derive(Clone, Debug, PartialEq)]
pub struct Class {
  pub name: Token,
  pub superclass: Option<Token>,
  pub methods: Vec<Function>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TopLevel {
  Function(Function),
  Class(Class),
}

/// A whole compilation unit: an ordered sequence of top-level functions and
/// classes (spec §2 "AST: Tagged variants for expressions, statements,
/// declarations, types").
pub type Program = Vec<TopLevel>;
