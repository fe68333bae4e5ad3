//! Scoped name resolution and the structural type checker (spec §3 "Scope",
//! type-system values; §4.5, §4.6, §4.7). Consumes a checked `strata-ast`
//! `Program` and either returns `()` or the first `CompileError` it hits —
//! there is no diagnostic accumulation here, matching the rest of the
//! pipeline's fail-fast policy.

mod checker;
mod env;
mod scope;
mod types;

pub use checker::{check_program, CheckResult, Checker};
pub use env::{resolve_return_type, resolve_type};
pub use scope::Scope;
pub use types::{can_assign, can_infer, common_type, is_subtype, ClassArena, ClassDef, ClassId, FunctionSig, Ty};

#[cfg(test)]
mod tests {
  use strata_ast::{Class, Expr, Function, Literal, Statement, Stmt, TopLevel, VarType};
  use strata_diagnostics::{Token, TokenKind};

  use super::*;

  fn tok(kind: TokenKind, text: &str) -> Token {
    Token::new(1, 1, kind, text)
  }

  fn ident(text: &str) -> Token {
    tok(TokenKind::Identifier, text)
  }

  fn simple_type(name: &str) -> VarType {
    let kind = if name == "void" { TokenKind::Void } else { TokenKind::Identifier };
    VarType::simple(tok(kind, name))
  }

  fn main_function(body: Vec<Statement>) -> Function {
    Function { name: ident("main"), params: vec![], return_type: simple_type("void"), body }
  }

  #[test]
  fn program_without_main_is_rejected() {
    let program = vec![TopLevel::Function(Function {
      name: ident("helper"),
      params: vec![],
      return_type: simple_type("void"),
      body: vec![],
    })];
    let err = check_program(&program).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::ProgramShape { .. }));
  }

  #[test]
  fn minimal_main_program_checks() {
    let program = vec![TopLevel::Function(main_function(vec![]))];
    assert!(check_program(&program).is_ok());
  }

  #[test]
  fn undeclared_variable_is_a_name_error() {
    let body = vec![Statement(Stmt::ExpressionStatement(Expr::Variable(ident("missing"))))];
    let program = vec![TopLevel::Function(main_function(body))];
    let err = check_program(&program).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::Name { .. }));
  }

  #[test]
  fn var_declaration_with_mismatched_annotation_is_a_type_error() {
    let body = vec![Statement(Stmt::VarDeclaration {
      name: ident("x"),
      ty: Some(simple_type("int")),
      init: Expr::Literal(Literal::Str("hi".into())),
    })];
    let program = vec![TopLevel::Function(main_function(body))];
    let err = check_program(&program).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::Type { .. }));
  }

  #[test]
  fn break_outside_loop_is_a_control_flow_error() {
    let body = vec![Statement(Stmt::Break(tok(TokenKind::Break, "break")))];
    let program = vec![TopLevel::Function(main_function(body))];
    let err = check_program(&program).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::ControlFlow { .. }));
  }

  #[test]
  fn break_inside_while_loop_is_accepted() {
    let body = vec![Statement(Stmt::While {
      cond: Expr::Literal(Literal::Bool(true)),
      body: vec![Statement(Stmt::Break(tok(TokenKind::Break, "break")))],
    })];
    let program = vec![TopLevel::Function(main_function(body))];
    assert!(check_program(&program).is_ok());
  }

  #[test]
  fn subclass_constructor_without_super_init_first_is_rejected() {
    let animal = Class { name: ident("Animal"), superclass: None, methods: vec![] };
    let dog_init = Function {
      name: ident("init"),
      params: vec![],
      return_type: simple_type("void"),
      body: vec![Statement(Stmt::ExpressionStatement(Expr::Literal(Literal::Int(1))))],
    };
    let dog = Class { name: ident("Dog"), superclass: Some(ident("Animal")), methods: vec![dog_init] };
    let program = vec![TopLevel::Class(animal), TopLevel::Class(dog), TopLevel::Function(main_function(vec![]))];
    let err = check_program(&program).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::Class { .. }));
  }

  #[test]
  fn function_missing_a_return_on_every_path_is_rejected() {
    let f = Function {
      name: ident("needs_value"),
      params: vec![],
      return_type: simple_type("int"),
      body: vec![Statement(Stmt::ExpressionStatement(Expr::Literal(Literal::Int(1))))],
    };
    let program = vec![TopLevel::Function(f), TopLevel::Function(main_function(vec![]))];
    let err = check_program(&program).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::ControlFlow { .. }));
  }
}
