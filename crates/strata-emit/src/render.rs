use strata_ast::{Class, Expr, Function, Literal, Program, Statement, Stmt, TopLevel, VarType};
use strata_diagnostics::TokenKind;

const INDENT: &str = "\t";

/// Renders a checked program to its target textual surface (spec §4.8). One
/// call does the whole program; there's no incremental/streaming variant —
/// the original transpiler collects every line into a list before joining,
/// and a full AST is cheap enough to walk twice over if a caller needs to.
pub fn render(program: &Program) -> String {
  let mut out = Renderer::default();
  out.lines.push("from builtin import *".to_string());
  out.lines.push(String::new());
  for item in program {
    match item {
      TopLevel::Function(f) => out.function(f, 0),
      TopLevel::Class(c) => out.class(c),
    }
  }
  out.lines.push(String::new());
  out.lines.push("if __name__ == '__main__':".to_string());
  out.lines.push(format!("{INDENT}main()"));
  out.lines.join("\n") + "\n"
}

#[derive(Default)]
struct Renderer {
  lines: Vec<String>,
}

impl Renderer {
  fn push(&mut self, depth: usize, text: impl Into<String>) {
    self.lines.push(format!("{}{}", INDENT.repeat(depth), text.into()));
  }

  fn block(&mut self, body: &[Statement], depth: usize) {
    if body.is_empty() {
      self.push(depth, "pass");
      return;
    }
    for stmt in body {
      self.statement(stmt, depth);
    }
  }

  /// `depth == 0` is a free function; anything deeper is a method, which
  /// gains an implicit `self` parameter and renames `init` to `__init__`
  /// (spec §4.8's "handful of renames, e.g. `init` -> constructor name").
  fn function(&mut self, f: &Function, depth: usize) {
    let is_method = depth > 0;
    let name = if is_method && f.name.text == "init" { "__init__" } else { f.name.text.as_str() };
    let mut params: Vec<&str> = f.params.iter().map(|(tok, _)| tok.text.as_str()).collect();
    if is_method {
      params.insert(0, "self");
    }
    self.push(depth, format!("def {name}({}):", params.join(", ")));
    self.block(&f.body, depth + 1);
    self.lines.push(String::new());
  }

  fn class(&mut self, c: &Class) {
    let header = match &c.superclass {
      Some(super_tok) => format!("class {}({}):", c.name.text, super_tok.text),
      None => format!("class {}:", c.name.text),
    };
    self.lines.push(header);
    if c.methods.is_empty() {
      self.push(1, "pass");
      self.lines.push(String::new());
      return;
    }
    for method in &c.methods {
      self.function(method, 1);
    }
  }

  fn statement(&mut self, stmt: &Statement, depth: usize) {
    match &stmt.0 {
      Stmt::ExpressionStatement(expr) => self.push(depth, self.expr(expr)),
      Stmt::VarDeclaration { name, init, .. } => self.push(depth, format!("{} = {}", name.text, self.expr(init))),
      Stmt::AttrDeclaration { name, init, .. } => {
        self.push(depth, format!("self.{} = {}", name.text, self.expr(init)))
      }
      Stmt::Assignment { lvalue, rhs, .. } => self.push(depth, format!("{} = {}", self.expr(lvalue), self.expr(rhs))),
      Stmt::If { cond, then_branch, else_branch } => {
        self.push(depth, format!("if {}:", self.expr(cond)));
        self.block(then_branch, depth + 1);
        if !else_branch.is_empty() {
          self.push(depth, "else:");
          self.block(else_branch, depth + 1);
        }
      }
      Stmt::While { cond, body } => {
        self.push(depth, format!("while {}:", self.expr(cond)));
        self.block(body, depth + 1);
      }
      Stmt::For { var, iterable, body } => {
        self.push(depth, format!("for {} in {}:", var.text, self.expr(iterable)));
        self.block(body, depth + 1);
      }
      Stmt::Return { expr, .. } => match expr {
        Some(e) => self.push(depth, format!("return {}", self.expr(e))),
        None => self.push(depth, "return"),
      },
      Stmt::Break(_) => self.push(depth, "break"),
      Stmt::Continue(_) => self.push(depth, "continue"),
      Stmt::Switch { var, cases, default } => {
        self.push(depth, format!("match {}:", var.text));
        for (case_ty, body) in cases {
          self.push(depth + 1, format!("case {}():", type_name(case_ty)));
          self.block(body, depth + 2);
        }
        if !default.is_empty() {
          self.push(depth + 1, "case _:");
          self.block(default, depth + 2);
        }
      }
      // no text survives parsing for a standalone comment (strata_ast::Stmt::Comment
      // carries no payload); nothing to mechanically reproduce here.
      Stmt::Comment => {}
    }
  }

  fn expr(&self, expr: &Expr) -> String {
    match expr {
      Expr::Literal(lit) => literal(lit),
      Expr::Variable(tok) => tok.text.clone(),
      Expr::SelfExpr(_) => "self".to_string(),
      Expr::Super(_) => "super()".to_string(),
      Expr::Grouping(inner) => format!("({})", self.expr(inner)),
      Expr::Unary(op, right) => {
        let right = self.expr(right);
        match op.kind {
          TokenKind::Minus => format!("-{right}"),
          TokenKind::Bang => format!("not {right}"),
          _ => right,
        }
      }
      Expr::Binary(lhs, op, rhs) => self.binary(lhs, op.kind, rhs),
      Expr::Call { callee, args, .. } => {
        let mut called = self.expr(callee);
        if called.ends_with("init") {
          called.truncate(called.len() - 4);
          called.push_str("__init__");
        }
        let args = args.iter().map(|a| self.expr(a)).collect::<Vec<_>>().join(", ");
        format!("{called}({args})")
      }
      Expr::Get { receiver, name } => format!("{}.{}", self.expr(receiver), name.text),
      Expr::Index { collection, index } => format!("{}[{}]", self.expr(collection), self.expr(index)),
      Expr::Array(elems) => {
        format!("[{}]", elems.iter().map(|e| self.expr(e)).collect::<Vec<_>>().join(", "))
      }
      Expr::Dictionary { keys, values } => {
        let pairs = keys
          .iter()
          .zip(values.iter())
          .map(|(k, v)| format!("{}: {}", self.expr(k), self.expr(v)))
          .collect::<Vec<_>>()
          .join(", ");
        format!("{{{pairs}}}")
      }
    }
  }

  /// `==`/`!=` against a literal `null` become `is`/`is not` (Python
  /// identity comparison), matching the original transpiler's special case
  /// rather than emitting `== None`, which `ast`-linting target tooling
  /// would flag.
  fn binary(&self, lhs: &Expr, op: TokenKind, rhs: &Expr) -> String {
    let mut left = self.expr(lhs);
    let mut right = self.expr(rhs);
    match op {
      TokenKind::Plus => format!("{left} + {right}"),
      TokenKind::Minus => format!("{left} - {right}"),
      TokenKind::Star => format!("{left} * {right}"),
      TokenKind::Slash => format!("{left} / {right}"),
      TokenKind::Percent => format!("{left} % {right}"),
      TokenKind::Less => format!("{left} < {right}"),
      TokenKind::LessEqual => format!("{left} <= {right}"),
      TokenKind::Greater => format!("{left} > {right}"),
      TokenKind::GreaterEqual => format!("{left} >= {right}"),
      TokenKind::And => format!("{left} and {right}"),
      TokenKind::Or => format!("{left} or {right}"),
      TokenKind::EqualEqual => {
        if left == "None" {
          std::mem::swap(&mut left, &mut right);
        }
        let verb = if right == "None" { "is" } else { "==" };
        format!("{left} {verb} {right}")
      }
      TokenKind::BangEqual => {
        if left == "None" {
          std::mem::swap(&mut left, &mut right);
        }
        let verb = if right == "None" { "is not" } else { "!=" };
        format!("{left} {verb} {right}")
      }
      _ => unreachable!("not a binary operator token"),
    }
  }
}

fn literal(lit: &Literal) -> String {
  match lit {
    Literal::Int(i) => i.to_string(),
    Literal::Float(f) => {
      let text = f.to_string();
      if text.contains('.') {
        text
      } else {
        format!("{text}.0")
      }
    }
    Literal::Str(s) => format!("{s:?}"),
    Literal::Bool(true) => "True".to_string(),
    Literal::Bool(false) => "False".to_string(),
    Literal::Null => "None".to_string(),
  }
}

/// The bare class name a `switch` case matches against — `list<T>`/`dict`
/// parameterization never appears in a case label (spec's checker only
/// allows switching over class types), so only the head name matters here.
fn type_name(ty: &VarType) -> &str {
  &ty.name.text
}

#[cfg(test)]
mod tests {
  use strata_ast::{Literal, Statement, Stmt, VarType};
  use strata_diagnostics::{Token, TokenKind};

  use super::*;

  fn tok(kind: TokenKind, text: &str) -> Token {
    Token::new(1, 1, kind, text)
  }

  #[test]
  fn free_function_has_no_self_and_keeps_its_name() {
    let program: Program = vec![TopLevel::Function(Function {
      name: tok(TokenKind::Identifier, "main"),
      params: vec![],
      return_type: VarType::simple(tok(TokenKind::Void, "void")),
      body: vec![Statement(Stmt::Return { expr: None, line: 1 })],
    })];
    let text = render(&program);
    assert!(text.contains("def main():\n\treturn"));
  }

  #[test]
  fn constructor_is_renamed_to_dunder_init() {
    let program: Program = vec![TopLevel::Class(Class {
      name: tok(TokenKind::Identifier, "Dog"),
      superclass: None,
      methods: vec![Function {
        name: tok(TokenKind::Identifier, "init"),
        params: vec![(tok(TokenKind::Identifier, "name"), VarType::simple(tok(TokenKind::Identifier, "string")))],
        return_type: VarType::simple(tok(TokenKind::Void, "void")),
        body: vec![Statement(Stmt::AttrDeclaration {
          name: tok(TokenKind::Identifier, "name"),
          ty: None,
          init: Expr::Variable(tok(TokenKind::Identifier, "name")),
        })],
      }],
    })];
    let text = render(&program);
    assert!(text.contains("class Dog:"));
    assert!(text.contains("def __init__(self, name):"));
    assert!(text.contains("self.name = name"));
  }

  #[test]
  fn empty_class_body_becomes_pass() {
    let program: Program =
      vec![TopLevel::Class(Class { name: tok(TokenKind::Identifier, "Empty"), superclass: None, methods: vec![] })];
    let text = render(&program);
    assert!(text.contains("class Empty:\n\tpass"));
  }

  #[test]
  fn null_equality_becomes_identity_comparison() {
    let expr = Expr::Binary(
      Box::new(Expr::Variable(tok(TokenKind::Identifier, "x"))),
      tok(TokenKind::EqualEqual, "=="),
      Box::new(Expr::Literal(Literal::Null)),
    );
    let renderer = Renderer::default();
    assert_eq!(renderer.expr(&expr), "x is None");
  }

  #[test]
  fn super_init_call_becomes_super_dunder_init() {
    let expr = Expr::Call {
      callee: Box::new(Expr::Get { receiver: Box::new(Expr::Super(tok(TokenKind::Super, "super"))), name: tok(TokenKind::Identifier, "init") }),
      args: vec![Expr::Literal(Literal::Int(1))],
      line: 1,
    };
    let renderer = Renderer::default();
    assert_eq!(renderer.expr(&expr), "super().__init__(1)");
  }

  #[test]
  fn switch_case_renders_as_structural_match() {
    let program: Program = vec![TopLevel::Function(Function {
      name: tok(TokenKind::Identifier, "main"),
      params: vec![],
      return_type: VarType::simple(tok(TokenKind::Void, "void")),
      body: vec![Statement(Stmt::Switch {
        var: tok(TokenKind::Identifier, "shape"),
        cases: vec![(VarType::simple(tok(TokenKind::Identifier, "Circle")), vec![Statement(Stmt::Break(tok(TokenKind::Break, "break")))])],
        default: vec![],
      })],
    })];
    let text = render(&program);
    assert!(text.contains("match shape:"));
    assert!(text.contains("case Circle():"));
    assert!(text.contains("\t\tbreak"));
  }
}
