//! Grammar representation, the LR(1) table generator, and the shift/reduce
//! driver (spec §3 "Grammar", "LR(1) item"; §4.3). Generic over the
//! semantic-value type `V` a caller's productions build — this crate knows
//! nothing about ASTs; `strata-cli` instantiates `Grammar<Expr>` (or
//! whatever top-level value its concrete grammar produces) and wires the
//! pieces below together.

mod automaton;
mod first;
mod grammar;
mod item;
mod production;
mod symbol;
mod tables;

pub mod driver;

pub use automaton::{build_lr1_automaton, LrAutomaton};
pub use first::{compute_first_sets, FirstSet, FirstSets};
pub use grammar::{Grammar, ProductionId, EOF_NAME};
pub use item::{Center, Item};
pub use production::{Action, Production, SemanticValue};
pub use symbol::Symbol;
pub use tables::{build_tables, TableAction, Tables};

/// Builds ACTION/GOTO tables for `grammar` end to end: augment, compute
/// FIRST sets, build the canonical automaton, build the tables. This is the
/// one call most callers want; the individual steps stay public for callers
/// that need the intermediate automaton (e.g. to print item sets for
/// debugging, mirroring `LR1Parser.logs` in the original).
pub fn compile<V: 'static>(grammar: Grammar<V>) -> Result<(Grammar<V>, Tables), strata_diagnostics::CompileError> {
  let augmented = grammar.augment();
  let firsts = compute_first_sets(&augmented);
  let automaton = build_lr1_automaton(&augmented, &firsts);
  let tables = build_tables(&augmented, &automaton)?;
  Ok((augmented, tables))
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use strata_diagnostics::{Token, TokenKind};

  use super::*;

  #[derive(Clone, Debug, PartialEq)]
  enum Expr {
    Num(i64),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
  }

  /// `E -> E + T | T`, `T -> T * F | F`, `F -> Integer | ( E )` — the
  /// classic left-recursive expression grammar, picked so the multiplication
  /// precedence in spec §8 scenario S2 ("1 + 2 * 3") is structural rather
  /// than declared.
  fn arithmetic_grammar() -> Grammar<Expr> {
    let num = |mut c: Vec<SemanticValue<Expr>>| {
      let tok = c.remove(0).token();
      Expr::Num(tok.text.parse().unwrap())
    };
    let pass_through = |mut c: Vec<SemanticValue<Expr>>| c.remove(0).value();
    let paren = |mut c: Vec<SemanticValue<Expr>>| c.remove(1).value();
    let add = |mut c: Vec<SemanticValue<Expr>>| {
      let rhs = c.remove(2).value();
      c.remove(1); // '+' token
      let lhs = c.remove(0).value();
      Expr::Add(Box::new(lhs), Box::new(rhs))
    };
    let mul = |mut c: Vec<SemanticValue<Expr>>| {
      let rhs = c.remove(2).value();
      c.remove(1); // '*' token
      let lhs = c.remove(0).value();
      Expr::Mul(Box::new(lhs), Box::new(rhs))
    };

    let t = |s: &str| Symbol::Terminal(s.to_string());
    let nt = |s: &str| Symbol::NonTerminal(s.to_string());

    Grammar::new(
      vec!["Integer".into(), "Plus".into(), "Star".into(), "OpenParen".into(), "CloseParen".into()],
      vec!["E".into(), "T".into(), "F".into()],
      "E".into(),
      vec![
        Production::new("E", vec![nt("E"), t("Plus"), nt("T")], Rc::new(add)),
        Production::new("E", vec![nt("T")], Rc::new(pass_through)),
        Production::new("T", vec![nt("T"), t("Star"), nt("F")], Rc::new(mul)),
        Production::new("T", vec![nt("F")], Rc::new(pass_through)),
        Production::new("F", vec![t("Integer")], Rc::new(num)),
        Production::new("F", vec![t("OpenParen"), nt("E"), t("CloseParen")], Rc::new(paren)),
      ],
    )
  }

  fn tok(kind: TokenKind, text: &str) -> Token {
    Token::new(1, 1, kind, text)
  }

  fn tokens_for(src: &[(TokenKind, &str)]) -> Vec<Token> {
    let mut out: Vec<Token> = src.iter().map(|(k, t)| tok(*k, t)).collect();
    out.push(Token::eof(1, 1));
    out
  }

  #[test]
  fn precedence_matches_scenario_s2() {
    // "1 + 2 * 3" -> Add(1, Mul(2, 3)): multiplication binds tighter.
    let (grammar, tables) = compile(arithmetic_grammar()).unwrap();
    let tokens = tokens_for(&[
      (TokenKind::Integer, "1"),
      (TokenKind::Plus, "+"),
      (TokenKind::Integer, "2"),
      (TokenKind::Star, "*"),
      (TokenKind::Integer, "3"),
    ]);
    let trace = driver::parse(&grammar, &tables, &tokens).unwrap();
    let ast = driver::evaluate(&grammar, &trace, &tokens);
    assert_eq!(ast, Expr::Add(Box::new(Expr::Num(1)), Box::new(Expr::Mul(Box::new(Expr::Num(2)), Box::new(Expr::Num(3))))));
  }

  #[test]
  fn parenthesization_overrides_precedence() {
    let (grammar, tables) = compile(arithmetic_grammar()).unwrap();
    let tokens = tokens_for(&[
      (TokenKind::OpenParen, "("),
      (TokenKind::Integer, "1"),
      (TokenKind::Plus, "+"),
      (TokenKind::Integer, "2"),
      (TokenKind::CloseParen, ")"),
      (TokenKind::Star, "*"),
      (TokenKind::Integer, "3"),
    ]);
    let trace = driver::parse(&grammar, &tables, &tokens).unwrap();
    let ast = driver::evaluate(&grammar, &trace, &tokens);
    assert_eq!(ast, Expr::Mul(Box::new(Expr::Add(Box::new(Expr::Num(1)), Box::new(Expr::Num(2)))), Box::new(Expr::Num(3))));
  }

  #[test]
  fn parse_round_trip_shifts_match_input() {
    // property 7: the SHIFTs equal the input minus EOF.
    let (grammar, tables) = compile(arithmetic_grammar()).unwrap();
    let tokens = tokens_for(&[(TokenKind::Integer, "1"), (TokenKind::Plus, "+"), (TokenKind::Integer, "2")]);
    let trace = driver::parse(&grammar, &tables, &tokens).unwrap();
    let shifts = trace.ops.iter().filter(|op| **op == driver::ParseOp::Shift).count();
    assert_eq!(shifts, tokens.len() - 1);
  }

  #[test]
  fn unexpected_token_is_a_parse_error() {
    let (grammar, tables) = compile(arithmetic_grammar()).unwrap();
    let tokens = tokens_for(&[(TokenKind::Plus, "+")]);
    let err = driver::parse(&grammar, &tables, &tokens).unwrap_err();
    assert!(matches!(err, strata_diagnostics::CompileError::Parse { index: 0, .. }));
  }

  #[test]
  fn table_construction_is_deterministic() {
    // property 6: rebuilding from the same grammar yields the same tables.
    let (g1, t1) = compile(arithmetic_grammar()).unwrap();
    let (_, t2) = compile(arithmetic_grammar()).unwrap();
    let tokens = tokens_for(&[(TokenKind::Integer, "4"), (TokenKind::Star, "*"), (TokenKind::Integer, "5")]);
    let trace1 = driver::parse(&g1, &t1, &tokens).unwrap();
    let trace2 = driver::parse(&g1, &t2, &tokens).unwrap();
    assert_eq!(trace1.ops, trace2.ops);
    assert_eq!(trace1.reductions, trace2.reductions);
  }

  #[test]
  fn grammar_signature_is_stable_across_rebuilds() {
    let a = arithmetic_grammar().augment();
    let b = arithmetic_grammar().augment();
    assert_eq!(a.signature(), b.signature());
  }
}
