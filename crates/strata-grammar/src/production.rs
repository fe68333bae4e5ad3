use std::fmt;
use std::rc::Rc;

use strata_diagnostics::Token;

use crate::symbol::Symbol;

/// The value an action sees for each popped stack slot: either a shifted
/// token or a previously-reduced semantic value (spec §3 "semantic action:
/// a function from the concrete children values to a semantic value").
#[derive(Clone, Debug)]
pub enum SemanticValue<V> {
  Token(Token),
  Value(V),
}

impl<V> SemanticValue<V> {
  /// Unwraps a shifted token, or panics. An action that calls this on a
  /// reduced value has a grammar bug — spec §4.3 "no runtime coercion".
  pub fn token(self) -> Token {
    match self {
      SemanticValue::Token(t) => t,
      SemanticValue::Value(_) => panic!("semantic action expected a token, found a reduced value"),
    }
  }

  pub fn token_ref(&self) -> &Token {
    match self {
      SemanticValue::Token(t) => t,
      SemanticValue::Value(_) => panic!("semantic action expected a token, found a reduced value"),
    }
  }

  /// Unwraps a reduced value, or panics (see `token` above).
  pub fn value(self) -> V {
    match self {
      SemanticValue::Value(v) => v,
      SemanticValue::Token(_) => panic!("semantic action expected a reduced value, found a token"),
    }
  }
}

pub type Action<V> = Rc<dyn Fn(Vec<SemanticValue<V>>) -> V>;

/// `Production`/`AttributedProduction` of spec §3, merged into one type:
/// every production carries an action, including the single synthetic
/// `S' -> S` production `Grammar::augment` inserts, whose action is a plain
/// forward of its one child.
pub struct Production<V> {
  pub left: String,
  /// Empty means the epsilon production (spec §3: "a sequence of symbols,
  /// possibly the single symbol `ε`" — represented here as no symbols at
  /// all rather than a literal epsilon marker).
  pub right: Vec<Symbol>,
  pub action: Action<V>,
}

impl<V> Production<V> {
  pub fn new(left: impl Into<String>, right: Vec<Symbol>, action: Action<V>) -> Self {
    Self { left: left.into(), right, action }
  }

  pub fn is_epsilon(&self) -> bool {
    self.right.is_empty()
  }
}

impl<V> fmt::Debug for Production<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self)
  }
}

impl<V> fmt::Display for Production<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.right.is_empty() {
      write!(f, "{} -> epsilon", self.left)
    } else {
      let rhs = self.right.iter().map(Symbol::name).collect::<Vec<_>>().join(" ");
      write!(f, "{} -> {}", self.left, rhs)
    }
  }
}
