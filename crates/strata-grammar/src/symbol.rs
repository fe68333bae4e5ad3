use std::fmt;

/// A grammar symbol (spec §3 "Grammar"). Terminal and non-terminal names are
/// plain `String`s rather than interned handles — grammars in this system
/// top out at a few dozen symbols, so the simplicity wins over the interning
/// the teacher's bigger grammars need.
///
/// The end-of-input terminal is just `Terminal("$".into())`; there is no
/// separate variant for it, matching the original's `EOF(Terminal)` (spec
/// §3, §4.3 ACCEPT rule).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
  Terminal(String),
  NonTerminal(String),
}

impl Symbol {
  pub fn is_terminal(&self) -> bool {
    matches!(self, Symbol::Terminal(_))
  }

  pub fn name(&self) -> &str {
    match self {
      Symbol::Terminal(n) | Symbol::NonTerminal(n) => n,
    }
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
