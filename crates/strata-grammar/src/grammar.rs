use crate::production::{Production, SemanticValue};
use crate::symbol::Symbol;

pub type ProductionId = usize;

/// The end-of-input terminal name (spec §3 "distinguished end-of-input
/// terminal"). Matches `TokenKind::Eof`'s `Debug` rendering, which is how
/// `strata-lexer` tokens are looked up against the ACTION table.
pub const EOF_NAME: &str = "Eof";

/// `Grammar` of spec §3: terminals, non-terminals, a designated initial
/// non-terminal, an implicit end-of-input terminal, and the production
/// list. `V` is the semantic value type produced by reductions (the AST
/// node type, from the caller's point of view — this crate has no
/// knowledge of it).
pub struct Grammar<V> {
  pub terminals: Vec<String>,
  pub non_terminals: Vec<String>,
  pub initial: String,
  pub productions: Vec<Production<V>>,
}

impl<V: 'static> Grammar<V> {
  pub fn new(terminals: Vec<String>, non_terminals: Vec<String>, initial: String, productions: Vec<Production<V>>) -> Self {
    Self { terminals, non_terminals, initial, productions }
  }

  pub fn eof(&self) -> Symbol {
    Symbol::Terminal(EOF_NAME.to_string())
  }

  /// True past a single `S' -> S` production whose left is `initial` (spec
  /// §3 invariant).
  pub fn is_augmented(&self) -> bool {
    self.productions.iter().filter(|p| p.left == self.initial).count() <= 1
  }

  /// Adds `S' -> S` ahead of the existing initial, per spec §4.3 "Canonical
  /// LR(1) automaton": the augmented production's action is a plain
  /// pass-through of its single child, since the driver never actually
  /// reduces it (it is consumed by the ACCEPT rule instead, spec §4.3
  /// "Augmented-production acceptance").
  pub fn augment(self) -> Self {
    if self.is_augmented() {
      return self;
    }
    let augmented_name = format!("{}'", self.initial);
    let old_initial = self.initial.clone();
    let mut non_terminals = vec![augmented_name.clone()];
    non_terminals.extend(self.non_terminals);
    let mut productions = vec![Production::new(
      augmented_name.clone(),
      vec![Symbol::NonTerminal(old_initial)],
      std::rc::Rc::new(|mut children: Vec<SemanticValue<V>>| children.pop().unwrap().value()),
    )];
    productions.extend(self.productions);
    Self { terminals: self.terminals, non_terminals, initial: augmented_name, productions }
  }

  /// Canonical textual signature for table-cache validity (spec §6.3):
  /// terminals, then non-terminals, then every production as `Left ->
  /// Right`, one per line, mirroring `Grammar.to_string()` in the Python
  /// original (`lr_parser/shift_reduce_parser.py::pickle_save`).
  pub fn signature(&self) -> String {
    let mut out = String::new();
    out.push_str(&self.terminals.join(" "));
    out.push('\n');
    out.push_str(&self.non_terminals.join(" "));
    out.push('\n');
    out.push_str(&format!("initial: {}\n", self.initial));
    for production in &self.productions {
      out.push_str(&production.to_string());
      out.push('\n');
    }
    out
  }
}
