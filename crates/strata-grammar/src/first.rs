use std::collections::{BTreeSet, HashMap};

use crate::grammar::{Grammar, EOF_NAME};
use crate::symbol::Symbol;

/// FIRST of a single symbol or a whole sentence: the terminals that can
/// begin a derivation, plus whether the symbol/sentence can derive epsilon
/// (spec §4.3 "FIRST sets").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstSet {
  pub terminals: BTreeSet<String>,
  pub contains_epsilon: bool,
}

impl FirstSet {
  fn singleton(terminal: &str) -> Self {
    Self { terminals: BTreeSet::from([terminal.to_string()]), contains_epsilon: false }
  }

  /// Unions `other` in; returns whether anything changed, mirroring
  /// `MySet.hard_update` in the original (`lr_parser/lr_utils.py`) — the
  /// fixpoint loop below uses this to detect convergence.
  fn hard_update(&mut self, other: &FirstSet) -> bool {
    let before_len = self.terminals.len();
    let before_eps = self.contains_epsilon;
    self.terminals.extend(other.terminals.iter().cloned());
    self.contains_epsilon |= other.contains_epsilon;
    self.terminals.len() != before_len || self.contains_epsilon != before_eps
  }
}

/// FIRST of a sentence (spec's `get_local_firsts`): union the FIRST of each
/// symbol left to right, stopping at the first symbol that cannot derive
/// epsilon; if every symbol can derive epsilon, so can the sentence.
fn local_first(symbols: &HashMap<Symbol, FirstSet>, sentence: &[Symbol]) -> FirstSet {
  let mut out = FirstSet::default();
  if sentence.is_empty() {
    out.contains_epsilon = true;
    return out;
  }
  for symbol in sentence {
    let set = symbols.get(symbol).expect("FIRST requested for an unknown symbol");
    out.hard_update(set);
    if !set.contains_epsilon {
      return out;
    }
  }
  out.contains_epsilon = true;
  out
}

/// FIRST sets for every symbol in a grammar, computed by fixpoint iteration
/// (spec §4.3). Also exposes FIRST-of-sentence for arbitrary symbol
/// sequences, needed by LR(1) lookahead propagation (`FIRST(γ·L)`).
pub struct FirstSets {
  symbols: HashMap<Symbol, FirstSet>,
}

impl FirstSets {
  pub fn of_symbol(&self, symbol: &Symbol) -> &FirstSet {
    self.symbols.get(symbol).expect("FIRST requested for an unknown symbol")
  }

  pub fn of_sentence(&self, sentence: &[Symbol]) -> FirstSet {
    local_first(&self.symbols, sentence)
  }
}

pub fn compute_first_sets<V>(grammar: &Grammar<V>) -> FirstSets {
  let mut symbols: HashMap<Symbol, FirstSet> = HashMap::new();
  for terminal in &grammar.terminals {
    symbols.insert(Symbol::Terminal(terminal.clone()), FirstSet::singleton(terminal));
  }
  symbols.insert(Symbol::Terminal(EOF_NAME.to_string()), FirstSet::singleton(EOF_NAME));
  for non_terminal in &grammar.non_terminals {
    symbols.insert(Symbol::NonTerminal(non_terminal.clone()), FirstSet::default());
  }

  let mut changed = true;
  while changed {
    changed = false;
    for production in &grammar.productions {
      let local = local_first(&symbols, &production.right);
      let left = Symbol::NonTerminal(production.left.clone());
      changed |= symbols.get_mut(&left).unwrap().hard_update(&local);
    }
  }

  FirstSets { symbols }
}
