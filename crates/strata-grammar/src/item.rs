use std::collections::{BTreeSet, HashMap};

use crate::first::FirstSets;
use crate::grammar::{Grammar, ProductionId};
use crate::symbol::Symbol;

/// An item with its lookaheads dropped (spec GLOSSARY "Core") — two items
/// with the same center are merged by union of lookaheads during
/// compression.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Center {
  pub production: ProductionId,
  pub dot: usize,
}

/// An LR(1) item: `(production, dot position, lookahead set)` (spec §3).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
  pub center: Center,
  pub lookaheads: BTreeSet<String>,
}

impl Item {
  pub fn start(production: ProductionId, lookaheads: BTreeSet<String>) -> Self {
    Self { center: Center { production, dot: 0 }, lookaheads }
  }

  pub fn is_reduce<V>(&self, grammar: &Grammar<V>) -> bool {
    self.center.dot == grammar.productions[self.center.production].right.len()
  }

  pub fn next_symbol<'g, V>(&self, grammar: &'g Grammar<V>) -> Option<&'g Symbol> {
    grammar.productions[self.center.production].right.get(self.center.dot)
  }

  fn unseen<'g, V>(&self, grammar: &'g Grammar<V>) -> &'g [Symbol] {
    &grammar.productions[self.center.production].right[self.center.dot + 1..]
  }

  fn advanced(&self) -> Self {
    Self { center: Center { production: self.center.production, dot: self.center.dot + 1 }, lookaheads: self.lookaheads.clone() }
  }
}

/// Merges items sharing a center by union of lookaheads (spec §3
/// "compression"; original's `compress` in `lr_parser/lr_utils.py`).
fn compress(items: impl IntoIterator<Item = Item>) -> BTreeSet<Item> {
  let mut centers: HashMap<Center, BTreeSet<String>> = HashMap::new();
  for item in items {
    centers.entry(item.center).or_default().extend(item.lookaheads);
  }
  centers.into_iter().map(|(center, lookaheads)| Item { center, lookaheads }).collect()
}

/// For every item whose dot precedes a non-terminal `B`, adds `(B -> .δ,
/// FIRST(γ·L))` for every production of `B` and every lookahead `L` in the
/// item (spec §4.3 "Canonical LR(1) automaton").
fn expand<V>(item: &Item, grammar: &Grammar<V>, firsts: &FirstSets) -> Vec<Item> {
  let Some(Symbol::NonTerminal(name)) = item.next_symbol(grammar) else {
    return Vec::new();
  };

  let mut lookaheads = BTreeSet::new();
  for lookahead in &item.lookaheads {
    let mut preview: Vec<Symbol> = item.unseen(grammar).to_vec();
    preview.push(Symbol::Terminal(lookahead.clone()));
    lookaheads.extend(firsts.of_sentence(&preview).terminals);
  }

  grammar
    .productions
    .iter()
    .enumerate()
    .filter(|(_, p)| &p.left == name)
    .map(|(id, _)| Item::start(id, lookaheads.clone()))
    .collect()
}

/// Closure of an LR(1) item set: repeatedly `expand` every item and
/// `compress` the result until a fixpoint (spec §4.3 `closure_lr1`).
pub fn closure<V>(items: BTreeSet<Item>, grammar: &Grammar<V>, firsts: &FirstSets) -> BTreeSet<Item> {
  let mut current = compress(items);
  loop {
    let mut expanded: Vec<Item> = current.iter().cloned().collect();
    for item in &current {
      expanded.extend(expand(item, grammar, firsts));
    }
    let next = compress(expanded);
    if next == current {
      return current;
    }
    current = next;
  }
}

/// The kernel of `goto(items, symbol)`: every item with `symbol` immediately
/// after the dot, with the dot advanced (spec §4.3 "goto function"). Callers
/// take `closure` of this to get the next state's full item set.
pub fn goto_kernel<V>(items: &BTreeSet<Item>, symbol: &Symbol, grammar: &Grammar<V>) -> BTreeSet<Item> {
  compress(items.iter().filter(|item| item.next_symbol(grammar) == Some(symbol)).map(Item::advanced))
}
