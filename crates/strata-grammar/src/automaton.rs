use std::collections::{BTreeSet, HashMap};

use crate::first::FirstSets;
use crate::grammar::{Grammar, EOF_NAME};
use crate::item::{closure, goto_kernel, Item};
use crate::symbol::Symbol;

/// The canonical LR(1) item automaton (spec §4.3): one state per distinct
/// item-set *kernel* (pre-closure), each holding its full (closed) item set
/// for the table builder to read. Mirrors `Automata`/`Info` in
/// `automata/automata.py` and `build_lr1_automata` in `lr_parser/lr_utils.py`.
pub struct LrAutomaton {
  pub states: Vec<BTreeSet<Item>>,
  pub transitions: HashMap<(usize, Symbol), usize>,
}

/// Builds the canonical automaton for an already-augmented grammar. Panics
/// if `grammar` is not augmented — callers go through `Grammar::augment`
/// first; this is a programming error, not a user-facing one.
pub fn build_lr1_automaton<V: 'static>(grammar: &Grammar<V>, firsts: &FirstSets) -> LrAutomaton {
  assert!(grammar.is_augmented(), "LR(1) automaton construction requires an augmented grammar");

  let start_production =
    grammar.productions.iter().position(|p| p.left == grammar.initial).expect("augmented grammar has no start production");
  let start_kernel: BTreeSet<Item> = BTreeSet::from([Item::start(start_production, BTreeSet::from([EOF_NAME.to_string()]))]);

  let mut visited: HashMap<BTreeSet<Item>, usize> = HashMap::from([(start_kernel.clone(), 0)]);
  let mut states: Vec<BTreeSet<Item>> = vec![closure(start_kernel.clone(), grammar, firsts)];
  let mut pending = vec![start_kernel];
  let mut transitions = HashMap::new();

  let all_symbols: Vec<Symbol> = grammar
    .terminals
    .iter()
    .map(|t| Symbol::Terminal(t.clone()))
    .chain(grammar.non_terminals.iter().map(|n| Symbol::NonTerminal(n.clone())))
    .collect();

  while let Some(current_kernel) = pending.pop() {
    let current_state = visited[&current_kernel];
    let current_closure = closure(current_kernel, grammar, firsts);
    for symbol in &all_symbols {
      let next_kernel = goto_kernel(&current_closure, symbol, grammar);
      if next_kernel.is_empty() {
        continue;
      }
      let next_state = *visited.entry(next_kernel.clone()).or_insert_with(|| {
        let id = states.len();
        states.push(closure(next_kernel.clone(), grammar, firsts));
        pending.push(next_kernel.clone());
        id
      });
      transitions.insert((current_state, symbol.clone()), next_state);
    }
  }

  LrAutomaton { states, transitions }
}
