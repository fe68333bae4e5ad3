use std::collections::HashMap;

use strata_diagnostics::CompileError;

use crate::automaton::LrAutomaton;
use crate::grammar::{Grammar, ProductionId, EOF_NAME};
use crate::symbol::Symbol;

/// One ACTION-table entry (spec §4.3 "ACTION / GOTO tables"). `Reduce`
/// carries a `ProductionId` rather than the production itself so this type
/// stays plain data — serializable and independent of the semantic-value
/// type `V` (spec §4.3 Persistence, §6.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TableAction {
  Shift(usize),
  Reduce(ProductionId),
  Accept,
}

/// The ACTION/GOTO tables produced by generation, and consumed by the
/// driver. Plain data: no reference to the grammar's semantic actions, so
/// this is what gets persisted and cache-validated against a grammar
/// signature (spec §4.3 Persistence, §6.3).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Tables {
  action: HashMap<(usize, String), TableAction>,
  goto: HashMap<(usize, String), usize>,
}

impl Tables {
  pub fn action(&self, state: usize, terminal: &str) -> Option<TableAction> {
    self.action.get(&(state, terminal.to_string())).copied()
  }

  pub fn goto(&self, state: usize, non_terminal: &str) -> Option<usize> {
    self.goto.get(&(state, non_terminal.to_string())).copied()
  }
}

fn register_action(
  table: &mut HashMap<(usize, String), TableAction>,
  key: (usize, String),
  value: TableAction,
) -> Result<(), CompileError> {
  match table.get(&key) {
    Some(existing) if *existing != value => {
      let kind = match (existing, &value) {
        (TableAction::Shift(_), TableAction::Reduce(_)) | (TableAction::Reduce(_), TableAction::Shift(_)) => {
          "shift-reduce"
        }
        _ => "reduce-reduce",
      };
      Err(CompileError::GrammarBuild {
        message: format!("{kind} conflict in state {} on lookahead {:?}: {:?} vs {:?}", key.0, key.1, existing, value),
      })
    }
    _ => {
      table.insert(key, value);
      Ok(())
    }
  }
}

/// Builds ACTION/GOTO from the canonical automaton (spec §4.3): SHIFT for
/// terminal transitions, GOTO for non-terminal transitions, REDUCE for every
/// lookahead of a reduce item, ACCEPT for the augmented start production's
/// reduce item on end-of-input. Conflicting writes to the same ACTION cell
/// are a fatal grammar-build error (spec §4.3 "Conflicts are fatal").
pub fn build_tables<V: 'static>(grammar: &Grammar<V>, automaton: &LrAutomaton) -> Result<Tables, CompileError> {
  let mut action = HashMap::new();
  let mut goto = HashMap::new();

  for (state, items) in automaton.states.iter().enumerate() {
    for item in items {
      if item.is_reduce(grammar) {
        let production = &grammar.productions[item.center.production];
        if production.left == grammar.initial {
          register_action(&mut action, (state, EOF_NAME.to_string()), TableAction::Accept)?;
        } else {
          for lookahead in &item.lookaheads {
            register_action(&mut action, (state, lookahead.clone()), TableAction::Reduce(item.center.production))?;
          }
        }
      } else {
        let symbol = item.next_symbol(grammar).unwrap();
        let target = automaton.transitions[&(state, symbol.clone())];
        match symbol {
          Symbol::Terminal(name) => {
            register_action(&mut action, (state, name.clone()), TableAction::Shift(target))?;
          }
          Symbol::NonTerminal(name) => {
            goto.insert((state, name.clone()), target);
          }
        }
      }
    }
  }

  Ok(Tables { action, goto })
}
