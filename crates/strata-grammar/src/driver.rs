use strata_diagnostics::{CompileError, Token};

use crate::grammar::{Grammar, ProductionId};
use crate::production::SemanticValue;
use crate::tables::{TableAction, Tables};

/// One step of the shift/reduce trace (spec §4.3 "Driver"). `Reduce` doesn't
/// carry the production here — the matching `ProductionId` lives in
/// `ParseTrace::reductions`, consumed in lock-step during semantic replay,
/// mirroring the original's separate `output`/`operations` lists
/// (`lr_parser/lr_utils.py::evaluate_reverse_parser`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseOp {
  Shift,
  Reduce,
  Accept,
}

/// The "two traces" of spec §4.3: the SHIFT/REDUCE/ACCEPT sequence, and the
/// productions applied at each REDUCE, in order.
#[derive(Clone, Debug, Default)]
pub struct ParseTrace {
  pub ops: Vec<ParseOp>,
  pub reductions: Vec<ProductionId>,
}

/// Runs the table-driven shift/reduce parser over `tokens` (spec §4.3
/// "Driver"). The state stack holds states only — the symbol half of each
/// classic `(symbol, state)` pair is redundant once reductions are resolved
/// through `Tables::goto`, so it's dropped to keep the stack a plain
/// `Vec<usize>`.
pub fn parse<V: 'static>(grammar: &Grammar<V>, tables: &Tables, tokens: &[Token]) -> Result<ParseTrace, CompileError> {
  let mut states = vec![0usize];
  let mut cursor = 0usize;
  let mut trace = ParseTrace::default();

  loop {
    let state = *states.last().unwrap();
    let token = tokens.get(cursor).expect("token stream must end with an Eof token");
    let lookahead = format!("{:?}", token.kind);

    match tables.action(state, &lookahead) {
      Some(TableAction::Shift(next)) => {
        states.push(next);
        cursor += 1;
        trace.ops.push(ParseOp::Shift);
      }
      Some(TableAction::Reduce(production_id)) => {
        let arity = grammar.productions[production_id].right.len();
        states.truncate(states.len() - arity);
        let left = &grammar.productions[production_id].left;
        let top = *states.last().unwrap();
        let goto = tables.goto(top, left).expect("GOTO table missing an entry the generator should have produced");
        states.push(goto);
        trace.ops.push(ParseOp::Reduce);
        trace.reductions.push(production_id);
      }
      Some(TableAction::Accept) => {
        trace.ops.push(ParseOp::Accept);
        return Ok(trace);
      }
      None => return Err(CompileError::Parse { token: token.clone(), index: cursor }),
    }
  }
}

/// Re-runs `trace` against `tokens` through the grammar's semantic actions
/// to build the AST (spec §4.3 "Semantic evaluation"). On `Shift`, pushes
/// the next token; on `Reduce`, pops the production's arity worth of
/// values, applies its action, and pushes the result. After `Accept` the
/// stack holds exactly one value.
pub fn evaluate<V>(grammar: &Grammar<V>, trace: &ParseTrace, tokens: &[Token]) -> V {
  let mut token_iter = tokens.iter().cloned();
  let mut reduction_iter = trace.reductions.iter();
  let mut stack: Vec<SemanticValue<V>> = Vec::new();

  for op in &trace.ops {
    match op {
      ParseOp::Shift => stack.push(SemanticValue::Token(token_iter.next().expect("shift with no remaining token"))),
      ParseOp::Reduce => {
        let production_id = *reduction_iter.next().expect("reduce op with no matching production in trace");
        let production = &grammar.productions[production_id];
        let arity = production.right.len();
        let children = stack.split_off(stack.len() - arity);
        stack.push(SemanticValue::Value((production.action)(children)));
      }
      ParseOp::Accept => {}
    }
  }

  assert_eq!(stack.len(), 1, "semantic replay must leave exactly one value on the stack");
  stack.pop().unwrap().value()
}
