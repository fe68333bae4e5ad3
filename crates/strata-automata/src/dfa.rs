use std::collections::HashMap;

use crate::{nfa::Nfa, tag::Tag, StateId};

/// A deterministic finite automaton: no epsilon transitions, at most one
/// target state per `(state, char)` pair (spec §3 invariant, §8 property 1).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Dfa<K> {
  states: usize,
  transitions: HashMap<(StateId, char), StateId>,
  initial: StateId,
  finals: HashMap<StateId, Vec<Tag<K>>>,
}

impl<K: Clone + Eq> Dfa<K> {
  pub fn new(
    states: usize,
    transitions: HashMap<(StateId, char), StateId>,
    initial: StateId,
    finals: HashMap<StateId, Vec<Tag<K>>>,
  ) -> Self {
    Self { states, transitions, initial, finals }
  }

  pub fn initial(&self) -> StateId {
    self.initial
  }

  pub fn is_final(&self, state: StateId) -> bool {
    self.finals.contains_key(&state)
  }

  /// Steps the DFA across `input` starting at `start`, consuming the
  /// longest prefix for which every position had a defined transition.
  /// Returns `(accepted, length)`; `accepted` is whether the state reached
  /// is a DFA final (spec §4.1 `recognize`).
  pub fn recognize(&self, input: &[char], start: usize) -> (bool, usize) {
    let (accepted, _, length) = self.recognize_tracking(input, start);
    (accepted, length)
  }

  /// Like `recognize`, but also returns the state reached, so callers (the
  /// tokenizer) can look up its tag without re-running the scan.
  pub fn recognize_tracking(&self, input: &[char], start: usize) -> (bool, StateId, usize) {
    let mut current = self.initial;
    let mut i = start;
    while i < input.len() {
      match self.transitions.get(&(current, input[i])) {
        Some(&next) => {
          current = next;
          i += 1;
        }
        None => break,
      }
    }
    (self.is_final(current), current, i - start)
  }

  /// The tag with minimum priority among a state's tags, ties broken by
  /// priority already encoding registration order (spec §4.1 `tag_of`).
  pub fn tag_of(&self, state: StateId) -> Option<&Tag<K>> {
    self.finals.get(&state).and_then(|tags| tags.iter().min_by_key(|t| t.priority))
  }

  /// Returns a copy where `tag` is appended to every final state's tag list
  /// (spec §4.1 `add_type`).
  pub fn add_type(&self, tag: Tag<K>) -> Self {
    let finals = self
      .finals
      .iter()
      .map(|(state, tags)| {
        let mut tags = tags.clone();
        tags.push(tag.clone());
        (*state, tags)
      })
      .collect();
    Self { states: self.states, transitions: self.transitions.clone(), initial: self.initial, finals }
  }

  /// A DFA's transitions are a (deterministic) subset of an NFA's; this is
  /// the identity embedding used so a tagged per-matcher DFA can be unioned
  /// with its siblings before the tokenizer's final determinization (spec
  /// §4.4: "unions all of them into a single NFA, then determinizes").
  pub fn into_nfa(&self) -> Nfa<K> {
    let transitions = self.transitions.iter().map(|(&(s, c), &t)| ((s, Some(c)), vec![t])).collect();
    Nfa::from_parts(self.states, transitions, self.initial, self.finals.clone())
  }
}
