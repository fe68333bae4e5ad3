use std::collections::{BTreeSet, HashMap};

use crate::{dfa::Dfa, tag::Tag, StateId};

/// A symbol labeling an NFA transition: either a concrete input character or
/// epsilon (`None`).
pub type Symbol = Option<char>;

/// A non-deterministic finite automaton with epsilon transitions (spec §3
/// "Finite automaton"). `K` is the payload carried by an accepting tag (the
/// token kind).
#[derive(Clone, Debug)]
pub struct Nfa<K> {
  states: usize,
  transitions: HashMap<(StateId, Symbol), Vec<StateId>>,
  initial: StateId,
  finals: HashMap<StateId, Vec<Tag<K>>>,
}

impl<K: Clone + Eq> Nfa<K> {
  /// The automaton accepting only the empty string: one state, no
  /// transitions, the sole state final with no tags.
  pub fn epsilon() -> Self {
    Self { states: 1, transitions: HashMap::new(), initial: 0, finals: HashMap::from([(0, Vec::new())]) }
  }

  /// Two-state NFA `0 --char--> 1`, `1` final with `tags` (spec §4.1
  /// `single`).
  pub fn single(ch: char, tags: Vec<Tag<K>>) -> Self {
    Self { states: 2, transitions: HashMap::from([((0, Some(ch)), vec![1])]), initial: 0, finals: HashMap::from([(1, tags)]) }
  }

  /// Builds an `Nfa` directly from its parts. Used by `Dfa::into_nfa` to
  /// embed an already-deterministic automaton into NFA space before a
  /// further `union`.
  pub(crate) fn from_parts(
    states: usize,
    transitions: HashMap<(StateId, Symbol), Vec<StateId>>,
    initial: StateId,
    finals: HashMap<StateId, Vec<Tag<K>>>,
  ) -> Self {
    Self { states, transitions, initial, finals }
  }

  pub fn states(&self) -> usize {
    self.states
  }

  pub fn initial(&self) -> StateId {
    self.initial
  }

  pub fn finals(&self) -> &HashMap<StateId, Vec<Tag<K>>> {
    &self.finals
  }

  fn alphabet(&self) -> BTreeSet<char> {
    self.transitions.keys().filter_map(|(_, sym)| *sym).collect()
  }

  /// Place `other` after `self`: epsilon edges from every final of `self` to
  /// `other`'s initial state. The result's finals are `other`'s finals only
  /// (spec §4.1 `concat`: "Preserves tags of B only").
  pub fn concat(&self, other: &Self) -> Self {
    let offset = self.states;
    let mut transitions = self.transitions.clone();
    for state in self.finals.keys() {
      transitions.entry((*state, None)).or_default().push(other.initial + offset);
    }
    for (&(state, sym), targets) in &other.transitions {
      transitions.insert((state + offset, sym), targets.iter().map(|s| s + offset).collect());
    }
    let finals = other.finals.iter().map(|(s, tags)| (s + offset, tags.clone())).collect();
    Self { states: self.states + other.states, transitions, initial: self.initial, finals }
  }

  /// A new initial state with epsilon edges to both `self`'s and `other`'s
  /// initials; finals are the union of both (spec §4.1 `union`).
  pub fn union(&self, other: &Self) -> Self {
    let new_initial = 0;
    let left_offset = 1;
    let right_offset = self.states + 1;
    let mut transitions = HashMap::new();
    transitions.insert((new_initial, None), vec![self.initial + left_offset, other.initial + right_offset]);
    for (&(state, sym), targets) in &self.transitions {
      transitions.insert((state + left_offset, sym), targets.iter().map(|s| s + left_offset).collect());
    }
    for (&(state, sym), targets) in &other.transitions {
      transitions.insert((state + right_offset, sym), targets.iter().map(|s| s + right_offset).collect());
    }
    let mut finals: HashMap<StateId, Vec<Tag<K>>> =
      self.finals.iter().map(|(s, tags)| (s + left_offset, tags.clone())).collect();
    finals.extend(other.finals.iter().map(|(s, tags)| (s + right_offset, tags.clone())));
    Self { states: self.states + other.states + 1, transitions, initial: new_initial, finals }
  }

  /// Folds `union` over a non-empty slice of automata (spec §4.2 evaluation
  /// of alternation chains, and §4.4's "union all of them into a single
  /// NFA").
  pub fn union_many(automata: &[Self]) -> Self {
    match automata.split_first() {
      None => Self::epsilon(),
      Some((first, [])) => first.clone(),
      Some((first, rest)) => first.union(&Self::union_many(rest)),
    }
  }

  /// Epsilon edges from every final back to the initial state, and the
  /// initial state becomes final with the union of all final tags (spec
  /// §4.1 `star`). Existing finals remain final.
  pub fn star(&self) -> Self {
    let mut transitions = self.transitions.clone();
    for state in self.finals.keys() {
      transitions.entry((*state, None)).or_default().push(self.initial);
    }
    let mut finals = self.finals.clone();
    let mut all_tags: Vec<Tag<K>> = Vec::new();
    for tags in self.finals.values() {
      for tag in tags {
        if !all_tags.contains(tag) {
          all_tags.push(tag.clone());
        }
      }
    }
    finals.insert(self.initial, all_tags);
    Self { states: self.states, transitions, initial: self.initial, finals }
  }

  /// Returns a copy where `tag` is appended to every final state's tag list
  /// (spec §4.1 `add_type`; used by the tokenizer to color sub-automata by
  /// token kind).
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

  fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
    let mut closure = states.clone();
    let mut stack: Vec<StateId> = states.iter().copied().collect();
    while let Some(state) = stack.pop() {
      if let Some(targets) = self.transitions.get(&(state, None)) {
        for &target in targets {
          if closure.insert(target) {
            stack.push(target);
          }
        }
      }
    }
    closure
  }

  fn r#move(&self, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
    let mut out = BTreeSet::new();
    for state in states {
      if let Some(targets) = self.transitions.get(&(*state, Some(symbol))) {
        out.extend(targets.iter().copied());
      }
    }
    out
  }

  fn tags_of(&self, states: &BTreeSet<StateId>) -> Vec<Tag<K>> {
    let mut tags = Vec::new();
    for state in states {
      if let Some(t) = self.finals.get(state) {
        for tag in t {
          if !tags.contains(tag) {
            tags.push(tag.clone());
          }
        }
      }
    }
    tags
  }

  /// Classical subset construction over the non-epsilon alphabet, starting
  /// from the epsilon-closure of the initial state (spec §4.1 `to_dfa`).
  pub fn to_dfa(&self) -> Dfa<K> {
    let alphabet = self.alphabet();
    let start = self.epsilon_closure(&BTreeSet::from([self.initial]));

    let mut dfa_states: Vec<BTreeSet<StateId>> = vec![start.clone()];
    let mut index_of: HashMap<BTreeSet<StateId>, StateId> = HashMap::from([(start.clone(), 0)]);
    let mut pending = vec![start];
    let mut transitions: HashMap<(StateId, char), StateId> = HashMap::new();

    while let Some(current) = pending.pop() {
      let current_id = index_of[&current];
      for &symbol in &alphabet {
        let moved = self.r#move(&current, symbol);
        if moved.is_empty() {
          continue;
        }
        let next = self.epsilon_closure(&moved);
        let next_id = *index_of.entry(next.clone()).or_insert_with(|| {
          let id = dfa_states.len();
          dfa_states.push(next.clone());
          pending.push(next.clone());
          id
        });
        transitions.insert((current_id, symbol), next_id);
      }
    }

    let finals = dfa_states
      .iter()
      .enumerate()
      .filter_map(|(id, states)| {
        let tags = self.tags_of(states);
        (states.iter().any(|s| self.finals.contains_key(s))).then_some((id, tags))
      })
      .collect();

    Dfa::new(dfa_states.len(), transitions, 0, finals)
  }
}
