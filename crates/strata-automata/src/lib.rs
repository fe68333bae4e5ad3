//! The finite-automaton library (spec §3 "Finite automaton", §4.1).
//!
//! States are plain integers `0..N`. NFAs may carry epsilon transitions;
//! DFAs never do. Every construction operation (`concat`, `union`, `star`,
//! `to_dfa`) *returns a new automaton* — mutable state is never shared
//! between automata, matching the "automata operations return new automata"
//! rule of §5.
//!
//! Generic over the tag's payload `K` (the token kind) so this crate has no
//! dependency on any particular tokenizer's kind enum — `strata-lexer`
//! instantiates it with `strata_diagnostics::TokenKind`.

mod dfa;
mod nfa;
mod tag;

pub use dfa::Dfa;
pub use nfa::Nfa;
pub use tag::Tag;

pub type StateId = usize;

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  #[test]
  fn single_char_round_trip() {
    let nfa = Nfa::single('a', vec![Tag::new("A", 0)]);
    let dfa = nfa.to_dfa();
    assert_eq!(dfa.recognize(&chars("a"), 0), (true, 1));
    assert_eq!(dfa.recognize(&chars("b"), 0), (false, 0));
  }

  #[test]
  fn union_accepts_either_branch() {
    let a = Nfa::single('a', vec![Tag::new("A", 0)]);
    let b = Nfa::single('b', vec![Tag::new("B", 0)]);
    let dfa = a.union(&b).to_dfa();
    assert_eq!(dfa.recognize(&chars("a"), 0), (true, 1));
    assert_eq!(dfa.recognize(&chars("b"), 0), (true, 1));
    assert_eq!(dfa.recognize(&chars("c"), 0), (false, 0));
  }

  #[test]
  fn concat_requires_both_parts_in_order() {
    let a = Nfa::single('a', vec![]);
    let b = Nfa::single('b', vec![Tag::new("AB", 0)]);
    let dfa = a.concat(&b).to_dfa();
    assert_eq!(dfa.recognize(&chars("ab"), 0), (true, 2));
    assert_eq!(dfa.recognize(&chars("ba"), 0), (false, 0));
  }

  #[test]
  fn star_accepts_empty_and_repeats() {
    let a = Nfa::single('a', vec![Tag::new("AS", 0)]);
    let dfa = a.star().to_dfa();
    assert_eq!(dfa.recognize(&chars(""), 0), (true, 0));
    assert_eq!(dfa.recognize(&chars("aaa"), 0), (true, 3));
  }

  #[test]
  fn subset_construction_matches_nfa_semantics_on_longest_match() {
    // (a|b)*c — exercises epsilon closures through union and star together.
    let ab = Nfa::single('a', vec![]).union(&Nfa::single('b', vec![]));
    let abstar = ab.star();
    let full = abstar.concat(&Nfa::single('c', vec![Tag::new("ABC", 0)]));
    let dfa = full.to_dfa();
    assert_eq!(dfa.recognize(&chars("ababc"), 0), (true, 5));
    assert_eq!(dfa.recognize(&chars("abab"), 0), (false, 4));
  }

  #[test]
  fn tag_of_breaks_ties_by_priority() {
    let low = Nfa::single('x', vec![Tag::new("FIRST", 0)]);
    let high = Nfa::single('x', vec![Tag::new("SECOND", 1)]);
    let dfa = low.union(&high).to_dfa();
    let (_, state, _) = dfa.recognize_tracking(&chars("x"), 0);
    assert_eq!(dfa.tag_of(state).unwrap().kind, "FIRST");
  }

  #[test]
  fn dfa_transition_function_is_deterministic() {
    let a = Nfa::single('a', vec![]).union(&Nfa::single('a', vec![Tag::new("A", 0)]));
    let dfa = a.to_dfa();
    // Both NFA branches on 'a' collapse into a single DFA state per input
    // symbol — recognize must not be ambiguous about the outcome.
    assert_eq!(dfa.recognize(&chars("a"), 0), (true, 1));
  }
}
