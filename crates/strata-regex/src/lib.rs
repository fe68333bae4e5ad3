//! Compiles a regex surface pattern into a tagged NFA or DFA (spec §3 "Regex
//! AST", §4.2). Used by `strata-lexer` to build each token matcher, and
//! available standalone for anything else that wants a small compiled
//! matcher (the tokenizer's own `[...]` literal handling, for instance).
//!
//! The surface grammar is itself compiled and driven through
//! `strata-grammar`'s own LR(1) machinery (`surface.rs`) — the same engine
//! that drives the host language's parser — rather than a bespoke recursive
//! descent over the pattern text (spec §4.2: "the regex grammar is itself
//! compiled with the same tool it supports").

mod ast;
mod surface;

pub use ast::RegexAst;
pub use surface::RegexSyntaxError;

use strata_automata::{Dfa, Nfa, Tag};

/// Parses `pattern` and evaluates it to an NFA, without tagging or
/// determinizing — callers that need to `add_type` several matchers before
/// unioning them (as the tokenizer does) want the NFA, not a DFA.
pub fn compile(pattern: &str) -> Result<RegexAst, RegexSyntaxError> {
  surface::parse(pattern)
}

/// Parses and evaluates `pattern` to an untagged NFA.
pub fn compile_to_nfa<K: Clone + Eq>(pattern: &str) -> Result<Nfa<K>, RegexSyntaxError> {
  Ok(compile(pattern)?.evaluate())
}

/// Parses, evaluates, and determinizes `pattern` in one step.
pub fn compile_to_dfa<K: Clone + Eq>(pattern: &str) -> Result<Dfa<K>, RegexSyntaxError> {
  Ok(compile_to_nfa(pattern)?.to_dfa())
}

/// Parses, evaluates, determinizes, and tags every accepting state of
/// `pattern` with `tag` — the shape `strata-lexer` wants for one token
/// matcher (spec §4.4: "compiles each matcher to a tagged DFA via
/// `add_type`").
pub fn compile_tagged_dfa<K: Clone + Eq>(pattern: &str, tag: Tag<K>) -> Result<Dfa<K>, RegexSyntaxError> {
  Ok(compile_to_dfa(pattern)?.add_type(tag))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  fn matches(pattern: &str, input: &str) -> bool {
    let dfa: Dfa<&'static str> = compile_to_dfa(pattern).unwrap();
    let (accepted, len) = dfa.recognize(&chars(input), 0);
    accepted && len == input.chars().count()
  }

  #[test]
  fn single_literal_char_round_trip() {
    // property 3: compile(c) accepts only c, not some other single char.
    for c in ['a', 'Z', '5', '_'] {
      assert!(matches(&c.to_string(), &c.to_string()));
      let other = if c == 'x' { 'y' } else { 'x' };
      assert!(!matches(&c.to_string(), &other.to_string()));
    }
  }

  #[test]
  fn escaped_metacharacter_is_literal() {
    assert!(matches(r"\*", "*"));
    assert!(!matches(r"\*", "a"));
    assert!(matches(r"\(", "("));
  }

  #[test]
  fn union_accepts_either_side() {
    // property 4: compile(A|B) accepts iff A or B does.
    assert!(matches("a|b", "a"));
    assert!(matches("a|b", "b"));
    assert!(!matches("a|b", "c"));
  }

  #[test]
  fn concat_requires_both_parts_in_order() {
    assert!(matches("ab", "ab"));
    assert!(!matches("ab", "ba"));
    assert!(!matches("ab", "a"));
  }

  #[test]
  fn star_plus_maybe_quantifiers() {
    assert!(matches("a*", ""));
    assert!(matches("a*", "aaaa"));
    assert!(!matches("a+", ""));
    assert!(matches("a+", "aaa"));
    assert!(matches("a?", ""));
    assert!(matches("a?", "a"));
    assert!(!matches("a?", "aa"));
  }

  #[test]
  fn grouping_controls_precedence() {
    assert!(matches("(ab)*", "ababab"));
    assert!(!matches("(ab)*", "aba"));
  }

  #[test]
  fn char_class_unions_members_and_ranges() {
    // [abc-z] is a ∪ b ∪ {c..z}
    for c in ['a', 'b', 'c', 'm', 'z'] {
      assert!(matches("[abc-z]", &c.to_string()), "{c} should match");
    }
    assert!(!matches("[abc-z]", "A"));
  }

  #[test]
  fn negated_char_class_is_complement_of_printable_ascii() {
    assert!(matches("[^a-z]", "A"));
    assert!(matches("[^a-z]", "5"));
    assert!(!matches("[^a-z]", "m"));
  }

  #[test]
  fn shorthand_classes_match_digit_letter_alphanum() {
    assert!(matches(r"\d", "7"));
    assert!(!matches(r"\d", "a"));
    assert!(matches(r"\l", "Q"));
    assert!(!matches(r"\l", "9"));
    assert!(matches(r"\w+", "abc123"));
  }

  #[test]
  fn unterminated_group_is_a_syntax_error() {
    assert!(compile("(ab").is_err());
    assert!(compile("ab)").is_err());
  }

  #[test]
  fn unterminated_class_is_a_syntax_error() {
    assert!(compile("[abc").is_err());
  }

  #[test]
  fn empty_pattern_accepts_only_empty_string() {
    assert!(matches("", ""));
  }
}
