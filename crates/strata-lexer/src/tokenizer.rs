use strata_automata::{Dfa, Nfa, Tag};
use strata_diagnostics::{CompileError, Token, TokenKind};

use crate::matcher::TokenMatcher;

/// The combined tagged DFA for one matcher list, plus the textual signature
/// a cache file is keyed by (spec §4.4 Persistence, mirroring
/// `strata_grammar::Grammar::signature`).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Tokenizer {
  dfa: Dfa<TokenKind>,
  signature: String,
}

impl Tokenizer {
  /// Compiles each matcher to a tagged DFA via `add_type`, unions all of
  /// them into a single NFA, then determinizes once (spec §4.4).
  pub fn build(matchers: &[TokenMatcher]) -> Result<Self, CompileError> {
    let mut nfas: Vec<Nfa<TokenKind>> = Vec::with_capacity(matchers.len());
    for (priority, matcher) in matchers.iter().enumerate() {
      let ast = strata_regex::compile(matcher.pattern).map_err(|err| CompileError::GrammarBuild {
        message: format!("tokenizer matcher {priority} ({:?}): {err}", matcher.kind),
      })?;
      let nfa: Nfa<TokenKind> = ast.evaluate();
      nfas.push(nfa.add_type(Tag::new(matcher.kind, priority as u32)));
    }
    let dfa = Nfa::union_many(&nfas).to_dfa();
    Ok(Self { dfa, signature: signature_of(matchers) })
  }

  pub fn signature(&self) -> &str {
    &self.signature
  }

  /// Longest-match scan over `source` (spec §4.4). Newlines and whitespace
  /// advance line/column bookkeeping without ever constructing a `Token`
  /// (C.6); comments are kept only when the previously *emitted* token's
  /// kind is `Comment`, `Semicolon`, or `OpenBrace`; every other matched
  /// span becomes a token at its start position. A trailing `Eof` token is
  /// always appended.
  pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, CompileError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut column = 1u32;
    let mut last_emitted: Option<TokenKind> = None;
    let mut i = 0usize;

    while i < chars.len() {
      let (accepted, state, length) = self.dfa.recognize_tracking(&chars, i);
      if !accepted || length == 0 {
        return Err(CompileError::Lex { line, column, found: chars[i] });
      }
      let kind = self.dfa.tag_of(state).expect("an accepting state always carries at least one tag").kind;
      let text: String = chars[i..i + length].iter().collect();

      match kind {
        TokenKind::Newline => {
          line += 1;
          column = 1;
        }
        TokenKind::Whitespace => {
          for c in text.chars() {
            column += if c == '\t' { 4 } else { 1 };
          }
        }
        TokenKind::Comment => {
          let preserve = matches!(
            last_emitted,
            Some(TokenKind::Comment) | Some(TokenKind::Semicolon) | Some(TokenKind::OpenBrace)
          );
          if preserve {
            tokens.push(Token::new(line, column, kind, text));
            last_emitted = Some(kind);
          }
          column += length as u32;
        }
        _ => {
          tokens.push(Token::new(line, column, kind, text));
          last_emitted = Some(kind);
          column += length as u32;
        }
      }
      i += length;
    }

    tokens.push(Token::eof(line, column));
    Ok(tokens)
  }
}

/// Matcher kind plus pattern, one per line, in declaration order — the same
/// shape `strata_grammar::Grammar::signature` uses for productions (spec
/// §4.4 Persistence). Public so a caller can check cache validity against
/// the matcher list alone, without paying for `Tokenizer::build`'s DFA
/// compilation just to find out the cache already matches.
pub fn signature_of(matchers: &[TokenMatcher]) -> String {
  matchers.iter().map(|m| format!("{:?}: {}", m.kind, m.pattern)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::standard::standard_matchers;

  fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
  }

  #[test]
  fn scenario_s1_declaration_and_semicolon() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let tokens = tokenizer.tokenize("var x = 42;").unwrap();
    assert_eq!(
      kinds(&tokens),
      vec![
        TokenKind::Var,
        TokenKind::Identifier,
        TokenKind::Equal,
        TokenKind::Integer,
        TokenKind::Semicolon,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn scenario_s6_longest_match_beats_keyword_prefix() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let tokens = tokenizer.tokenize("ifx").unwrap();
    assert_eq!(kinds(&tokens), vec![TokenKind::Identifier, TokenKind::Eof]);
    assert_eq!(tokens[0].text, "ifx");
  }

  #[test]
  fn bare_keyword_wins_the_identifier_tie() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let tokens = tokenizer.tokenize("if").unwrap();
    assert_eq!(kinds(&tokens), vec![TokenKind::If, TokenKind::Eof]);
  }

  #[test]
  fn newline_and_whitespace_are_never_emitted() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let tokens = tokenizer.tokenize("var x\n  = 1;").unwrap();
    assert_eq!(
      kinds(&tokens),
      vec![
        TokenKind::Var,
        TokenKind::Identifier,
        TokenKind::Equal,
        TokenKind::Integer,
        TokenKind::Semicolon,
        TokenKind::Eof,
      ]
    );
    // the `=` sits on line 2, after two leading spaces on that line.
    let equal = tokens.iter().find(|t| t.kind == TokenKind::Equal).unwrap();
    assert_eq!(equal.line, 2);
    assert_eq!(equal.column, 3);
  }

  #[test]
  fn comment_after_brace_semicolon_or_comment_is_kept() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let standalone = tokenizer.tokenize("{\n// note\nvar x = 1;\n}").unwrap();
    assert_eq!(
      kinds(&standalone),
      vec![
        TokenKind::OpenBrace,
        TokenKind::Comment,
        TokenKind::Var,
        TokenKind::Identifier,
        TokenKind::Equal,
        TokenKind::Integer,
        TokenKind::Semicolon,
        TokenKind::CloseBrace,
        TokenKind::Eof,
      ]
    );

    // the previous *emitted* token is `Semicolon`, so this one is kept too,
    // even though it trails an expression on the same line (spec §4.4's
    // rule is keyed on the previous emitted kind, not on same-line-ness).
    let after_semicolon = tokenizer.tokenize("var x = 1; // kept\n").unwrap();
    assert_eq!(
      kinds(&after_semicolon),
      vec![
        TokenKind::Var,
        TokenKind::Identifier,
        TokenKind::Equal,
        TokenKind::Integer,
        TokenKind::Semicolon,
        TokenKind::Comment,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn comment_after_any_other_token_is_dropped() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    // the previous emitted token is `Integer`, not comment/semicolon/brace.
    let tokens = tokenizer.tokenize("var x = 1 // dropped\n").unwrap();
    assert_eq!(
      kinds(&tokens),
      vec![TokenKind::Var, TokenKind::Identifier, TokenKind::Equal, TokenKind::Integer, TokenKind::Eof]
    );
  }

  #[test]
  fn float_beats_integer_on_a_decimal_point() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let tokens = tokenizer.tokenize("3.14").unwrap();
    assert_eq!(kinds(&tokens), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(tokens[0].text, "3.14");
  }

  #[test]
  fn string_literal_is_quote_delimited() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let tokens = tokenizer.tokenize("\"hello world\"").unwrap();
    assert_eq!(kinds(&tokens), vec![TokenKind::String, TokenKind::Eof]);
    assert_eq!(tokens[0].text, "\"hello world\"");
  }

  #[test]
  fn unrecognized_character_is_a_lex_error() {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let err = tokenizer.tokenize("var x = @;").unwrap_err();
    assert!(matches!(err, CompileError::Lex { line: 1, column: 9, found: '@' }));
  }
}
