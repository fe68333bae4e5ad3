use std::fmt;

/// Every terminal kind the tokenizer can produce, in the superset named by
/// the spec's open question: includes `%`/modulo, the `true`/`false`/`null`
/// literal terminals, and the `for`/`switch`/`continue`/`break` family, since
/// the checker handles all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
  OpenParen,
  CloseParen,
  OpenBrace,
  CloseBrace,
  OpenBracket,
  CloseBracket,
  Comma,
  Dot,
  Semicolon,
  Colon,
  Plus,
  Minus,
  Star,
  Slash,
  Percent,
  Bang,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  Equal,
  EqualEqual,
  BangEqual,

  Integer,
  Float,
  String,
  Identifier,

  Var,
  Attr,
  Class,
  Fun,
  While,
  If,
  Else,
  For,
  In,
  Null,
  True,
  False,
  Return,
  And,
  Or,
  SelfKw,
  Super,
  Switch,
  Case,
  Default,
  Break,
  Continue,
  List,
  Dict,
  Void,

  Comment,
  /// A single `\n`. Never reaches a `Token` value — the tokenizer consumes
  /// it for line/column bookkeeping and emits nothing (spec §4.4).
  Newline,
  /// A single space or tab character. Same treatment as `Newline`.
  Whitespace,
  Eof,

  /// An ordinary regex literal character, outside or inside a bracket
  /// expression — `strata-regex`'s own surface grammar (spec §4.2) is
  /// driven through this same token/parser machinery, so it needs its own
  /// terminal vocabulary alongside the language's.
  RegexSymbol,
  /// `|`, outside a bracket expression.
  RegexPipe,
  /// `?`, outside a bracket expression.
  RegexQuestion,
  /// `^`, only meaningful as the first token of a bracket expression.
  RegexCaret,
  /// `\d`, outside a bracket expression.
  RegexDigit,
  /// `\l`, outside a bracket expression.
  RegexLetter,
  /// `\w`, outside a bracket expression.
  RegexAlphaNum,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// `{line, column, kind, text}` (spec §3). Constructed by the tokenizer,
/// consumed by the parser, referenced by error messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
  pub line: u32,
  pub column: u32,
  pub kind: TokenKind,
  pub text: String,
}

impl Token {
  pub fn new(line: u32, column: u32, kind: TokenKind, text: impl Into<String>) -> Self {
    Self { line, column, kind, text: text.into() }
  }

  pub fn eof(line: u32, column: u32) -> Self {
    Self::new(line, column, TokenKind::Eof, "")
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}({:?})", self.kind, self.text)
  }
}
