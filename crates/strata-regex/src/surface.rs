use std::rc::Rc;

use strata_diagnostics::{Token, TokenKind};
use strata_grammar::{driver, Action, Grammar, Production, SemanticValue, Symbol};

use crate::ast::RegexAst;

/// Errors in the regex *surface* text itself (an unterminated group, a
/// dangling quantifier, a malformed bracket expression...). Matchers are
/// fixed literals declared by the tokenizer's own matcher list rather than
/// arbitrary user input, so a single flat message is enough — there is no
/// reason to recover and keep parsing a broken pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexSyntaxError(pub String);

impl std::fmt::Display for RegexSyntaxError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "invalid regex: {}", self.0)
  }
}

impl std::error::Error for RegexSyntaxError {}

type SResult<T> = Result<T, RegexSyntaxError>;

/// One position in the escape-resolved character stream (spec §6.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unit {
  /// An ordinary character; `escaped` is true if it followed a `\` — an
  /// escaped character is always literal, in every context.
  Ch(char, bool),
  /// One of the two-character shorthands `\d`, `\l`, `\w`.
  Shorthand(Shorthand),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shorthand {
  Digit,
  Letter,
  AlphaNum,
}

impl Shorthand {
  /// The literal character a shorthand degrades to when it appears inside a
  /// character class, where `\d \l \w` are not part of the grammar (the
  /// bracket productions `G F V K` never mention them) — mirrors the
  /// original's `_unescape_tokens`, which strips the backslash and keeps the
  /// bare letter.
  fn literal(self) -> char {
    match self {
      Shorthand::Digit => 'd',
      Shorthand::Letter => 'l',
      Shorthand::AlphaNum => 'w',
    }
  }
}

/// `\\` escapes the next character; everything else passes through
/// unescaped except the two-character shorthands (spec §6.2).
fn tokenize(pattern: &str) -> Vec<Unit> {
  let chars: Vec<char> = pattern.chars().collect();
  let mut units = Vec::with_capacity(chars.len());
  let mut i = 0;
  while i < chars.len() {
    if chars[i] == '\\' && i + 1 < chars.len() {
      units.push(match chars[i + 1] {
        'd' => Unit::Shorthand(Shorthand::Digit),
        'l' => Unit::Shorthand(Shorthand::Letter),
        'w' => Unit::Shorthand(Shorthand::AlphaNum),
        other => Unit::Ch(other, true),
      });
      i += 2;
    } else {
      units.push(Unit::Ch(chars[i], false));
      i += 1;
    }
  }
  units
}

/// Maps the escape-resolved `Unit` stream to `(TokenKind, text)` pairs,
/// tracking whether we're inside a `[...]` bracket expression — mirrors the
/// original's `_map_to_regex`: outside a class, `| * + ? ( ) [ ]` are
/// metacharacters and `^`/`-` are never special; inside a class, only
/// `^`/`-`/`]` keep their meaning and `\d \l \w` degrade to their bare
/// letter (spec §6.2).
fn map_to_tokens(units: &[Unit]) -> Vec<(TokenKind, String)> {
  let mut out = Vec::with_capacity(units.len());
  let mut in_class = false;
  for unit in units {
    match *unit {
      Unit::Ch(c, true) => out.push((TokenKind::RegexSymbol, c.to_string())),
      Unit::Shorthand(s) if in_class => out.push((TokenKind::RegexSymbol, s.literal().to_string())),
      Unit::Shorthand(s) => {
        let kind = match s {
          Shorthand::Digit => TokenKind::RegexDigit,
          Shorthand::Letter => TokenKind::RegexLetter,
          Shorthand::AlphaNum => TokenKind::RegexAlphaNum,
        };
        out.push((kind, format!("\\{}", s.literal())));
      }
      Unit::Ch(c, false) if in_class => match c {
        '^' => out.push((TokenKind::RegexCaret, c.to_string())),
        '-' => out.push((TokenKind::Minus, c.to_string())),
        ']' => {
          in_class = false;
          out.push((TokenKind::CloseBracket, c.to_string()));
        }
        _ => out.push((TokenKind::RegexSymbol, c.to_string())),
      },
      Unit::Ch(c, false) => match c {
        '|' => out.push((TokenKind::RegexPipe, c.to_string())),
        '*' => out.push((TokenKind::Star, c.to_string())),
        '+' => out.push((TokenKind::Plus, c.to_string())),
        '?' => out.push((TokenKind::RegexQuestion, c.to_string())),
        '(' => out.push((TokenKind::OpenParen, c.to_string())),
        ')' => out.push((TokenKind::CloseParen, c.to_string())),
        '[' => {
          in_class = true;
          out.push((TokenKind::OpenBracket, c.to_string()));
        }
        ']' => out.push((TokenKind::CloseBracket, c.to_string())),
        _ => out.push((TokenKind::RegexSymbol, c.to_string())),
      },
    }
  }
  out
}

/// The semantic value every reduction in the regex grammar produces. Two
/// shapes are needed because the bracket sub-grammar (`G F V K`) accumulates
/// a flat character list while everything above it (`E A S B`) builds
/// `RegexAst` nodes directly — `Grammar<V>` is single-typed, so both shapes
/// share one enum, the same way `strata-cli`'s own language grammar carries
/// its `Sem` type.
#[derive(Clone, Debug)]
enum RegexSem {
  Node(RegexAst),
  Chars(Vec<char>),
}

impl RegexSem {
  fn into_node(self) -> RegexAst {
    match self {
      RegexSem::Node(n) => n,
      other => panic!("grammar action expected Node, found {other:?}"),
    }
  }

  fn into_chars(self) -> Vec<char> {
    match self {
      RegexSem::Chars(c) => c,
      other => panic!("grammar action expected Chars, found {other:?}"),
    }
  }
}

fn term(name: &str) -> Symbol {
  Symbol::Terminal(name.to_string())
}

fn nonterm(name: &str) -> Symbol {
  Symbol::NonTerminal(name.to_string())
}

fn tok(it: &mut std::vec::IntoIter<SemanticValue<RegexSem>>) -> Token {
  it.next().expect("production arity mismatch").token()
}

fn val(it: &mut std::vec::IntoIter<SemanticValue<RegexSem>>) -> RegexSem {
  it.next().expect("production arity mismatch").value()
}

/// Builds the regex surface grammar: `E -> E '|' A | A`, `A -> A S | S`,
/// `S -> B ('*'|'+'|'?')?`, `B -> sym | '(' E ')' | '[' G ']' | \d | \l |
/// \w`, `G -> '^' F | F`, `F -> F V | V`, `V -> V '-' K | K`, `K -> sym` —
/// the same `E A S B G F V K` shape the original's own `RegGrammar` uses,
/// compiled by the same LR(1) machinery that drives the language parser
/// (spec §4.2: "the regex grammar is itself compiled with the same tool it
/// supports").
fn build_grammar() -> Grammar<RegexSem> {
  let mut productions: Vec<Production<RegexSem>> = Vec::new();

  macro_rules! prod {
    ($left:expr, [$($sym:expr),* $(,)?], $action:expr) => {
      productions.push(Production::new($left, vec![$($sym),*], Rc::new($action) as Action<RegexSem>));
    };
  }

  prod!("E", [nonterm("E"), term("RegexPipe"), nonterm("A")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let left = val(&mut it).into_node();
    it.next();
    let right = val(&mut it).into_node();
    RegexSem::Node(RegexAst::Union(Box::new(left), Box::new(right)))
  });
  prod!("E", [nonterm("A")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("A", [nonterm("A"), nonterm("S")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let left = val(&mut it).into_node();
    let right = val(&mut it).into_node();
    RegexSem::Node(RegexAst::Concat(Box::new(left), Box::new(right)))
  });
  prod!("A", [nonterm("S")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("S", [nonterm("B"), term("Star")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let base = val(&mut it).into_node();
    RegexSem::Node(RegexAst::Star(Box::new(base)))
  });
  prod!("S", [nonterm("B"), term("Plus")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let base = val(&mut it).into_node();
    RegexSem::Node(RegexAst::Plus(Box::new(base)))
  });
  prod!("S", [nonterm("B"), term("RegexQuestion")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let base = val(&mut it).into_node();
    RegexSem::Node(RegexAst::Maybe(Box::new(base)))
  });
  prod!("S", [nonterm("B")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("B", [term("RegexSymbol")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let t = tok(&mut it);
    RegexSem::Node(RegexAst::Symbol(t.text.chars().next().expect("RegexSymbol token always carries one char")))
  });
  prod!("B", [term("OpenParen"), nonterm("E"), term("CloseParen")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    it.next();
    let inner = val(&mut it).into_node();
    RegexSem::Node(inner)
  });
  prod!("B", [term("OpenBracket"), nonterm("G"), term("CloseBracket")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    it.next();
    let inner = val(&mut it).into_node();
    RegexSem::Node(inner)
  });
  prod!("B", [term("RegexDigit")], |_: Vec<SemanticValue<RegexSem>>| RegexSem::Node(RegexAst::Digit));
  prod!("B", [term("RegexLetter")], |_: Vec<SemanticValue<RegexSem>>| RegexSem::Node(RegexAst::Letter));
  prod!("B", [term("RegexAlphaNum")], |_: Vec<SemanticValue<RegexSem>>| RegexSem::Node(RegexAst::AlphaNum));

  prod!("G", [term("RegexCaret"), nonterm("F")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    it.next();
    let chars = val(&mut it).into_chars();
    RegexSem::Node(RegexAst::NegCharClass(chars))
  });
  prod!("G", [nonterm("F")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let chars = val(&mut it).into_chars();
    RegexSem::Node(RegexAst::CharClass(chars))
  });

  prod!("F", [nonterm("F"), nonterm("V")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let mut left = val(&mut it).into_chars();
    let right = val(&mut it).into_chars();
    left.extend(right);
    RegexSem::Chars(left)
  });
  prod!("F", [nonterm("V")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("V", [nonterm("V"), term("Minus"), nonterm("K")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let mut left = val(&mut it).into_chars();
    it.next();
    let right = val(&mut it).into_chars();
    let lo = *left.last().expect("V always carries at least one char");
    let hi = right[0];
    left.pop();
    left.extend((lo.min(hi)..=lo.max(hi)).collect::<Vec<_>>());
    RegexSem::Chars(left)
  });
  prod!("V", [nonterm("K")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("K", [term("RegexSymbol")], |c: Vec<SemanticValue<RegexSem>>| {
    let mut it = c.into_iter();
    let t = tok(&mut it);
    RegexSem::Chars(vec![t.text.chars().next().expect("RegexSymbol token always carries one char")])
  });

  let terminals = [
    "RegexSymbol",
    "RegexPipe",
    "Star",
    "OpenParen",
    "CloseParen",
    "RegexQuestion",
    "RegexDigit",
    "RegexLetter",
    "RegexAlphaNum",
    "Plus",
    "OpenBracket",
    "CloseBracket",
    "Minus",
    "RegexCaret",
    "Eof",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect();

  let non_terminals = ["E", "A", "S", "B", "G", "F", "V", "K"].iter().map(|s| s.to_string()).collect();

  Grammar::new(terminals, non_terminals, "E".to_string(), productions)
}

pub fn parse(pattern: &str) -> SResult<RegexAst> {
  let units = tokenize(pattern);
  if units.is_empty() {
    return Ok(RegexAst::Epsilon);
  }

  let mapped = map_to_tokens(&units);
  let mut tokens: Vec<Token> = mapped
    .into_iter()
    .enumerate()
    .map(|(i, (kind, text))| Token::new(1, i as u32 + 1, kind, text))
    .collect();
  tokens.push(Token::eof(1, tokens.len() as u32 + 1));

  let (grammar, tables) =
    strata_grammar::compile(build_grammar()).expect("the regex surface grammar is fixed and must never contain an LR(1) conflict");

  let trace = driver::parse(&grammar, &tables, &tokens)
    .map_err(|err| RegexSyntaxError(format!("invalid regex syntax: {}", err.message())))?;

  Ok(driver::evaluate(&grammar, &trace, &tokens).into_node())
}
