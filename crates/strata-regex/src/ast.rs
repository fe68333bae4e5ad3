use strata_automata::{Nfa, Tag};

/// The regex AST (spec §3 "Regex AST"). Each variant evaluates to an NFA by
/// Thompson construction (§4.2). `Range` only ever appears nested inside a
/// `CharClass`/`NegCharClass` member list — it is never produced, nor
/// expected, as a top-level node by the surface parser (spec invariant:
/// "a Range(a,b) is only reachable inside a char class context").
#[derive(Clone, Debug, PartialEq)]
pub enum RegexAst {
  Epsilon,
  Symbol(char),
  Letter,
  Digit,
  AlphaNum,
  Maybe(Box<RegexAst>),
  Star(Box<RegexAst>),
  Plus(Box<RegexAst>),
  Union(Box<RegexAst>, Box<RegexAst>),
  Concat(Box<RegexAst>, Box<RegexAst>),
  CharClass(Vec<char>),
  NegCharClass(Vec<char>),
  Range(char, char),
}

/// All printable ASCII characters, used to evaluate `NegCharClass` (spec
/// §4.2: "the union of all printable characters not in S").
fn printable_ascii() -> impl Iterator<Item = char> {
  (0x20u8..=0x7eu8).map(char::from)
}

fn ascii_letters() -> impl Iterator<Item = char> {
  ('a'..='z').chain('A'..='Z')
}

fn ascii_digits() -> impl Iterator<Item = char> {
  '0'..='9'
}

impl RegexAst {
  pub fn evaluate<K: Clone + Eq>(&self) -> Nfa<K> {
    match self {
      RegexAst::Epsilon => Nfa::epsilon(),
      RegexAst::Symbol(c) => Nfa::single(*c, Vec::new()),
      RegexAst::Letter => Nfa::union_many(&ascii_letters().map(|c| Nfa::single(c, Vec::<Tag<K>>::new())).collect::<Vec<_>>()),
      RegexAst::Digit => Nfa::union_many(&ascii_digits().map(|c| Nfa::single(c, Vec::<Tag<K>>::new())).collect::<Vec<_>>()),
      RegexAst::AlphaNum => Nfa::union_many(
        &ascii_letters().chain(ascii_digits()).map(|c| Nfa::single(c, Vec::<Tag<K>>::new())).collect::<Vec<_>>(),
      ),
      RegexAst::Maybe(x) => x.evaluate().union(&Nfa::epsilon()),
      RegexAst::Star(x) => x.evaluate().star(),
      RegexAst::Plus(x) => {
        let inner = x.evaluate();
        inner.concat(&inner.star())
      }
      RegexAst::Union(l, r) => l.evaluate().union(&r.evaluate()),
      RegexAst::Concat(l, r) => l.evaluate().concat(&r.evaluate()),
      RegexAst::CharClass(chars) => {
        Nfa::union_many(&chars.iter().map(|&c| Nfa::single(c, Vec::<Tag<K>>::new())).collect::<Vec<_>>())
      }
      RegexAst::NegCharClass(chars) => Nfa::union_many(
        &printable_ascii().filter(|c| !chars.contains(c)).map(|c| Nfa::single(c, Vec::<Tag<K>>::new())).collect::<Vec<_>>(),
      ),
      RegexAst::Range(lo, hi) => {
        Nfa::union_many(&(*lo..=*hi).map(|c| Nfa::single(c, Vec::<Tag<K>>::new())).collect::<Vec<_>>())
      }
    }
  }
}
