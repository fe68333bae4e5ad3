/// A tag on a DFA final state: the token kind plus a priority index (the
/// matcher's position in its declaration list), used to resolve longest-match
/// ties (spec GLOSSARY "Tag", §4.1 `tag_of`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag<K> {
  pub kind: K,
  pub priority: u32,
}

impl<K> Tag<K> {
  pub fn new(kind: K, priority: u32) -> Self {
    Self { kind, priority }
  }
}
