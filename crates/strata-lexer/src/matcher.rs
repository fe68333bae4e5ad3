use strata_diagnostics::TokenKind;

/// A `(regex, token-kind)` pair (spec §4.4). Matchers are compiled in
/// declaration order; that order becomes each matcher's tie-break priority
/// when two matchers accept the same longest prefix.
#[derive(Clone, Debug)]
pub struct TokenMatcher {
  pub pattern: &'static str,
  pub kind: TokenKind,
}

impl TokenMatcher {
  pub const fn new(pattern: &'static str, kind: TokenKind) -> Self {
    Self { pattern, kind }
  }
}
