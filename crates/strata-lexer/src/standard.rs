use strata_diagnostics::TokenKind;

use crate::matcher::TokenMatcher;

/// The matcher list for this language's concrete surface syntax, in
/// declaration order. Keywords are declared before `Identifier` so that a
/// keyword spelling wins the longest-match tie against the identifier
/// pattern it's also a valid instance of (spec §4.4, §8 scenario S6).
pub fn standard_matchers() -> Vec<TokenMatcher> {
  vec![
    TokenMatcher::new("var", TokenKind::Var),
    TokenMatcher::new("attr", TokenKind::Attr),
    TokenMatcher::new("class", TokenKind::Class),
    TokenMatcher::new("fun", TokenKind::Fun),
    TokenMatcher::new("while", TokenKind::While),
    TokenMatcher::new("if", TokenKind::If),
    TokenMatcher::new("else", TokenKind::Else),
    TokenMatcher::new("for", TokenKind::For),
    TokenMatcher::new("in", TokenKind::In),
    TokenMatcher::new("null", TokenKind::Null),
    TokenMatcher::new("true", TokenKind::True),
    TokenMatcher::new("false", TokenKind::False),
    TokenMatcher::new("return", TokenKind::Return),
    TokenMatcher::new("and", TokenKind::And),
    TokenMatcher::new("or", TokenKind::Or),
    TokenMatcher::new("self", TokenKind::SelfKw),
    TokenMatcher::new("super", TokenKind::Super),
    TokenMatcher::new("switch", TokenKind::Switch),
    TokenMatcher::new("case", TokenKind::Case),
    TokenMatcher::new("default", TokenKind::Default),
    TokenMatcher::new("break", TokenKind::Break),
    TokenMatcher::new("continue", TokenKind::Continue),
    TokenMatcher::new("list", TokenKind::List),
    TokenMatcher::new("dict", TokenKind::Dict),
    TokenMatcher::new("void", TokenKind::Void),
    // two-char operators before the single-char prefixes they share, so a
    // tie (never actually possible here since the lengths differ) would
    // still resolve the obvious way.
    TokenMatcher::new(">=", TokenKind::GreaterEqual),
    TokenMatcher::new("<=", TokenKind::LessEqual),
    TokenMatcher::new("==", TokenKind::EqualEqual),
    TokenMatcher::new("!=", TokenKind::BangEqual),
    TokenMatcher::new("\\(", TokenKind::OpenParen),
    TokenMatcher::new("\\)", TokenKind::CloseParen),
    TokenMatcher::new("{", TokenKind::OpenBrace),
    TokenMatcher::new("}", TokenKind::CloseBrace),
    TokenMatcher::new("\\[", TokenKind::OpenBracket),
    TokenMatcher::new("\\]", TokenKind::CloseBracket),
    TokenMatcher::new(",", TokenKind::Comma),
    TokenMatcher::new(".", TokenKind::Dot),
    TokenMatcher::new(";", TokenKind::Semicolon),
    TokenMatcher::new(":", TokenKind::Colon),
    TokenMatcher::new("\\+", TokenKind::Plus),
    TokenMatcher::new("-", TokenKind::Minus),
    TokenMatcher::new("\\*", TokenKind::Star),
    TokenMatcher::new("/", TokenKind::Slash),
    TokenMatcher::new("%", TokenKind::Percent),
    TokenMatcher::new("!", TokenKind::Bang),
    TokenMatcher::new(">", TokenKind::Greater),
    TokenMatcher::new("<", TokenKind::Less),
    TokenMatcher::new("=", TokenKind::Equal),
    TokenMatcher::new("\\d+.\\d+", TokenKind::Float),
    TokenMatcher::new("\\d+", TokenKind::Integer),
    TokenMatcher::new("\"[^\"]*\"", TokenKind::String),
    TokenMatcher::new("[a-zA-Z_][a-zA-Z0-9_]*", TokenKind::Identifier),
    TokenMatcher::new("//[^\n]*", TokenKind::Comment),
    TokenMatcher::new("\n", TokenKind::Newline),
    TokenMatcher::new(" ", TokenKind::Whitespace),
    TokenMatcher::new("\t", TokenKind::Whitespace),
  ]
}
