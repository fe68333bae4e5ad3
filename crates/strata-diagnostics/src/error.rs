use std::fmt;

use crate::{SourceMap, Token};

pub type CompileResult<T> = Result<T, CompileError>;

/// The kinds of §7: lex, parse, grammar-build, name, type, class,
/// control-flow, program-shape. Each fails fast — there is no recovery and
/// no accumulation, matching the driver's "fail fast with a structured
/// error" policy.
#[derive(Clone, Debug)]
pub enum CompileError {
  /// Unexpected character at line/col (§4.4, §7).
  Lex { line: u32, column: u32, found: char },
  /// Unexpected token, carrying the token and its index in the stream (§4.3
  /// Failure, §7).
  Parse { token: Token, index: usize },
  /// Shift-reduce or reduce-reduce conflict, fatal at table-build time
  /// (§4.3 ACTION/GOTO tables).
  GrammarBuild { message: String },
  /// Undeclared or duplicate identifier (§4.5, §4.7).
  Name { message: String, token: Token },
  /// Assignment/operator/call/return/condition/iteration/index mismatch
  /// (§4.7).
  Type { message: String, token: Token },
  /// Missing `super.init`, invalid override, attribute outside `init`
  /// (§4.7).
  Class { message: String, token: Token },
  /// `break`/`continue` outside a loop, missing return path (§4.7).
  ControlFlow { message: String, token: Token },
  /// Missing or ill-typed `main` (§4.7 step 5).
  ProgramShape { message: String },
}

impl CompileError {
  /// The token this error is anchored to, when it has one, for caret
  /// rendering (§6.5).
  pub fn token(&self) -> Option<&Token> {
    match self {
      CompileError::Parse { token, .. }
      | CompileError::Name { token, .. }
      | CompileError::Type { token, .. }
      | CompileError::Class { token, .. }
      | CompileError::ControlFlow { token, .. } => Some(token),
      CompileError::Lex { .. } | CompileError::GrammarBuild { .. } | CompileError::ProgramShape { .. } => None,
    }
  }

  /// One-line message, no source context. `render` below adds the blamed
  /// source line and caret.
  pub fn message(&self) -> String {
    match self {
      CompileError::Lex { line, column, found } => {
        format!("unexpected character '{found}' at line {line} column {column}")
      }
      CompileError::Parse { token, index } => {
        format!("unexpected token {token} at position {index}")
      }
      CompileError::GrammarBuild { message } => message.clone(),
      CompileError::Name { message, .. } => message.clone(),
      CompileError::Type { message, .. } => message.clone(),
      CompileError::Class { message, .. } => message.clone(),
      CompileError::ControlFlow { message, .. } => message.clone(),
      CompileError::ProgramShape { message } => message.clone(),
    }
  }

  /// Full diagnostic per §6.5: message, the offending source line, and a
  /// caret underlining the token's text.
  pub fn render(&self, source: &SourceMap) -> String {
    match self.token() {
      Some(tok) => {
        let line_text = source.line(tok.line);
        let caret_offset = tok.column.saturating_sub(1) as usize;
        let caret_len = tok.text.chars().count().max(1);
        let caret = format!("{}{}", " ".repeat(caret_offset), "^".repeat(caret_len));
        format!("{}\n{}\n{}", self.message(), line_text, caret)
      }
      None => self.message(),
    }
  }
}

impl fmt::Display for CompileError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message())
  }
}

impl std::error::Error for CompileError {}
