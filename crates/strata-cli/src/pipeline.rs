use strata_ast::Program;
use strata_diagnostics::{CompileError, Token};
use strata_grammar::{driver, Grammar, Tables};
use strata_lexer::Tokenizer;
use strata_sema::check_program;

use crate::grammar::{into_program, Sem};

/// What a successful run needs to write to disk (spec §6.1): the rendered
/// program text. The runtime library bundle is static (spec §4.8) and the
/// driver copies it independently — `main.rs` owns the filesystem.
pub struct CompiledOutput {
  pub rendered: String,
}

/// Runs one source file through the whole pipeline (spec §2): tokenize,
/// parse, build the AST via semantic replay, type-check, emit. Fails fast
/// on the first `CompileError`, matching every stage's own policy.
pub fn compile(source: &str, grammar: &Grammar<Sem>, tables: &Tables, tokenizer: &Tokenizer) -> Result<CompiledOutput, CompileError> {
  let tokens: Vec<Token> = tokenizer.tokenize(source)?;
  let trace = driver::parse(grammar, tables, &tokens)?;
  let sem = driver::evaluate(grammar, &trace, &tokens);
  let program: Program = into_program(sem);
  check_program(&program)?;
  let rendered = strata_emit::render(&program);
  Ok(CompiledOutput { rendered })
}

#[cfg(test)]
mod tests {
  use strata_lexer::{standard_matchers, Tokenizer};

  use super::*;
  use crate::grammar::build_grammar;

  fn compiled(source: &str) -> Result<CompiledOutput, CompileError> {
    let tokenizer = Tokenizer::build(&standard_matchers()).unwrap();
    let (grammar, tables) = strata_grammar::compile(build_grammar()).unwrap();
    compile(source, &grammar, &tables, &tokenizer)
  }

  #[test]
  fn a_minimal_program_compiles_to_a_main_function() {
    let output = compiled("fun main(): void {\n  return;\n}\n").unwrap();
    assert!(output.rendered.contains("def main():"));
    assert!(output.rendered.contains("if __name__ == '__main__':"));
  }

  #[test]
  fn an_undeclared_main_is_reported_as_a_program_shape_error() {
    let err = compiled("fun helper(): void {\n  return;\n}\n").unwrap_err();
    assert!(matches!(err, CompileError::ProgramShape { .. }));
  }

  #[test]
  fn a_lex_error_surfaces_before_parsing_even_starts() {
    let err = compiled("fun main(): void {\n  var x = @;\n}\n").unwrap_err();
    assert!(matches!(err, CompileError::Lex { .. }));
  }
}
