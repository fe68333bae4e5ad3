use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_diagnostics::CompileError;
use strata_grammar::{build_lr1_automaton, build_tables, compute_first_sets, Grammar, Tables};
use strata_lexer::{Tokenizer, TokenMatcher};

/// An owned cached artifact plus the textual signature it was built from
/// (spec §4.3/§4.4 Persistence, §6.3): "a persisted table file is
/// accompanied by this signature; mismatch causes regeneration."
#[derive(Deserialize)]
struct Cached<T> {
  signature: String,
  data: T,
}

/// The borrowed counterpart used when writing — avoids cloning `data` just
/// to hand it to `bincode::serialize`.
#[derive(Serialize)]
struct CachedRef<'a, T> {
  signature: &'a str,
  data: &'a T,
}

fn load<T: for<'de> Deserialize<'de>>(path: &Path, signature: &str) -> Option<T> {
  let bytes = fs::read(path).ok()?;
  let cached: Cached<T> = bincode::deserialize(&bytes).ok()?;
  if cached.signature == signature {
    Some(cached.data)
  } else {
    None
  }
}

fn store<T: Serialize>(path: &Path, signature: &str, data: &T) {
  let Ok(bytes) = bincode::serialize(&CachedRef { signature, data }) else { return };
  if let Some(parent) = path.parent() {
    let _ = fs::create_dir_all(parent);
  }
  let _ = fs::write(path, bytes);
}

/// Augments `grammar`, then loads its ACTION/GOTO tables from `cache_path`
/// if the stored signature matches, or builds and persists them otherwise
/// (spec §4.3 Persistence). Returns the augmented grammar alongside the
/// tables, since the driver needs both.
pub fn load_or_build_tables<V: 'static>(
  cache_path: &Path,
  grammar: Grammar<V>,
) -> Result<(Grammar<V>, Tables), CompileError> {
  let augmented = grammar.augment();
  let signature = augmented.signature();

  if let Some(tables) = load::<Tables>(cache_path, &signature) {
    return Ok((augmented, tables));
  }

  let firsts = compute_first_sets(&augmented);
  let automaton = build_lr1_automaton(&augmented, &firsts);
  let tables = build_tables(&augmented, &automaton)?;
  store(cache_path, &signature, &tables);
  Ok((augmented, tables))
}

/// Loads the combined tokenizer DFA from `cache_path` if its signature
/// matches `matchers`, or compiles and persists it otherwise (spec §4.4
/// Persistence). `strata_lexer::signature_of` is cheap — plain string
/// joining — so a cache hit never pays for regex compilation or subset
/// construction.
pub fn load_or_build_tokenizer(cache_path: &Path, matchers: &[TokenMatcher]) -> Result<Tokenizer, CompileError> {
  let signature = strata_lexer::signature_of(matchers);

  if let Some(tokenizer) = load::<Tokenizer>(cache_path, &signature) {
    return Ok(tokenizer);
  }

  let tokenizer = Tokenizer::build(matchers)?;
  store(cache_path, &signature, &tokenizer);
  Ok(tokenizer)
}

#[cfg(test)]
mod tests {
  use strata_grammar::{Grammar, Production, SemanticValue, Symbol};
  use strata_lexer::standard_matchers;

  use super::*;

  fn toy_grammar() -> Grammar<()> {
    Grammar::new(
      vec!["Identifier".to_string()],
      vec!["S".to_string()],
      "S".to_string(),
      vec![Production::new(
        "S",
        vec![Symbol::Terminal("Identifier".to_string())],
        std::rc::Rc::new(|_: Vec<SemanticValue<()>>| ()),
      )],
    )
  }

  #[test]
  fn second_call_hits_the_cache_and_skips_rebuilding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.bin");

    let (_, first) = load_or_build_tables(&path, toy_grammar()).unwrap();
    assert!(path.is_file());

    // a grammar with the same signature, freshly built, must reuse the
    // bytes written above rather than silently miss the cache.
    let (_, second) = load_or_build_tables(&path, toy_grammar()).unwrap();
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
  }

  #[test]
  fn a_changed_grammar_signature_invalidates_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.bin");

    load_or_build_tables(&path, toy_grammar()).unwrap();

    let mut other = toy_grammar();
    other.terminals.push("Integer".to_string());
    other.productions.push(Production::new(
      "S",
      vec![Symbol::Terminal("Integer".to_string())],
      std::rc::Rc::new(|_: Vec<SemanticValue<()>>| ()),
    ));
    let (augmented, _) = load_or_build_tables(&path, other).unwrap();
    assert_eq!(augmented.productions.len(), 3); // two of ours plus the augmenting S' -> S
  }

  #[test]
  fn tokenizer_cache_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokenizer.bin");
    let matchers = standard_matchers();

    let built = load_or_build_tokenizer(&path, &matchers).unwrap();
    let cached = load_or_build_tokenizer(&path, &matchers).unwrap();
    assert_eq!(built.signature(), cached.signature());
  }
}
