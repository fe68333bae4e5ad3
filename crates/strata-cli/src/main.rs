//! The compiler driver (spec §1's "excluded" command-line entry point; §6.1;
//! §2's pipeline wired end-to-end). Grounded in the teacher's
//! `app/cli/main.rs`: a thin `clap`-derived argument struct, a `fn main`
//! that never panics on user-facing failure, and errors reported to stderr
//! before a non-zero exit rather than a Rust panic unwinding out of `main`.

mod cache;
mod config;
mod grammar;
mod pipeline;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strata_diagnostics::{CompileError, SourceMap};
use strata_lexer::standard_matchers;

use config::{RunConfig, ENTRY_NAME, LIBDIR_NAME};
use pipeline::CompiledOutput;

/// Compiles a source program to its target surface plus a bundled runtime
/// library.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about)]
struct Cli {
  /// Path to the source file. Defaults to the `FILE` environment variable
  /// (a name under `run/`), or `run/program.strata` if neither is given.
  path: Option<PathBuf>,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  let config = RunConfig::resolve(cli.path);

  if !config.source_path.is_file() {
    eprintln!("no such file: {}", config.source_path.display());
    return ExitCode::from(1);
  }

  let source = match fs::read_to_string(&config.source_path) {
    Ok(text) => text,
    Err(err) => {
      eprintln!("failed to read {}: {err}", config.source_path.display());
      return ExitCode::from(1);
    }
  };
  let source_map = SourceMap::new(source.clone());

  let matchers = standard_matchers();
  let tokenizer = match cache::load_or_build_tokenizer(&config.cache_dir.join("tokenizer.bin"), &matchers) {
    Ok(tokenizer) => tokenizer,
    Err(err) => return report(&err, &source_map),
  };

  let (grammar, tables) = match cache::load_or_build_tables(&config.cache_dir.join("tables.bin"), grammar::build_grammar()) {
    Ok(pair) => pair,
    Err(err) => return report(&err, &source_map),
  };

  let compiled = match pipeline::compile(&source, &grammar, &tables, &tokenizer) {
    Ok(compiled) => compiled,
    Err(err) => return report(&err, &source_map),
  };

  match write_output(&config, &compiled) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("failed to write output: {err}");
      ExitCode::from(1)
    }
  }
}

/// One diagnostic, rendered with its source line and caret, to stderr, then
/// exit 1 (spec §6.5).
fn report(err: &CompileError, source_map: &SourceMap) -> ExitCode {
  eprintln!("{}", err.render(source_map));
  ExitCode::from(1)
}

/// Clears and recreates `out/`, writes the rendered entry, and copies the
/// bundled runtime library alongside it verbatim (spec §6.1, §4.8).
fn write_output(config: &RunConfig, compiled: &CompiledOutput) -> std::io::Result<()> {
  if config.out_dir.exists() {
    fs::remove_dir_all(&config.out_dir)?;
  }
  fs::create_dir_all(&config.out_dir)?;
  fs::write(config.out_dir.join(ENTRY_NAME), &compiled.rendered)?;

  let libdir = config.out_dir.join(LIBDIR_NAME);
  fs::create_dir_all(&libdir)?;
  for file in strata_emit::library_files() {
    fs::write(libdir.join(file.relative_path), file.contents)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn write_output_lays_out_entry_file_and_bundled_library() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
      source_path: PathBuf::from("unused.strata"),
      out_dir: dir.path().join("out"),
      cache_dir: dir.path().join("binaries"),
    };
    let compiled = CompiledOutput { rendered: "print('hi')\n".to_string() };

    write_output(&config, &compiled).unwrap();

    assert_eq!(fs::read_to_string(config.out_dir.join(ENTRY_NAME)).unwrap(), "print('hi')\n");
    for file in strata_emit::library_files() {
      assert_eq!(fs::read_to_string(config.out_dir.join(LIBDIR_NAME).join(file.relative_path)).unwrap(), file.contents);
    }
  }

  #[test]
  fn write_output_clears_a_stale_out_dir_first() {
    let dir = tempfile::tempdir().unwrap();
    let config =
      RunConfig { source_path: PathBuf::from("unused.strata"), out_dir: dir.path().join("out"), cache_dir: dir.path().join("binaries") };
    fs::create_dir_all(&config.out_dir).unwrap();
    fs::write(config.out_dir.join("leftover.txt"), "stale").unwrap();

    write_output(&config, &CompiledOutput { rendered: String::new() }).unwrap();

    assert!(!config.out_dir.join("leftover.txt").exists());
  }
}
