use std::env;
use std::path::PathBuf;

/// Source files carry this extension (spec §6.1's `run/program.<ext>`).
pub const SOURCE_EXTENSION: &str = "strata";
/// The generated program's entry file, under `out/`.
pub const ENTRY_NAME: &str = "__main__.py";
/// The bundled runtime library's directory name, under `out/`.
pub const LIBDIR_NAME: &str = "builtin";

/// Where to find table/DFA cache files, relative to the process's working
/// directory (spec §4.3/§4.4 Persistence, §6.3).
pub const CACHE_DIR: &str = "binaries";

/// One run's resolved paths (spec §6.1 "CLI / invocation"). Priority, same
/// as the original driver: the `FILE` environment variable (a bare filename
/// under `run/`), then a positional path argument, then the default
/// `run/program.<ext>`.
pub struct RunConfig {
  pub source_path: PathBuf,
  pub out_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl RunConfig {
  pub fn resolve(positional: Option<PathBuf>) -> Self {
    let source_path = if let Ok(file) = env::var("FILE") {
      PathBuf::from("run").join(file)
    } else if let Some(path) = positional {
      path
    } else {
      PathBuf::from("run").join(format!("program.{SOURCE_EXTENSION}"))
    };
    Self { source_path, out_dir: PathBuf::from("out"), cache_dir: PathBuf::from(CACHE_DIR) }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;

  // `FILE` is process-global state; serialize every test that touches it so
  // a parallel run of this module can't observe another test's value.
  static FILE_ENV_LOCK: Mutex<()> = Mutex::new(());

  #[test]
  fn file_env_var_wins_over_a_positional_argument() {
    let _guard = FILE_ENV_LOCK.lock().unwrap();
    env::set_var("FILE", "taxi.strata");
    let config = RunConfig::resolve(Some(PathBuf::from("elsewhere.strata")));
    env::remove_var("FILE");
    assert_eq!(config.source_path, PathBuf::from("run/taxi.strata"));
  }

  #[test]
  fn positional_argument_wins_when_file_env_var_is_unset() {
    let _guard = FILE_ENV_LOCK.lock().unwrap();
    env::remove_var("FILE");
    let config = RunConfig::resolve(Some(PathBuf::from("elsewhere.strata")));
    assert_eq!(config.source_path, PathBuf::from("elsewhere.strata"));
  }

  #[test]
  fn default_path_is_run_program_dot_extension() {
    let _guard = FILE_ENV_LOCK.lock().unwrap();
    env::remove_var("FILE");
    let config = RunConfig::resolve(None);
    assert_eq!(config.source_path, PathBuf::from("run/program.strata"));
  }
}
