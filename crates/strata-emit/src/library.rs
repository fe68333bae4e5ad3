/// One file of the bundled runtime library, relative to the `<libdir>` the
/// driver writes it under (spec §4.8: "a bundle of built-in library files,
/// copied verbatim from a shipped resource directory"). Embedded at compile
/// time with `include_str!` so the crate has no runtime dependency on its
/// own source tree.
pub struct LibraryFile {
  pub relative_path: &'static str,
  pub contents: &'static str,
}

/// The builtin library shipped next to every generated program. The driver
/// copies each entry to `out/<libdir>/<relative_path>` (spec §6.1); this
/// crate never touches a filesystem itself.
pub fn library_files() -> &'static [LibraryFile] {
  &[
    LibraryFile { relative_path: "__init__.py", contents: include_str!("../builtin/__init__.py") },
    LibraryFile { relative_path: "prelude.py", contents: include_str!("../builtin/prelude.py") },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_entry_is_nonempty() {
    for file in library_files() {
      assert!(!file.contents.is_empty(), "{} is empty", file.relative_path);
    }
  }
}
