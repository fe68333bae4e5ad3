//! The emitter (spec §4.8, excluded from the CORE per §1 but still built:
//! "a mechanical tree walk converting AST back into a textual surface").
//! It consumes only the checked `strata_ast::Program` — the checker has
//! already validated everything, so no `Scope`/`Ty` ever reaches this crate
//! — and produces plain text. File I/O (writing `out/<entry>`, copying the
//! library to `out/<libdir>/`) is the driver's job (spec §6.1); this crate
//! hands `strata-cli` a `String` and a list of `(path, contents)` pairs and
//! stays out of `std::fs` entirely.

mod library;
mod render;

pub use library::{library_files, LibraryFile};
pub use render::render;
