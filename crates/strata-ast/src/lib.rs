//! The AST (spec §3 "AST"): closed tagged variants for expressions,
//! statements, declarations, and types, each walked by exhaustive `match`
//! rather than an open visitor trait (§9 redesign note).

mod expr;
mod stmt;
mod top;
mod types;

pub use expr::{Expr, Literal};
pub use stmt::{Statement, Stmt};
pub use top::{Class, Function, Program, TopLevel};
pub use types::VarType;
