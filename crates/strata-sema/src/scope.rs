use std::collections::HashMap;

use crate::types::Ty;

/// A lexically nested symbol table (spec §3 "Scope", §4.5): declare / get /
/// assign against a borrowed parent chain. Each block the checker enters
/// (`if`/`while`/`for`/`switch` arm/function body) gets its own `Scope`
/// borrowing whichever scope was active at that point; it is dropped when
/// the block's check returns, exactly mirroring the original's "push a
/// child scope, check the block, pop it" discipline (`checker.py`'s
/// `check_block`) without needing a mutable "current scope" field.
#[derive(Debug)]
pub struct Scope<'p> {
  variables: HashMap<String, Ty>,
  parent: Option<&'p Scope<'p>>,
}

impl Scope<'static> {
  /// The outermost scope — builtins and top-level function/class names live
  /// here (the original's `self.globals`).
  pub fn root() -> Self {
    Scope { variables: HashMap::new(), parent: None }
  }
}

impl<'p> Scope<'p> {
  pub fn child(parent: &'p Scope<'p>) -> Self {
    Scope { variables: HashMap::new(), parent: Some(parent) }
  }

  /// `Err` if `name` is already declared in *this* scope — shadowing an
  /// outer scope's variable is fine, redeclaring in the same one is not
  /// (matches `Scope.declare`'s `raise Exception` on repeat).
  pub fn declare(&mut self, name: &str, ty: Ty) -> Result<(), ()> {
    if self.variables.contains_key(name) {
      return Err(());
    }
    self.variables.insert(name.to_string(), ty);
    Ok(())
  }

  /// Walks this scope, then its parent chain.
  pub fn get(&self, name: &str) -> Option<&Ty> {
    self.variables.get(name).or_else(|| self.parent.and_then(|p| p.get(name)))
  }

  /// True if `name` is declared somewhere along the chain (`Scope.exists`).
  pub fn exists(&self, name: &str) -> bool {
    self.variables.contains_key(name) || self.parent.is_some_and(|p| p.exists(name))
  }

  /// Rebinds `name` in whichever scope already declared it. Only ever
  /// reaches the innermost scope here, since a borrowed parent can't be
  /// mutated through `&self` — the checker never calls this (type-checking
  /// an `Assignment` only compares types, it never rewrites the symbol
  /// table), so the limitation is never exercised in practice, matching the
  /// original's own `Scope.assign` method, which the type checker likewise
  /// never calls.
  pub fn assign(&mut self, name: &str, ty: Ty) -> bool {
    if self.variables.contains_key(name) {
      self.variables.insert(name.to_string(), ty);
      true
    } else {
      false
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_walks_the_parent_chain() {
    let mut root = Scope::root();
    root.declare("x", Ty::Int).unwrap();
    let mut child = Scope::child(&root);
    child.declare("y", Ty::Bool).unwrap();
    assert_eq!(child.get("x"), Some(&Ty::Int));
    assert_eq!(child.get("y"), Some(&Ty::Bool));
    assert_eq!(root.get("y"), None);
  }

  #[test]
  fn redeclaring_in_the_same_scope_is_rejected() {
    let mut scope = Scope::root();
    scope.declare("x", Ty::Int).unwrap();
    assert!(scope.declare("x", Ty::Float).is_err());
  }

  #[test]
  fn shadowing_an_outer_declaration_is_allowed() {
    let mut root = Scope::root();
    root.declare("x", Ty::Int).unwrap();
    let mut child = Scope::child(&root);
    assert!(child.declare("x", Ty::Float).is_ok());
    assert_eq!(child.get("x"), Some(&Ty::Float));
    assert_eq!(root.get("x"), Some(&Ty::Int));
  }

  #[test]
  fn exists_also_walks_the_chain() {
    let mut root = Scope::root();
    root.declare("x", Ty::Int).unwrap();
    let child = Scope::child(&root);
    assert!(child.exists("x"));
    assert!(!child.exists("y"));
  }
}
