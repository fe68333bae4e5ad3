use strata_diagnostics::Token;

/// `T`, `list<T>`, or `dict<K,V>` (spec §3 "AST", `VarType`). A recursive
/// node: `nested`/`second_nested` hold owned sub-type handles rather than
/// back-pointers, per the §9 redesign note for recursive type records.
#[derive(Clone, Debug, PartialEq)]
pub struct VarType {
  pub name: Token,
  pub nested: Option<Box<VarType>>,
  pub second_nested: Option<Box<VarType>>,
}

impl VarType {
  /// A bare name with no type parameters, e.g. `int` or a class name.
  pub fn simple(name: Token) -> Self {
    Self { name, nested: None, second_nested: None }
  }

  /// `list<T>`.
  pub fn list(name: Token, element: VarType) -> Self {
    Self { name, nested: Some(Box::new(element)), second_nested: None }
  }

  /// `dict<K,V>`.
  pub fn dict(name: Token, key: VarType, value: VarType) -> Self {
    Self { name, nested: Some(Box::new(key)), second_nested: Some(Box::new(value)) }
  }
}
