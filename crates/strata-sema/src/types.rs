use std::fmt;
use std::rc::Rc;

/// Index into a `ClassArena` (spec §9 redesign note: classes live in an
/// arena addressed by stable index, `superclass` is `Option<ClassId>` rather
/// than a back-pointer, so the type graph can't form an un-droppable cycle).
pub type ClassId = usize;

/// One user `class` declaration: its name, optional superclass, and member
/// table (methods plus, once `init` has run, declared attributes) — the
/// structural analogue of `builtin/classes.py`'s `Class` metaclass, minus
/// the Python object-identity plumbing.
#[derive(Clone, Debug)]
pub struct ClassDef {
  pub name: String,
  pub superclass: Option<ClassId>,
  /// A `BTreeMap` rather than a `HashMap` so inheritance checks that iterate
  /// every member walk them in a stable order — otherwise which of two
  /// simultaneously-broken overrides gets reported first would depend on
  /// hash iteration order.
  pub members: std::collections::BTreeMap<String, Ty>,
}

#[derive(Clone, Debug, Default)]
pub struct ClassArena {
  classes: Vec<ClassDef>,
}

impl ClassArena {
  pub fn new() -> Self {
    Self { classes: Vec::new() }
  }

  pub fn push(&mut self, def: ClassDef) -> ClassId {
    self.classes.push(def);
    self.classes.len() - 1
  }

  pub fn get(&self, id: ClassId) -> &ClassDef {
    &self.classes[id]
  }

  pub fn get_mut(&mut self, id: ClassId) -> &mut ClassDef {
    &mut self.classes[id]
  }

  pub fn find_by_name(&self, name: &str) -> Option<ClassId> {
    self.classes.iter().position(|c| c.name == name)
  }

  /// `sub` is `sup`, or descends from it through the `superclass` chain
  /// (`builtin/classes.py`'s `__new__` chains `scope.father` the same way).
  pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
    let mut cur = Some(sub);
    while let Some(id) = cur {
      if id == sup {
        return true;
      }
      cur = self.get(id).superclass;
    }
    false
  }

  /// Looks up `name` in `id`'s own members, then its ancestor chain —
  /// `Class`'s member scope parent-chains to its superclass's scope
  /// (`classes.py`: `scope.father = super_class.scope`).
  pub fn member(&self, id: ClassId, name: &str) -> Option<&Ty> {
    let mut cur = Some(id);
    while let Some(cid) = cur {
      let def = self.get(cid);
      if let Some(ty) = def.members.get(name) {
        return Some(ty);
      }
      cur = def.superclass;
    }
    None
  }
}

/// One function or method signature. Shared (`Rc`) because the same
/// signature is read from both a `Scope` entry and, for methods, a
/// `ClassDef`'s member table.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSig {
  pub name: String,
  pub params: Vec<Ty>,
  pub return_type: Ty,
}

/// The structural type system of spec §4.6. Atomic types, parametric
/// `List`/`Dict`, function signatures, user classes (by arena index), and
/// the `MetaType` sentinel consumed only by `Call` argument matching (C.7).
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
  Object,
  Int,
  Float,
  Bool,
  String,
  Null,
  /// The element/key/value type of an empty `[]` or `{}` literal — the
  /// Rust stand-in for the original's `None` list_type/key_type sentinel
  /// (`builtin/_types.py`'s `TypeList(None)`). Never spelled by a `VarType`;
  /// only produced by `common_type` over zero expressions.
  Bottom,
  List(Box<Ty>),
  Dict(Box<Ty>, Box<Ty>),
  /// The bare, unparametrized `list` type — every `List(_)` is a subtype of
  /// it regardless of element type (`builtin.py`'s `len` takes this, not a
  /// `TypeList` instance: a parametrized list is a structural subclass of
  /// the plain `List` builtin class, so `len` accepts any of them).
  AnyList,
  Function(Rc<FunctionSig>),
  Class(ClassId),
  /// `Type`, the sentinel spec C.7 adds: a parameter declared with this
  /// type also accepts a `Function`-typed argument (used by `isinstance`'s
  /// second parameter).
  MetaType,
}

impl Ty {
  pub fn display(&self, classes: &ClassArena) -> String {
    match self {
      Ty::Object => "object".to_string(),
      Ty::Int => "int".to_string(),
      Ty::Float => "float".to_string(),
      Ty::Bool => "bool".to_string(),
      Ty::String => "string".to_string(),
      Ty::Null => "null".to_string(),
      Ty::Bottom => "<empty>".to_string(),
      Ty::List(elem) => format!("list<{}>", elem.display(classes)),
      Ty::Dict(k, v) => format!("dict<{}, {}>", k.display(classes), v.display(classes)),
      Ty::AnyList => "list".to_string(),
      Ty::Function(sig) => format!("fun {}", sig.name),
      Ty::Class(id) => classes.get(*id).name.clone(),
      Ty::MetaType => "type".to_string(),
    }
  }
}

impl fmt::Display for Ty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Ty::Object => write!(f, "object"),
      Ty::Int => write!(f, "int"),
      Ty::Float => write!(f, "float"),
      Ty::Bool => write!(f, "bool"),
      Ty::String => write!(f, "string"),
      Ty::Null => write!(f, "null"),
      Ty::Bottom => write!(f, "<empty>"),
      Ty::List(elem) => write!(f, "list<{elem}>"),
      Ty::Dict(k, v) => write!(f, "dict<{k}, {v}>"),
      Ty::AnyList => write!(f, "list"),
      Ty::Function(sig) => write!(f, "fun {}", sig.name),
      Ty::Class(id) => write!(f, "class#{id}"),
      Ty::MetaType => write!(f, "type"),
    }
  }
}

/// `issubclass(sub, sup)` (`checker.py`'s `can_assign` fallback). `Object`
/// is the universal top; `int <: float <: object`; user classes follow
/// their arena ancestor chain.
pub fn is_subtype(sub: &Ty, sup: &Ty, classes: &ClassArena) -> bool {
  if sub == sup {
    return true;
  }
  match (sub, sup) {
    (_, Ty::Object) => true,
    (Ty::Int, Ty::Float) => true,
    (Ty::List(_), Ty::AnyList) => true,
    (Ty::Class(a), Ty::Class(b)) => classes.is_subclass(*a, *b),
    _ => false,
  }
}

/// `TypeChecker.can_assign(type1, type2)`: can a value of type `from` be
/// assigned where `to` is expected. `Function` values are never assignable,
/// anywhere, including to themselves; `null` is assignable only to a user
/// class, never to an atomic type; `List`/`Dict` recurse structurally, with
/// `Bottom` (an empty-literal's unconstrained element type) assignable into
/// anything and nothing assignable into it.
pub fn can_assign(from: &Ty, to: &Ty, classes: &ClassArena) -> bool {
  if matches!(from, Ty::Function(_)) || matches!(to, Ty::Function(_)) {
    return false;
  }
  match (from, to) {
    (Ty::List(a), Ty::List(b)) => {
      if **a == Ty::Bottom {
        true
      } else if **b == Ty::Bottom {
        false
      } else {
        can_assign(a, b, classes)
      }
    }
    (Ty::Dict(ak, av), Ty::Dict(bk, bv)) => {
      if **ak == Ty::Bottom {
        true
      } else if **bk == Ty::Bottom {
        false
      } else {
        can_assign(ak, bk, classes) && can_assign(av, bv, classes)
      }
    }
    (Ty::Null, Ty::Class(_)) => true,
    _ => is_subtype(from, to, classes),
  }
}

/// `TypeChecker.can_infer(type)`: whether a `var` declaration with no
/// explicit annotation may adopt this inferred type. `Bottom` (an untyped
/// empty literal) and `Null` are rejected; `List`/`Dict` recurse.
pub fn can_infer(ty: &Ty) -> bool {
  match ty {
    Ty::Bottom | Ty::Null => false,
    Ty::List(elem) => can_infer(elem),
    Ty::Dict(k, v) => can_infer(k) && can_infer(v),
    _ => true,
  }
}

/// The immediate supertype used while climbing for a common ancestor
/// (`common_type`'s `elem = elem.__base__`). Collapses the original's extra
/// `TypeList -> List -> Object` hop into one, and gives a stray `Function`
/// value `Object` as a safe landing spot instead of reproducing the
/// original's crash on `Function.__base__` (no function value can legally
/// appear in an array/dict literal via this grammar, so the path is
/// unreachable in practice either way).
fn immediate_base(ty: &Ty, classes: &ClassArena) -> Ty {
  match ty {
    Ty::Int => Ty::Float,
    Ty::Class(id) => classes.get(*id).superclass.map(Ty::Class).unwrap_or(Ty::Object),
    _ => Ty::Object,
  }
}

/// `TypeChecker.common_type`: the least upper bound of a list of expression
/// types, used by array/dict literals to infer one element type. Empty
/// input yields `Bottom`. Otherwise folds left, widening the running type
/// whenever the next element doesn't already fit, climbing the loser's
/// supertype chain until the two sides finally agree.
pub fn common_type(types: &[Ty], classes: &ClassArena) -> Ty {
  let mut iter = types.iter();
  let Some(first) = iter.next() else {
    return Ty::Bottom;
  };
  let mut current = first.clone();
  for next in iter {
    let mut elem = next.clone();
    if can_assign(&elem, &current, classes) {
      continue;
    }
    if can_assign(&current, &elem, classes) {
      current = elem;
      continue;
    }
    loop {
      if elem == Ty::Object || can_assign(&current, &elem, classes) {
        break;
      }
      elem = immediate_base(&elem, classes);
    }
    current = elem;
  }
  current
}

#[cfg(test)]
mod tests {
  use super::*;

  fn arena_with_chain() -> (ClassArena, ClassId, ClassId, ClassId) {
    let mut arena = ClassArena::new();
    let animal = arena.push(ClassDef { name: "Animal".into(), superclass: None, members: Default::default() });
    let dog =
      arena.push(ClassDef { name: "Dog".into(), superclass: Some(animal), members: Default::default() });
    let cat =
      arena.push(ClassDef { name: "Cat".into(), superclass: Some(animal), members: Default::default() });
    (arena, animal, dog, cat)
  }

  #[test]
  fn int_is_a_float_is_a_object() {
    let arena = ClassArena::new();
    assert!(is_subtype(&Ty::Int, &Ty::Float, &arena));
    assert!(is_subtype(&Ty::Float, &Ty::Object, &arena));
    assert!(is_subtype(&Ty::Int, &Ty::Object, &arena));
    assert!(!is_subtype(&Ty::Float, &Ty::Int, &arena));
  }

  #[test]
  fn null_assigns_only_into_user_classes() {
    let (arena, animal, ..) = arena_with_chain();
    assert!(can_assign(&Ty::Null, &Ty::Class(animal), &arena));
    assert!(!can_assign(&Ty::Null, &Ty::Object, &arena));
    assert!(!can_assign(&Ty::Null, &Ty::Int, &arena));
  }

  #[test]
  fn function_values_are_never_assignable() {
    let arena = ClassArena::new();
    let sig = Rc::new(FunctionSig { name: "f".into(), params: vec![], return_type: Ty::Null });
    let f = Ty::Function(sig);
    assert!(!can_assign(&f, &Ty::Object, &arena));
    assert!(!can_assign(&Ty::Object, &f, &arena));
  }

  #[test]
  fn list_bottom_is_assignable_anywhere_but_accepts_nothing() {
    let arena = ClassArena::new();
    let empty = Ty::List(Box::new(Ty::Bottom));
    let ints = Ty::List(Box::new(Ty::Int));
    assert!(can_assign(&empty, &ints, &arena));
    assert!(!can_assign(&ints, &empty, &arena));
  }

  #[test]
  fn dog_and_cat_common_ancestor_is_animal() {
    let (arena, animal, dog, cat) = arena_with_chain();
    let ty = common_type(&[Ty::Class(dog), Ty::Class(cat)], &arena);
    assert_eq!(ty, Ty::Class(animal));
  }

  #[test]
  fn mixed_int_float_common_type_widens_to_float() {
    let arena = ClassArena::new();
    assert_eq!(common_type(&[Ty::Int, Ty::Float, Ty::Int], &arena), Ty::Float);
  }

  #[test]
  fn unrelated_classes_widen_to_object() {
    let mut arena = ClassArena::new();
    let a = arena.push(ClassDef { name: "A".into(), superclass: None, members: Default::default() });
    let b = arena.push(ClassDef { name: "B".into(), superclass: None, members: Default::default() });
    assert_eq!(common_type(&[Ty::Class(a), Ty::Class(b)], &arena), Ty::Object);
  }

  #[test]
  fn empty_literal_has_bottom_common_type_and_cannot_be_inferred() {
    let arena = ClassArena::new();
    let ty = common_type(&[], &arena);
    assert_eq!(ty, Ty::Bottom);
    assert!(!can_infer(&ty));
    assert!(!can_infer(&Ty::Null));
    assert!(can_infer(&Ty::List(Box::new(Ty::Int))));
  }

  #[test]
  fn member_lookup_walks_the_superclass_chain() {
    let (mut arena, animal, dog, _) = arena_with_chain();
    arena.get_mut(animal).members.insert("speak".into(), Ty::Bool);
    assert_eq!(arena.member(dog, "speak"), Some(&Ty::Bool));
    assert_eq!(arena.member(dog, "bark"), None);
  }
}
