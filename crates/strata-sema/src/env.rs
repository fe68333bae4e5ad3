use strata_ast::VarType;
use strata_diagnostics::{CompileError, Token};

use crate::types::{ClassArena, Ty};

/// Resolves a `VarType` surface node to a `Ty` (spec §4.6 "Type construction
/// from a `VarType` node"). `list<X>`/`dict<K,V>` build parametric types
/// recursively; any other name must already be a known user class — `void`
/// is rejected here, since it is only legal in return-type position
/// (`resolve_return_type` handles that case separately).
pub fn resolve_type(var_type: &VarType, classes: &ClassArena) -> Result<Ty, CompileError> {
  match var_type.name.text.as_str() {
    "list" => {
      let elem = var_type
        .nested
        .as_ref()
        .ok_or_else(|| name_error(&var_type.name, "list type is missing its element type parameter"))?;
      Ok(Ty::List(Box::new(resolve_type(elem, classes)?)))
    }
    "dict" => {
      let key = var_type
        .nested
        .as_ref()
        .ok_or_else(|| name_error(&var_type.name, "dict type is missing its key type parameter"))?;
      let value = var_type
        .second_nested
        .as_ref()
        .ok_or_else(|| name_error(&var_type.name, "dict type is missing its value type parameter"))?;
      Ok(Ty::Dict(Box::new(resolve_type(key, classes)?), Box::new(resolve_type(value, classes)?)))
    }
    "object" => Ok(Ty::Object),
    "int" => Ok(Ty::Int),
    "float" => Ok(Ty::Float),
    "bool" => Ok(Ty::Bool),
    "string" => Ok(Ty::String),
    "null" => Ok(Ty::Null),
    "void" => Err(name_error(&var_type.name, "void is only a valid return type, not a value type")),
    name => classes
      .find_by_name(name)
      .map(Ty::Class)
      .ok_or_else(|| name_error(&var_type.name, &format!("Type {name} is not defined in current scope"))),
  }
}

/// A function's declared return type: `void` maps to `Null`, everything
/// else goes through `resolve_type` (spec §4.6).
pub fn resolve_return_type(var_type: &VarType, classes: &ClassArena) -> Result<Ty, CompileError> {
  if var_type.name.text == "void" && var_type.nested.is_none() {
    return Ok(Ty::Null);
  }
  resolve_type(var_type, classes)
}

fn name_error(token: &Token, message: &str) -> CompileError {
  CompileError::Name { message: message.to_string(), token: token.clone() }
}
