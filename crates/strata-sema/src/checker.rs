use std::rc::Rc;

use strata_ast::{Class, Expr, Function, Literal, Program, Statement, Stmt, TopLevel, VarType};
use strata_diagnostics::{CompileError, Token, TokenKind};

use crate::env::{resolve_return_type, resolve_type};
use crate::scope::Scope;
use crate::types::{can_assign, can_infer, common_type, is_subtype, ClassArena, ClassDef, ClassId, FunctionSig, Ty};

pub type CheckResult<T> = Result<T, CompileError>;

/// A `Token` to anchor a diagnostic on, for the checks that only have a line
/// number to go on in the original (`if`/`while` conditions, array/dict
/// literals, `for` loops, call-argument mismatches) rather than a concrete
/// token. Carries no real column/text — just enough for `CompileError`'s
/// `Display` to still print *a* caret line.
fn anchor(line: u32) -> Token {
  Token::new(line, 1, TokenKind::Eof, String::new())
}

fn name_error(token: Token, message: impl Into<String>) -> CompileError {
  CompileError::Name { message: message.into(), token }
}

fn type_error(token: Token, message: impl Into<String>) -> CompileError {
  CompileError::Type { message: message.into(), token }
}

fn class_error(token: Token, message: impl Into<String>) -> CompileError {
  CompileError::Class { message: message.into(), token }
}

fn control_flow_error(token: Token, message: impl Into<String>) -> CompileError {
  CompileError::ControlFlow { message: message.into(), token }
}

/// The built-in free functions every program sees without declaring them
/// (spec §4.6/§9 C.7; `builtin/builtin.py`'s `builtin_functions` list). Only
/// the entries the checker itself depends on are included — `isinstance`'s
/// second parameter is exactly the `Ty::MetaType` sentinel of C.7.
fn register_builtins(globals: &mut Scope<'static>) {
  let mut declare = |name: &str, params: Vec<Ty>, return_type: Ty| {
    let sig = FunctionSig { name: name.to_string(), params, return_type };
    globals.declare(name, Ty::Function(Rc::new(sig))).expect("builtin names never collide with each other");
  };
  declare("print", vec![Ty::Object], Ty::Null);
  declare("len", vec![Ty::AnyList], Ty::Int);
  declare("isinstance", vec![Ty::Object, Ty::MetaType], Ty::Bool);
  declare("max", vec![Ty::Float, Ty::Float], Ty::Float);
  declare("min", vec![Ty::Float, Ty::Float], Ty::Float);
  declare("pow", vec![Ty::Float, Ty::Float], Ty::Float);
}

fn function_sig(f: &Function, classes: &ClassArena) -> CheckResult<FunctionSig> {
  let mut params = Vec::with_capacity(f.params.len());
  for (_, ty) in &f.params {
    params.push(resolve_type(ty, classes)?);
  }
  let return_type = resolve_return_type(&f.return_type, classes)?;
  if f.name.text == "init" && return_type != Ty::Null {
    return Err(class_error(f.name.clone(), "init method must have void return type"));
  }
  Ok(FunctionSig { name: f.name.text.clone(), params, return_type })
}

/// Checks every top-level declaration of `program` (spec §4.7): pre-
/// registration (classes, methods, synthesized constructors, top-level
/// functions, the `main` requirement), then a tree walk over every function
/// and class body.
pub fn check_program(program: &Program) -> CheckResult<()> {
  let mut classes = ClassArena::new();
  let mut globals = Scope::root();
  register_builtins(&mut globals);

  // Step 1: classes exist, with superclasses resolved. A superclass must
  // already have been declared earlier in the program — the same
  // single-pass order the original walks `self.types` in.
  for top in program {
    if let TopLevel::Class(class) = top {
      let superclass = match &class.superclass {
        Some(name) => Some(
          classes
            .find_by_name(&name.text)
            .ok_or_else(|| name_error(name.clone(), format!("Class {} not defined in scope", name.text)))?,
        ),
        None => None,
      };
      if classes.find_by_name(&class.name.text).is_some() || globals.exists(&class.name.text) {
        return Err(name_error(class.name.clone(), format!("Class {} already exists", class.name.text)));
      }
      classes.push(ClassDef { name: class.name.text.clone(), superclass, members: Default::default() });
    }
  }

  // Step 2: register each class's methods (signatures only) plus its
  // synthesized constructor, and check method-shape inheritance (arity,
  // parameter/return variance) — everything that doesn't need attribute
  // types, which aren't known until `init` bodies are walked in step 5.
  for top in program {
    if let TopLevel::Class(class) = top {
      let class_id = classes.find_by_name(&class.name.text).unwrap();
      for method in &class.methods {
        let sig = function_sig(method, &classes)?;
        classes.get_mut(class_id).members.insert(method.name.text.clone(), Ty::Function(Rc::new(sig)));
      }
      check_method_inheritance(class_id, &classes)?;
      let ctor = constructor_for(class_id, &classes);
      globals
        .declare(&class.name.text, ctor)
        .map_err(|_| name_error(class.name.clone(), format!("Class {} already exists", class.name.text)))?;
    }
  }

  // Step 3: register top-level function signatures.
  for top in program {
    if let TopLevel::Function(f) = top {
      let sig = function_sig(f, &classes)?;
      globals
        .declare(&f.name.text, Ty::Function(Rc::new(sig)))
        .map_err(|_| name_error(f.name.clone(), format!("Function {} already exists", f.name.text)))?;
    }
  }

  // Step 4: require `main`.
  match globals.get("main") {
    Some(Ty::Function(sig)) if sig.params.is_empty() && sig.return_type == Ty::Null => {}
    _ => return Err(CompileError::ProgramShape { message: "Program must contain a main method".into() }),
  }

  // Step 5: walk every body.
  let mut checker = Checker { classes, current_function: None, current_class: None, loop_depth: 0 };
  for top in program {
    match top {
      TopLevel::Function(f) => checker.check_function(f, &globals)?,
      TopLevel::Class(c) => checker.check_class(c, &globals)?,
    }
  }

  // Step 6: now that `init` bodies have populated attribute members, check
  // field-override variance across every class.
  for top in program {
    if let TopLevel::Class(class) = top {
      let class_id = checker.classes.find_by_name(&class.name.text).unwrap();
      check_field_inheritance(class_id, &checker.classes, &class.name)?;
    }
  }

  Ok(())
}

/// `Class.get_constructor`: `init`'s parameter list if the class declares
/// one, else a zero-argument constructor; return type is always the class
/// itself (spec §4.7 step 2).
fn constructor_for(class_id: ClassId, classes: &ClassArena) -> Ty {
  let params = match classes.get(class_id).members.get("init") {
    Some(Ty::Function(sig)) => sig.params.clone(),
    _ => Vec::new(),
  };
  Ty::Function(Rc::new(FunctionSig { name: classes.get(class_id).name.clone(), params, return_type: Ty::Class(class_id) }))
}

/// Arity/parameter/return-type variance across an override, skipping `init`
/// (exempt per spec §4.7 step 3) and skipping fields (handled later, once
/// attribute types are known — see `check_field_inheritance`).
fn check_method_inheritance(class_id: ClassId, classes: &ClassArena) -> CheckResult<()> {
  let Some(parent_id) = classes.get(class_id).superclass else { return Ok(()) };
  for (member_name, member_ty) in &classes.get(class_id).members {
    let Ty::Function(child_sig) = member_ty else { continue };
    if child_sig.name == "init" {
      continue;
    }
    let Some(Ty::Function(parent_sig)) = classes.member(parent_id, member_name) else { continue };
    if child_sig.params.len() != parent_sig.params.len() {
      return Err(class_error(
        anchor(0),
        format!("Function {member_name} must have same number of arguments as in parent class"),
      ));
    }
    for (child_param, parent_param) in child_sig.params.iter().zip(&parent_sig.params) {
      if !can_assign(parent_param, child_param, classes) {
        return Err(class_error(
          anchor(0),
          format!(
            "Parameter in {member_name} defined in parent class as {} type, can't be of type {} in class {}",
            parent_param.display(classes),
            child_param.display(classes),
            classes.get(class_id).name
          ),
        ));
      }
    }
    if !can_assign(&child_sig.return_type, &parent_sig.return_type, classes) {
      return Err(class_error(
        anchor(0),
        format!(
          "Return type defined in parent class as {} type, not {}",
          parent_sig.return_type.display(classes),
          child_sig.return_type.display(classes)
        ),
      ));
    }
  }
  Ok(())
}

/// Field-override variance: a non-function member overriding a parent's
/// member of the same name must be a subtype of it (spec §4.7 step 3,
/// "overridden fields must be subtypes"). Deferred until every `init` body
/// has been walked, since attribute types aren't known during
/// pre-registration.
fn check_field_inheritance(class_id: ClassId, classes: &ClassArena, name_token: &Token) -> CheckResult<()> {
  let Some(parent_id) = classes.get(class_id).superclass else { return Ok(()) };
  for (member_name, member_ty) in &classes.get(class_id).members {
    if matches!(member_ty, Ty::Function(_)) {
      continue;
    }
    let Some(parent_ty) = classes.member(parent_id, member_name) else { continue };
    if matches!(parent_ty, Ty::Function(_)) {
      continue;
    }
    if !can_assign(member_ty, parent_ty, classes) {
      return Err(class_error(
        name_token.clone(),
        format!(
          "Variable {member_name} defined in parent class as {} type, not {}",
          parent_ty.display(classes),
          member_ty.display(classes)
        ),
      ));
    }
  }
  Ok(())
}

/// The tree-walking half of the checker (spec §4.7 "Walk contracts"). Owns
/// the class arena — attribute declarations mutate it as `init` bodies are
/// walked — plus the call-scoped "current function / current class / loop
/// depth" state of spec §5.
pub struct Checker {
  classes: ClassArena,
  current_function: Option<Rc<FunctionSig>>,
  current_class: Option<ClassId>,
  loop_depth: u32,
}

impl Checker {
  fn check_function(&mut self, f: &Function, globals: &Scope<'static>) -> CheckResult<()> {
    let sig = match globals.get(&f.name.text) {
      Some(Ty::Function(sig)) => sig.clone(),
      _ => unreachable!("top-level function signatures are registered before bodies are walked"),
    };
    self.check_function_body(f, sig, globals)
  }

  fn check_function_body(&mut self, f: &Function, sig: Rc<FunctionSig>, globals: &Scope<'static>) -> CheckResult<()> {
    let mut scope = Scope::child(globals);
    for ((name, _), ty) in f.params.iter().zip(&sig.params) {
      scope
        .declare(&name.text, ty.clone())
        .map_err(|_| name_error(name.clone(), format!("Parameter {} already exists", name.text)))?;
    }

    if f.name.text == "init" {
      if let Some(class_id) = self.current_class {
        if self.classes.get(class_id).superclass.is_some() {
          check_super_init_call(&f.body, &f.name)?;
        }
      }
    }

    self.current_function = Some(sig.clone());
    self.check_stmts(&f.body, &mut scope)?;
    if sig.return_type != Ty::Null && !all_paths_return(&f.body) {
      return Err(control_flow_error(f.name.clone(), "All code paths don't return a value"));
    }
    self.current_function = None;
    Ok(())
  }

  fn check_class(&mut self, class: &Class, globals: &Scope<'static>) -> CheckResult<()> {
    let class_id = self.classes.find_by_name(&class.name.text).unwrap();
    self.current_class = Some(class_id);

    let mut methods: Vec<&Function> = class.methods.iter().collect();
    methods.sort_by_key(|m| if m.name.text == "init" { 0 } else { 1 });

    for method in methods {
      let sig = match self.classes.member(class_id, &method.name.text) {
        Some(Ty::Function(sig)) => sig.clone(),
        _ => unreachable!("method signatures are registered before bodies are walked"),
      };
      self.check_function_body(method, sig, globals)?;
    }

    self.current_class = None;
    Ok(())
  }

  /// Runs `stmts` in `scope` directly (no further nesting) — used for a
  /// function/method body, which shares its parameter scope with its
  /// top-level statements.
  fn check_stmts(&mut self, stmts: &[Statement], scope: &mut Scope) -> CheckResult<()> {
    for stmt in stmts {
      self.check_stmt(stmt, scope)?;
    }
    Ok(())
  }

  /// Runs `stmts` in a fresh child scope of `parent` — used for every
  /// nested block (`if`/`while`/`for`/`switch` arm bodies).
  fn check_block(&mut self, stmts: &[Statement], parent: &Scope) -> CheckResult<()> {
    let mut scope = Scope::child(parent);
    self.check_stmts(stmts, &mut scope)
  }

  fn check_stmt(&mut self, statement: &Statement, scope: &mut Scope) -> CheckResult<()> {
    match &statement.0 {
      Stmt::Comment => Ok(()),
      Stmt::ExpressionStatement(expr) => self.check_expr(expr, scope).map(|_| ()),
      Stmt::VarDeclaration { name, ty, init } => {
        let init_ty = self.check_expr(init, scope)?;
        let declared = match ty {
          Some(var_type) => {
            let declared = resolve_type(var_type, &self.classes)?;
            if !can_assign(&init_ty, &declared, &self.classes) {
              return Err(type_error(
                name.clone(),
                format!(
                  "Variable {} of type {} can't be assigned {}",
                  name.text,
                  declared.display(&self.classes),
                  init_ty.display(&self.classes)
                ),
              ));
            }
            declared
          }
          None => {
            if matches!(init_ty, Ty::Function(_)) {
              return Err(type_error(
                name.clone(),
                format!("Variable {} can't be assigned {}", name.text, init_ty.display(&self.classes)),
              ));
            }
            if !can_infer(&init_ty) {
              return Err(type_error(name.clone(), "Can't infer type from expression"));
            }
            init_ty
          }
        };
        scope
          .declare(&name.text, declared)
          .map_err(|_| name_error(name.clone(), format!("Variable {} already exists", name.text)))
      }
      Stmt::AttrDeclaration { name, ty, init } => self.check_attr_declaration(name, ty, init, scope),
      Stmt::Assignment { lvalue, rhs, line } => {
        let rhs_ty = self.check_expr(rhs, scope)?;
        let lhs_ty = self.check_expr(lvalue, scope)?;
        if !can_assign(&rhs_ty, &lhs_ty, &self.classes) {
          return Err(type_error(
            anchor(*line),
            format!("Can't assign {} to {} object", rhs_ty.display(&self.classes), lhs_ty.display(&self.classes)),
          ));
        }
        Ok(())
      }
      Stmt::If { cond, then_branch, else_branch } => {
        let cond_ty = self.check_expr(cond, scope)?;
        if cond_ty != Ty::Bool {
          return Err(type_error(anchor(cond.line()), "if condition is not a boolean value"));
        }
        self.check_block(then_branch, scope)?;
        self.check_block(else_branch, scope)
      }
      Stmt::While { cond, body } => {
        let cond_ty = self.check_expr(cond, scope)?;
        if cond_ty != Ty::Bool {
          return Err(type_error(anchor(cond.line()), "while condition is not a boolean value"));
        }
        self.loop_depth += 1;
        let result = self.check_block(body, scope);
        self.loop_depth -= 1;
        result
      }
      Stmt::For { var, iterable, body } => {
        let iterable_ty = self.check_expr(iterable, scope)?;
        let element_ty = match &iterable_ty {
          Ty::Dict(key, _) => (**key).clone(),
          Ty::List(elem) => (**elem).clone(),
          _ => {
            return Err(type_error(var.clone(), "For can only iterate over a list or a dictionary"));
          }
        };
        let mut inner = Scope::child(scope);
        inner
          .declare(&var.text, element_ty)
          .map_err(|_| name_error(var.clone(), format!("Variable {} already exists", var.text)))?;
        self.loop_depth += 1;
        let result = self.check_stmts(body, &mut inner);
        self.loop_depth -= 1;
        result
      }
      Stmt::Return { expr, line } => {
        let Some(current) = self.current_function.clone() else {
          return Err(control_flow_error(anchor(*line), "return statement should be inside a function"));
        };
        let return_ty = match expr {
          Some(e) => self.check_expr(e, scope)?,
          None => Ty::Null,
        };
        if !can_assign(&return_ty, &current.return_type, &self.classes) {
          return Err(type_error(
            anchor(*line),
            format!(
              "Function expects {} return type, got {} instead",
              current.return_type.display(&self.classes),
              return_ty.display(&self.classes)
            ),
          ));
        }
        Ok(())
      }
      Stmt::Break(token) => {
        if self.loop_depth == 0 {
          return Err(control_flow_error(token.clone(), "break must be inside a for or while loop body"));
        }
        Ok(())
      }
      Stmt::Continue(token) => {
        if self.loop_depth == 0 {
          return Err(control_flow_error(token.clone(), "continue must be inside a for or while loop body"));
        }
        Ok(())
      }
      Stmt::Switch { var, cases, default } => self.check_switch(var, cases, default, scope),
    }
  }

  fn check_attr_declaration(
    &mut self,
    name: &Token,
    ty: &Option<VarType>,
    init: &Expr,
    scope: &mut Scope,
  ) -> CheckResult<()> {
    let Some(class_id) = self.current_class else {
      return Err(class_error(name.clone(), "Attributes can only be created inside classes"));
    };
    let in_init = matches!(&self.current_function, Some(sig) if sig.name == "init");
    if !in_init {
      return Err(class_error(name.clone(), "Attributes can only be declared in init class method"));
    }
    let init_ty = self.check_expr(init, scope)?;
    let declared = match ty {
      Some(var_type) => {
        let declared = resolve_type(var_type, &self.classes)?;
        if !can_assign(&init_ty, &declared, &self.classes) {
          return Err(type_error(
            name.clone(),
            format!(
              "Attribute {} of type {} can't be assigned {}",
              name.text,
              declared.display(&self.classes),
              init_ty.display(&self.classes)
            ),
          ));
        }
        declared
      }
      None => {
        if !can_infer(&init_ty) {
          return Err(type_error(name.clone(), "Can't infer type from expression"));
        }
        init_ty
      }
    };
    // A method already occupies this name — an attribute sharing it would
    // alias the method silently.
    if matches!(self.classes.get(class_id).members.get(&name.text), Some(Ty::Function(_))) {
      return Err(name_error(name.clone(), format!("Attribute {} already exists", name.text)));
    }
    self.classes.get_mut(class_id).members.insert(name.text.clone(), declared);
    Ok(())
  }

  fn check_switch(
    &mut self,
    var: &Token,
    cases: &[(VarType, Vec<Statement>)],
    default: &[Statement],
    scope: &Scope,
  ) -> CheckResult<()> {
    let var_ty = scope.get(&var.text).cloned().ok_or_else(|| name_error(var.clone(), format!("{} not defined in current scope", var.text)))?;
    for (case_type, body) in cases {
      let case_ty = resolve_type(case_type, &self.classes)?;
      if !matches!(case_ty, Ty::Class(_)) {
        return Err(type_error(case_type.name.clone(), format!("Can't cast to type {}", case_ty.display(&self.classes))));
      }
      if !can_assign(&var_ty, &case_ty, &self.classes) && !can_assign(&case_ty, &var_ty, &self.classes) {
        return Err(type_error(
          case_type.name.clone(),
          format!("Can't cast {} to {}", var_ty.display(&self.classes), case_ty.display(&self.classes)),
        ));
      }
      let mut inner = Scope::child(scope);
      inner.declare(&var.text, case_ty).expect("rebinding switch's own variable in a fresh scope never collides");
      self.check_stmts(body, &mut inner)?;
    }
    self.check_block(default, scope)
  }

  fn check_expr(&mut self, expr: &Expr, scope: &Scope) -> CheckResult<Ty> {
    match expr {
      Expr::Literal(lit) => Ok(match lit {
        Literal::Int(_) => Ty::Int,
        Literal::Float(_) => Ty::Float,
        Literal::Str(_) => Ty::String,
        Literal::Bool(_) => Ty::Bool,
        Literal::Null => Ty::Null,
      }),
      Expr::Variable(token) => scope
        .get(&token.text)
        .cloned()
        .ok_or_else(|| name_error(token.clone(), format!("{} not defined in current scope", token.text))),
      Expr::SelfExpr(token) => self
        .current_class
        .map(Ty::Class)
        .ok_or_else(|| class_error(token.clone(), "self must be contained in a class")),
      Expr::Super(token) => {
        let class_id = self.current_class.ok_or_else(|| class_error(token.clone(), "super must be contained in a class"))?;
        Ok(match self.classes.get(class_id).superclass {
          Some(parent) => Ty::Class(parent),
          None => Ty::Object,
        })
      }
      Expr::Grouping(inner) => self.check_expr(inner, scope),
      Expr::Unary(op, operand) => {
        let operand_ty = self.check_expr(operand, scope)?;
        match op.kind {
          TokenKind::Minus => match operand_ty {
            Ty::Int | Ty::Float => Ok(operand_ty),
            other => Err(type_error(op.clone(), format!("Operator - not supported for {}", other.display(&self.classes)))),
          },
          TokenKind::Bang => {
            if operand_ty == Ty::Bool {
              Ok(Ty::Bool)
            } else {
              Err(type_error(op.clone(), format!("Operator ! not supported for {}", operand_ty.display(&self.classes))))
            }
          }
          _ => unreachable!("the parser never builds a Unary node with any other operator token"),
        }
      }
      Expr::Binary(left, op, right) => self.check_binary(left, op, right, scope),
      Expr::Call { callee, args, line } => self.check_call(callee, args, *line, scope),
      Expr::Get { receiver, name } => self.check_get(receiver, name, scope),
      Expr::Index { collection, index } => self.check_index(collection, index, scope),
      Expr::Array(elements) => {
        let mut types = Vec::with_capacity(elements.len());
        for elem in elements {
          types.push(self.check_expr(elem, scope)?);
        }
        Ok(Ty::List(Box::new(common_type(&types, &self.classes))))
      }
      Expr::Dictionary { keys, values } => self.check_dictionary(keys, values, scope),
    }
  }

  fn check_binary(&mut self, left: &Expr, op: &Token, right: &Expr, scope: &Scope) -> CheckResult<Ty> {
    let left_ty = self.check_expr(left, scope)?;
    let right_ty = self.check_expr(right, scope)?;
    let classes = &self.classes;
    let incompatible = |op_name: &str| {
      type_error(
        op.clone(),
        format!("Operator {op_name} not supported for types {} and {}", left_ty.display(classes), right_ty.display(classes)),
      )
    };

    match op.kind {
      TokenKind::EqualEqual | TokenKind::BangEqual => {
        if matches!(left_ty, Ty::Function(_)) || matches!(right_ty, Ty::Function(_)) {
          return Err(incompatible(if op.kind == TokenKind::EqualEqual { "==" } else { "!=" }));
        }
        if !can_assign(&left_ty, &right_ty, classes) && !can_assign(&right_ty, &left_ty, classes) {
          return Err(incompatible(if op.kind == TokenKind::EqualEqual { "==" } else { "!=" }));
        }
        Ok(Ty::Bool)
      }
      TokenKind::And | TokenKind::Or => {
        if left_ty != Ty::Bool || right_ty != Ty::Bool {
          return Err(incompatible(if op.kind == TokenKind::And { "and" } else { "or" }));
        }
        Ok(Ty::Bool)
      }
      TokenKind::Plus => match (&left_ty, &right_ty) {
        (Ty::String, Ty::String) => Ok(Ty::String),
        _ => numeric_lub(&left_ty, &right_ty).ok_or_else(|| incompatible("+")),
      },
      TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
        numeric_lub(&left_ty, &right_ty).ok_or_else(|| incompatible(&op.text))
      }
      TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
        let both_numeric = matches!(left_ty, Ty::Int | Ty::Float) && matches!(right_ty, Ty::Int | Ty::Float);
        let both_string = left_ty == Ty::String && right_ty == Ty::String;
        if both_numeric || both_string {
          Ok(Ty::Bool)
        } else {
          Err(incompatible(&op.text))
        }
      }
      _ => unreachable!("the parser never builds a Binary node with any other operator token"),
    }
  }

  fn check_call(&mut self, callee: &Expr, args: &[Expr], line: u32, scope: &Scope) -> CheckResult<Ty> {
    let callee_ty = self.check_expr(callee, scope)?;
    let Ty::Function(sig) = callee_ty else {
      return Err(type_error(anchor(line), "Calls must be made to functions and methods"));
    };
    if args.len() != sig.params.len() {
      return Err(type_error(anchor(line), "Invalid number of arguments"));
    }
    for (arg, param) in args.iter().zip(&sig.params) {
      let arg_ty = self.check_expr(arg, scope)?;
      if *param == Ty::MetaType && matches!(arg_ty, Ty::Function(_)) {
        continue;
      }
      if !can_assign(&arg_ty, param, &self.classes) {
        return Err(type_error(
          anchor(line),
          format!("Function with argument type {} can't receive {}", param.display(&self.classes), arg_ty.display(&self.classes)),
        ));
      }
    }
    Ok(sig.return_type.clone())
  }

  fn check_get(&mut self, receiver: &Expr, name: &Token, scope: &Scope) -> CheckResult<Ty> {
    let receiver_ty = self.check_expr(receiver, scope)?;
    match &receiver_ty {
      Ty::Class(id) => self
        .classes
        .member(*id, &name.text)
        .cloned()
        .ok_or_else(|| class_error(name.clone(), format!("{} type has no property or method {}", self.classes.get(*id).name, name.text))),
      // A plain `Function` binding has no attributes of its own — spec §9's
      // open question calls for rejecting this outright rather than
      // silently falling through to `None`.
      Ty::Function(_) => Err(class_error(name.clone(), "invalid attribute access")),
      other => Err(class_error(name.clone(), format!("{} type has no property or method {}", other.display(&self.classes), name.text))),
    }
  }

  fn check_index(&mut self, collection: &Expr, index: &Expr, scope: &Scope) -> CheckResult<Ty> {
    let collection_ty = self.check_expr(collection, scope)?;
    let index_ty = self.check_expr(index, scope)?;
    match &collection_ty {
      Ty::List(elem) => {
        if index_ty != Ty::Int {
          return Err(type_error(anchor(collection.line()), "list index must be an int"));
        }
        Ok((**elem).clone())
      }
      Ty::Dict(key, value) => {
        if !can_assign(&index_ty, key, &self.classes) {
          return Err(type_error(
            anchor(collection.line()),
            format!("dict index of type {} can't be used on a {} key", index_ty.display(&self.classes), key.display(&self.classes)),
          ));
        }
        Ok((**value).clone())
      }
      other => Err(type_error(anchor(collection.line()), format!("{} is not indexable", other.display(&self.classes)))),
    }
  }

  fn check_dictionary(&mut self, keys: &[Expr], values: &[Expr], scope: &Scope) -> CheckResult<Ty> {
    let mut key_types = Vec::with_capacity(keys.len());
    for key in keys {
      key_types.push(self.check_expr(key, scope)?);
    }
    let mut value_types = Vec::with_capacity(values.len());
    for value in values {
      value_types.push(self.check_expr(value, scope)?);
    }
    if keys.is_empty() {
      return Ok(Ty::Dict(Box::new(Ty::Bottom), Box::new(Ty::Bottom)));
    }
    let key_ty = common_type(&key_types, &self.classes);
    let value_ty = common_type(&value_types, &self.classes);
    if key_ty == Ty::Object {
      return Err(type_error(anchor(keys[0].line()), "Dictionary keys are not of the same type"));
    }
    if !(is_subtype(&key_ty, &Ty::Float, &self.classes) || key_ty == Ty::String) {
      return Err(type_error(anchor(keys[0].line()), "Dictionary keys are not immutable"));
    }
    Ok(Ty::Dict(Box::new(key_ty), Box::new(value_ty)))
  }
}

/// `+ − × ÷ %` on two numerics: `int` if both are `int`, else `float` (spec
/// §4.6 operator table).
fn numeric_lub(left: &Ty, right: &Ty) -> Option<Ty> {
  match (left, right) {
    (Ty::Int, Ty::Int) => Some(Ty::Int),
    (Ty::Int | Ty::Float, Ty::Int | Ty::Float) => Some(Ty::Float),
    _ => None,
  }
}

/// The structural check of spec §9 C.8: for a class with a non-`object`
/// superclass, `init`'s first non-comment statement must be a call of the
/// form `super.init(...)`.
fn check_super_init_call(body: &[Statement], init_name: &Token) -> CheckResult<()> {
  let first = body.iter().find(|s| !matches!(s.0, Stmt::Comment));
  let fail = || class_error(init_name.clone(), "init method must call super's init in first statement");

  let Some(Statement(Stmt::ExpressionStatement(Expr::Call { callee, .. }))) = first else {
    return Err(fail());
  };
  let Expr::Get { receiver, name } = callee.as_ref() else {
    return Err(fail());
  };
  if !matches!(receiver.as_ref(), Expr::Super(_)) || name.text != "init" {
    return Err(fail());
  }
  Ok(())
}

/// Conservative return-path analysis (spec §4.7 "Function"): a block
/// returns if it ends with `Return`, or with an `If` whose both branches
/// return.
fn all_paths_return(body: &[Statement]) -> bool {
  match body.last() {
    Some(Statement(Stmt::Return { .. })) => true,
    Some(Statement(Stmt::If { then_branch, else_branch, .. })) => {
      all_paths_return(then_branch) && all_paths_return(else_branch)
    }
    _ => false,
  }
}
