//! The concrete LR(1) grammar for this language's surface syntax (spec §4.3,
//! §6.2's sibling for the parser rather than the tokenizer). `strata-grammar`
//! is deliberately generic over the semantic-value type; this module is
//! where that type becomes concrete (`Sem`) and where the actual
//! productions — the ones a hand-written recursive-descent parser would
//! otherwise encode as match arms — get built as data instead.
//!
//! Grounded in `_parser/_parser.py`'s `Parser.__init__`: the same operator
//! precedence chain (`Logic > Equality > Comparison > Term > Factor >
//! Unary > Call`), the same `Get`/`Index`/`Set` mutual recursion for
//! postfix member access, call, and indexing, and the same reuse of `{`/`}`
//! for both statement blocks and dictionary literals. Two surface
//! differences from the original, both noted in `DESIGN.md`: comma-lists
//! (`Params`, `Arguments`, array/dict elements) are standard left-recursive
//! lists here rather than the original's right-recursive
//! `More*`-suffixed non-terminals, and `list<T>`/`dict<K,V>` go through the
//! dedicated `List`/`Dict` keyword tokens `strata-lexer` already reserves,
//! rather than a generic `identifier<T>` form.

use std::rc::Rc;

use strata_ast::{Class, Expr, Function, Literal, Program, Statement, Stmt, TopLevel, VarType};
use strata_diagnostics::Token;
use strata_grammar::{Action, Grammar, Production, SemanticValue, Symbol};

/// The semantic value every reduction in this grammar produces. A grammar
/// bug — an action unwrapping the wrong variant — panics rather than
/// silently coercing (spec §4.3 "no runtime coercion").
#[derive(Clone, Debug)]
pub enum Sem {
  Token(Token),
  Expr(Expr),
  ExprList(Vec<Expr>),
  DictPairs(Vec<Expr>, Vec<Expr>),
  Stmt(Statement),
  StmtList(Vec<Statement>),
  Param(Token, VarType),
  ParamList(Vec<(Token, VarType)>),
  VarType(VarType),
  OptVarType(Option<VarType>),
  OptExpr(Option<Expr>),
  Case(VarType, Vec<Statement>),
  CaseList(Vec<(VarType, Vec<Statement>)>),
  Function(Function),
  FunctionList(Vec<Function>),
  Class(Class),
  Program(Program),
}

macro_rules! unwrap_variant {
  ($name:ident, $variant:ident, $ty:ty) => {
    impl Sem {
      fn $name(self) -> $ty {
        match self {
          Sem::$variant(v) => v,
          other => panic!("grammar action expected {}, found {other:?}", stringify!($variant)),
        }
      }
    }
  };
}

unwrap_variant!(into_expr, Expr, Expr);
unwrap_variant!(into_expr_list, ExprList, Vec<Expr>);
unwrap_variant!(into_stmt_list, StmtList, Vec<Statement>);
unwrap_variant!(into_param_list, ParamList, Vec<(Token, VarType)>);
unwrap_variant!(into_var_type, VarType, VarType);
unwrap_variant!(into_opt_var_type, OptVarType, Option<VarType>);
unwrap_variant!(into_opt_expr, OptExpr, Option<Expr>);
unwrap_variant!(into_case_list, CaseList, Vec<(VarType, Vec<Statement>)>);
unwrap_variant!(into_function_list, FunctionList, Vec<Function>);
unwrap_variant!(into_class, Class, Class);
unwrap_variant!(into_program, Program, Program);

impl Sem {
  fn into_stmt(self) -> Statement {
    match self {
      Sem::Stmt(s) => s,
      other => panic!("grammar action expected Stmt, found {other:?}"),
    }
  }

  fn into_dict_pairs(self) -> (Vec<Expr>, Vec<Expr>) {
    match self {
      Sem::DictPairs(k, v) => (k, v),
      other => panic!("grammar action expected DictPairs, found {other:?}"),
    }
  }

  fn into_function(self) -> Function {
    match self {
      Sem::Function(f) => f,
      other => panic!("grammar action expected Function, found {other:?}"),
    }
  }
}

fn term(name: &str) -> Symbol {
  Symbol::Terminal(name.to_string())
}

fn nonterm(name: &str) -> Symbol {
  Symbol::NonTerminal(name.to_string())
}

/// Pulls the next child's raw shifted token. Panics if the child was
/// actually a reduced non-terminal — a grammar authoring bug.
fn tok(it: &mut std::vec::IntoIter<SemanticValue<Sem>>) -> Token {
  it.next().expect("production arity mismatch").token()
}

/// Pulls the next child's reduced semantic value.
fn val(it: &mut std::vec::IntoIter<SemanticValue<Sem>>) -> Sem {
  it.next().expect("production arity mismatch").value()
}

fn strip_quotes(text: &str) -> String {
  text.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(text).to_string()
}

/// Builds the unaugmented grammar (spec §3 "Grammar"); `strata_grammar::compile`
/// augments it, computes FIRST sets, builds the canonical LR(1) automaton,
/// and builds ACTION/GOTO tables.
pub fn build_grammar() -> Grammar<Sem> {
  let mut productions: Vec<Production<Sem>> = Vec::new();
  macro_rules! prod {
    ($left:expr, [$($sym:expr),* $(,)?], $action:expr) => {
      productions.push(Production::new($left, vec![$($sym),*], Rc::new($action) as Action<Sem>));
    };
  }

  // Program / top level ----------------------------------------------------
  prod!("Program", [nonterm("Class"), nonterm("Program")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let class = val(&mut it).into_class();
    let mut rest = val(&mut it).into_program();
    rest.insert(0, TopLevel::Class(class));
    Sem::Program(rest)
  });
  prod!("Program", [nonterm("Functions")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Program(val(&mut it).into_function_list().into_iter().map(TopLevel::Function).collect())
  });
  prod!("Functions", [nonterm("FunDeclaration"), nonterm("Functions")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let f = val(&mut it).into_function();
    let mut rest = val(&mut it).into_function_list();
    rest.insert(0, f);
    Sem::FunctionList(rest)
  });
  prod!("Functions", [], |_: Vec<SemanticValue<Sem>>| Sem::FunctionList(Vec::new()));

  // Class --------------------------------------------------------------
  prod!(
    "Class",
    [term("Class"), term("Identifier"), nonterm("Superclass"), term("OpenBrace"), nonterm("ClassMembers"), term("CloseBrace")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let name = tok(&mut it);
      let superclass = match val(&mut it) {
        Sem::Token(t) => Some(t),
        _ => None,
      };
      it.next();
      let methods = val(&mut it).into_function_list();
      Sem::Class(Class { name, superclass, methods })
    }
  );
  prod!("Superclass", [term("Colon"), term("Identifier")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    Sem::Token(tok(&mut it))
  });
  prod!("Superclass", [], |_: Vec<SemanticValue<Sem>>| Sem::OptExpr(None));
  prod!("ClassMembers", [nonterm("FunDeclaration"), nonterm("ClassMembers")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let f = val(&mut it).into_function();
    let mut rest = val(&mut it).into_function_list();
    rest.insert(0, f);
    Sem::FunctionList(rest)
  });
  prod!("ClassMembers", [], |_: Vec<SemanticValue<Sem>>| Sem::FunctionList(Vec::new()));

  // Function declaration ----------------------------------------------------
  prod!(
    "FunDeclaration",
    [
      term("Fun"),
      term("Identifier"),
      term("OpenParen"),
      nonterm("Params"),
      term("CloseParen"),
      term("Colon"),
      nonterm("Type"),
      term("OpenBrace"),
      nonterm("Statements"),
      term("CloseBrace"),
    ],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let name = tok(&mut it);
      it.next();
      let params = val(&mut it).into_param_list();
      it.next();
      it.next();
      let return_type = val(&mut it).into_var_type();
      it.next();
      let body = val(&mut it).into_stmt_list();
      Sem::Function(Function { name, params, return_type, body })
    }
  );
  prod!("Params", [nonterm("ParamList")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::ParamList(val(&mut it).into_param_list())
  });
  prod!("Params", [], |_: Vec<SemanticValue<Sem>>| Sem::ParamList(Vec::new()));
  prod!("ParamList", [nonterm("ParamList"), term("Comma"), nonterm("Param")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let mut list = val(&mut it).into_param_list();
    it.next();
    let (name, ty) = match val(&mut it) {
      Sem::Param(n, t) => (n, t),
      other => panic!("expected Param, found {other:?}"),
    };
    list.push((name, ty));
    Sem::ParamList(list)
  });
  prod!("ParamList", [nonterm("Param")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    match val(&mut it) {
      Sem::Param(n, t) => Sem::ParamList(vec![(n, t)]),
      other => panic!("expected Param, found {other:?}"),
    }
  });
  prod!("Param", [term("Identifier"), term("Colon"), nonterm("Type")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let name = tok(&mut it);
    it.next();
    let ty = val(&mut it).into_var_type();
    Sem::Param(name, ty)
  });

  // Types ------------------------------------------------------------------
  prod!("Type", [term("Identifier")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::VarType(VarType::simple(tok(&mut it)))
  });
  prod!("Type", [term("Void")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::VarType(VarType::simple(tok(&mut it)))
  });
  prod!("Type", [term("List"), term("Less"), nonterm("Type"), term("Greater")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let list_tok = tok(&mut it);
    it.next();
    let elem = val(&mut it).into_var_type();
    Sem::VarType(VarType::list(list_tok, elem))
  });
  prod!(
    "Type",
    [term("Dict"), term("Less"), nonterm("Type"), term("Comma"), nonterm("Type"), term("Greater")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      let dict_tok = tok(&mut it);
      it.next();
      let key = val(&mut it).into_var_type();
      it.next();
      let value = val(&mut it).into_var_type();
      Sem::VarType(VarType::dict(dict_tok, key, value))
    }
  );
  prod!("VarTypeOpt", [term("Colon"), nonterm("Type")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    Sem::OptVarType(Some(val(&mut it).into_var_type()))
  });
  prod!("VarTypeOpt", [], |_: Vec<SemanticValue<Sem>>| Sem::OptVarType(None));

  // Statements ---------------------------------------------------------
  prod!("Statements", [nonterm("Statements"), nonterm("Statement")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let mut list = val(&mut it).into_stmt_list();
    list.push(val(&mut it).into_stmt());
    Sem::StmtList(list)
  });
  prod!("Statements", [], |_: Vec<SemanticValue<Sem>>| Sem::StmtList(Vec::new()));

  for alt in [
    "If",
    "While",
    "For",
    "VarDeclaration",
    "AttrDeclaration",
    "Assign",
    "Return",
    "ExpressionStmt",
    "Switch",
    "CommentStmt",
    "BreakStmt",
    "ContinueStmt",
  ] {
    prod!("Statement", [nonterm(alt)], |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      val(&mut it)
    });
  }

  prod!(
    "If",
    [
      term("If"),
      term("OpenParen"),
      nonterm("Expression"),
      term("CloseParen"),
      term("OpenBrace"),
      nonterm("Statements"),
      term("CloseBrace"),
      nonterm("ElseClause"),
    ],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      it.next();
      let cond = val(&mut it).into_expr();
      it.next();
      it.next();
      let then_branch = val(&mut it).into_stmt_list();
      it.next();
      let else_branch = val(&mut it).into_stmt_list();
      Sem::Stmt(Statement(Stmt::If { cond, then_branch, else_branch }))
    }
  );
  prod!("ElseClause", [term("Else"), term("OpenBrace"), nonterm("Statements"), term("CloseBrace")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    it.next();
    Sem::StmtList(val(&mut it).into_stmt_list())
  });
  prod!("ElseClause", [], |_: Vec<SemanticValue<Sem>>| Sem::StmtList(Vec::new()));

  prod!(
    "While",
    [term("While"), term("OpenParen"), nonterm("Expression"), term("CloseParen"), term("OpenBrace"), nonterm("Statements"), term("CloseBrace")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      it.next();
      let cond = val(&mut it).into_expr();
      it.next();
      it.next();
      let body = val(&mut it).into_stmt_list();
      Sem::Stmt(Statement(Stmt::While { cond, body }))
    }
  );

  prod!(
    "For",
    [term("For"), term("Identifier"), term("In"), nonterm("Expression"), term("OpenBrace"), nonterm("Statements"), term("CloseBrace")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let var = tok(&mut it);
      it.next();
      let iterable = val(&mut it).into_expr();
      it.next();
      let body = val(&mut it).into_stmt_list();
      Sem::Stmt(Statement(Stmt::For { var, iterable, body }))
    }
  );

  prod!(
    "VarDeclaration",
    [term("Var"), term("Identifier"), nonterm("VarTypeOpt"), term("Equal"), nonterm("Expression"), term("Semicolon")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let name = tok(&mut it);
      let ty = val(&mut it).into_opt_var_type();
      it.next();
      let init = val(&mut it).into_expr();
      Sem::Stmt(Statement(Stmt::VarDeclaration { name, ty, init }))
    }
  );

  prod!(
    "AttrDeclaration",
    [term("Attr"), term("Identifier"), term("Colon"), nonterm("Type"), term("Equal"), nonterm("Expression"), term("Semicolon")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let name = tok(&mut it);
      it.next();
      let ty = val(&mut it).into_var_type();
      it.next();
      let init = val(&mut it).into_expr();
      Sem::Stmt(Statement(Stmt::AttrDeclaration { name, ty: Some(ty), init }))
    }
  );

  prod!("Assign", [nonterm("Set"), term("Equal"), nonterm("Expression"), term("Semicolon")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let lvalue = val(&mut it).into_expr();
    let equal = tok(&mut it);
    let rhs = val(&mut it).into_expr();
    Sem::Stmt(Statement(Stmt::Assignment { lvalue, rhs, line: equal.line }))
  });

  prod!("Return", [term("Return"), nonterm("ReturnArg")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let return_tok = tok(&mut it);
    let expr = val(&mut it).into_opt_expr();
    Sem::Stmt(Statement(Stmt::Return { expr, line: return_tok.line }))
  });
  prod!("ReturnArg", [nonterm("Expression"), term("Semicolon")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::OptExpr(Some(val(&mut it).into_expr()))
  });
  prod!("ReturnArg", [term("Semicolon")], |_: Vec<SemanticValue<Sem>>| Sem::OptExpr(None));

  prod!("ExpressionStmt", [nonterm("Expression"), term("Semicolon")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Stmt(Statement(Stmt::ExpressionStatement(val(&mut it).into_expr())))
  });

  prod!("BreakStmt", [term("Break"), term("Semicolon")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Stmt(Statement(Stmt::Break(tok(&mut it))))
  });
  prod!("ContinueStmt", [term("Continue"), term("Semicolon")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Stmt(Statement(Stmt::Continue(tok(&mut it))))
  });
  prod!("CommentStmt", [term("Comment")], |_: Vec<SemanticValue<Sem>>| Sem::Stmt(Statement(Stmt::Comment)));

  prod!(
    "Switch",
    [term("Switch"), term("Identifier"), term("OpenBrace"), nonterm("Cases"), nonterm("DefaultClause"), term("CloseBrace")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let var = tok(&mut it);
      it.next();
      let cases = val(&mut it).into_case_list();
      let default = val(&mut it).into_stmt_list();
      Sem::Stmt(Statement(Stmt::Switch { var, cases, default }))
    }
  );
  prod!("Cases", [nonterm("Cases"), nonterm("CaseClause")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let mut list = val(&mut it).into_case_list();
    match val(&mut it) {
      Sem::Case(ty, body) => list.push((ty, body)),
      other => panic!("expected Case, found {other:?}"),
    }
    Sem::CaseList(list)
  });
  prod!("Cases", [], |_: Vec<SemanticValue<Sem>>| Sem::CaseList(Vec::new()));
  prod!(
    "CaseClause",
    [term("Case"), nonterm("Type"), term("OpenBrace"), nonterm("Statements"), term("CloseBrace")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      it.next();
      let ty = val(&mut it).into_var_type();
      it.next();
      let body = val(&mut it).into_stmt_list();
      Sem::Case(ty, body)
    }
  );
  prod!("DefaultClause", [term("Default"), term("OpenBrace"), nonterm("Statements"), term("CloseBrace")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    it.next();
    Sem::StmtList(val(&mut it).into_stmt_list())
  });
  prod!("DefaultClause", [], |_: Vec<SemanticValue<Sem>>| Sem::StmtList(Vec::new()));

  // Expressions, precedence-climbing chain ----------------------------------
  prod!("Expression", [nonterm("Logic")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  binary_level(&mut productions, "Logic", "LogicOp", "Equality", &["And", "Or"]);
  binary_level(&mut productions, "Equality", "EqualityOp", "Comparison", &["EqualEqual", "BangEqual"]);
  binary_level(&mut productions, "Comparison", "ComparisonOp", "Term", &["Greater", "GreaterEqual", "Less", "LessEqual"]);
  binary_level(&mut productions, "Term", "TermOp", "Factor", &["Plus", "Minus"]);
  binary_level(&mut productions, "Factor", "FactorOp", "Unary", &["Star", "Slash", "Percent"]);

  prod!("Unary", [nonterm("UnaryOp"), nonterm("Unary")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let op = match val(&mut it) {
      Sem::Token(t) => t,
      other => panic!("expected operator token, found {other:?}"),
    };
    let inner = val(&mut it).into_expr();
    Sem::Expr(Expr::Unary(op, Box::new(inner)))
  });
  prod!("Unary", [nonterm("Call")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });
  for op in ["Bang", "Minus"] {
    prod!("UnaryOp", [term(op)], |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      Sem::Token(tok(&mut it))
    });
  }

  prod!("Call", [nonterm("Primary")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });
  prod!("Call", [nonterm("Get")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("Get", [nonterm("Get"), term("Dot"), term("Identifier")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let receiver = val(&mut it).into_expr();
    it.next();
    let name = tok(&mut it);
    Sem::Expr(Expr::Get { receiver: Box::new(receiver), name })
  });
  prod!("Get", [nonterm("Get"), term("OpenParen"), nonterm("Arguments"), term("CloseParen")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let callee = val(&mut it).into_expr();
    let open_paren = tok(&mut it);
    let args = val(&mut it).into_expr_list();
    Sem::Expr(Expr::Call { callee: Box::new(callee), args, line: open_paren.line })
  });
  prod!("Get", [term("Identifier")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Expr(Expr::Variable(tok(&mut it)))
  });
  prod!("Get", [term("SelfKw")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Expr(Expr::SelfExpr(tok(&mut it)))
  });
  prod!("Get", [term("Super")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Expr(Expr::Super(tok(&mut it)))
  });
  prod!("Get", [nonterm("Index")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("Index", [nonterm("Call"), term("OpenBracket"), nonterm("Expression"), term("CloseBracket")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let collection = val(&mut it).into_expr();
    it.next();
    let index = val(&mut it).into_expr();
    Sem::Expr(Expr::Index { collection: Box::new(collection), index: Box::new(index) })
  });

  prod!("Set", [nonterm("Get"), term("Dot"), term("Identifier")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let receiver = val(&mut it).into_expr();
    it.next();
    let name = tok(&mut it);
    Sem::Expr(Expr::Get { receiver: Box::new(receiver), name })
  });
  prod!("Set", [term("Identifier")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::Expr(Expr::Variable(tok(&mut it)))
  });
  prod!("Set", [nonterm("Index")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("Arguments", [nonterm("ArgList")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::ExprList(val(&mut it).into_expr_list())
  });
  prod!("Arguments", [], |_: Vec<SemanticValue<Sem>>| Sem::ExprList(Vec::new()));
  prod!("ArgList", [nonterm("ArgList"), term("Comma"), nonterm("Expression")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let mut list = val(&mut it).into_expr_list();
    it.next();
    list.push(val(&mut it).into_expr());
    Sem::ExprList(list)
  });
  prod!("ArgList", [nonterm("Expression")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::ExprList(vec![val(&mut it).into_expr()])
  });

  prod!("Primary", [term("Integer")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let t = tok(&mut it);
    Sem::Expr(Expr::Literal(Literal::Int(t.text.parse().expect("tokenizer guarantees digits-only text"))))
  });
  prod!("Primary", [term("Float")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let t = tok(&mut it);
    Sem::Expr(Expr::Literal(Literal::Float(t.text.parse().expect("tokenizer guarantees a well-formed float"))))
  });
  prod!("Primary", [term("String")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let t = tok(&mut it);
    Sem::Expr(Expr::Literal(Literal::Str(strip_quotes(&t.text))))
  });
  prod!("Primary", [term("True")], |_: Vec<SemanticValue<Sem>>| Sem::Expr(Expr::Literal(Literal::Bool(true))));
  prod!("Primary", [term("False")], |_: Vec<SemanticValue<Sem>>| Sem::Expr(Expr::Literal(Literal::Bool(false))));
  prod!("Primary", [term("Null")], |_: Vec<SemanticValue<Sem>>| Sem::Expr(Expr::Literal(Literal::Null)));
  prod!("Primary", [term("OpenParen"), nonterm("Expression"), term("CloseParen")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    let inner = val(&mut it).into_expr();
    Sem::Expr(Expr::Grouping(Box::new(inner)))
  });
  prod!("Primary", [nonterm("Array")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });
  prod!("Primary", [nonterm("Dict")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });

  prod!("Array", [term("OpenBracket"), nonterm("ArrayElems"), term("CloseBracket")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    let elems = val(&mut it).into_expr_list();
    Sem::Expr(Expr::Array(elems))
  });
  prod!("ArrayElems", [nonterm("ArgList")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    Sem::ExprList(val(&mut it).into_expr_list())
  });
  prod!("ArrayElems", [], |_: Vec<SemanticValue<Sem>>| Sem::ExprList(Vec::new()));

  prod!("Dict", [term("OpenBrace"), nonterm("DictElems"), term("CloseBrace")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    it.next();
    let (keys, values) = val(&mut it).into_dict_pairs();
    Sem::Expr(Expr::Dictionary { keys, values })
  });
  prod!("DictElems", [nonterm("DictList")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    val(&mut it)
  });
  prod!("DictElems", [], |_: Vec<SemanticValue<Sem>>| Sem::DictPairs(Vec::new(), Vec::new()));
  prod!(
    "DictList",
    [nonterm("DictList"), term("Comma"), nonterm("Expression"), term("Colon"), nonterm("Expression")],
    |c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      let (mut keys, mut values) = val(&mut it).into_dict_pairs();
      it.next();
      keys.push(val(&mut it).into_expr());
      it.next();
      values.push(val(&mut it).into_expr());
      Sem::DictPairs(keys, values)
    }
  );
  prod!("DictList", [nonterm("Expression"), term("Colon"), nonterm("Expression")], |c: Vec<SemanticValue<Sem>>| {
    let mut it = c.into_iter();
    let key = val(&mut it).into_expr();
    it.next();
    let value = val(&mut it).into_expr();
    Sem::DictPairs(vec![key], vec![value])
  });

  let terminals = [
    "OpenParen", "CloseParen", "OpenBrace", "CloseBrace", "OpenBracket", "CloseBracket", "Comma", "Dot", "Semicolon", "Colon", "Plus",
    "Minus", "Star", "Slash", "Percent", "Bang", "Greater", "GreaterEqual", "Less", "LessEqual", "Equal", "EqualEqual", "BangEqual",
    "Integer", "Float", "String", "Identifier", "Var", "Attr", "Class", "Fun", "While", "If", "Else", "For", "In", "Null", "True",
    "False", "Return", "And", "Or", "SelfKw", "Super", "Switch", "Case", "Default", "Break", "Continue", "List", "Dict", "Void",
    "Comment", "Eof",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect();

  let non_terminals = [
    "Program", "Functions", "Class", "Superclass", "ClassMembers", "FunDeclaration", "Params", "ParamList", "Param", "Type",
    "VarTypeOpt", "Statements", "Statement", "If", "ElseClause", "While", "For", "VarDeclaration", "AttrDeclaration", "Assign",
    "Return", "ReturnArg", "ExpressionStmt", "BreakStmt", "ContinueStmt", "CommentStmt", "Switch", "Cases", "CaseClause",
    "DefaultClause", "Expression", "Logic", "LogicOp", "Equality", "EqualityOp", "Comparison", "ComparisonOp", "Term", "TermOp",
    "Factor", "FactorOp", "Unary", "UnaryOp", "Call", "Get", "Index", "Set", "Arguments", "ArgList", "Primary", "Array",
    "ArrayElems", "Dict", "DictElems", "DictList",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect();

  Grammar::new(terminals, non_terminals, "Program".to_string(), productions)
}

/// Builds the four near-identical productions of one precedence level:
/// `Level -> Level Op Next | Next` and `Op -> tok1 | tok2 | ...` (spec §4.3,
/// `_parser.py`'s `p_logic`/`p_equality`/... chain).
fn binary_level(productions: &mut Vec<Production<Sem>>, level: &str, op_name: &str, next: &str, ops: &[&str]) {
  productions.push(Production::new(
    level,
    vec![nonterm(level), nonterm(op_name), nonterm(next)],
    Rc::new(|c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      let left = val(&mut it).into_expr();
      let op = match val(&mut it) {
        Sem::Token(t) => t,
        other => panic!("expected operator token, found {other:?}"),
      };
      let right = val(&mut it).into_expr();
      Sem::Expr(Expr::Binary(Box::new(left), op, Box::new(right)))
    }) as Action<Sem>,
  ));
  productions.push(Production::new(
    level,
    vec![nonterm(next)],
    Rc::new(|c: Vec<SemanticValue<Sem>>| {
      let mut it = c.into_iter();
      val(&mut it)
    }) as Action<Sem>,
  ));
  for op in ops {
    productions.push(Production::new(
      op_name,
      vec![term(op)],
      Rc::new(|c: Vec<SemanticValue<Sem>>| {
        let mut it = c.into_iter();
        Sem::Token(tok(&mut it))
      }) as Action<Sem>,
    ));
  }
}

/// Unwraps the root `Program` value the driver's `evaluate` returns.
pub fn into_program(sem: Sem) -> Program {
  sem.into_program()
}
