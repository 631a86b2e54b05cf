//! Server function constructors
//!
//! One constructor per server function, each producing the exact
//! tagged-object wire shape the server expects (e.g.
//! `{"create": <ref>, "params": <obj>}`). Arity is validated here where
//! cheap; operand semantics are validated by the server.

use super::cursor::Cursor;
use super::expr::{Expr, FnCall};

fn call(fields: Vec<(&'static str, Expr)>) -> Expr {
    Expr::Fn(FnCall::new(fields))
}

/// `{"get": <ref>}` — reads the document a ref points at.
pub fn get(reference: impl Into<Expr>) -> Expr {
    call(vec![("get", reference.into())])
}

/// `{"exists": <ref>}` — whether a ref resolves to a document.
pub fn exists(reference: impl Into<Expr>) -> Expr {
    call(vec![("exists", reference.into())])
}

/// `{"create": <ref>, "params": <obj>}` — creates a document.
pub fn create(collection: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    call(vec![("create", collection.into()), ("params", params.into())])
}

/// `{"update": <ref>, "params": <obj>}` — merges fields into a document.
pub fn update(reference: impl Into<Expr>, params: impl Into<Expr>) -> Expr {
    call(vec![("update", reference.into()), ("params", params.into())])
}

/// `{"delete": <ref>}` — removes a document.
pub fn delete(reference: impl Into<Expr>) -> Expr {
    call(vec![("delete", reference.into())])
}

/// `{"match": <index-ref>}` — the set named by an index.
pub fn match_(index: impl Into<Expr>) -> Expr {
    call(vec![("match", index.into())])
}

/// `{"match": <index-ref>, "terms": [...]}` — an index lookup with terms.
pub fn match_terms(index: impl Into<Expr>, terms: Vec<Expr>) -> Expr {
    call(vec![("match", index.into()), ("terms", Expr::Array(terms))])
}

/// `{"map": <lambda>, "collection": <coll>}` — applies a lambda to each
/// element.
pub fn map_(collection: impl Into<Expr>, lambda: Expr) -> Expr {
    call(vec![("map", lambda), ("collection", collection.into())])
}

/// `{"foreach": <lambda>, "collection": <coll>}` — applies a lambda for
/// its effects, returning the source collection.
pub fn foreach(collection: impl Into<Expr>, lambda: Expr) -> Expr {
    call(vec![("foreach", lambda), ("collection", collection.into())])
}

/// `{"filter": <lambda>, "collection": <coll>}` — keeps elements for
/// which the lambda returns true.
pub fn filter_(collection: impl Into<Expr>, lambda: Expr) -> Expr {
    call(vec![("filter", lambda), ("collection", collection.into())])
}

/// `{"do": [...]}` — evaluates expressions in order, yielding the last.
pub fn do_(exprs: Vec<Expr>) -> Expr {
    assert!(!exprs.is_empty(), "do requires at least one expression");
    call(vec![("do", Expr::Array(exprs))])
}

/// `{"if": <cond>, "then": <t>, "else": <e>}`.
pub fn if_(condition: impl Into<Expr>, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
    call(vec![
        ("if", condition.into()),
        ("then", then.into()),
        ("else", otherwise.into()),
    ])
}

/// Parameter names bound by a lambda.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParams(Vec<String>);

impl From<&str> for LambdaParams {
    fn from(name: &str) -> Self {
        LambdaParams(vec![name.to_string()])
    }
}

impl From<&[&str]> for LambdaParams {
    fn from(names: &[&str]) -> Self {
        LambdaParams(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LambdaParams {
    fn from(names: [&str; N]) -> Self {
        LambdaParams(names.iter().map(|n| n.to_string()).collect())
    }
}

/// `{"lambda": <param|params>, "expr": <body>}` — an anonymous function.
///
/// A single parameter serializes as a bare name, multiple parameters as
/// an array of names. Parameter names are visible only within the body.
pub fn lambda(params: impl Into<LambdaParams>, body: impl Into<Expr>) -> Expr {
    let LambdaParams(names) = params.into();
    assert!(!names.is_empty(), "lambda requires at least one parameter");
    let params_expr = if names.len() == 1 {
        Expr::from(names[0].as_str())
    } else {
        Expr::Array(names.iter().map(|n| Expr::from(n.as_str())).collect())
    };
    call(vec![("lambda", params_expr), ("expr", body.into())])
}

/// `{"var": <name>}` — references a lambda parameter.
pub fn var(name: &str) -> Expr {
    call(vec![("var", Expr::from(name))])
}

fn variadic(key: &'static str, operands: Vec<Expr>) -> Expr {
    assert!(
        !operands.is_empty(),
        "{} requires at least one operand",
        key
    );
    call(vec![(key, Expr::Array(operands))])
}

/// `{"add": [...]}`.
pub fn add(operands: Vec<Expr>) -> Expr {
    variadic("add", operands)
}

/// `{"subtract": [...]}`.
pub fn subtract(operands: Vec<Expr>) -> Expr {
    variadic("subtract", operands)
}

/// `{"multiply": [...]}`.
pub fn multiply(operands: Vec<Expr>) -> Expr {
    variadic("multiply", operands)
}

/// `{"divide": [...]}`.
pub fn divide(operands: Vec<Expr>) -> Expr {
    variadic("divide", operands)
}

/// `{"and": [...]}`.
pub fn and_(operands: Vec<Expr>) -> Expr {
    variadic("and", operands)
}

/// `{"or": [...]}`.
pub fn or_(operands: Vec<Expr>) -> Expr {
    variadic("or", operands)
}

/// `{"not": <expr>}`.
pub fn not_(operand: impl Into<Expr>) -> Expr {
    call(vec![("not", operand.into())])
}

/// `{"equals": [...]}`.
pub fn equals(operands: Vec<Expr>) -> Expr {
    variadic("equals", operands)
}

/// `{"lt": [...]}`.
pub fn lt(operands: Vec<Expr>) -> Expr {
    variadic("lt", operands)
}

/// `{"lte": [...]}`.
pub fn lte(operands: Vec<Expr>) -> Expr {
    variadic("lte", operands)
}

/// `{"gt": [...]}`.
pub fn gt(operands: Vec<Expr>) -> Expr {
    variadic("gt", operands)
}

/// `{"gte": [...]}`.
pub fn gte(operands: Vec<Expr>) -> Expr {
    variadic("gte", operands)
}

/// Builder for `{"paginate": <set>, ...}`.
///
/// Requires a source set expression; page size and a resume cursor are
/// optional. Cursor tokens echo back to the server exactly as they were
/// received.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginate {
    source: Expr,
    size: Option<i64>,
    cursor: Option<Cursor>,
}

impl Paginate {
    /// Creates a paginate call over a set expression.
    pub fn new(source: impl Into<Expr>) -> Self {
        Self {
            source: source.into(),
            size: None,
            cursor: None,
        }
    }

    /// Sets the page size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Resumes paging before or after an opaque boundary token.
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

impl From<Paginate> for Expr {
    fn from(builder: Paginate) -> Self {
        let mut fields = vec![("paginate", builder.source)];
        if let Some(cursor) = builder.cursor {
            fields.push((cursor.wire_key(), Expr::Literal(cursor.into_token())));
        }
        if let Some(size) = builder.size {
            fields.push(("size", Expr::from(size)));
        }
        call(fields)
    }
}
