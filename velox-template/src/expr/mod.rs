//! The expression language used inside directives and interpolations.
//!
//! Templates never splice expression text into a host program. Each fragment
//! is parsed into an [`Expr`] once at compile time and evaluated later against
//! a [`Scope`], which resolves every free identifier by name.

mod ast;
mod eval;
mod scope;
mod value;

use std::fmt;
use std::sync::Arc;

use pest::Parser;
use pest::iterators::Pair;
use thiserror::Error;

pub use ast::{AssignOp, BinaryOp, Expr, Lambda, UnaryOp};
pub use scope::Scope;
pub use value::{Function, Value};

#[derive(pest_derive::Parser)]
#[grammar = "expr.pest"]
struct ExprParser;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SyntaxError(pub String);

impl From<pest::error::Error<Rule>> for SyntaxError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        SyntaxError(e.variant.message().into_owned())
    }
}

/// Expression text paired with its parsed form.
///
/// The text is what gets emitted; the tree is what gets evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub source: String,
    pub ast: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            source: source.trim().to_string(),
            ast: parse_expr(source)?,
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

pub fn parse_expr(source: &str) -> Result<Expr, SyntaxError> {
    let mut pairs = ExprParser::parse(Rule::expression, source)?;
    let root = pairs
        .next()
        .ok_or_else(|| SyntaxError("empty expression".into()))?;
    let inner = root
        .into_inner()
        .next()
        .ok_or_else(|| SyntaxError("empty expression".into()))?;
    build_expr(inner)
}

/// Parse a `v-for` alias: `item`, `(item, index)` or `(value, key, index)`.
pub fn parse_alias(source: &str) -> Result<Vec<String>, SyntaxError> {
    let mut pairs = ExprParser::parse(Rule::alias, source)?;
    let root = pairs
        .next()
        .ok_or_else(|| SyntaxError("empty alias".into()))?;
    Ok(root
        .into_inner()
        .filter(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .collect())
}

fn build_expr(pair: Pair<Rule>) -> Result<Expr, SyntaxError> {
    match pair.as_rule() {
        Rule::arrow => {
            let mut inner = pair.into_inner();
            let params = next_pair(&mut inner)?
                .into_inner()
                .map(|p| p.as_str().to_string())
                .collect();
            let body = build_expr(next_pair(&mut inner)?)?;
            Ok(Expr::Arrow(Arc::new(Lambda { params, body })))
        }
        Rule::assignment => {
            let mut inner = pair.into_inner();
            let target = build_expr(next_pair(&mut inner)?)?;
            if !target.is_assignable() {
                return Err(SyntaxError("invalid assignment target".into()));
            }
            let op = match next_pair(&mut inner)?.as_str() {
                "+=" => AssignOp::Add,
                "-=" => AssignOp::Sub,
                "*=" => AssignOp::Mul,
                "/=" => AssignOp::Div,
                _ => AssignOp::Assign,
            };
            let value = build_expr(next_pair(&mut inner)?)?;
            Ok(Expr::Assign(Box::new(target), op, Box::new(value)))
        }
        Rule::conditional => {
            let mut inner = pair.into_inner();
            let test = build_expr(next_pair(&mut inner)?)?;
            match (inner.next(), inner.next()) {
                (Some(cons), Some(alt)) => Ok(Expr::Conditional(
                    Box::new(test),
                    Box::new(build_expr(cons)?),
                    Box::new(build_expr(alt)?),
                )),
                _ => Ok(test),
            }
        }
        Rule::nullish
        | Rule::logic_or
        | Rule::logic_and
        | Rule::equality
        | Rule::relational
        | Rule::additive
        | Rule::multiplicative => {
            let mut inner = pair.into_inner();
            let mut lhs = build_expr(next_pair(&mut inner)?)?;
            while let Some(op) = inner.next() {
                let op = binary_op(op.as_str())?;
                let rhs = build_expr(next_pair(&mut inner)?)?;
                lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
            }
            Ok(lhs)
        }
        Rule::unary => {
            let mut ops = Vec::new();
            let mut operand = None;
            for p in pair.into_inner() {
                match p.as_rule() {
                    Rule::op_unary => ops.push(match p.as_str() {
                        "!" => UnaryOp::Not,
                        "-" => UnaryOp::Neg,
                        _ => UnaryOp::Plus,
                    }),
                    _ => operand = Some(build_expr(p)?),
                }
            }
            let mut expr = operand.ok_or_else(|| SyntaxError("missing operand".into()))?;
            for op in ops.into_iter().rev() {
                expr = Expr::Unary(op, Box::new(expr));
            }
            Ok(expr)
        }
        Rule::postfix => {
            let mut inner = pair.into_inner();
            let mut expr = build_expr(next_pair(&mut inner)?)?;
            for suffix in inner {
                expr = match suffix.as_rule() {
                    Rule::member => {
                        let name = next_pair(&mut suffix.into_inner())?.as_str().to_string();
                        Expr::Member(Box::new(expr), name)
                    }
                    Rule::index => {
                        let key = build_expr(next_pair(&mut suffix.into_inner())?)?;
                        Expr::Index(Box::new(expr), Box::new(key))
                    }
                    _ => {
                        let args = suffix
                            .into_inner()
                            .map(build_expr)
                            .collect::<Result<Vec<_>, _>>()?;
                        Expr::Call(Box::new(expr), args)
                    }
                };
            }
            Ok(expr)
        }
        Rule::array => Ok(Expr::Array(
            pair.into_inner()
                .map(build_expr)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Rule::object => {
            let mut props = Vec::new();
            for prop in pair.into_inner() {
                let mut inner = prop.into_inner();
                let key_pair = next_pair(&mut inner)?;
                let key = match key_pair.as_rule() {
                    Rule::string => unescape(string_body(key_pair)),
                    _ => key_pair.as_str().to_string(),
                };
                // `{ foo }` is shorthand for `{ foo: foo }`
                let value = match inner.next() {
                    Some(v) => build_expr(v)?,
                    None => Expr::Ident(key.clone()),
                };
                props.push((key, value));
            }
            Ok(Expr::Object(props))
        }
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(Expr::Number)
            .map_err(|e| SyntaxError(e.to_string())),
        Rule::string => Ok(Expr::Str(unescape(string_body(pair)))),
        Rule::true_lit => Ok(Expr::Bool(true)),
        Rule::false_lit => Ok(Expr::Bool(false)),
        Rule::null_lit => Ok(Expr::Null),
        Rule::ident => Ok(Expr::Ident(pair.as_str().to_string())),
        rule => Err(SyntaxError(format!("unexpected {rule:?}"))),
    }
}

fn next_pair<'i>(
    pairs: &mut pest::iterators::Pairs<'i, Rule>,
) -> Result<Pair<'i, Rule>, SyntaxError> {
    pairs
        .next()
        .ok_or_else(|| SyntaxError("truncated expression".into()))
}

fn binary_op(op: &str) -> Result<BinaryOp, SyntaxError> {
    Ok(match op {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Rem,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "===" => BinaryOp::StrictEq,
        "!==" => BinaryOp::StrictNe,
        "&&" => BinaryOp::And,
        "||" => BinaryOp::Or,
        "??" => BinaryOp::Nullish,
        other => return Err(SyntaxError(format!("unknown operator `{other}`"))),
    })
}

fn string_body<'i>(pair: Pair<'i, Rule>) -> &'i str {
    pair.into_inner().next().map(|p| p.as_str()).unwrap_or("")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
