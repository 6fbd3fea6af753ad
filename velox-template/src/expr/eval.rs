use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use super::ast::{BinaryOp, Expr, Lambda, UnaryOp};
use super::scope::{PathKey, Scope};
use super::value::{Function, Value};
use crate::error::EvalError;

impl Expr {
    pub fn eval(&self, scope: &Scope) -> Result<Value, EvalError> {
        match self {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::String(s.clone())),
            Expr::Ident(name) => scope
                .get(name)
                .ok_or_else(|| EvalError::Unbound(name.clone())),
            Expr::Array(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(|e| e.eval(scope))
                    .collect::<Result<_, _>>()?,
            )),
            Expr::Object(props) => {
                let mut map = IndexMap::with_capacity(props.len());
                for (k, e) in props {
                    map.insert(k.clone(), e.eval(scope)?);
                }
                Ok(Value::Object(map))
            }
            Expr::Member(obj, name) => member(&obj.eval(scope)?, name),
            Expr::Index(obj, key) => index(&obj.eval(scope)?, &key.eval(scope)?),
            Expr::Call(callee, args) => {
                let f = callee.eval(scope)?;
                let args = args
                    .iter()
                    .map(|a| a.eval(scope))
                    .collect::<Result<Vec<_>, _>>()?;
                match f {
                    Value::Function(f) => f.call(&args),
                    other => Err(EvalError::NotCallable(describe(callee, &other))),
                }
            }
            Expr::Unary(op, operand) => {
                let v = operand.eval(scope)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!v.is_truthy()),
                    UnaryOp::Neg => Value::Number(-v.to_number()),
                    UnaryOp::Plus => Value::Number(v.to_number()),
                })
            }
            Expr::Binary(lhs, op, rhs) => {
                let l = lhs.eval(scope)?;
                // short-circuit before touching the right side
                match op {
                    BinaryOp::And if !l.is_truthy() => return Ok(l),
                    BinaryOp::Or if l.is_truthy() => return Ok(l),
                    BinaryOp::Nullish if l != Value::Null => return Ok(l),
                    BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => return rhs.eval(scope),
                    _ => {}
                }
                Ok(binary(*op, &l, &rhs.eval(scope)?))
            }
            Expr::Conditional(test, cons, alt) => {
                if test.eval(scope)?.is_truthy() {
                    cons.eval(scope)
                } else {
                    alt.eval(scope)
                }
            }
            Expr::Arrow(lambda) => Ok(Value::Function(closure(lambda.clone(), scope.clone()))),
            Expr::Assign(target, op, value) => {
                let mut v = value.eval(scope)?;
                if let Some(bin) = op.binary() {
                    v = binary(bin, &target.eval(scope)?, &v);
                }
                target.assign(scope, v.clone())?;
                Ok(v)
            }
        }
    }

    /// Write `value` to the location this expression names.
    pub fn assign(&self, scope: &Scope, value: Value) -> Result<(), EvalError> {
        let mut path = Vec::new();
        let mut cursor = self;
        let root = loop {
            match cursor {
                Expr::Ident(name) => break name,
                Expr::Member(obj, name) => {
                    path.push(PathKey::Field(name.clone()));
                    cursor = obj.as_ref();
                }
                Expr::Index(obj, key) => {
                    let key = key.eval(scope)?;
                    path.push(match key.as_index() {
                        Some(i) => PathKey::Index(i),
                        None => PathKey::Field(key.to_display_string()),
                    });
                    cursor = obj.as_ref();
                }
                _ => return Err(EvalError::InvalidAssignment),
            }
        };
        path.reverse();
        trace!(root = %root, depth = path.len(), "assign");
        scope.assign(root, &path, value)
    }
}

fn closure(lambda: Arc<Lambda>, scope: Scope) -> Function {
    Function::new(move |args| {
        let bindings = lambda
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), args.get(i).cloned().unwrap_or_default()));
        lambda.body.eval(&scope.child(bindings))
    })
}

fn member(target: &Value, name: &str) -> Result<Value, EvalError> {
    match (target, name) {
        (Value::Object(map), _) => Ok(map.get(name).cloned().unwrap_or_default()),
        (Value::Array(items), "length") => Ok(Value::from(items.len())),
        (Value::String(s), "length") => Ok(Value::from(s.chars().count())),
        (Value::Null, _) => Err(EvalError::InvalidMember {
            target: "null".to_string(),
            property: name.to_string(),
        }),
        _ => Ok(Value::Null),
    }
}

fn index(target: &Value, key: &Value) -> Result<Value, EvalError> {
    match (target, key.as_index()) {
        (Value::Array(items), Some(i)) => Ok(items.get(i).cloned().unwrap_or_default()),
        (Value::String(s), Some(i)) => Ok(s
            .chars()
            .nth(i)
            .map(|c| Value::String(c.to_string()))
            .unwrap_or_default()),
        _ => member(target, &key.to_display_string()),
    }
}

fn binary(op: BinaryOp, l: &Value, r: &Value) -> Value {
    match op {
        BinaryOp::Add => match (l, r) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Value::String(l.to_display_string() + &r.to_display_string())
            }
            _ => Value::Number(l.to_number() + r.to_number()),
        },
        BinaryOp::Sub => Value::Number(l.to_number() - r.to_number()),
        BinaryOp::Mul => Value::Number(l.to_number() * r.to_number()),
        BinaryOp::Div => Value::Number(l.to_number() / r.to_number()),
        BinaryOp::Rem => Value::Number(l.to_number() % r.to_number()),
        BinaryOp::Lt => Value::Bool(compare(l, r, |o| o.is_lt())),
        BinaryOp::Le => Value::Bool(compare(l, r, |o| o.is_le())),
        BinaryOp::Gt => Value::Bool(compare(l, r, |o| o.is_gt())),
        BinaryOp::Ge => Value::Bool(compare(l, r, |o| o.is_ge())),
        BinaryOp::StrictEq => Value::Bool(strict_eq(l, r)),
        BinaryOp::StrictNe => Value::Bool(!strict_eq(l, r)),
        BinaryOp::Eq => Value::Bool(loose_eq(l, r)),
        BinaryOp::Ne => Value::Bool(!loose_eq(l, r)),
        // handled by the caller
        BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => Value::Null,
    }
}

fn compare(l: &Value, r: &Value, pred: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    let ordering = match (l, r) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => l.to_number().partial_cmp(&r.to_number()),
    };
    ordering.is_some_and(pred)
}

fn strict_eq(l: &Value, r: &Value) -> bool {
    l == r
}

fn loose_eq(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Number(_), Value::String(_) | Value::Bool(_))
        | (Value::String(_) | Value::Bool(_), Value::Number(_))
        | (Value::Bool(_), Value::String(_))
        | (Value::String(_), Value::Bool(_)) => l.to_number() == r.to_number(),
        _ => strict_eq(l, r),
    }
}

fn describe(callee: &Expr, value: &Value) -> String {
    match callee {
        Expr::Ident(name) => name.clone(),
        Expr::Member(_, name) => name.clone(),
        _ => value.type_name().to_string(),
    }
}
