//! Tree-walking interpreter for compiled expressions.
//!
//! Values follow the coercion rules of the dynamic templating language the
//! expressions are written in: `+` concatenates when either side is a string,
//! `==` compares loosely, `&&`/`||` return operands, and member access on an
//! absent or null receiver yields absent instead of failing.

use serde_json::{Map, Value};
use strsim::levenshtein;

use super::error::ExprError;
use super::parser::{BinaryOp, Expr, LogicalOp, UnaryOp};
use super::scope::{Binding, Scope, member};
use crate::codec;

/// Evaluated result; `None` is absent.
pub type Evaluated = Option<Value>;

pub(crate) fn eval(expr: &Expr, scope: &Scope<'_>) -> Result<Evaluated, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(Some(value.clone())),
        Expr::Undefined => Ok(None),
        Expr::Path(segments) => {
            let found = scope.lookup_path(segments);
            if found.is_none() {
                tracing::trace!(path = %segments.join("."), "path resolved to absent");
            }
            Ok(found)
        }
        Expr::Member { object, property } => {
            let receiver = eval(object, scope)?;
            let key = codec::display(eval(property, scope)?.as_ref());
            Ok(receiver.and_then(|r| member(&r, &key)))
        }
        Expr::Call { callee, args } => call(callee, args, scope),
        Expr::Unary { op, operand } => {
            let value = eval(operand, scope)?;
            match op {
                UnaryOp::Not => Ok(Some(Value::Bool(!is_truthy(value.as_ref())))),
                UnaryOp::Negate => number_result(-to_number(value.as_ref()), "-"),
                UnaryOp::Plus => number_result(to_number(value.as_ref()), "+"),
            }
        }
        Expr::Binary { op, left, right } => {
            let left = eval(left, scope)?;
            let right = eval(right, scope)?;
            binary(*op, left.as_ref(), right.as_ref())
        }
        Expr::Logical { op, left, right } => {
            let left = eval(left, scope)?;
            let short_circuit = match op {
                LogicalOp::And => !is_truthy(left.as_ref()),
                LogicalOp::Or => is_truthy(left.as_ref()),
                LogicalOp::Coalesce => !matches!(left, None | Some(Value::Null)),
            };
            if short_circuit { Ok(left) } else { eval(right, scope) }
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if is_truthy(eval(test, scope)?.as_ref()) {
                eval(consequent, scope)
            } else {
                eval(alternate, scope)
            }
        }
        Expr::Array(items) => {
            let values = items
                .iter()
                .map(|item| Ok(eval(item, scope)?.unwrap_or(Value::Null)))
                .collect::<Result<Vec<_>, ExprError>>()?;
            Ok(Some(Value::Array(values)))
        }
        Expr::Object(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                // absent members are dropped, as a JSON encoder would
                if let Some(value) = eval(value, scope)? {
                    map.insert(key.clone(), value);
                }
            }
            Ok(Some(Value::Object(map)))
        }
    }
}

fn call(callee: &Expr, args: &[Expr], scope: &Scope<'_>) -> Result<Evaluated, ExprError> {
    let args = args
        .iter()
        .map(|arg| eval(arg, scope))
        .collect::<Result<Vec<_>, ExprError>>()?;

    match callee {
        Expr::Path(segments) if segments.len() == 1 => {
            let name = &segments[0];
            match scope.resolve(name) {
                Some(Binding::Helper(function)) => Ok(function(&args)),
                Some(Binding::Value(_)) => Err(ExprError::NotCallable { name: name.clone() }),
                None => {
                    // unknown bare calls are silent no-ops
                    if let Some(similar) = closest_helper(name, scope) {
                        tracing::debug!("Unknown helper '{}' (did you mean '{}'?)", name, similar);
                    }
                    Ok(None)
                }
            }
        }
        Expr::Path(segments) => {
            let (method, receiver) = segments.split_last().ok_or_else(|| ExprError::NotCallable {
                name: String::new(),
            })?;
            call_method(scope.lookup_path(receiver), method, &args)
        }
        Expr::Member { object, property } => {
            let receiver = eval(object, scope)?;
            let method = codec::display(eval(property, scope)?.as_ref());
            call_method(receiver, &method, &args)
        }
        _ => Err(ExprError::NotCallable {
            name: "expression result".to_string(),
        }),
    }
}

fn closest_helper<'a>(name: &str, scope: &Scope<'a>) -> Option<&'a str> {
    scope
        .helpers
        .names()
        .map(|candidate| (candidate, levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= name.len() / 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

fn call_method(receiver: Evaluated, method: &str, args: &[Evaluated]) -> Result<Evaluated, ExprError> {
    let arg = |i: usize| args.get(i).and_then(Option::as_ref);

    let Some(receiver) = receiver else {
        return Ok(None);
    };

    match (&receiver, method) {
        (Value::Null, _) => Ok(None),
        (Value::String(s), "toUpperCase") => Ok(Some(Value::String(s.to_uppercase()))),
        (Value::String(s), "toLowerCase") => Ok(Some(Value::String(s.to_lowercase()))),
        (Value::String(s), "trim") => Ok(Some(Value::String(s.trim().to_string()))),
        (Value::String(s), "includes") => {
            Ok(Some(Value::Bool(s.contains(&codec::display(arg(0))))))
        }
        (Value::String(s), "indexOf") => {
            let needle = codec::display(arg(0));
            let position = s
                .find(&needle)
                .map_or(-1, |byte| s[..byte].chars().count() as i64);
            Ok(Some(Value::from(position)))
        }
        (Value::Array(items), "includes") => {
            let needle = arg(0);
            Ok(Some(Value::Bool(items.iter().any(|item| strict_eq(Some(item), needle)))))
        }
        (Value::Array(items), "indexOf") => {
            let needle = arg(0);
            let position = items
                .iter()
                .position(|item| strict_eq(Some(item), needle))
                .map_or(-1, |i| i as i64);
            Ok(Some(Value::from(position)))
        }
        (Value::Array(items), "join") => {
            let separator = arg(0).map_or_else(|| ",".to_string(), |s| codec::display(Some(s)));
            Ok(Some(Value::String(join(items, &separator))))
        }
        (Value::Array(items), "toString") => Ok(Some(Value::String(join(items, ",")))),
        (_, "toString") => Ok(Some(Value::String(codec::display(Some(&receiver))))),
        _ => Err(ExprError::UnknownMethod {
            method: method.to_string(),
            receiver: type_name(&receiver),
        }),
    }
}

fn join(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => codec::display(Some(other)),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn binary(op: BinaryOp, left: Option<&Value>, right: Option<&Value>) -> Result<Evaluated, ExprError> {
    let symbol = op.symbol();
    match op {
        BinaryOp::Add => {
            if matches!(left, Some(Value::String(_))) || matches!(right, Some(Value::String(_))) {
                Ok(Some(Value::String(format!("{}{}", to_text(left), to_text(right)))))
            } else {
                number_result(to_number(left) + to_number(right), symbol)
            }
        }
        BinaryOp::Sub => number_result(to_number(left) - to_number(right), symbol),
        BinaryOp::Mul => number_result(to_number(left) * to_number(right), symbol),
        BinaryOp::Div => number_result(to_number(left) / to_number(right), symbol),
        BinaryOp::Rem => number_result(to_number(left) % to_number(right), symbol),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (left, right) {
                (Some(Value::String(a)), Some(Value::String(b))) => Some(a.cmp(b)),
                _ => to_number(left).partial_cmp(&to_number(right)),
            };
            let result = ordering.is_some_and(|ordering| match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            });
            Ok(Some(Value::Bool(result)))
        }
        BinaryOp::LooseEq => Ok(Some(Value::Bool(loose_eq(left, right)))),
        BinaryOp::LooseNe => Ok(Some(Value::Bool(!loose_eq(left, right)))),
        BinaryOp::StrictEq => Ok(Some(Value::Bool(strict_eq(left, right)))),
        BinaryOp::StrictNe => Ok(Some(Value::Bool(!strict_eq(left, right)))),
    }
}

/// Truthiness: absent, `null`, `false`, `0`, NaN and `""` are falsy; every
/// array and object (even empty ones) is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

fn to_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        other => codec::display(other),
    }
}

/// Convert an arithmetic result back into a JSON number.
fn number_result(n: f64, operator: &'static str) -> Result<Evaluated, ExprError> {
    if !n.is_finite() {
        return Err(ExprError::NonFinite { operator });
    }
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Ok(Some(Value::from(n as i64)));
    }
    Ok(serde_json::Number::from_f64(n).map(Value::Number))
}

fn strict_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

fn loose_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        (None | Some(Value::Null), _) | (_, None | Some(Value::Null)) => false,
        (Some(Value::Number(_)), Some(Value::String(_) | Value::Bool(_)))
        | (Some(Value::String(_) | Value::Bool(_)), Some(Value::Number(_)))
        | (Some(Value::Bool(_)), Some(Value::String(_)))
        | (Some(Value::String(_)), Some(Value::Bool(_))) => to_number(left) == to_number(right),
        _ => strict_eq(left, right),
    }
}
