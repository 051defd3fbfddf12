//! Evaluación del AST contra `ProcessData`.

use std::cmp::Ordering;

use flowgate_core::ProcessData;
use serde_json::Value;

use crate::error::RuleError;
use crate::parser::{CmpOp, Expr};

/// `false`, `null`, `0` y `""` son falsos; el resto es verdadero.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn eval(expr: &Expr, data: &ProcessData) -> Result<Value, RuleError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Var(name) => Ok(data.get_path(name).cloned().unwrap_or(Value::Null)),
        Expr::Not(inner) => Ok(Value::Bool(!truthy(&eval(inner, data)?))),
        Expr::Neg(inner) => {
            let v = eval(inner, data)?;
            if let Some(i) = v.as_i64().and_then(i64::checked_neg) {
                return Ok(Value::from(i));
            }
            v.as_f64()
             .and_then(|f| serde_json::Number::from_f64(-f))
             .map(Value::Number)
             .ok_or_else(|| RuleError::BadOperand(describe(&v)))
        }
        Expr::And(l, r) => {
            if !truthy(&eval(l, data)?) {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(truthy(&eval(r, data)?)))
        }
        Expr::Or(l, r) => {
            if truthy(&eval(l, data)?) {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(truthy(&eval(r, data)?)))
        }
        Expr::Cmp(op, l, r) => {
            let left = eval(l, data)?;
            let right = eval(r, data)?;
            compare(*op, &left, &right).map(Value::Bool)
        }
    }
}

fn compare(op: CmpOp, left: &Value, right: &Value) -> Result<bool, RuleError> {
    match op {
        CmpOp::Eq => Ok(equals(left, right)),
        CmpOp::Ne => Ok(!equals(left, right)),
        _ => {
            let ord = order(left, right).ok_or_else(|| RuleError::TypeMismatch { left: describe(left),
                                                                                   op: op.symbol(),
                                                                                   right: describe(right) })?;
            Ok(match op {
                CmpOp::Lt => ord == Ordering::Less,
                CmpOp::Le => ord != Ordering::Greater,
                CmpOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            })
        }
    }
}

/// Los números se comparan por valor (`1 == 1.0`); el resto por igualdad JSON.
fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn describe(v: &Value) -> String {
    match v {
        Value::Null => "null".into(),
        Value::Bool(_) => "bool".into(),
        Value::Number(_) => "number".into(),
        Value::String(_) => "string".into(),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}
