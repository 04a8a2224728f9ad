//! Expression evaluation.
//!
//! Expressions only read the environment: `call` is a statement, so nothing
//! evaluated here can bind a name.  Every operator works on numbers; strings
//! take part only when their text parses as a number.  Boolean results are
//! the numbers `1` and `0`.

use log::debug;

use crate::ast::{CompareOp, Expr, SumOp, TermOp, UnaryOp};
use crate::environment::Environment;
use crate::error::ErrorKind;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// Convenient alias for evaluator results.
pub type EvalResult<T> = Result<T, ErrorKind>;

/// Reduce `expr` to a value against `env`.
pub fn evaluate(expr: &Expr, env: &Environment) -> EvalResult<Value> {
    ensure_sufficient_stack(|| reduce(expr, env))
}

fn reduce(expr: &Expr, env: &Environment) -> EvalResult<Value> {
    let value = match expr {
        Expr::Number(n) => Value::Number(*n),

        Expr::Str(s) => Value::String(s.clone()),

        Expr::Identifier(name) => {
            debug!("Looking up variable '{}'", name);
            env.get(name)?
        }

        Expr::Group(inner) => evaluate(inner, env)?,

        // Both sides are always evaluated; there is no short circuit.
        Expr::Disjunction(left, right) => {
            let l = evaluate(left, env)?.is_truthy()?;
            let r = evaluate(right, env)?.is_truthy()?;
            Value::from_bool(l || r)
        }

        Expr::Conjunction(left, right) => {
            let l = evaluate(left, env)?.is_truthy()?;
            let r = evaluate(right, env)?.is_truthy()?;
            Value::from_bool(l && r)
        }

        Expr::Comparison(left, op, right) => {
            let (l, r) = operands(left, right, env)?;
            Value::from_bool(compare(l, *op, r))
        }

        Expr::Sum(left, op, right) => {
            let (l, r) = operands(left, right, env)?;
            Value::Number(match op {
                SumOp::Add => l + r,
                SumOp::Sub => l - r,
            })
        }

        Expr::Term(left, op, right) => {
            let (l, r) = operands(left, right, env)?;
            match op {
                TermOp::Mul => Value::Number(l * r),
                TermOp::Div => {
                    if r == 0.0 {
                        debug!("Division of {} by zero", l);
                        return Err(ErrorKind::Arithmetic("division by zero".to_string()));
                    }
                    Value::Number(l / r)
                }
            }
        }

        Expr::Power(base, exponent) => {
            let b = evaluate(base, env)?.as_number()?;
            let e = match exponent {
                Some(exponent) => evaluate(exponent, env)?.as_number()?,
                None => 1.0,
            };
            Value::Number(power(b, e)?)
        }

        Expr::Unary(UnaryOp::Negate, operand) => {
            Value::Number(-evaluate(operand, env)?.as_number()?)
        }
    };

    debug!("Expression evaluated to: {}", value);
    Ok(value)
}

fn operands(left: &Expr, right: &Expr, env: &Environment) -> EvalResult<(f64, f64)> {
    let l = evaluate(left, env)?.as_number()?;
    let r = evaluate(right, env)?.as_number()?;
    Ok((l, r))
}

fn compare(l: f64, op: CompareOp, r: f64) -> bool {
    match op {
        CompareOp::Equal => l == r,
        CompareOp::NotEqual => l != r,
        CompareOp::Less => l < r,
        CompareOp::Greater => l > r,
        CompareOp::LessEqual => l <= r,
        CompareOp::GreaterEqual => l >= r,
    }
}

/// `powf`, except that finite operands must give a finite result.
fn power(base: f64, exponent: f64) -> EvalResult<f64> {
    let result = base.powf(exponent);

    if base.is_finite() && exponent.is_finite() && !result.is_finite() {
        return Err(ErrorKind::Arithmetic(format!(
            "{} ^ {} has no finite value",
            base, exponent
        )));
    }

    Ok(result)
}
