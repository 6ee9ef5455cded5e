//! Math library. Every function takes and returns doubles except `sign`.

use knot_ir::NodeId;

use super::{eval_args, float_args, floats, BuiltinRegistry};
use crate::errors::{Arity, EvalResult};
use crate::interpreter::Runner;
use crate::value::Value;

/// One-argument functions that map a double to a double.
macro_rules! unary_math {
    ($($func:ident => $name:literal, $op:expr;)*) => {
        $(
            fn $func(runner: &mut Runner, node: NodeId) -> EvalResult {
                let [x] = float_args::<1>(runner, node, $name)?;
                Ok(Value::Float($op(x)))
            }
        )*

        fn register_unary(registry: &mut BuiltinRegistry) {
            $(registry.register($name, $func, false);)*
        }
    };
}

unary_math! {
    floor => "floor", f64::floor;
    ceil => "ceil", f64::ceil;
    round => "round", f64::round_ties_even;
    truncate => "truncate", f64::trunc;
    abs => "abs", f64::abs;
    exp => "exp", f64::exp;
    sqrt => "sqrt", f64::sqrt;
    log10 => "log10", f64::log10;
    sin => "sin", f64::sin;
    cos => "cos", f64::cos;
    tan => "tan", f64::tan;
    asin => "asin", f64::asin;
    acos => "acos", f64::acos;
    sinh => "sinh", f64::sinh;
    cosh => "cosh", f64::cosh;
    tanh => "tanh", f64::tanh;
}

pub(super) fn register(registry: &mut BuiltinRegistry) {
    register_unary(registry);
    registry.register("sign", sign, false);
    registry.register("log", log, false);
    registry.register("atan", atan, false);
    registry.register("pow", pow, false);
    registry.register("min", min, false);
    registry.register("max", max, false);
}

/// `-1`, `0` or `1`. NaN has no sign and yields `0`.
fn sign(runner: &mut Runner, node: NodeId) -> EvalResult {
    let [x] = float_args::<1>(runner, node, "sign")?;
    let sign = if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    };
    Ok(Value::Int(sign))
}

/// Natural log, or `log(x, base)`.
fn log(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "log", Arity::Between(1, 2))?;
    let x = args[0].to_float()?;
    Ok(Value::Float(match args.get(1) {
        Some(base) => x.log(base.to_float()?),
        None => x.ln(),
    }))
}

/// `atan(x)`, or `atan(y, x)` for the angle of the point `(x, y)`.
fn atan(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "atan", Arity::Between(1, 2))?;
    let y = args[0].to_float()?;
    Ok(Value::Float(match args.get(1) {
        Some(x) => y.atan2(x.to_float()?),
        None => y.atan(),
    }))
}

/// Left fold: `pow(2, 3, 2)` is `(2^3)^2`.
fn pow(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "pow", Arity::AtLeast(2))?;
    reduce(&floats(&args)?, f64::powf)
}

fn min(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "min", Arity::AtLeast(1))?;
    reduce(&floats(&args)?, f64::min)
}

fn max(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "max", Arity::AtLeast(1))?;
    reduce(&floats(&args)?, f64::max)
}

fn reduce(numbers: &[f64], op: fn(f64, f64) -> f64) -> EvalResult {
    let folded = numbers[1..].iter().fold(numbers[0], |acc, &x| op(acc, x));
    Ok(Value::Float(folded))
}
