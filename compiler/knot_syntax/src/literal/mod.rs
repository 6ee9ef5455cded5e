//! Literal inference for bare tokens.
//!
//! Priority order: reserved words, then the numeric grammar, then plain
//! string. Reserved words match case-insensitively.
//!
//! Numeric grammar:
//! - `0x[0-9a-f]+` → integer, base 16
//! - `0[0-7]+` → integer, base 8
//! - `[+-]?[0-9]+` → integer, base 10
//! - `[+-]?[0-9]*\.?[0-9]+([eE][+-]?[0-9]+)?` → float

use knot_ir::Scalar;

const RESERVED_WORDS: [&str; 8] = [
    "nil",
    "null",
    "true",
    "false",
    "infinity",
    "+infinity",
    "-infinity",
    "nan",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NumberShape {
    Hex,
    Octal,
    Decimal,
    Float,
}

/// Whether `text` case-insensitively equals a reserved word.
pub fn is_reserved_word(text: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(text))
}

/// Whether `text` matches the numeric grammar (and would be read as a number).
pub fn is_numeric_literal(text: &str) -> bool {
    number_shape(text).is_some()
}

/// Classify a trimmed, non-empty bare token.
pub fn classify(token: &str) -> Scalar {
    if let Some(reserved) = reserved(token) {
        return reserved;
    }
    match number_shape(token) {
        Some(shape) => number(token, shape).unwrap_or_else(|| Scalar::Str(token.to_owned())),
        None => Scalar::Str(token.to_owned()),
    }
}

fn reserved(token: &str) -> Option<Scalar> {
    let lowered = token.to_ascii_lowercase();
    let scalar = match lowered.as_str() {
        "nil" | "null" => Scalar::Nil,
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        "infinity" | "+infinity" => Scalar::Float(f64::INFINITY),
        "-infinity" => Scalar::Float(f64::NEG_INFINITY),
        "nan" => Scalar::Float(f64::NAN),
        _ => return None,
    };
    Some(scalar)
}

fn number(token: &str, shape: NumberShape) -> Option<Scalar> {
    match shape {
        // Up to 16 digits, wrapping into the sign bit like a raw 64-bit word.
        NumberShape::Hex => u64::from_str_radix(&token[2..], 16)
            .ok()
            .map(|bits| Scalar::Int(bits as i64)),
        NumberShape::Octal => i64::from_str_radix(&token[1..], 8).ok().map(Scalar::Int),
        NumberShape::Decimal => match token.parse::<i64>() {
            Ok(n) => Some(Scalar::Int(n)),
            Err(_) => token.parse::<f64>().ok().map(Scalar::Float),
        },
        NumberShape::Float => token.parse::<f64>().ok().map(Scalar::Float),
    }
}

fn number_shape(text: &str) -> Option<NumberShape> {
    let bytes = text.as_bytes();
    if let [b'0', b'x' | b'X', digits @ ..] = bytes {
        return (!digits.is_empty() && digits.iter().all(u8::is_ascii_hexdigit))
            .then_some(NumberShape::Hex);
    }
    if let [b'0', digits @ ..] = bytes {
        if !digits.is_empty() && digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return Some(NumberShape::Octal);
        }
    }

    let unsigned = match bytes {
        [b'+' | b'-', rest @ ..] => rest,
        _ => bytes,
    };
    let int_digits = leading_digits(unsigned);
    if int_digits > 0 && int_digits == unsigned.len() {
        return Some(NumberShape::Decimal);
    }

    let mut rest = &unsigned[int_digits..];
    if let [b'.', fraction @ ..] = rest {
        let frac_digits = leading_digits(fraction);
        if frac_digits == 0 {
            return None;
        }
        rest = &fraction[frac_digits..];
    } else if int_digits == 0 {
        return None;
    }

    match rest {
        [] => Some(NumberShape::Float),
        [b'e' | b'E', exponent @ ..] => {
            let exponent = match exponent {
                [b'+' | b'-', digits @ ..] => digits,
                _ => exponent,
            };
            let exp_digits = leading_digits(exponent);
            (exp_digits > 0 && exp_digits == exponent.len()).then_some(NumberShape::Float)
        }
        _ => None,
    }
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
