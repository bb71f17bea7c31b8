//! Number parsing for command arguments.
//!
//! These follow the C library's prefix rules: a number is read from the front of the token
//! and whatever follows it is handed back (or ignored) rather than being an error on its own.

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, hex_digit0, hex_digit1, one_of},
    combinator::{opt, recognize},
    error::{Error, ErrorKind},
    number::complete::double,
    sequence::{pair, preceded},
    IResult,
};

use crate::plat::{SResult, SuperError};

/// Parses a leading floating point number, returning it and the unparsed rest of the token.
fn float_prefix(inp: &str) -> IResult<&str, f64> {
    double(inp)
}

/// Parses a hexadecimal float such as `0x10` or `0x1.8p3`; the binary exponent is optional.
fn hex_float(inp: &str) -> IResult<&str, f64> {
    let (inp, sign) = opt(one_of("+-"))(inp)?;
    let (inp, _) = tag_no_case("0x")(inp)?;
    let (inp, int) = hex_digit0(inp)?;
    let (inp, frac) = opt(preceded(char('.'), hex_digit0))(inp)?;
    let frac = frac.unwrap_or("");
    if int.is_empty() && frac.is_empty() {
        return Err(nom::Err::Error(Error::new(inp, ErrorKind::HexDigit)));
    }
    let (inp, exp) = opt(preceded(one_of("pP"), decimal))(inp)?;

    let mut mantissa = 0.0;
    for d in int.chars().filter_map(|c| c.to_digit(16)) {
        mantissa = mantissa * 16.0 + f64::from(d);
    }
    let mut place = 1.0 / 16.0;
    for d in frac.chars().filter_map(|c| c.to_digit(16)) {
        mantissa += f64::from(d) * place;
        place /= 16.0;
    }
    let exp = exp.map_or(0, decimal_prefix);
    let value = mantissa * 2f64.powi(exp);
    Ok((inp, if sign == Some('-') { -value } else { value }))
}

fn decimal(inp: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(inp)
}

fn hex(inp: &str) -> IResult<&str, &str> {
    let (inp, _) = opt(tag_no_case("0x"))(inp)?;
    hex_digit1(inp)
}

/// Parses a clock frequency in Hz, in decimal or `0x` hexadecimal. A unit suffix of `k`, `m` or `g` (either case) scales it;
/// only the first character after the number is looked at, so `4MHz` is 4e6.
///
/// # Errors
///
/// Returns [`SuperError::BadFrequency`] if the token doesn't start with a number and
/// [`SuperError::UnitSuffix`] if the number is followed by anything else.
pub fn frequency(token: &str) -> SResult<f64> {
    let (rest, f) =
        alt((hex_float, float_prefix))(token).map_err(|_| SuperError::BadFrequency)?;
    let scale = match rest.chars().next() {
        None => 1.0,
        Some('k' | 'K') => 1e3,
        Some('m' | 'M') => 1e6,
        Some('g' | 'G') => 1e9,
        Some(_) => return Err(SuperError::UnitSuffix),
    };
    Ok(f * scale)
}

/// Reads a leading signed decimal integer, saturating at the bounds of `i32`. No digits reads as 0.
pub fn decimal_prefix(token: &str) -> i32 {
    let Ok((_, digits)) = decimal(token) else {
        return 0;
    };
    match digits.parse::<i64>() {
        Ok(n) => n.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        Err(_) if digits.starts_with('-') => i32::MIN,
        Err(_) => i32::MAX,
    }
}

/// Reads a leading hexadecimal address, with or without `0x`. No digits reads as 0;
/// anything wider than 16 bits keeps its low 16 bits.
pub fn hex_prefix(token: &str) -> u16 {
    let Ok((_, digits)) = hex(token) else {
        return 0;
    };
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0u16, |acc, d| acc.wrapping_shl(4) | d as u16)
}
