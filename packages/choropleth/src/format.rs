//! Compact number formatting for legend labels.

/// Extra digits requested from the exact decimal expansion before
/// rounding. Far more than the gap between adjacent `f64` values at any
/// magnitude where a tie can occur.
const GUARD_DIGITS: usize = 30;

/// Formats `n` with precision that shrinks as magnitude grows.
///
/// | `abs(n)` | decimals |
/// |----------|----------|
/// | `>= 1000` | 0 |
/// | `>= 100`  | 1 |
/// | `>= 1`    | 2 |
/// | otherwise | 3 |
///
/// Rounding is half away from zero on the exact binary value, so
/// `0.0625` becomes `0.063` while `1.005` (really `1.00499…`) becomes
/// `1.00`. Non-finite values format as `NaN`, `Infinity` and
/// `-Infinity`.
#[must_use]
pub fn format_num(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let abs = n.abs();
    let decimals = if abs >= 1000.0 {
        0
    } else if abs >= 100.0 {
        1
    } else if abs >= 1.0 {
        2
    } else {
        3
    };

    to_fixed(n, decimals)
}

/// Fixed-point rendering with half-away-from-zero rounding.
fn to_fixed(value: f64, decimals: usize) -> String {
    let expanded = format!("{:.*}", decimals + GUARD_DIGITS, value.abs());
    let (int_part, frac_part) = expanded.split_once('.').unwrap_or((expanded.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();

    let round_up = frac_part
        .as_bytes()
        .get(decimals)
        .is_some_and(|digit| *digit >= b'5');
    if round_up {
        increment(&mut digits);
    }

    let int_len = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|d| char::from(*d)));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|d| char::from(*d)));
    }
    out
}

/// Adds one unit in the last place to a string of ASCII digits.
fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
