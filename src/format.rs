/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

/// Distance under which a result is shown as zero or as the nearest integer
pub const SNAP_EPSILON: f64 = 1e-12;

/// Default number of significant digits in a displayed result
pub const DEFAULT_PRECISION: usize = 14;

/// Format `value` for display with at most `precision` significant digits.
///
/// Values within `SNAP_EPSILON` of zero print as `0` and values within
/// `SNAP_EPSILON` of an integer print as that integer. Very large or very
/// small magnitudes switch to exponent notation.
pub fn format_number(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() < SNAP_EPSILON {
        return "0".to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    if exponent < -6 || exponent >= precision as i32 {
        return format_exponent(value, precision);
    }

    let rounded = value.round();
    if (value - rounded).abs() < SNAP_EPSILON {
        return format!("{rounded:.0}");
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    let text = trim_fraction(&format!("{value:.decimals$}"));
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn format_exponent(value: f64, precision: usize) -> String {
    let text = format!("{:.*e}", precision - 1, value);
    match text.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
        None => text,
    }
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Parse a displayed result back into a number
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
