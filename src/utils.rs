//! Common small functions used throughout the crate
//!
//! Mostly number formatting. The engine is picky about how numbers appear in
//! its input files, and golden files written by older tools are compared line
//! for line, so every float that ends up on disk goes through one of the
//! [NumberFmt] methods.

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Number of exponent digits the engine writes (Windows C runtime style)
pub const EXPONENT_DIGITS: usize = 3;

/// Extends `f64` with the formatting flavours used by the file formats
pub trait NumberFmt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition of both the precision and exponent padding.
    ///
    /// ```rust
    /// # use mcxray::utils::NumberFmt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0e-10_f64).sci(3, 3), "1.000e-010".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Fixed decimal places, exactly like `%.Nf`
    ///
    /// ```rust
    /// # use mcxray::utils::NumberFmt;
    /// assert_eq!(500.0_f64.fixed(6), "500.000000");
    /// ```
    fn fixed(&self, precision: usize) -> String;

    /// Fixed decimal places with redundant trailing zeros removed
    ///
    /// At least one digit is always kept after the decimal point.
    ///
    /// ```rust
    /// # use mcxray::utils::NumberFmt;
    /// assert_eq!(20.0_f64.fixed_trimmed(6), "20.0");
    /// assert_eq!(0.3_f64.fixed_trimmed(6), "0.3");
    /// assert_eq!(1.234567_f64.fixed_trimmed(6), "1.234567");
    /// ```
    fn fixed_trimmed(&self, precision: usize) -> String;

    /// Significant digits, exactly like `%.Ng`, with padded exponents
    ///
    /// Values with a decimal exponent below -4 or at least `precision` are
    /// written in scientific notation, everything else as a plain decimal.
    /// Trailing zeros are removed in both cases.
    ///
    /// ```rust
    /// # use mcxray::utils::NumberFmt;
    /// assert_eq!(1e-10_f64.general(6, 3), "1e-010");
    /// assert_eq!(200.0_f64.general(6, 3), "200");
    /// assert_eq!(0.3_f64.general(6, 3), "0.3");
    /// ```
    fn general(&self, precision: usize, exp_pad: usize) -> String;
}

impl NumberFmt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let num = f!("{:.precision$e}", self, precision = precision);
        match num.split_once('e') {
            Some((mantissa, exp)) => f!("{mantissa}{}", pad_exponent(exp, exp_pad)),
            None => num,
        }
    }

    fn fixed(&self, precision: usize) -> String {
        f!("{:.precision$}", self, precision = precision)
    }

    fn fixed_trimmed(&self, precision: usize) -> String {
        let mut num = self.fixed(precision);
        if num.contains('.') {
            let trimmed = num.trim_end_matches('0').len();
            num.truncate(trimmed);
            if num.ends_with('.') {
                num.push('0');
            }
        }
        num
    }

    fn general(&self, precision: usize, exp_pad: usize) -> String {
        if *self == 0.0 {
            return if self.is_sign_negative() { "-0" } else { "0" }.to_string();
        }
        if !self.is_finite() {
            return f!("{self}");
        }

        // %g treats a precision of zero as one
        let precision = precision.max(1);

        // rounding to the significant digits first gives the true exponent
        let num = self.sci(precision - 1, 1);
        let (mantissa, exp) = match num.split_once('e') {
            Some(pair) => pair,
            None => return num,
        };
        let exponent: i32 = exp.parse().unwrap_or(0);

        if exponent < -4 || exponent >= precision as i32 {
            f!("{}{}", strip_zeros(mantissa), pad_exponent(exp, exp_pad))
        } else {
            let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
            strip_zeros(&self.fixed(decimals)).to_string()
        }
    }
}

/// Rewrites an exponent such as `-5` or `+10` as `e-005`/`e+010`
///
/// The sign is always explicit and the digits are zero-padded to `pad`.
///
/// ```rust
/// # use mcxray::utils::pad_exponent;
/// assert_eq!(pad_exponent("-5", 2), "e-05");
/// assert_eq!(pad_exponent("10", 3), "e+010");
/// ```
pub fn pad_exponent(exp: &str, pad: usize) -> String {
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp.trim_start_matches('+')),
    };
    f!("e{}{:0>pad$}", sign, digits, pad = pad)
}

/// Drop trailing zeros, and the point itself if nothing is left after it
fn strip_zeros(num: &str) -> &str {
    if num.contains('.') {
        num.trim_end_matches('0').trim_end_matches('.')
    } else {
        num
    }
}
