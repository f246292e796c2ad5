//! Numbers: IEEE-754 doubles with a `[0, 100]` small-integer cache.
//!
//! Pinned from `examples/original_source/source/types/Number.cpp`: the
//! cache covers integers `0..=100` inclusive, and `round(ndigits)` uses the
//! exact `factor = 10^(ndigits - ceil(log10(|v|)))` formula from that file.

use std::rc::Rc;
use std::sync::OnceLock;

use crate::intern::SMALL_INT_CACHE_MAX;

/// A shared handle to a number. Numbers in `[0, 100]` share one `Rc` per
/// integer value, so two independent evaluations producing the same small
/// integer end up pointer-identical.
pub type NumberBox = Rc<f64>;

struct Cache {
    numbers: Vec<NumberBox>,
}

static CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    CACHE.get_or_init(|| Cache {
        numbers: (0..=SMALL_INT_CACHE_MAX).map(|n| Rc::new(n as f64)).collect(),
    })
}

/// Returns a shared handle for `v`, reusing the small-integer cache when
/// `v` is a non-negative integer `<= 100`.
pub fn make_number(v: f64) -> NumberBox {
    if v >= 0.0 && v <= SMALL_INT_CACHE_MAX as f64 && v.fract() == 0.0 {
        cache().numbers[v as usize].clone()
    } else {
        Rc::new(v)
    }
}

/// Default double formatting: shortest round-trip; bare integers print
/// without a fraction.
pub fn number_to_s(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity".to_owned() } else { "-Infinity".to_owned() };
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let mut buf = ryu::Buffer::new();
        buf.format(v).to_owned()
    }
}

/// `round(ndigits)` away-from-zero (Open Question (a), resolved in
/// `DESIGN.md`). `ndigits == 0` is a plain round; `ndigits > 0` rounds to
/// that many digits after the decimal point; `ndigits < 0` rounds to that
/// many digits before it, matching the original's nested-call behavior.
pub fn round(v: f64, ndigits: i64) -> f64 {
    if v == 0.0 {
        return v;
    }
    if ndigits == 0 {
        return v.round();
    }
    if ndigits > 0 {
        round_at(v, ndigits as f64)
    } else {
        round_at(v, -ndigits as f64).round()
    }
}

fn round_at(v: f64, ndigits: f64) -> f64 {
    let factor = 10f64.powf(ndigits - v.abs().log10().ceil());
    (v * factor).round() / factor
}

pub trait NumberExt {
    fn get(&self) -> f64;
    fn to_s(&self) -> String;
}

impl NumberExt for NumberBox {
    fn get(&self) -> f64 {
        **self
    }

    fn to_s(&self) -> String {
        number_to_s(**self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_non_negative_integers_are_interned() {
        let a = make_number(7.0);
        let b = make_number(7.0);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn values_outside_cache_are_not_interned() {
        let a = make_number(101.0);
        let b = make_number(101.0);
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn integers_print_without_fraction() {
        assert_eq!(number_to_s(3.0), "3");
        assert_eq!(number_to_s(-4.0), "-4");
    }

    #[test]
    fn round_zero_digits() {
        assert_eq!(round(2.5, 0), 3.0);
        assert_eq!(round(-2.5, 0), -3.0);
    }

    #[test]
    fn round_positive_digits() {
        // `ndigits` counts significant digits from the formula's
        // `ceil(log10(|v|))` term, not decimal places: `ceil(log10(3.14159))
        // == 1`, so `ndigits = 2` rounds to one decimal place (`3.1`) and
        // `ndigits = 3` is the one that lands on `3.14`.
        assert!((round(3.14159, 2) - 3.1).abs() < 1e-9);
        assert!((round(3.14159, 3) - 3.14).abs() < 1e-9);
    }

    #[test]
    fn round_negative_digits() {
        assert_eq!(round(1234.0, -2), 1200.0);
    }
}
