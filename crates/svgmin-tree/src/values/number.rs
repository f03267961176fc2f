// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use super::Syntax;

/// Writes a number in its shortest form.
///
/// Leading and trailing zeros are removed: `0.50` becomes `.5`.
pub fn fmt_number(n: f64) -> String {
    if n == 0.0 || !n.is_finite() {
        return "0".to_string();
    }

    let mut s = n.to_string();
    if s.starts_with("0.") {
        s.remove(0);
    } else if s.starts_with("-0.") {
        s.remove(1);
    }

    s
}

/// Appends a number to a list, adding a separator only when required.
///
/// `1 -2` becomes `1-2` and `.5 .5` becomes `.5.5`.
pub(crate) fn push_number(s: &mut String, n: f64) {
    let text = fmt_number(n);

    let prev_is_number = s
        .as_bytes()
        .last()
        .map(|c| c.is_ascii_digit() || *c == b'.')
        .unwrap_or(false);

    if prev_is_number {
        let prev_has_dot = s
            .bytes()
            .rev()
            .take_while(|c| c.is_ascii_digit() || *c == b'.')
            .any(|c| c == b'.');

        let can_join = text.starts_with('-') || (text.starts_with('.') && prev_has_dot);
        if !can_join {
            s.push(' ');
        }
    }

    s.push_str(&text);
}

/// A `<number>` value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Number(pub f64);

impl Syntax for Number {
    fn parse(text: &str) -> Option<Self> {
        svgtypes::Number::from_str(text).ok().map(|n| Number(n.0))
    }

    fn write(&self) -> String {
        fmt_number(self.0)
    }
}

/// A `<number>` or a `<percentage>` value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Percentage {
    /// The number.
    pub number: f64,
    /// Whether the number is followed by `%`.
    pub is_percent: bool,
}

impl Syntax for Percentage {
    fn parse(text: &str) -> Option<Self> {
        let length = svgtypes::Length::from_str(text).ok()?;
        let is_percent = match length.unit {
            svgtypes::LengthUnit::None => false,
            svgtypes::LengthUnit::Percent => true,
            _ => return None,
        };

        Some(Percentage {
            number: length.number,
            is_percent,
        })
    }

    fn write(&self) -> String {
        let mut s = fmt_number(self.number);
        if self.is_percent {
            s.push('%');
        }
        s
    }
}

/// A number clamped to the `0..=1` range, like `opacity` or a gradient stop `offset`.
///
/// Percentages are converted into numbers.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Fraction(pub f64);

impl Syntax for Fraction {
    fn parse(text: &str) -> Option<Self> {
        let p = Percentage::parse(text)?;
        let n = if p.is_percent {
            p.number / 100.0
        } else {
            p.number
        };

        Some(Fraction(n.clamp(0.0, 1.0)))
    }

    fn write(&self) -> String {
        fmt_number(self.0)
    }
}
