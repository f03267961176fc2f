// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgtypes::LengthUnit;

use super::{fmt_number, Syntax};

/// A `<length>` or a `<length-percentage>` value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Length(pub svgtypes::Length);

impl Length {
    /// Checks that the length is zero, regardless of the unit.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.number == 0.0
    }
}

fn unit_suffix(unit: LengthUnit) -> &'static str {
    match unit {
        LengthUnit::None => "",
        LengthUnit::Em => "em",
        LengthUnit::Ex => "ex",
        LengthUnit::Px => "px",
        LengthUnit::In => "in",
        LengthUnit::Cm => "cm",
        LengthUnit::Mm => "mm",
        LengthUnit::Pt => "pt",
        LengthUnit::Pc => "pc",
        LengthUnit::Percent => "%",
    }
}

impl Syntax for Length {
    fn parse(text: &str) -> Option<Self> {
        svgtypes::Length::from_str(text.trim()).ok().map(Length)
    }

    fn write(&self) -> String {
        let mut s = fmt_number(self.0.number);
        // A zero is unitless everywhere except percentages.
        if !(self.is_zero() && self.0.unit != LengthUnit::Percent) {
            s.push_str(unit_suffix(self.0.unit));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Length::parse($text).unwrap().write(), $result);
            }
        )
    }

    test!(plain, "10", "10");
    test!(px_kept, "10.50px", "10.5px");
    test!(zero_unit_dropped, "0mm", "0");
    test!(percent, "050%", "50%");
    test!(fraction, "0.5em", ".5em");

    #[test]
    fn invalid() {
        assert_eq!(Length::parse("auto"), None);
        assert_eq!(Length::parse("10 20"), None);
    }
}
