// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Color, PaintFallback};

use super::Syntax;

/// A `<paint>` or a `<color>` value.
///
/// Only opaque colors are represented, everything with an alpha channel
/// is kept as text.
#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    /// `none`
    None,
    /// `currentColor`
    CurrentColor,
    /// An opaque color.
    Color(Color),
    /// `context-fill`
    ContextFill,
    /// `context-stroke`
    ContextStroke,
    /// A paint server reference.
    Url {
        /// Referenced element id.
        id: String,
        /// A fallback used when the reference is invalid.
        fallback: Option<PaintFallback>,
    },
}

impl Paint {
    /// Checks that the paint is `none`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }
}

fn is_opaque(c: &Color) -> bool {
    c.alpha == 255
}

impl Syntax for Paint {
    fn parse(text: &str) -> Option<Self> {
        let paint = match svgtypes::Paint::from_str(text).ok()? {
            svgtypes::Paint::None => Paint::None,
            svgtypes::Paint::CurrentColor => Paint::CurrentColor,
            svgtypes::Paint::Color(c) if is_opaque(&c) => Paint::Color(c),
            svgtypes::Paint::ContextFill => Paint::ContextFill,
            svgtypes::Paint::ContextStroke => Paint::ContextStroke,
            svgtypes::Paint::FuncIRI(id, fallback) => {
                if let Some(PaintFallback::Color(ref c)) = fallback {
                    if !is_opaque(c) {
                        return None;
                    }
                }

                Paint::Url {
                    id: id.to_string(),
                    fallback,
                }
            }
            // `inherit` and translucent colors are kept as is.
            _ => return None,
        };

        Some(paint)
    }

    fn write(&self) -> String {
        match self {
            Paint::None => "none".to_string(),
            Paint::CurrentColor => "currentColor".to_string(),
            Paint::Color(c) => color_to_string(*c),
            Paint::ContextFill => "context-fill".to_string(),
            Paint::ContextStroke => "context-stroke".to_string(),
            Paint::Url { id, fallback } => {
                let mut s = format!("url(#{})", id);
                match fallback {
                    Some(PaintFallback::None) => s.push_str(" none"),
                    Some(PaintFallback::CurrentColor) => s.push_str(" currentColor"),
                    Some(PaintFallback::Color(c)) => {
                        s.push(' ');
                        s.push_str(&color_to_string(*c));
                    }
                    None => {}
                }
                s
            }
        }
    }
}

/// Color keywords that are shorter than their hex notation.
static SHORT_NAMES: &[(&str, [u8; 3])] = &[
    ("azure", [0xf0, 0xff, 0xff]),
    ("beige", [0xf5, 0xf5, 0xdc]),
    ("bisque", [0xff, 0xe4, 0xc4]),
    ("brown", [0xa5, 0x2a, 0x2a]),
    ("coral", [0xff, 0x7f, 0x50]),
    ("gold", [0xff, 0xd7, 0x00]),
    ("gray", [0x80, 0x80, 0x80]),
    ("green", [0x00, 0x80, 0x00]),
    ("indigo", [0x4b, 0x00, 0x82]),
    ("ivory", [0xff, 0xff, 0xf0]),
    ("khaki", [0xf0, 0xe6, 0x8c]),
    ("linen", [0xfa, 0xf0, 0xe6]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("olive", [0x80, 0x80, 0x00]),
    ("orange", [0xff, 0xa5, 0x00]),
    ("orchid", [0xda, 0x70, 0xd6]),
    ("peru", [0xcd, 0x85, 0x3f]),
    ("pink", [0xff, 0xc0, 0xcb]),
    ("plum", [0xdd, 0xa0, 0xdd]),
    ("purple", [0x80, 0x00, 0x80]),
    ("red", [0xff, 0x00, 0x00]),
    ("salmon", [0xfa, 0x80, 0x72]),
    ("sienna", [0xa0, 0x52, 0x2d]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("snow", [0xff, 0xfa, 0xfa]),
    ("tan", [0xd2, 0xb4, 0x8c]),
    ("teal", [0x00, 0x80, 0x80]),
    ("tomato", [0xff, 0x63, 0x47]),
    ("violet", [0xee, 0x82, 0xee]),
    ("wheat", [0xf5, 0xde, 0xb3]),
];

/// Writes an opaque color in its shortest form.
pub fn color_to_string(c: Color) -> String {
    let rgb = [c.red, c.green, c.blue];

    let is_short = rgb.iter().all(|v| v >> 4 == v & 0x0f);
    let hex = if is_short {
        format!("#{:x}{:x}{:x}", c.red & 0x0f, c.green & 0x0f, c.blue & 0x0f)
    } else {
        format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    };

    match SHORT_NAMES.iter().find(|(_, v)| *v == rgb) {
        Some((name, _)) if name.len() < hex.len() => name.to_string(),
        _ => hex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                let paint = Paint::parse($text).unwrap();
                assert_eq!(paint.write(), $result);
            }
        )
    }

    test!(short_hex, "#ffffff", "#fff");
    test!(long_hex, "#123456", "#123456");
    test!(keyword_to_hex, "white", "#fff");
    test!(hex_to_keyword, "#ff0000", "red");
    test!(rgb_func, "rgb(0, 0, 255)", "#00f");
    test!(shorter_name, "#f0ffff", "azure");
    test!(none, "none", "none");
    test!(current_color, "currentColor", "currentColor");
    test!(url, "url(#lg1)", "url(#lg1)");
    test!(url_fallback, "url(#lg1) #ff0000", "url(#lg1) red");

    #[test]
    fn translucent_is_not_parsed() {
        assert_eq!(Paint::parse("rgba(0, 0, 0, 0.5)"), None);
        assert_eq!(Paint::parse("transparent"), None);
        assert_eq!(Paint::parse("inherit"), None);
    }
}
