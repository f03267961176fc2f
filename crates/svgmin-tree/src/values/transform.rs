// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{TransformListParser, TransformListToken};

use super::number::push_number;
use super::Syntax;

/// A single transform function.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum TransformItem {
    Matrix { a: f64, b: f64, c: f64, d: f64, e: f64, f: f64 },
    Translate { tx: f64, ty: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate { angle: f64, cx: f64, cy: f64 },
    SkewX { angle: f64 },
    SkewY { angle: f64 },
}

impl TransformItem {
    fn write(&self, s: &mut String) {
        let mut args = [0.0; 6];
        let (name, len) = match *self {
            TransformItem::Matrix { a, b, c, d, e, f } => {
                args = [a, b, c, d, e, f];
                ("matrix", 6)
            }
            TransformItem::Translate { tx, ty } => {
                args[..2].copy_from_slice(&[tx, ty]);
                ("translate", if ty == 0.0 { 1 } else { 2 })
            }
            TransformItem::Scale { sx, sy } => {
                args[..2].copy_from_slice(&[sx, sy]);
                ("scale", if sx == sy { 1 } else { 2 })
            }
            TransformItem::Rotate { angle, cx, cy } => {
                args[..3].copy_from_slice(&[angle, cx, cy]);
                ("rotate", if cx == 0.0 && cy == 0.0 { 1 } else { 3 })
            }
            TransformItem::SkewX { angle } => {
                args[0] = angle;
                ("skewX", 1)
            }
            TransformItem::SkewY { angle } => {
                args[0] = angle;
                ("skewY", 1)
            }
        };

        s.push_str(name);
        s.push('(');
        for n in &args[..len] {
            push_number(s, *n);
        }
        s.push(')');
    }
}

/// A `<transform-list>` value.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TransformList(pub Vec<TransformItem>);

impl TransformList {
    /// Checks that the list has no transforms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Syntax for TransformList {
    fn parse(text: &str) -> Option<Self> {
        let mut items = Vec::new();
        for token in TransformListParser::from(text) {
            let item = match token.ok()? {
                TransformListToken::Matrix { a, b, c, d, e, f } => {
                    TransformItem::Matrix { a, b, c, d, e, f }
                }
                TransformListToken::Translate { tx, ty } => TransformItem::Translate { tx, ty },
                TransformListToken::Scale { sx, sy } => TransformItem::Scale { sx, sy },
                TransformListToken::Rotate { angle } => TransformItem::Rotate {
                    angle,
                    cx: 0.0,
                    cy: 0.0,
                },
                TransformListToken::SkewX { angle } => TransformItem::SkewX { angle },
                TransformListToken::SkewY { angle } => TransformItem::SkewY { angle },
            };

            items.push(item);
        }

        Some(TransformList(collapse_rotations(items)))
    }

    fn write(&self) -> String {
        let mut s = String::new();
        for item in &self.0 {
            item.write(&mut s);
        }
        s
    }
}

/// Turns `translate(cx cy) rotate(a) translate(-cx -cy)` back into `rotate(a cx cy)`.
fn collapse_rotations(items: Vec<TransformItem>) -> Vec<TransformItem> {
    let mut result = Vec::with_capacity(items.len());
    let mut i = 0;
    while i < items.len() {
        if let [TransformItem::Translate { tx: cx, ty: cy }, TransformItem::Rotate { angle, cx: rx, cy: ry }, TransformItem::Translate { tx, ty }, ..] =
            items[i..]
        {
            if rx == 0.0 && ry == 0.0 && tx == -cx && ty == -cy {
                result.push(TransformItem::Rotate { angle, cx, cy });
                i += 3;
                continue;
            }
        }

        result.push(items[i]);
        i += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(TransformList::parse($text).unwrap().write(), $result);
            }
        )
    }

    test!(translate_single, "translate(10, 0)", "translate(10)");
    test!(scale_uniform, "scale(2 2)", "scale(2)");
    test!(list, "translate(10 20) scale(0.5)", "translate(10 20)scale(.5)");
    test!(rotate_center, "rotate(45, 10, 10)", "rotate(45 10 10)");
    test!(negative_args, "matrix(1 0 0 1 -10 -20)", "matrix(1 0 0 1-10-20)");

    #[test]
    fn invalid() {
        assert_eq!(TransformList::parse("rotate(45deg)"), None);
    }
}
