// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{PathParser, PathSegment};

use super::number::push_number;
use super::Syntax;

/// A path data value.
///
/// Segments are kept as written, only the formatting is compacted.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct PathData(pub Vec<PathSegment>);

impl PathData {
    /// Checks that the path has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn command(seg: &PathSegment) -> char {
    let (c, abs) = match *seg {
        PathSegment::MoveTo { abs, .. } => ('m', abs),
        PathSegment::LineTo { abs, .. } => ('l', abs),
        PathSegment::HorizontalLineTo { abs, .. } => ('h', abs),
        PathSegment::VerticalLineTo { abs, .. } => ('v', abs),
        PathSegment::CurveTo { abs, .. } => ('c', abs),
        PathSegment::SmoothCurveTo { abs, .. } => ('s', abs),
        PathSegment::Quadratic { abs, .. } => ('q', abs),
        PathSegment::SmoothQuadratic { abs, .. } => ('t', abs),
        PathSegment::EllipticalArc { abs, .. } => ('a', abs),
        PathSegment::ClosePath { abs } => ('z', abs),
    };

    if abs {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

impl Syntax for PathData {
    fn parse(text: &str) -> Option<Self> {
        let segments = PathParser::from(text)
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(PathData(segments))
    }

    fn write(&self) -> String {
        let mut s = String::new();
        let mut prev_cmd = None;
        for seg in &self.0 {
            let cmd = command(seg);
            // A command letter can be omitted when it repeats,
            // except for moveto, which turns into lineto.
            let implicit = prev_cmd == Some(cmd) && !matches!(cmd, 'M' | 'm' | 'Z' | 'z');
            if !implicit {
                s.push(cmd);
            }
            prev_cmd = Some(cmd);

            match *seg {
                PathSegment::MoveTo { x, y, .. }
                | PathSegment::LineTo { x, y, .. }
                | PathSegment::SmoothQuadratic { x, y, .. } => {
                    push_number(&mut s, x);
                    push_number(&mut s, y);
                }
                PathSegment::HorizontalLineTo { x, .. } => push_number(&mut s, x),
                PathSegment::VerticalLineTo { y, .. } => push_number(&mut s, y),
                PathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                    ..
                } => {
                    for n in [x1, y1, x2, y2, x, y] {
                        push_number(&mut s, n);
                    }
                }
                PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
                    for n in [x2, y2, x, y] {
                        push_number(&mut s, n);
                    }
                }
                PathSegment::Quadratic { x1, y1, x, y, .. } => {
                    for n in [x1, y1, x, y] {
                        push_number(&mut s, n);
                    }
                }
                PathSegment::EllipticalArc {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                    ..
                } => {
                    let flag = |b: bool| if b { 1.0 } else { 0.0 };
                    for n in [rx, ry, x_axis_rotation, flag(large_arc), flag(sweep), x, y] {
                        push_number(&mut s, n);
                    }
                }
                PathSegment::ClosePath { .. } => {}
            }
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
                assert_eq!(PathData::parse($text).unwrap().write(), $result);
            }
        )
    }

    test!(simple, "M 10 20 L 30 40 Z", "M10 20L30 40Z");
    test!(implicit_lineto, "M10 10 20 20 30 30", "M10 10L20 20 30 30");
    test!(negative, "m 0.5 -0.5 l -1 -1", "m.5-.5l-1-1");
    test!(arc, "M0 0 A 5 5 0 0 1 10 10", "M0 0A5 5 0 0 1 10 10");
    test!(repeated_curve, "M0 0c1 1 2 2 3 3 c 4 4 5 5 6 6", "M0 0c1 1 2 2 3 3 4 4 5 5 6 6");

    #[test]
    fn invalid() {
        assert_eq!(PathData::parse("M 10"), None);
    }
}
