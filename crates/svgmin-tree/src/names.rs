// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Element and property name tables.

/// Checks that the attribute is a presentation attribute,
/// i.e. it can be set both as an attribute and as a CSS property.
pub fn is_presentation(name: &str) -> bool {
    matches!(
        name,
        "alignment-baseline"
            | "baseline-shift"
            | "clip-path"
            | "clip-rule"
            | "color"
            | "color-interpolation"
            | "color-interpolation-filters"
            | "color-rendering"
            | "direction"
            | "display"
            | "dominant-baseline"
            | "fill"
            | "fill-opacity"
            | "fill-rule"
            | "filter"
            | "flood-color"
            | "flood-opacity"
            | "font-family"
            | "font-kerning" // technically not presentation
            | "font-size"
            | "font-size-adjust"
            | "font-stretch"
            | "font-style"
            | "font-variant"
            | "font-weight"
            | "glyph-orientation-horizontal"
            | "glyph-orientation-vertical"
            | "image-rendering"
            | "isolation" // technically not presentation
            | "letter-spacing"
            | "lighting-color"
            | "marker-end"
            | "marker-mid"
            | "marker-start"
            | "mask"
            | "mask-type"
            | "mix-blend-mode" // technically not presentation
            | "opacity"
            | "overflow"
            | "paint-order"
            | "pointer-events"
            | "shape-rendering"
            | "stop-color"
            | "stop-opacity"
            | "stroke"
            | "stroke-dasharray"
            | "stroke-dashoffset"
            | "stroke-linecap"
            | "stroke-linejoin"
            | "stroke-miterlimit"
            | "stroke-opacity"
            | "stroke-width"
            | "text-anchor"
            | "text-decoration"
            | "text-overflow"
            | "text-rendering"
            | "transform"
            | "transform-origin"
            | "unicode-bidi"
            | "vector-effect"
            | "visibility"
            | "white-space"
            | "word-spacing"
            | "writing-mode"
    )
}

/// Checks that the property is inherited by children when not set.
///
/// Custom properties (`--name`) are always inherited.
pub fn is_inheritable(name: &str) -> bool {
    if name.starts_with("--") {
        return true;
    }

    if is_presentation(name) {
        !is_non_inheritable(name)
    } else {
        matches!(name, "marker" | "font" | "font-variant-ligatures" | "cursor")
    }
}

fn is_non_inheritable(name: &str) -> bool {
    matches!(
        name,
        "alignment-baseline"
            | "baseline-shift"
            | "clip-path"
            | "display"
            | "dominant-baseline"
            | "filter"
            | "flood-color"
            | "flood-opacity"
            | "isolation"
            | "mask"
            | "mask-type"
            | "mix-blend-mode"
            | "opacity"
            | "overflow"
            | "lighting-color"
            | "stop-color"
            | "stop-opacity"
            | "text-decoration"
            | "transform"
            | "transform-origin"
            | "unicode-bidi"
            | "vector-effect"
    )
}

/// Returns the initial value of a presentation attribute.
pub fn default_value(name: &str) -> Option<&'static str> {
    let value = match name {
        "image-rendering" | "shape-rendering" | "text-rendering" | "color-rendering" => "auto",

        "clip-path" | "filter" | "marker-end" | "marker-mid" | "marker-start" | "mask"
        | "stroke" | "stroke-dasharray" | "text-decoration" => "none",

        "font-stretch" | "font-style" | "font-variant" | "font-weight" | "letter-spacing"
        | "word-spacing" | "unicode-bidi" => "normal",

        "fill" | "flood-color" | "stop-color" => "black",
        "lighting-color" => "white",

        "fill-opacity" | "flood-opacity" | "opacity" | "stop-opacity" | "stroke-opacity" => "1",

        "clip-rule" | "fill-rule" => "nonzero",

        "alignment-baseline" | "dominant-baseline" => "auto",
        "baseline-shift" => "baseline",
        "color-interpolation" => "sRGB",
        "color-interpolation-filters" => "linearRGB",
        "direction" => "ltr",
        "display" => "inline",
        "font-size" => "medium",
        "overflow" => "visible",
        "stroke-dashoffset" => "0",
        "stroke-linecap" => "butt",
        "stroke-linejoin" => "miter",
        "stroke-miterlimit" => "4",
        "stroke-width" => "1",
        "text-anchor" => "start",
        "visibility" => "visible",
        "writing-mode" => "lr-tb",
        _ => return None,
    };

    Some(value)
}

/// Returns geometry properties of an element.
///
/// These are attributes that are also CSS properties in SVG 2,
/// but are not presentation attributes in SVG 1.1.
pub fn geometry_properties(element: &str) -> &'static [&'static str] {
    match element {
        "circle" => &["cx", "cy", "r"],
        "ellipse" => &["cx", "cy", "rx", "ry"],
        "rect" => &["x", "y", "width", "height", "rx", "ry"],
        "image" | "foreignObject" | "svg" | "use" | "symbol" => &["x", "y", "width", "height"],
        "path" => &["d"],
        _ => &[],
    }
}

/// Checks that the property is a geometry property of the element.
#[inline]
pub fn is_geometry_property(element: &str, name: &str) -> bool {
    geometry_properties(element).contains(&name)
}

/// Checks that the element is a container.
pub fn is_container(name: &str) -> bool {
    matches!(
        name,
        "a" | "defs"
            | "g"
            | "marker"
            | "mask"
            | "missing-glyph"
            | "pattern"
            | "svg"
            | "switch"
            | "symbol"
    )
}

/// Checks that the element is a basic shape or a path.
pub fn is_shape(name: &str) -> bool {
    matches!(
        name,
        "circle" | "ellipse" | "line" | "path" | "polygon" | "polyline" | "rect"
    )
}

/// Checks that the element is a text content element.
pub fn is_text_content(name: &str) -> bool {
    matches!(
        name,
        "altGlyph" | "textPath" | "text" | "tref" | "tspan"
    )
}

/// Checks that the element is an animation element.
pub fn is_animation(name: &str) -> bool {
    matches!(
        name,
        "animate" | "animateColor" | "animateMotion" | "animateTransform" | "set" | "discard"
    )
}

/// Checks that the element content is raw text that must be kept as is.
pub fn has_raw_text(name: &str) -> bool {
    matches!(name, "style" | "script")
}

/// Checks that whitespace-only text inside the element is significant.
pub fn preserves_whitespace(name: &str) -> bool {
    matches!(
        name,
        "text" | "tspan" | "textPath" | "title" | "desc" | "style" | "script" | "pre"
    )
}

/// Checks that the element is never rendered directly.
pub fn is_non_rendering(name: &str) -> bool {
    matches!(
        name,
        "clipPath"
            | "defs"
            | "filter"
            | "linearGradient"
            | "marker"
            | "mask"
            | "pattern"
            | "radialGradient"
            | "symbol"
    )
}

/// Checks that the attribute is an event handler.
#[inline]
pub fn is_event_attribute(name: &str) -> bool {
    name.len() > 2 && name.starts_with("on")
}
