// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgmin` is an SVG optimizer.

A document is parsed into a mutable tree, rewritten by an ordered list of
plugins and written back, possibly several times, until the output stops
getting shorter.

Most plugins depend on the CSS cascade, provided by [`svgmin_css::StyleData`].
When a document has a stylesheet that cannot be parsed safely,
style-dependent plugins are disabled for this document.

```no_run
let config = svgmin::Config::default();
let output = svgmin::optimize("<svg xmlns='http://www.w3.org/2000/svg'/>", &config).unwrap();
println!("{} after {} passes", output.data, output.passes);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod pipeline;
mod plugin;
pub mod plugins;

pub use pipeline::{optimize, resolve_plugins, Config, Output, PluginRef, ResolvedPlugin};
pub use plugin::{DocData, ParamValue, Params, Plugin, PluginInfo};

pub use svgmin_css;
pub use svgmin_tree;

use svgmin_tree::{ParseError, VisitError};

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// The input is not a well-formed XML.
    ///
    /// The document is left untouched.
    Parse(ParseError),

    /// A plugin failed. No partial result is returned.
    Plugin {
        /// Plugin name.
        name: String,
        /// Failure reason.
        error: VisitError,
    },

    /// A plugin name that is not registered.
    UnknownPlugin(String),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Parse(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::Plugin {
                ref name,
                ref error,
            } => {
                write!(f, "plugin '{}' failed cause {}", name, error)
            }
            Error::UnknownPlugin(ref name) => {
                write!(f, "unknown plugin '{}'", name)
            }
        }
    }
}

impl std::error::Error for Error {}
