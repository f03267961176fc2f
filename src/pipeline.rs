// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use svgmin_tree::{traverse, Document, WriteOptions};

use crate::plugin::{DocData, Params, Plugin, PluginInfo};
use crate::{plugins, Error};

/// A plugin referenced by a config.
#[derive(Clone)]
pub enum PluginRef {
    /// A built-in plugin name.
    Name(String),
    /// A custom plugin.
    Custom(Rc<dyn Plugin>),
}

impl PluginRef {
    fn name(&self) -> &str {
        match self {
            PluginRef::Name(ref name) => name,
            PluginRef::Custom(ref plugin) => plugin.name(),
        }
    }
}

impl From<&str> for PluginRef {
    fn from(name: &str) -> Self {
        PluginRef::Name(name.to_string())
    }
}

impl std::fmt::Debug for PluginRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PluginRef::Name(ref name) => write!(f, "Name({})", name),
            PluginRef::Custom(ref plugin) => write!(f, "Custom({})", plugin.name()),
        }
    }
}

/// Optimization options.
#[derive(Clone, Debug)]
pub struct Config {
    /// Plugins that run before the main ones.
    ///
    /// Default: empty
    pub pre: Vec<PluginRef>,

    /// Main plugins.
    ///
    /// Default: [`plugins::DEFAULT_PRESET`]
    pub main: Vec<PluginRef>,

    /// Plugins that run after the main ones.
    ///
    /// Default: empty
    pub post: Vec<PluginRef>,

    /// Built-in plugins to append to the main list, unless already present.
    ///
    /// Default: empty
    pub enable: Vec<String>,

    /// Plugins to remove from all lists. Applied after `enable`.
    ///
    /// Default: empty
    pub disable: Vec<String>,

    /// Per-plugin parameters, by plugin name.
    ///
    /// Default: empty
    pub params: HashMap<String, Params>,

    /// The maximum number of passes. Clamped to `1..=10`.
    ///
    /// Default: 10
    pub max_passes: u32,

    /// Output options.
    pub write: WriteOptions,

    /// The input file path, used in diagnostics.
    ///
    /// Default: None
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pre: Vec::new(),
            main: plugins::DEFAULT_PRESET.iter().map(|name| PluginRef::from(*name)).collect(),
            post: Vec::new(),
            enable: Vec::new(),
            disable: Vec::new(),
            params: HashMap::new(),
            max_passes: 10,
            write: WriteOptions::default(),
            path: None,
        }
    }
}

/// A plugin with its parameters.
#[derive(Clone)]
pub struct ResolvedPlugin {
    /// The plugin.
    pub plugin: Rc<dyn Plugin>,
    /// Parameters.
    pub params: Params,
}

impl std::fmt::Debug for ResolvedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ResolvedPlugin")
            .field("plugin", &self.plugin.name())
            .field("params", &self.params)
            .finish()
    }
}

/// An optimization result.
#[derive(Clone, PartialEq, Debug)]
pub struct Output {
    /// The shortest output.
    pub data: String,
    /// The number of passes that were run.
    ///
    /// Equals to `max_passes` when the output did not converge.
    pub passes: u32,
}

/// Builds the final plugin list: presets in the `pre`, `main`, `post` order,
/// then `enable`, then `disable`, then parameters.
pub fn resolve_plugins(config: &Config) -> Result<Vec<ResolvedPlugin>, Error> {
    let mut list: Vec<PluginRef> = Vec::new();
    list.extend(config.pre.iter().cloned());
    list.extend(config.main.iter().cloned());
    for name in &config.enable {
        if !list.iter().any(|p| p.name() == name) {
            list.push(PluginRef::Name(name.clone()));
        }
    }
    list.extend(config.post.iter().cloned());

    list.retain(|p| !config.disable.iter().any(|name| name == p.name()));

    let mut resolved = Vec::with_capacity(list.len());
    for item in list {
        let plugin = match item {
            PluginRef::Name(name) => match plugins::find(&name) {
                Some(plugin) => plugin,
                None => return Err(Error::UnknownPlugin(name)),
            },
            PluginRef::Custom(plugin) => plugin,
        };

        let params = config.params.get(plugin.name()).cloned().unwrap_or_default();
        resolved.push(ResolvedPlugin { plugin, params });
    }

    Ok(resolved)
}

/// Optimizes an SVG document.
///
/// Each pass parses the previous output into a new tree, so no style data
/// is carried between passes. Stops when the output does not get shorter.
pub fn optimize(text: &str, config: &Config) -> Result<Output, Error> {
    let plugins = resolve_plugins(config)?;
    let max_passes = config.max_passes.clamp(1, 10);
    let source_name = config.path.as_ref().map(|p| p.display().to_string());

    let mut best: Option<String> = None;
    let mut passes = 0;
    for pass in 1..=max_passes {
        let input = best.as_deref().unwrap_or(text);
        let mut doc = match source_name {
            Some(ref name) => Document::parse_with_name(input, name)?,
            None => Document::parse(input)?,
        };

        run_pass(&mut doc, &plugins, pass, config)?;
        passes = pass;

        let output = doc.to_string(&config.write);
        log::debug!("Pass {}: {} bytes.", pass, output.len());

        if let Some(ref prev) = best {
            if output.len() >= prev.len() {
                break;
            }
        }

        best = Some(output);
    }

    Ok(Output {
        data: best.unwrap_or_else(|| text.to_string()),
        passes,
    })
}

fn run_pass(
    doc: &mut Document,
    plugins: &[ResolvedPlugin],
    pass: u32,
    config: &Config,
) -> Result<(), Error> {
    let doc_data = DocData::new(doc);
    let info = PluginInfo {
        pass,
        path: config.path.as_deref(),
        doc_data: &doc_data,
    };

    for item in plugins {
        let mut visitor = match item.plugin.create(&info, &item.params) {
            Some(v) => v,
            None => {
                log::debug!("Plugin '{}' skipped.", item.plugin.name());
                continue;
            }
        };

        traverse(doc, visitor.as_mut()).map_err(|error| Error::Plugin {
            name: item.plugin.name().to_string(),
            error,
        })?;
    }

    Ok(())
}
