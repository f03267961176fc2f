// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
svgmin is an SVG optimizer.

USAGE:
  svgmin [OPTIONS] <in-svg> <out-svg>  # from file to file
  svgmin [OPTIONS] <in-svg> -c         # from file to stdout
  svgmin [OPTIONS] - <out-svg>         # from stdin to file
  svgmin [OPTIONS] - -c                # from stdin to stdout

OPTIONS:
  -h, --help                        Prints help information
  -V, --version                     Prints version information
  -c                                Prints the output SVG to the stdout

  --multipass                       Runs plugins until the output stops shrinking.
                                    Same as '--max-passes 10'
  --max-passes NUM                  Sets the maximum number of passes
                                    [values: 1..10 (inclusive)] [default: 1]
  --enable PLUGINS                  Sets a comma-separated list of plugins
                                    to run in addition to the default ones
                                    Examples: 'minifyClassNames'
  --disable PLUGINS                 Sets a comma-separated list of plugins
                                    to skip
                                    Examples: 'cleanupIds, removeComments'

  --pretty                          Puts each XML node on its own line
  --indent INDENT                   Sets the XML nodes indent. Used only with '--pretty'
                                    [values: 0..8 (inclusive)] [default: 4]
  --eol EOL                         Sets the line ending
                                    [values: lf, crlf] [default: lf]
  --final-newline                   Ends the output with a line ending
  --quiet                           Disables warnings

ARGS:
  <in-svg>                          Input file
  <out-svg>                         Output file
";

#[derive(Debug)]
struct Args {
    max_passes: u32,
    enable: Vec<String>,
    disable: Vec<String>,

    pretty: bool,
    indent: usize,
    eol: svgmin::svgmin_tree::Eol,
    final_newline: bool,

    quiet: bool,

    input: String,
    output: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    let multipass = input.contains("--multipass");
    let max_passes = input.opt_value_from_fn("--max-passes", parse_passes)?;

    Ok(Args {
        max_passes: max_passes.unwrap_or(if multipass { 10 } else { 1 }),
        enable: input
            .opt_value_from_fn("--enable", parse_list)?
            .unwrap_or_default(),
        disable: input
            .opt_value_from_fn("--disable", parse_list)?
            .unwrap_or_default(),

        pretty: input.contains("--pretty"),
        indent: input
            .opt_value_from_fn("--indent", parse_indent)?
            .unwrap_or(4),
        eol: input.opt_value_from_str("--eol")?.unwrap_or(svgmin::svgmin_tree::Eol::Lf),
        final_newline: input.contains("--final-newline"),

        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.free_from_str()?,
    })
}

fn parse_passes(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (1..=10).contains(&n) {
        Ok(n)
    } else {
        Err("passes NUM cannot be smaller than 1 or larger than 10".to_string())
    }
}

fn parse_indent(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| "invalid INDENT value")?;

    if n <= 8 {
        Ok(n)
    } else {
        Err("INDENT cannot be larger than 8".to_string())
    }
}

fn parse_list(s: &str) -> Result<Vec<String>, String> {
    let list: Vec<String> = s
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    if list.is_empty() {
        return Err("plugins list cannot be empty".to_string());
    }

    Ok(list)
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom<'a> {
    Stdin,
    File(&'a str),
}

#[derive(Clone, PartialEq, Debug)]
enum OutputTo<'a> {
    Stdout,
    File(&'a str),
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let (in_svg, out_svg) = {
        let in_svg = args.input.as_str();
        let out_svg = args.output.as_str();

        let svg_from = if in_svg == "-" {
            InputFrom::Stdin
        } else if in_svg == "-c" {
            return Err("-c should be set after input".to_string());
        } else {
            InputFrom::File(in_svg)
        };

        let svg_to = if out_svg == "-c" {
            OutputTo::Stdout
        } else {
            OutputTo::File(out_svg)
        };

        (svg_from, svg_to)
    };

    let input_svg = match in_svg {
        InputFrom::Stdin => load_stdin(),
        InputFrom::File(path) => std::fs::read(path).map_err(|e| e.to_string()),
    }?;

    let text = String::from_utf8(input_svg).map_err(|_| "input is not a UTF-8 text".to_string())?;

    let config = svgmin::Config {
        enable: args.enable,
        disable: args.disable,
        max_passes: args.max_passes,
        write: svgmin::svgmin_tree::WriteOptions {
            pretty: args.pretty,
            indent: args.indent,
            eol: args.eol,
            final_newline: args.final_newline,
        },
        path: match in_svg {
            InputFrom::Stdin => None,
            InputFrom::File(path) => Some(PathBuf::from(path)),
        },
        ..svgmin::Config::default()
    };

    let output = svgmin::optimize(&text, &config).map_err(|e| e.to_string())?;
    log::info!(
        "{} -> {} bytes after {} passes.",
        text.len(),
        output.data.len(),
        output.passes
    );

    match out_svg {
        OutputTo::Stdout => {
            io::stdout()
                .write_all(output.data.as_bytes())
                .map_err(|_| "failed to write to the stdout".to_string())?;
        }
        OutputTo::File(path) => {
            let mut f =
                File::create(path).map_err(|_| "failed to create the output file".to_string())?;
            f.write_all(output.data.as_bytes())
                .map_err(|_| "failed to write to the output file".to_string())?;
        }
    }

    Ok(())
}

fn load_stdin() -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();

    handle
        .read_to_end(&mut buf)
        .map_err(|_| "failed to read from stdin".to_string())?;

    Ok(buf)
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
