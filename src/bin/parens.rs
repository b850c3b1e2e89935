//! Command-line interface for parens
//! This binary scans and parses a source file and prints its tokens or syntax tree.
//!
//! Usage:
//!   parens `<path>` [--format `<format>`] [--config `<file>`] [--max-depth `<n>`] [-v]

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use parens::config::{Settings, SettingsLoader};
use parens::formats::{self, Format};
use parens::{report, scan, Parser, SourceLoader};
use tracing::{debug, Level};

fn main() {
    let matches = Command::new("parens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scan and parse Scheme-like source files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: tokens, tree, json or yaml (default from settings: tree)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("YAML settings file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Maximum nesting of rule applications")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr (-v for debug, -vv for trace)")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let settings = load_settings(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    debug!(?settings, "resolved settings");

    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    handle_parse_command(path, &settings);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Settings from the defaults and `--config`, with command-line flags on top.
fn load_settings(matches: &ArgMatches) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut loader = SettingsLoader::new();
    if let Some(config) = matches.get_one::<String>("config") {
        loader = loader.with_file(config);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        let format = format.parse::<Format>()?;
        loader = loader.set_override("output.format", format.name())?;
    }
    if let Some(max_depth) = matches.get_one::<u64>("max-depth") {
        loader = loader.set_override("parser.max_depth", *max_depth)?;
    }
    Ok(loader.build()?)
}

/// Handle the parse command
fn handle_parse_command(path: &str, settings: &Settings) {
    let file = SourceLoader::from_path(path)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
        .into_source();

    let tokens = scan(&file);
    let format = settings.output.format;
    if !format.needs_ast() {
        print!("{}", formats::render_tokens(&tokens));
        return;
    }

    let program = Parser::standard()
        .with_max_depth(settings.parser.max_depth)
        .parse_tokens(&file, tokens)
        .unwrap_or_else(|e| report::report_and_exit(&e));

    let output = formats::render_node(&program, format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    print!("{}", output);
}
