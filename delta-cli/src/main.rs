// Command-line interface for delta-babel
//
// Reads a delta as JSON, converts it to HTML with the formats declared in the configuration
// and writes the markup to stdout or a file.
//
// The delta can be given either as `{"ops": [...]}` or as a bare array of operations.
// Formats come from `[formats.<attribute>]` tables in the configuration; a `delta.toml` in the
// working directory is picked up automatically, and --config layers an explicit file on top.
//
// Usage:
//  delta-html [<input>] [--output <file>]       - Convert a delta file (stdin when omitted or "-")
//  delta-html --list-formats                    - List the configured formats
//
// Conversion flags (--block-tag, --inline-tag, --embed-placeholder, --strict) override the
// matching `[convert]` keys.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use delta_babel::{convert_delta, Delta, FormatRegistry};
use delta_config::{ConfigError, DeltaConfig, Loader};
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("delta-html")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert rich text deltas to HTML")
        .long_about(
            "delta-html converts a rich text delta (a list of insert operations with\n\
            formatting attributes) into HTML markup.\n\n\
            Every newline in the delta closes a block element. What each attribute\n\
            renders as is declared in the configuration under [formats.<name>].\n\n\
            Examples:\n  \
            delta-html doc.json                      # Convert to stdout\n  \
            cat doc.json | delta-html                # Read the delta from stdin\n  \
            delta-html doc.json -o doc.html          # Write to a file\n  \
            delta-html doc.json --config site.toml   # Use a format catalog\n  \
            delta-html --list-formats                # Show configured formats",
        )
        .arg(
            Arg::new("input")
                .help("Path to the delta JSON file (\"-\" reads stdin)")
                .index(1)
                .default_value("-")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file path (defaults to stdout)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a delta.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("block-tag")
                .long("block-tag")
                .value_name("TAG")
                .help("Element used for each line (default: div)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("inline-tag")
                .long("inline-tag")
                .value_name("TAG")
                .help("Element wrapping attributed text (default: span)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("embed-placeholder")
                .long("embed-placeholder")
                .value_name("TEXT")
                .help("Text rendered for embed inserts")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail on attributes that have no configured format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List configured formats and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion details to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    // --verbose enables DEBUG level, otherwise use RUST_LOG
    let filter = if matches.get_flag("verbose") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = load_cli_config(&matches);
    let registry = config.registry();

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    let input = matches
        .get_one::<String>("input")
        .map(|s| s.as_str())
        .unwrap_or("-");
    let output = matches.get_one::<String>("output").map(|s| s.as_str());
    handle_convert_command(input, output, &config, &registry);
}

fn handle_convert_command(
    input: &str,
    output: Option<&str>,
    config: &DeltaConfig,
    registry: &FormatRegistry,
) {
    let source = read_input(input).unwrap_or_else(|e| {
        eprintln!("Error reading '{input}': {e}");
        std::process::exit(1);
    });

    let delta = Delta::from_json(&source).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    tracing::debug!(input, operations = delta.ops.len(), "delta loaded");

    let html = convert_delta(&delta, registry, &config.options()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, &html).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{html}"),
    }
}

fn handle_list_formats_command(registry: &FormatRegistry) {
    if registry.is_empty() {
        println!("No formats configured.");
        return;
    }

    println!("Configured formats:\n");
    for name in registry.list_formats() {
        let Some(format) = registry.get(&name) else {
            continue;
        };
        match format.tag.as_deref() {
            Some(tag) => println!("  {name:<16} {:<8} <{tag}>", format.category.as_str()),
            None => println!("  {name:<16} {}", format.category.as_str()),
        }
    }
}

fn read_input(input: &str) -> io::Result<String> {
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(input)
    }
}

fn load_cli_config(matches: &ArgMatches) -> DeltaConfig {
    let loader = Loader::new().with_optional_file("delta.toml");
    let loader = match matches.get_one::<String>("config") {
        Some(path) => {
            tracing::debug!(path = %path, "layering configuration file");
            loader.with_file(path)
        }
        None => loader,
    };

    let loader = apply_cli_overrides(loader, matches).unwrap_or_else(|err| {
        eprintln!("Invalid option: {err}");
        std::process::exit(1);
    });

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_cli_overrides(
    mut loader: Loader,
    matches: &ArgMatches,
) -> Result<Loader, ConfigError> {
    for (flag, key) in [
        ("block-tag", "convert.block_tag"),
        ("inline-tag", "convert.inline_tag"),
        ("embed-placeholder", "convert.embed_placeholder"),
    ] {
        if let Some(value) = matches.get_one::<String>(flag) {
            loader = loader.set_override(key, value.as_str())?;
        }
    }
    if matches.get_flag("strict") {
        loader = loader.set_override("convert.unknown_attributes", "reject")?;
    }
    Ok(loader)
}
