use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("delta-html")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert rich text deltas to HTML")
        .arg(
            Arg::new("input")
                .help("Path to the delta JSON file (\"-\" reads stdin)")
                .index(1)
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
                .help("Element used for each line"),
        )
        .arg(
            Arg::new("inline-tag")
                .long("inline-tag")
                .value_name("TAG")
                .help("Element wrapping attributed text"),
        )
        .arg(
            Arg::new("embed-placeholder")
                .long("embed-placeholder")
                .value_name("TEXT")
                .help("Text rendered for embed inserts"),
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
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "delta-html", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "delta-html", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "delta-html", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
