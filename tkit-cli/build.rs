use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the views from src/inspect.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &["events", "parts", "json"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Path to a JSON event stream")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("tkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rebuild localized documents from skeleton event streams")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("merge")
                .arg(input_arg())
                .arg(Arg::new("locale").long("locale").short('l'))
                .arg(Arg::new("encoding").long("encoding"))
                .arg(
                    Arg::new("simplify")
                        .long("simplify")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("simplify")
                .arg(input_arg())
                .arg(Arg::new("locale").long("locale").short('l'))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect").arg(input_arg()).arg(
                Arg::new("view")
                    .index(2)
                    .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                    .value_hint(ValueHint::Other),
            ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "tkit", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "tkit", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "tkit", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
