// Command-line interface for tkit
//
// This binary rebuilds localized documents from the skeleton event streams produced by
// extraction filters. The event stream is read as JSON (an array of events, as serialized by
// tkit-skeleton).
//
// Usage:
//  tkit merge <events.json> [--locale <loc>] [--simplify] [--output <file>]  - Write the document
//  tkit simplify <events.json> [--locale <loc>] [--output <file>]           - Flatten references
//  tkit inspect <events.json> [<view>]                                       - Dump the stream
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<name> <value>, on top of the embedded
// defaults, ./tkit.toml and --config.
// Example:
//  tkit merge events.json --extra-referent-copies 2 --extra-layer

mod inspect;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use tkit_config::{Loader, TkitConfig};
use tkit_skeleton::encoder::EncoderManager;
use tkit_skeleton::{merge, Event, LocaleId, MergeArtifact, MergeSpec, SkeletonSimplifier};

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }
        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Path to a JSON event stream")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn locale_arg() -> Arg {
    Arg::new("locale")
        .long("locale")
        .short('l')
        .help("Output locale (defaults to writer.output_locale, then the document locale)")
        .value_hint(ValueHint::Other)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("tkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rebuild localized documents from skeleton event streams")
        .long_about(
            "tkit writes the document described by a filter's event stream, with the\n\
            translated content of every text unit substituted into its skeleton.\n\n\
            Commands:\n  \
            - merge:    Write the document for an output locale\n  \
            - simplify: Rewrite the stream so that no event refers to another one\n  \
            - inspect:  Dump the stream (events, skeleton parts, JSON)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration keys:\n  \
            locale, encoding, line-break, referent-copies, simplify, layer.\n\n\
            Examples:\n  \
            tkit merge events.json --locale fr -o page.fr.html\n  \
            tkit simplify events.json > flat.json\n  \
            tkit inspect events.json parts",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a tkit.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("merge")
                .about("Write the document described by an event stream")
                .arg(input_arg())
                .arg(locale_arg())
                .arg(
                    Arg::new("encoding")
                        .long("encoding")
                        .help("Output encoding, e.g. UTF-8 or ISO-8859-1"),
                )
                .arg(
                    Arg::new("simplify")
                        .long("simplify")
                        .help("Simplify the stream before writing it")
                        .action(ArgAction::SetTrue),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("simplify")
                .about("Flatten cross references into self-contained events (JSON output)")
                .arg(input_arg())
                .arg(locale_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump an event stream")
                .arg(input_arg())
                .arg(
                    Arg::new("view")
                        .help("View to print. Defaults to 'events'")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);
    let matches = build_cli().get_matches_from(&cleaned_args);

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        log::warn!("ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("merge", sub_matches)) => handle_merge_command(sub_matches, &mut config),
        Some(("simplify", sub_matches)) => handle_simplify_command(sub_matches, &config),
        Some(("inspect", sub_matches)) => {
            let input = required(sub_matches, "input");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(inspect::DEFAULT_VIEW);
            let events = read_events(input);
            let output = inspect::render_view(&events, view).unwrap_or_else(|e| {
                eprintln!("Inspect error: {e}");
                std::process::exit(1);
            });
            print!("{output}");
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the merge command
fn handle_merge_command(matches: &ArgMatches, config: &mut TkitConfig) {
    let input = required(matches, "input");
    if let Some(locale) = matches.get_one::<String>("locale") {
        config.writer.output_locale = locale.clone();
    }
    if let Some(encoding) = matches.get_one::<String>("encoding") {
        config.writer.output_encoding = encoding.clone();
    }
    if matches.get_flag("simplify") {
        config.simplifier.enabled = true;
    }

    let events = read_events(input);
    let mut spec = MergeSpec::new(&events, config.output_options());
    if config.simplifier.enabled {
        spec = spec.simplified();
    }
    if let Some(path) = matches.get_one::<String>("output") {
        spec = spec.with_output_path(path);
    }

    let result = merge(spec).unwrap_or_else(|e| {
        eprintln!("Merge error: {e}");
        std::process::exit(1);
    });
    match result.artifact {
        MergeArtifact::InMemory(text) => print!("{text}"),
        MergeArtifact::File(path) => log::info!("wrote {}", path.display()),
    }
}

/// Handle the simplify command
fn handle_simplify_command(matches: &ArgMatches, config: &TkitConfig) {
    let input = required(matches, "input");
    let locale = matches
        .get_one::<String>("locale")
        .cloned()
        .or_else(|| non_empty(&config.writer.output_locale))
        .map(|tag| LocaleId::new(&tag));
    let encoding = non_empty(&config.writer.output_encoding);

    let events = read_events(input);
    let mut simplifier = SkeletonSimplifier::new(locale, encoding)
        .with_encoders(EncoderManager::from(&config.encoders))
        .with_referent_copies(config.writer.referent_copies);
    let simplified = simplifier.simplify_all(events).unwrap_or_else(|e| {
        eprintln!("Simplify error: {e}");
        std::process::exit(1);
    });

    let json = serde_json::to_string_pretty(&simplified).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, json + "\n").unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{json}"),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Missing argument '{name}'");
            std::process::exit(1);
        })
}

fn read_events(path: &str) -> Vec<Event> {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });
    serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing events in '{path}': {e}");
        std::process::exit(1);
    })
}

fn load_cli_config(explicit_path: Option<&str>) -> TkitConfig {
    let loader = Loader::new().with_optional_file("tkit.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut TkitConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["locale", "output-locale"]) {
        config.writer.output_locale = raw;
    }
    if let Some(raw) = take_override(extra_params, &["encoding", "output-encoding"]) {
        config.writer.output_encoding = raw;
    }
    if let Some(raw) = extra_params.remove("line-break") {
        config.writer.line_break = unescape_line_break(&raw);
    }
    if let Some(raw) = extra_params.remove("referent-copies") {
        config.writer.referent_copies = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid value for --extra-referent-copies: '{raw}' (expected a number)");
            std::process::exit(1);
        });
    }
    if let Some(raw) = extra_params.remove("simplify") {
        config.simplifier.enabled = parse_bool_arg("simplify", &raw);
    }
    if let Some(raw) = extra_params.remove("layer") {
        config.layer.enabled = parse_bool_arg("layer", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            eprintln!("Invalid value for --extra-{flag}: '{raw}' (expected true/false)");
            std::process::exit(1);
        }
    }
}

/// `\n` and `\r\n` typed on a shell arrive as literal backslash sequences.
fn unescape_line_break(raw: &str) -> String {
    raw.replace("\\r", "\r").replace("\\n", "\n")
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
