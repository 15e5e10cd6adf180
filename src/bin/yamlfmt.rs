//! Reads a YAML document and re-emits it, exercising the public API
//! end to end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use yamltree::{parse_from_file, serialize_to_file, stringify_with_options, SerializerOptions};

#[derive(ClapParser)]
#[command(name = "yamlfmt", about = "Parse a YAML document and reformat it")]
struct Args {
    /// Path to the YAML document to read.
    input: PathBuf,
    /// Write the reformatted document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Indent width in spaces.
    #[arg(long, default_value_t = 2)]
    indent: u32,
    /// Render short all-scalar sequences as `[...]`.
    #[arg(long)]
    compact_sequences: bool,
    /// Render short all-scalar mappings as `{...}`.
    #[arg(long)]
    compact_mappings: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let parsed = match parse_from_file(&args.input) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("yamlfmt: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = SerializerOptions {
        indent_size: args.indent,
        compact_sequences: args.compact_sequences,
        compact_mappings: args.compact_mappings,
        ..SerializerOptions::default()
    };

    match args.output {
        Some(path) => {
            if let Err(err) = serialize_to_file(&parsed.root, &path, Some(options)) {
                eprintln!("yamlfmt: {err}");
                return ExitCode::FAILURE;
            }
        }
        None => match stringify_with_options(&parsed.root, options) {
            Ok(text) => print!("{text}"),
            Err(err) => {
                eprintln!("yamlfmt: {err}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
