//! pair-ledger: convert between pair ledger files and JSON, YAML and HTML
//!
//! Usage:
//!   # Ledger to JSON on stdout, aliases expanded
//!   pair-ledger to-json --input stars.cpl
//!
//!   # JSON payload back to a ledger file
//!   pair-ledger from-json --input stars.json --output stars.cpl
//!
//!   # Flatten a multi-document YAML stream
//!   pair-ledger yaml-to-ledger --input catalog.yaml --output catalog.cpl
//!
//!   # Flatten markup into element/text records
//!   pair-ledger html-to-ledger --input page.html --output page.cpl

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use pairledger::{
    flatten_markup, AliasGenerator, Ledger, LedgerConfig, Payload, StructuralFlattener,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pair-ledger")]
#[command(about = "Pair ledger converter", long_about = None)]
struct Args {
    /// Log conversion details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a ledger to JSON
    ToJson {
        #[command(flatten)]
        io: Io,

        /// Single-line output
        #[arg(long)]
        compact: bool,

        /// Keep aliased keys instead of expanding them
        #[arg(long)]
        raw: bool,
    },

    /// Convert a ledger to YAML
    ToYaml {
        #[command(flatten)]
        io: Io,

        /// Keep aliased keys instead of expanding them
        #[arg(long)]
        raw: bool,
    },

    /// Convert a JSON payload back to a ledger
    FromJson {
        #[command(flatten)]
        io: Io,
    },

    /// Convert a YAML payload back to a ledger
    FromYaml {
        #[command(flatten)]
        io: Io,
    },

    /// Pretty print a ledger without converting
    Read {
        /// Ledger input file
        #[arg(long)]
        input: String,
    },

    /// Flatten a (multi-document) YAML file into a ledger
    YamlToLedger {
        #[command(flatten)]
        io: Io,

        /// Prefix for generated aliases (default: "k")
        #[arg(long)]
        alias_prefix: Option<String>,
    },

    /// Flatten a JSON document into a ledger
    JsonToLedger {
        #[command(flatten)]
        io: Io,

        /// Prefix for generated aliases (default: "k")
        #[arg(long)]
        alias_prefix: Option<String>,
    },

    /// Convert HTML into element and text records
    HtmlToLedger {
        #[command(flatten)]
        io: Io,
    },
}

#[derive(ClapArgs, Debug)]
struct Io {
    /// Input file
    #[arg(long)]
    input: String,

    /// Output file, or '-' for stdout
    #[arg(long, default_value = "-")]
    output: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args.command) {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        result => result,
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pairledger={level},pair_ledger={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A consumer closing stdout early is not an error
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::BrokenPipe)
    })
}

fn run(command: Command) -> Result<()> {
    let mut config = LedgerConfig::default();

    match command {
        Command::ToJson { io, compact, raw } => {
            config.pretty = !compact;
            config.expand_keymap = !raw;
            let payload = Payload::from_ledger(read_ledger(&io.input, config.expand_keymap)?);
            let text = payload.to_json_string(config.pretty)?;
            write_text_output(&io.output, &text)
        }
        Command::ToYaml { io, raw } => {
            config.expand_keymap = !raw;
            let payload = Payload::from_ledger(read_ledger(&io.input, config.expand_keymap)?);
            write_text_output(&io.output, &to_yaml(&payload)?)
        }
        Command::FromJson { io } => {
            let text = read_text(&io.input)?;
            let payload = Payload::from_json_str(&text)
                .with_context(|| format!("Invalid JSON payload in {}", io.input))?;
            write_ledger(&io.output, &payload.into_ledger())
        }
        Command::FromYaml { io } => {
            let text = read_text(&io.input)?;
            let payload = payload_from_yaml(&text)
                .with_context(|| format!("Invalid YAML payload in {}", io.input))?;
            write_ledger(&io.output, &payload.into_ledger())
        }
        Command::Read { input } => {
            let ledger = read_ledger(&input, false)?;
            let stdout = std::io::stdout();
            print_ledger(&mut stdout.lock(), &ledger)?;
            Ok(())
        }
        Command::YamlToLedger { io, alias_prefix } => {
            if let Some(prefix) = alias_prefix {
                config.alias_prefix = prefix;
            }
            let text = read_text(&io.input)?;
            let ledger = flatten_yaml(&text, &config)
                .with_context(|| format!("Failed to flatten YAML from {}", io.input))?;
            write_ledger(&io.output, &ledger)
        }
        Command::JsonToLedger { io, alias_prefix } => {
            if let Some(prefix) = alias_prefix {
                config.alias_prefix = prefix;
            }
            let text = read_text(&io.input)?;
            let document: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse JSON from {}", io.input))?;
            let mut flattener =
                StructuralFlattener::new(AliasGenerator::new(config.alias_prefix.as_str()));
            flattener.add_document(&document);
            write_ledger(&io.output, &flattener.finish())
        }
        Command::HtmlToLedger { io } => {
            let text = read_text(&io.input)?;
            let records = flatten_markup(&text);
            debug!(records = records.len(), "converted markup");
            write_ledger(&io.output, &Ledger::new(records))
        }
    }
}

fn read_text(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

fn read_ledger(path: &str, expand_keymap: bool) -> Result<Ledger> {
    let file = File::open(path).with_context(|| format!("Failed to open ledger: {}", path))?;
    let ledger = Ledger::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read ledger: {}", path))?;
    debug!(path, records = ledger.len(), "loaded ledger");
    Ok(if expand_keymap { ledger.expanded() } else { ledger })
}

/// Write to stdout for '-', otherwise to the named file
fn write_text_output(output: &str, text: &str) -> Result<()> {
    if is_stdout(output) {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
    } else {
        std::fs::write(output, text).with_context(|| format!("Failed to write {}", output))?;
    }
    Ok(())
}

fn write_ledger(output: &str, ledger: &Ledger) -> Result<()> {
    if is_stdout(output) {
        ledger.write_to(std::io::stdout().lock())?;
    } else {
        let file = File::create(Path::new(output))
            .with_context(|| format!("Failed to create ledger: {}", output))?;
        ledger
            .write_to(BufWriter::new(file))
            .with_context(|| format!("Failed to write ledger: {}", output))?;
    }
    debug!(output, records = ledger.len(), "wrote ledger");
    Ok(())
}

fn is_stdout(output: &str) -> bool {
    output.is_empty() || output == "-"
}

fn print_ledger<W: Write>(out: &mut W, ledger: &Ledger) -> std::io::Result<()> {
    if !ledger.keymap.is_empty() {
        writeln!(out, "--- Key Map ---")?;
        for (alias, target) in &ledger.keymap {
            writeln!(out, "{} -> {}", alias, target)?;
        }
        writeln!(out)?;
    }
    for (idx, record) in ledger.records.iter().enumerate() {
        writeln!(out, "--- Entry {} ---", idx + 1)?;
        for (key, value) in record {
            writeln!(out, "{}: {}", key, value)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(feature = "yaml")]
fn to_yaml(payload: &Payload) -> Result<String> {
    Ok(payload.to_yaml_string()?)
}

#[cfg(feature = "yaml")]
fn payload_from_yaml(text: &str) -> Result<Payload> {
    Ok(Payload::from_yaml_str(text)?)
}

#[cfg(feature = "yaml")]
fn flatten_yaml(text: &str, config: &LedgerConfig) -> Result<Ledger> {
    let documents = pairledger::flatten::yaml_documents(text)?;
    Ok(pairledger::flatten_documents(&documents, config))
}

#[cfg(not(feature = "yaml"))]
fn to_yaml(_payload: &Payload) -> Result<String> {
    yaml_unavailable()
}

#[cfg(not(feature = "yaml"))]
fn payload_from_yaml(_text: &str) -> Result<Payload> {
    yaml_unavailable()
}

#[cfg(not(feature = "yaml"))]
fn flatten_yaml(_text: &str, _config: &LedgerConfig) -> Result<Ledger> {
    yaml_unavailable()
}

#[cfg(not(feature = "yaml"))]
fn yaml_unavailable<T>() -> Result<T> {
    anyhow::bail!("YAML support is not compiled in; rebuild pair-ledger with the 'yaml' feature")
}
