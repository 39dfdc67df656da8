//! jflat: flatten JSON documents into records
//!
//! Usage:
//!   # Read from file, output one JSON record per line
//!   jflat data.json -f 'items.[].id=id' -f 'items.[].@=pos'
//!
//!   # Read from stdin
//!   echo '{"a": [1, 2]}' | jflat -f 'a.[]=all' -f 'a.[].#=n'
//!
//!   # Process NDJSON with descriptors from a file
//!   jflat --ndjson events.jsonl --descriptors fields.json

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use jflat::{extract_lines, Descriptor, ExtractConfig, Extractor, Record};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(name = "jflat")]
#[command(about = "Flatten JSON documents into records by dotted paths", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Field to extract as PATH=ID (repeatable); without '=' the path is the id
    #[arg(long = "field", short = 'f', value_name = "PATH=ID")]
    fields: Vec<String>,

    /// JSON file holding an array of {"path", "id"} descriptors
    #[arg(long, value_name = "FILE")]
    descriptors: Option<String>,

    /// Process newline-delimited JSON (one document per line)
    #[arg(long)]
    ndjson: bool,

    /// Path segment separator (default: '.')
    #[arg(long)]
    separator: Option<char>,

    /// Segment that expands an array (default: "[]")
    #[arg(long)]
    array_marker: Option<String>,

    /// Pseudo-field for the element index (default: "@")
    #[arg(long)]
    index_field: Option<String>,

    /// Pseudo-field for the element count (default: "#")
    #[arg(long)]
    count_field: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Build config
    let mut config = ExtractConfig::default();
    if let Some(sep) = args.separator {
        config.separator = sep;
    }
    if let Some(marker) = args.array_marker {
        config.array_marker = marker;
    }
    if let Some(index) = args.index_field {
        config.index_field = index;
    }
    if let Some(count) = args.count_field {
        config.count_field = count;
    }

    let descriptors = load_descriptors(args.descriptors.as_deref(), &args.fields)?;
    if descriptors.is_empty() {
        bail!("No descriptors given; use --field or --descriptors");
    }
    debug!(count = descriptors.len(), "loaded descriptors");

    let extractor = Extractor::new(&descriptors, config);

    let mut reader = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn BufRead>
    } else {
        Box::new(BufReader::new(std::io::stdin())) as Box<dyn BufRead>
    };

    let records = if args.ndjson {
        extract_lines(reader, &extractor)?
    } else {
        let mut content = Vec::new();
        reader.read_to_end(&mut content).context("Failed to read input")?;
        extractor.extract(&content).context("Failed to extract document")?
    };

    write_records(&records)?;
    info!(records = records.len(), "done");

    Ok(())
}

/// Collect descriptors from the descriptor file, then from `--field` flags
fn load_descriptors(path: Option<&str>, fields: &[String]) -> Result<Vec<Descriptor>> {
    let mut descriptors = Vec::new();

    if let Some(path) = path {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
        let from_file: Vec<Descriptor> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse descriptors from {}", path))?;
        descriptors.extend(from_file);
    }

    descriptors.extend(fields.iter().map(|field| parse_field(field)));
    Ok(descriptors)
}

/// Split `PATH=ID` at the last '='
fn parse_field(field: &str) -> Descriptor {
    match field.rsplit_once('=') {
        Some((path, id)) => Descriptor::new(path, id),
        None => Descriptor::new(field, field),
    }
}

/// Write records to stdout as newline-delimited JSON
fn write_records(records: &[Record]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for record in records {
        let line = serde_json::to_string(record).context("Failed to serialize record")?;
        writeln!(out, "{}", line)?;
    }

    out.flush().context("Failed to flush output")
}
