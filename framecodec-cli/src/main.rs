//! Command-line tool for encoding, decoding, and inspecting framecodec
//! streams.
//!
//! This binary provides command-line interfaces for:
//! - encode: JSON records + a schema → a binary stream
//! - decode: a binary stream + a schema → JSON records
//! - inspect: print a schema's JSON form and block/compression summary

mod json_bridge;

use clap::{Parser, Subcommand};
use framecodec_format::{Limits, Schema};
use framecodec_io::backends::{FileSink, FileSource};
use framecodec_io::{Decoder, Encoder};
use serde_json::Value as Json;
use std::fs;

#[derive(Parser)]
#[command(name = "framecodec")]
#[command(about = "Schema-driven binary codec CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON array of records into a binary stream
    Encode {
        /// Path to the schema's JSON description
        #[arg(long)]
        schema: String,
        /// Path to a JSON array of records
        input: String,
        /// Path to write the binary stream to
        #[arg(short, long)]
        output: String,
    },
    /// Decode a binary stream into a JSON array of records
    Decode {
        /// Path to the schema's JSON description
        #[arg(long)]
        schema: String,
        /// Path to the binary stream
        input: String,
        /// Path to write the decoded JSON array to
        #[arg(short, long)]
        output: String,
    },
    /// Print a schema's JSON form and a block/compression summary
    Inspect {
        /// Path to the schema's JSON description
        schema: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { schema, input, output } => encode(&schema, &input, &output),
        Commands::Decode { schema, input, output } => decode(&schema, &input, &output),
        Commands::Inspect { schema } => inspect(&schema),
    }
}

fn load_schema(path: &str) -> Result<Schema, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(Schema::from_json(&text, None, None)?)
}

fn encode(schema_path: &str, input_path: &str, output_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(schema_path)?;
    let text = fs::read_to_string(input_path)?;
    let records: Vec<Json> = serde_json::from_str(&text)?;

    let entries = records
        .iter()
        .map(|record| {
            let object = record
                .as_object()
                .ok_or_else(|| "each record must be a JSON object".to_string())?;
            json_bridge::record_to_entry(&schema, object)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sink = FileSink::create(output_path)?;
    let mut encoder = Encoder::new(&schema, sink)?;
    encoder.write_entries(entries)?;
    let finish = encoder.finish();
    finish.sink.finish()?;

    eprintln!(
        "wrote {} entries, {} bytes to {output_path}",
        finish.metrics.entries_written, finish.metrics.bytes_written
    );
    Ok(())
}

fn decode(schema_path: &str, input_path: &str, output_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(schema_path)?;
    let source = FileSource::open(input_path)?;
    let decoder = Decoder::new(&schema, source, Limits::default())?;

    let mut records = Vec::new();
    for entry in decoder {
        let entry = entry?;
        records.push(Json::Object(json_bridge::entry_to_record(&schema, &entry)));
    }

    fs::write(output_path, serde_json::to_string_pretty(&records)?)?;
    eprintln!("wrote {} records to {output_path}", records.len());
    Ok(())
}

fn inspect(schema_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(schema_path)?;
    println!("{}", schema.to_json(None, None)?);
    println!();
    println!("version: {}", schema.version());
    if let Some(cadence) = schema.stream_compression() {
        println!("i_frame_interval: {}", cadence.i_frame_interval);
    } else {
        println!("i_frame_interval: (none, every entry is an I-frame)");
    }
    if let Some(header) = schema.custom_header() {
        println!("custom_header: {} bytes", header.byte_length);
    }
    println!("blocks:");
    for block in schema.blocks() {
        let compression = block
            .compression
            .as_ref()
            .map(|c| format!("{:?}", c.kind))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  [{}] {} : {:?} (compression: {compression})",
            block.index, block.property_name, block.kind
        );
    }
    Ok(())
}
