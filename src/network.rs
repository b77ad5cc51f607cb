// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

//! Loading of road networks from node/edge-list files.
//!
//! The expected input is line-oriented CSV, one record per line:
//!
//! ```text
//! # comment
//! node,<id>,<lat>,<lon>
//! edge,<from>,<to>,<length_m>
//! ```
//!
//! Blank lines and `#` comments are ignored. Records may come in any order;
//! the edge/node consistency checks run once the whole file is read, through
//! [GraphBuilder::build]. Malformed input is fatal: a service must refuse to
//! start rather than route over a partially-loaded graph.

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::{BuildError, Graph, GraphBuilder, Node};

/// Format of the input network file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Uncompressed CSV
    Csv,

    /// CSV with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    CsvGz,

    /// CSV with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    CsvBz2,
}

impl FileFormat {
    /// Guesses the format from a file name, defaulting to plain CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::CsvGz,
            Some("bz2") => Self::CsvBz2,
            _ => Self::Csv,
        }
    }
}

/// Error which can occur when loading a network file.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Graph(#[from] BuildError),
}

/// Loads a [Graph] from a network file at the provided path, guessing the
/// [FileFormat] from the file extension.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Graph, NetworkError> {
    let format = FileFormat::from_path(path.as_ref());
    let f = File::open(path)?;
    load_from_io(f, format)
}

/// Loads a [Graph] from a reader with network-file content in the given
/// [FileFormat].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn load_from_io<R: io::Read>(reader: R, format: FileFormat) -> Result<Graph, NetworkError> {
    match format {
        FileFormat::Csv => read_records(io::BufReader::new(reader)),
        FileFormat::CsvGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            read_records(io::BufReader::new(d))
        }
        FileFormat::CsvBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            read_records(io::BufReader::new(d))
        }
    }
}

/// Loads a [Graph] from a static buffer with network-file content in the
/// given [FileFormat].
pub fn load_from_buffer(data: &[u8], format: FileFormat) -> Result<Graph, NetworkError> {
    load_from_io(io::Cursor::new(data), format)
}

fn read_records<B: BufRead>(reader: B) -> Result<Graph, NetworkError> {
    let mut builder = GraphBuilder::new();
    let mut nodes: usize = 0;
    let mut edges: usize = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }

        parse_record(record, &mut builder, &mut nodes, &mut edges).map_err(|message| {
            NetworkError::Parse {
                line: idx + 1,
                message,
            }
        })?;
    }

    log::info!("loaded {} nodes and {} edges", nodes, edges);
    Ok(builder.build()?)
}

fn parse_record(
    record: &str,
    builder: &mut GraphBuilder,
    nodes: &mut usize,
    edges: &mut usize,
) -> Result<(), String> {
    let mut fields = record.split(',').map(str::trim);
    let kind = fields.next().unwrap_or_default();
    match kind {
        "node" => {
            let id = parse_field(fields.next(), "node id")?;
            let lat = parse_field(fields.next(), "latitude")?;
            let lon = parse_field(fields.next(), "longitude")?;
            builder.add_node(Node { id, lat, lon });
            *nodes += 1;
        }
        "edge" => {
            let from = parse_field(fields.next(), "from id")?;
            let to = parse_field(fields.next(), "to id")?;
            let length = parse_field(fields.next(), "length")?;
            builder.add_edge(from, to, length);
            *edges += 1;
        }
        other => return Err(format!("unknown record type: {:?}", other)),
    }
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected trailing field: {:?}", extra));
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, what: &str) -> Result<T, String> {
    let field = field.ok_or_else(|| format!("missing {}", what))?;
    field
        .parse()
        .map_err(|_| format!("invalid {}: {:?}", what, field))
}
