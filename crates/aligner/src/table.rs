//! Loading of pretrained embedding tables in the GloVe text format.
//!
//! Every line holds a key followed by exactly `dim` numeric fields, all
//! separated by single spaces. Keys may themselves contain spaces, so the key
//! is whatever precedes the trailing `dim` fields.

use crate::errors::{Error, Result};
use crate::types::{Embedding, EmbeddingLookup};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

const TABLE_FILE_ERR: &str = "embedding table not found at";

/// Immutable mapping from embedding key to vector.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dim: usize,
    entries: HashMap<String, Embedding>,
}

impl EmbeddingTable {
    /// Builds a table from in-memory entries, checking every vector length.
    pub fn from_entries<I, K>(dim: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<f32>)>,
        K: Into<String>,
    {
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding dimensionality must be greater than zero",
            ));
        }

        let mut table = HashMap::new();
        for (idx, (key, values)) in entries.into_iter().enumerate() {
            if values.len() != dim {
                return Err(Error::Table {
                    line: idx + 1,
                    message: format!("expected {dim} components, found {}", values.len()),
                });
            }
            table.insert(key.into(), Embedding::new(values));
        }

        Ok(Self {
            dim,
            entries: table,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Embedding> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl EmbeddingLookup for EmbeddingTable {
    type Value = Embedding;

    fn lookup(&self, key: &str) -> Option<&Embedding> {
        self.entries.get(key)
    }
}

pub fn load_table(path: &Path, dim: usize) -> Result<EmbeddingTable> {
    if !path.is_file() {
        return Err(Error::Artifact(format!(
            "{TABLE_FILE_ERR} {}",
            path.display()
        )));
    }

    info!(path = %path.display(), dim, "loading embedding table");
    let file = File::open(path)?;
    let table = read_table(BufReader::new(file), dim)?;
    info!(entries = table.len(), "embedding table loaded");
    Ok(table)
}

/// Reads a table from any line source. Blank lines are skipped; a later
/// duplicate key replaces the earlier entry.
pub fn read_table<R: BufRead>(reader: R, dim: usize) -> Result<EmbeddingTable> {
    if dim == 0 {
        return Err(Error::InvalidConfig(
            "embedding dimensionality must be greater than zero",
        ));
    }

    let mut entries = HashMap::new();
    let mut duplicates = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (key, embedding) = parse_numbered(&line, dim, idx + 1)?;
        if entries.insert(key, embedding).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        debug!(duplicates, "embedding table contained repeated keys");
    }

    Ok(EmbeddingTable { dim, entries })
}

/// Parses a single `key v1 .. vdim` line. Errors report it as line 1.
pub fn parse_line(line: &str, dim: usize) -> Result<(String, Embedding)> {
    parse_numbered(line, dim, 1)
}

fn parse_numbered(line: &str, dim: usize, line_no: usize) -> Result<(String, Embedding)> {
    let fields: Vec<&str> = line.trim_end().split(' ').collect();
    if fields.len() <= dim {
        return Err(Error::Table {
            line: line_no,
            message: format!(
                "expected a key and {dim} components, found {} fields",
                fields.len()
            ),
        });
    }

    let split_at = fields.len() - dim;
    let key = fields[..split_at].join(" ");
    let values = fields[split_at..]
        .iter()
        .map(|field| {
            field.parse::<f32>().map_err(|err| Error::Table {
                line: line_no,
                message: format!("invalid component '{field}': {err}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((key, Embedding::new(values)))
}
