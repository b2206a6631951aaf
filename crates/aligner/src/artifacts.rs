use crate::config::Config;
use crate::errors::{Error, Result};
use crate::types::{ArtifactManifest, Embedding, StageTrace, Vocabulary};
use candle_core::{Device, Tensor};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const PACKED_TENSOR_NAME: &str = "embeds";
pub const STAGE_LOG_HEADER: &str = "Sep\tVoc_size\tOrphans";

const MANIFEST_ERR: &str = "manifest not found at";
const PACKED_KEYS_ERR: &str = "packed vocabulary keys not found at";

/// Writes one key per line, in iteration order.
pub fn write_key_listing<'a, I>(path: &Path, keys: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    for key in keys {
        writer.write_all(key.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_stage_log(path: &Path, trace: &[StageTrace]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{STAGE_LOG_HEADER}")?;
    for row in trace {
        writeln!(
            writer,
            "{}\t{}\t{}",
            row.stage, row.vocabulary_size, row.orphan_count
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Dumps the vocabulary in GloVe text format, sorted by key.
pub fn write_embeddings_text(path: &Path, vocabulary: &Vocabulary<Embedding>) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    for (key, embedding) in vocabulary {
        writeln!(writer, "{key} {embedding}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Packs the vocabulary into a `[len, dim]` f32 tensor stored as safetensors,
/// plus a JSON list of keys giving the key of each row.
pub fn write_packed(
    tensor_path: &Path,
    keys_path: &Path,
    vocabulary: &Vocabulary<Embedding>,
    dim: usize,
) -> Result<()> {
    let mut keys = Vec::with_capacity(vocabulary.len());
    let mut data = Vec::with_capacity(vocabulary.len() * dim);
    for (key, embedding) in vocabulary {
        if embedding.dim() != dim {
            return Err(Error::Artifact(format!(
                "embedding for '{key}' has dimension {} but {dim} was expected",
                embedding.dim()
            )));
        }
        keys.push(key.as_str());
        data.extend_from_slice(embedding.values());
    }

    ensure_parent(tensor_path)?;
    let tensor = Tensor::from_vec(data, (keys.len(), dim), &Device::Cpu)?;
    let mut tensors = HashMap::with_capacity(1);
    tensors.insert(PACKED_TENSOR_NAME.to_string(), tensor);
    candle_core::safetensors::save(&tensors, tensor_path).map_err(|err| {
        Error::Artifact(format!(
            "failed to write packed embeddings to {}: {err}",
            tensor_path.display()
        ))
    })?;

    ensure_parent(keys_path)?;
    let mut writer = BufWriter::new(File::create(keys_path)?);
    serde_json::to_writer_pretty(&mut writer, &keys)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_packed_keys(keys_path: &Path) -> Result<Vec<String>> {
    ensure_file(keys_path, PACKED_KEYS_ERR)?;
    let reader = BufReader::new(File::open(keys_path)?);
    let keys = serde_json::from_reader(reader)?;
    Ok(keys)
}

pub fn write_manifest(manifest_path: &Path, manifest: &ArtifactManifest) -> Result<()> {
    ensure_parent(manifest_path)?;
    let file = File::create(manifest_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_manifest(manifest_path: &Path) -> Result<ArtifactManifest> {
    ensure_file(manifest_path, MANIFEST_ERR)?;
    let file = File::open(manifest_path)?;
    let reader = BufReader::new(file);
    let manifest = serde_json::from_reader(reader)?;
    Ok(manifest)
}

/// SHA-256 over the serialized config followed by the given files, visited
/// in path order.
pub fn compute_config_hash(cfg: &Config, extra_paths: &[&Path]) -> Result<String> {
    let mut hasher = Sha256::new();
    let cfg_bytes = serde_json::to_vec(cfg)?;
    hasher.update(&cfg_bytes);

    let mut sorted = extra_paths.to_vec();
    sorted.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut buffer = [0u8; 8 * 1024];
    for path in sorted {
        ensure_file(path, "cannot hash missing file at")?;
        hasher.update(path.to_string_lossy().as_bytes());

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn ensure_file(path: &Path, context: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Artifact(format!("{context} {}", path.display())))
    }
}
