//! JSON snapshots of the stores, gzip-compressed when the path ends in `.gz`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tempfile::NamedTempFile;

use shapes_core::{Polygon, Square};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub squares: Vec<Square>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

fn is_gz(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "gz")
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let value = if is_gz(path) {
        serde_json::from_reader(GzDecoder::new(reader))
    } else {
        serde_json::from_reader(reader)
    };
    value.with_context(|| format!("parsing {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    // Each write gets its own temp file next to the target and is renamed over it, so a
    // crash or a concurrent writer never leaves a truncated snapshot.
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).with_context(|| format!("creating temp file in {}", dir.display()))?;
    {
        let writer = BufWriter::new(tmp.as_file());
        if is_gz(path) {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            serde_json::to_writer(&mut encoder, value)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
    }
    tmp.persist(path).map_err(|e| e.error).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Load a snapshot; a missing file is an empty one.
pub fn load(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        info!("No snapshot at {}, starting empty", path.display());
        return Ok(Snapshot::default());
    }
    let snapshot: Snapshot = read_json(path)?;
    info!(
        "Loaded {} squares and {} polygons from {}",
        snapshot.squares.len(),
        snapshot.polygons.len(),
        path.display(),
    );
    Ok(snapshot)
}

pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    write_json(path, snapshot)
}
