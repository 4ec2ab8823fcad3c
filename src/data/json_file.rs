use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn load_from_path<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).context(format!("Failed to open file: {:?}", path))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .context(format!("Failed to deserialize JSON: {:?}", path))?;
    Ok(value)
}

pub fn save_to_path<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path).context(format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .context(format!("Failed to serialize JSON to: {}", path.display()))
}
