use crate::types::ScanResult;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read previously saved results. A missing file is an empty set; an unreadable
/// or malformed one is logged and treated as empty.
pub fn load_results(path: &Path) -> Vec<ScanResult> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read existing results");
            return Vec::new();
        }
    };
    match serde_json::from_slice(&data) {
        Ok(existing) => existing,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "existing results are not valid JSON, starting fresh"
            );
            Vec::new()
        }
    }
}

/// Append `new_results` to whatever is already stored at `path` and write the union back
/// as pretty JSON. Returns the number of records now in the file.
pub fn merge_results(path: &Path, new_results: &[ScanResult]) -> Result<usize> {
    let mut all = load_results(path);
    debug!(existing = all.len(), new = new_results.len(), "merging results");
    all.extend_from_slice(new_results);

    // Write beside the target and rename, so a failed write leaves earlier runs intact.
    let tmp = temp_sibling(path);
    let written = write_json(&tmp, &all)
        .and_then(|()| fs::rename(&tmp, path).context("failed to replace results file"));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("failed to write results to {}", path.display()));
    }
    Ok(all.len())
}

fn write_json(path: &Path, results: &[ScanResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create results file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
