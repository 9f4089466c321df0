//! Reading and writing the dataset and report files.

use std::fs;
use std::path::Path;

use serde::Serialize;
use transcript_api::PeriodPayload;

use crate::error::TranscriptError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> TranscriptError + '_ {
    move |source| TranscriptError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_text(path: &Path, contents: &str) -> Result<(), TranscriptError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(path, contents).map_err(io_error(path))
}

/// Pretty-printed JSON with non-ASCII text kept as is.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), TranscriptError> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

/// Persists the raw payloads, one array element per fetched period.
pub fn write_raw(path: &Path, payloads: &[PeriodPayload]) -> Result<(), TranscriptError> {
    write_json(path, payloads)
}

pub fn read_raw(path: &Path) -> Result<Vec<PeriodPayload>, TranscriptError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(serde_json::from_str(&text)?)
}
