//! Packed numeric archive format (`.npz`).
//!
//! An `.npz` file is a ZIP archive of NPY members. The archive is expected to
//! hold a single named array (`arr_0`) that is a zero-index list of
//! sequences; only the first sequence is used as the waveform.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use zip::ZipArchive;

use super::{FormatError, WaveformParser};

/// Parser for packed numeric archives.
pub struct NpzParser;

impl WaveformParser for NpzParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["npz"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<f64>, FormatError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let member = select_member(&archive)
            .ok_or_else(|| FormatError::EmptyArchive(path.display().to_string()))?;
        let mut payload = Vec::new();
        archive.by_name(&member)?.read_to_end(&mut payload)?;

        first_row(&payload, path)
    }
}

/// Pick the archive member to read: the canonical `arr_0.npy` if present,
/// otherwise the lexicographically first NPY member.
fn select_member<R: Read + std::io::Seek>(archive: &ZipArchive<R>) -> Option<String> {
    let mut members: Vec<&str> = archive
        .file_names()
        .filter(|name| name.ends_with(".npy"))
        .collect();
    if members.iter().any(|name| *name == "arr_0.npy") {
        return Some("arr_0.npy".to_string());
    }
    members.sort_unstable();
    members.first().map(|name| name.to_string())
}

fn malformed(path: &Path, reason: impl Into<String>) -> FormatError {
    FormatError::Npy {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Decode an NPY payload and return the first row of its 2-D array.
fn first_row(payload: &[u8], path: &Path) -> Result<Vec<f64>, FormatError> {
    let mut cursor = Cursor::new(payload);

    let mut magic = [0u8; 6];
    cursor.read_exact(&mut magic)?;
    if &magic != b"\x93NUMPY" {
        return Err(malformed(path, "bad magic"));
    }
    let major = cursor.read_u8()?;
    let _minor = cursor.read_u8()?;
    let header_len = if major >= 2 {
        cursor.read_u32::<LittleEndian>()? as usize
    } else {
        cursor.read_u16::<LittleEndian>()? as usize
    };
    let mut header = vec![0u8; header_len];
    cursor.read_exact(&mut header)?;
    let header = String::from_utf8_lossy(&header);

    let descr = quoted_value(&header, "descr")
        .ok_or_else(|| malformed(path, "header missing descr"))?;
    if raw_value(&header, "fortran_order") == Some("True") {
        return Err(malformed(path, "Fortran-ordered arrays are not supported"));
    }
    let shape = shape_value(&header).ok_or_else(|| malformed(path, "header missing shape"))?;
    let (rows, cols) = match shape[..] {
        [rows, cols] => (rows, cols),
        _ => {
            return Err(malformed(
                path,
                format!("expected a 2-D array of waveforms, got shape {shape:?}"),
            ))
        }
    };
    if rows == 0 {
        return Err(malformed(path, "array holds no waveforms"));
    }

    // Row-major layout: the first row is the first `cols` elements.
    let mut row = Vec::with_capacity(cols);
    match descr.as_str() {
        "<f8" => {
            for _ in 0..cols {
                row.push(cursor.read_f64::<LittleEndian>()?);
            }
        }
        "<f4" => {
            for _ in 0..cols {
                row.push(cursor.read_f32::<LittleEndian>()? as f64);
            }
        }
        "<i8" => {
            for _ in 0..cols {
                row.push(cursor.read_i64::<LittleEndian>()? as f64);
            }
        }
        "<i4" => {
            for _ in 0..cols {
                row.push(cursor.read_i32::<LittleEndian>()? as f64);
            }
        }
        other => return Err(malformed(path, format!("unsupported dtype {other}"))),
    }
    Ok(row)
}

/// Extract a quoted header value, e.g. `'descr': '<f8'`.
fn quoted_value(header: &str, key: &str) -> Option<String> {
    let rest = raw_value(header, key)?;
    let rest = rest.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

/// Extract the raw text following `'key':`, trimmed of leading spaces.
fn raw_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("'{key}':");
    let start = header.find(&marker)? + marker.len();
    Some(header[start..].trim_start())
}

/// Extract the shape tuple, e.g. `'shape': (3, 4)` -> `[3, 4]`.
fn shape_value(header: &str) -> Option<Vec<usize>> {
    let rest = raw_value(header, "shape")?;
    let rest = rest.strip_prefix('(')?;
    let end = rest.find(')')?;
    let mut dims = Vec::new();
    for part in rest[..end].split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        dims.push(part.parse().ok()?);
    }
    Some(dims)
}
