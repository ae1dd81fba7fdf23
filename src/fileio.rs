//! File boundaries: buffered (optionally zstd) input and all-or-nothing output.
//!
//! Paths ending in `.zst` are transparently decompressed on read and compressed
//! on write. Output goes to a hidden sibling temp file that is renamed over the
//! destination only after the writer finished successfully.

use crate::error::{ConvertError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const ZSTD_LEVEL: i32 = 3;

pub fn is_zst(path: &Path) -> bool {
    path.extension().map_or(false, |e| e.eq_ignore_ascii_case("zst"))
}

/// Open `path` for reading with a `buf_bytes` buffer.
pub fn open_input(path: &Path, buf_bytes: usize) -> Result<Box<dyn Read>> {
    let f = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let r = BufReader::with_capacity(buf_bytes.max(8 * 1024), f);
    if !is_zst(path) {
        return Ok(Box::new(r));
    }
    let mut dec = zstd::stream::read::Decoder::with_buffer(r).map_err(|e| ConvertError::io(path, e))?;
    // large frames otherwise fail with "Frame requires too much memory"
    dec.window_log_max(31).map_err(|e| ConvertError::io(path, e))?;
    Ok(Box::new(BufReader::with_capacity(buf_bytes.max(8 * 1024), dec)))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "out".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Run `write` against a temp file next to `path`, then move it into place.
/// On any error the temp file is removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, buf_bytes: usize, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let tmp = tmp_path_for(path);
    let written = write_to(&tmp, is_zst(path), buf_bytes, write);
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    replace_file(&tmp, path)
}

fn write_to<F>(tmp: &Path, compress: bool, buf_bytes: usize, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let io_err = |e| ConvertError::io(tmp, e);
    let f = File::create(tmp).map_err(io_err)?;
    let mut w = BufWriter::with_capacity(buf_bytes.max(8 * 1024), f);
    if compress {
        let mut enc = zstd::stream::write::Encoder::new(&mut w, ZSTD_LEVEL).map_err(io_err)?;
        write(&mut enc)?;
        enc.finish().map_err(io_err)?;
    } else {
        write(&mut w)?;
    }
    let f = w.into_inner().map_err(|e| io_err(e.into_error()))?;
    f.sync_all().map_err(io_err)
}

/// Move `tmp` over `dest`; falls back to copy + remove when rename is refused
/// (e.g. across devices).
fn replace_file(tmp: &Path, dest: &Path) -> Result<()> {
    if fs::rename(tmp, dest).is_ok() {
        return Ok(());
    }
    let copied = fs::copy(tmp, dest).map_err(|e| ConvertError::io(dest, e));
    let _ = fs::remove_file(tmp);
    copied.map(|_| ())
}
