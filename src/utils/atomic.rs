//! Atomic file operations
//!
//! Writes go to a `.tmp` sibling which is synced and then renamed over the
//! destination, so readers see either the old file or the new one, never a
//! partial write. A failed write removes the temp file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Atomically replace `path` with whatever `write_fn` writes
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> io::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let result = write_temp(&temp_path, write_fn).and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp<F>(temp_path: &Path, write_fn: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(temp_path)?);
    write_fn(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
