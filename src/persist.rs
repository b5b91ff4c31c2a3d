//! Saving and loading objects to files.
//!
//! The text encoding is the default on-disk format; the `_binary` variants
//! store the binary stream instead. Writes go to a uniquely named hidden sibling
//! file that is synced and then renamed over the target, so a reader never sees a partly
//! written file. Every file handle is scoped to the call.
//!
//! ```rust,no_run
//! use rda::{persist, Rda, RdaSerializable, Result};
//!
//! #[derive(Default)]
//! struct Note {
//!     text: String,
//! }
//!
//! impl RdaSerializable for Note {
//!     fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
//!         rda.set_value_at(offset, self.text.as_str());
//!         offset + 1
//!     }
//!
//!     fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
//!         self.text = rda.value_at(offset)?.to_string();
//!         Ok(offset + 1)
//!     }
//! }
//!
//! let note = Note { text: "hello".into() };
//! persist::save(&note, "note.rda")?;
//! let back: Note = persist::load("note.rda")?;
//! assert_eq!(back.text, "hello");
//! # Ok::<(), rda::Error>(())
//! ```

use crate::binary::{BinaryReader, BinaryWriter};
use crate::{Error, Rda, RdaOptions, RdaSerializable, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Saves `obj` to `path` as text.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written, or an encoding error
/// if the exported tree exceeds the default depth limit.
pub fn save<T, P>(obj: &T, path: P) -> Result<()>
where
    T: RdaSerializable,
    P: AsRef<Path>,
{
    save_with_options(obj, path, &RdaOptions::default())
}

pub fn save_with_options<T, P>(obj: &T, path: P, options: &RdaOptions) -> Result<()>
where
    T: RdaSerializable,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = obj.to_rda().to_text_with_options(options)?;
    write_atomic(path, |w| {
        w.write_all(text.as_bytes())
            .map_err(|e| io_error("write", path, &e))
    })?;

    debug!(path = %path.display(), chars = text.len(), "saved rda text");
    Ok(())
}

/// Loads a `T` from a text file written by [`save`].
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, a parse error if its
/// content is malformed, or the first error raised while restoring `T`.
pub fn load<T, P>(path: P) -> Result<T>
where
    T: RdaSerializable + Default,
    P: AsRef<Path>,
{
    load_with_options(path, &RdaOptions::default())
}

pub fn load_with_options<T, P>(path: P, options: &RdaOptions) -> Result<T>
where
    T: RdaSerializable + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| io_error("read", path, &e))?;
    let rda = Rda::parse_with_options(&text, options)?;

    debug!(path = %path.display(), chars = text.len(), "loaded rda text");
    T::default().from_rda(&rda)
}

/// Saves `obj` to `path` as a binary stream.
pub fn save_binary<T, P>(obj: &T, path: P) -> Result<()>
where
    T: RdaSerializable,
    P: AsRef<Path>,
{
    save_binary_with_options(obj, path, &RdaOptions::default())
}

pub fn save_binary_with_options<T, P>(obj: &T, path: P, options: &RdaOptions) -> Result<()>
where
    T: RdaSerializable,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let rda = obj.to_rda();
    write_atomic(path, |w| {
        BinaryWriter::new(w, options.clone()).write(&rda)
    })?;

    debug!(path = %path.display(), "saved rda stream");
    Ok(())
}

/// Loads a `T` from a binary file written by [`save_binary`].
pub fn load_binary<T, P>(path: P) -> Result<T>
where
    T: RdaSerializable + Default,
    P: AsRef<Path>,
{
    load_binary_with_options(path, &RdaOptions::default())
}

pub fn load_binary_with_options<T, P>(path: P, options: &RdaOptions) -> Result<T>
where
    T: RdaSerializable + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;
    let rda = BinaryReader::new(BufReader::new(file), options.clone()).read()?;

    debug!(path = %path.display(), "loaded rda stream");
    T::default().from_rda(&rda)
}

fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(".{}.", file_name(path));
    // Dropping the temporary file on any early return removes it.
    let tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| io_error("create temporary file in", dir, &e))?;

    let mut writer = BufWriter::new(tmp);
    write(&mut writer)?;
    let tmp = writer
        .into_inner()
        .map_err(|e| io_error("flush", path, e.error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync", tmp.path(), &e))?;
    tmp.persist(path)
        .map_err(|e| io_error("rename onto", path, &e.error))?;
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> Error {
    Error::io(&format!("failed to {} {}: {}", action, path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        value: u32,
    }

    impl RdaSerializable for Counter {
        fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
            rda.child_mut(offset).set_display(&self.value);
            offset + 1
        }

        fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
            self.value = rda[offset].parse_value()?;
            Ok(offset + 1)
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_failed_write_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.rda");

        let result = write_atomic(&path, |_| Err(Error::custom("encoder failed")));
        assert!(result.is_err());
        assert!(!path.exists());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_temporary_file_is_hidden_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("john.rda");

        write_atomic(&path, |w| {
            let names = entries(dir.path());
            assert_eq!(names.len(), 1);
            assert!(names[0].starts_with(".john.rda."));
            assert!(names[0].ends_with(".tmp"));
            w.write_all(b"[]|=\\").map_err(Error::from)
        })
        .unwrap();

        assert_eq!(entries(dir.path()), vec!["john.rda".to_string()]);
    }

    #[test]
    fn test_concurrent_saves_to_one_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.rda");

        std::thread::scope(|scope| {
            for value in 0..8 {
                let path = &path;
                scope.spawn(move || {
                    for _ in 0..10 {
                        save(&Counter { value }, path).unwrap();
                    }
                });
            }
        });

        let back: Counter = load(&path).unwrap();
        assert!(back.value < 8);
        assert_eq!(entries(dir.path()), vec!["counter.rda".to_string()]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.rda");

        let result = fs::read_to_string(&path).map_err(|e| io_error("read", &path, &e));
        match result {
            Err(Error::Io(msg)) => assert!(msg.contains("missing.rda")),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
