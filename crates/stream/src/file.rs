// Path: crates/stream/src/file.rs

//! A file-backed stream with exclusive access.

use crate::{resolve_seek, write_all, SeekOrigin, Stream, StreamError};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A [`Stream`] over a file on disk.
///
/// The file is locked exclusively for the lifetime of the stream. Cursor and
/// size are tracked locally so that `tell` and `size` never touch the disk.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    path: PathBuf,
    position: u64,
    size: u64,
    /// Fails the next write that starts at this offset.
    #[cfg(test)]
    fail_write_at: Option<u64>,
}

impl FileStream {
    /// Opens an existing file for reading and writing.
    pub fn open(path: &Path) -> Result<Self, StreamError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file, path)
    }

    /// Opens a file, creating it empty if it does not exist.
    pub fn open_or_create(path: &Path) -> Result<Self, StreamError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(file, path)
    }

    /// Creates a file, truncating any previous content.
    pub fn create(path: &Path) -> Result<Self, StreamError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::from_file(file, path)
    }

    fn from_file(mut file: File, path: &Path) -> Result<Self, StreamError> {
        file.lock_exclusive()?;
        let size = file.metadata()?.len();
        file.seek(SeekFrom::Start(0))?;
        tracing::debug!(target: "stream", "Opened {:?} ({} bytes)", path, size);
        Ok(Self {
            file,
            path: path.to_path_buf(),
            position: 0,
            size,
            #[cfg(test)]
            fail_write_at: None,
        })
    }

    /// The path this stream was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes written data to disk.
    pub fn sync(&mut self) -> Result<(), StreamError> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    fn truncate_to(&mut self, len: u64) -> Result<(), StreamError> {
        self.file.set_len(len)?;
        self.size = len;
        self.file.seek(SeekFrom::Start(len))?;
        self.position = len;
        Ok(())
    }

    /// Puts `suffix` back at `start`, undoing a partial splice.
    fn restore(&mut self, start: u64, suffix: &[u8]) -> Result<(), StreamError> {
        self.truncate_to(start)?;
        write_all(self, suffix)?;
        self.seek(start as i64, SeekOrigin::Start)?;
        Ok(())
    }

    fn restore_after_failure(&mut self, start: u64, suffix: &[u8]) {
        tracing::warn!(target: "stream", "Splice failed on {:?}, restoring {} bytes at {}", self.path, suffix.len(), start);
        if let Err(e) = self.restore(start, suffix) {
            tracing::error!(target: "stream", "Could not restore {:?} after failed splice: {}", self.path, e);
        }
    }

    fn append_tail(&mut self, insert_end: u64, tail: &[u8]) -> Result<(), StreamError> {
        self.truncate_to(insert_end)?;
        write_all(self, tail)?;
        self.seek(insert_end as i64, SeekOrigin::Start)?;
        Ok(())
    }

    fn read_suffix(&mut self) -> Result<Vec<u8>, StreamError> {
        let mut suffix = Vec::with_capacity((self.size - self.position) as usize);
        self.file.seek(SeekFrom::Start(self.position))?;
        self.file.read_to_end(&mut suffix)?;
        self.file.seek(SeekFrom::Start(self.position))?;
        Ok(suffix)
    }
}

impl Stream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let count = self.file.read(buf)?;
        self.position += count as u64;
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        #[cfg(test)]
        if self.fail_write_at == Some(self.position) {
            self.fail_write_at = None;
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "injected write failure").into());
        }
        self.file.write_all(data)?;
        self.position += data.len() as u64;
        self.size = self.size.max(self.position);
        Ok(data.len())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
        let target = resolve_seek(offset, origin, self.position, self.size)?;
        self.file.seek(SeekFrom::Start(target))?;
        self.position = target;
        Ok(target)
    }

    fn tell(&self) -> u64 {
        self.position
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn splice<F, E>(&mut self, delete_len: u64, producer: F) -> Result<(), E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
        E: From<StreamError>,
    {
        let start = self.position;
        let cut_end = start.saturating_add(delete_len);
        if cut_end > self.size {
            return Err(StreamError::OutOfRange {
                offset: i128::from(cut_end),
                size: self.size,
            }
            .into());
        }

        let suffix = self.read_suffix()?;
        if let Err(e) = self.truncate_to(start) {
            self.restore_after_failure(start, &suffix);
            return Err(e.into());
        }

        if let Err(e) = producer(self) {
            self.restore_after_failure(start, &suffix);
            return Err(e);
        }

        let insert_end = self.position;
        let tail = suffix.get(delete_len as usize..).unwrap_or_default();
        if let Err(e) = self.append_tail(insert_end, tail) {
            self.restore_after_failure(start, &suffix);
            return Err(e.into());
        }
        Ok(())
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        // Unlock file
        let _ = self.file.unlock();
    }
}
