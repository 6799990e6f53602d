//! Content hashing and byte comparison
//!
//! xxHash3 provides a cheap prefilter for duplicate grouping; actual
//! duplicate/conflict decisions are always confirmed byte-for-byte so a
//! hash collision can never cost a file.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;
use xxhash_rust::xxh3::Xxh3;

/// Read buffer size for hashing and comparison
const CHUNK_SIZE: usize = 256 * 1024;

/// Compute the full-content xxHash3 of a file, streaming in chunks
pub fn compute_file_hash(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| Error::HashComputation {
        path: path.to_path_buf(),
        message: format!("failed to open file: {}", e),
    })?;

    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| Error::HashComputation {
            path: path.to_path_buf(),
            message: format!("failed to read file: {}", e),
        })?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = hasher.digest();
    trace!(?path, hash, "Computed file hash");
    Ok(hash)
}

/// Byte-for-byte comparison of two files.
///
/// Sizes are compared first so mismatched files cost one stat each.
pub fn files_identical(a: &Path, b: &Path) -> std::io::Result<bool> {
    let size_a = std::fs::metadata(a)?.len();
    let size_b = std::fs::metadata(b)?.len();
    if size_a != size_b {
        return Ok(false);
    }

    let mut reader_a = BufReader::with_capacity(CHUNK_SIZE, File::open(a)?);
    let mut reader_b = BufReader::with_capacity(CHUNK_SIZE, File::open(b)?);
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];

    loop {
        let n_a = read_full(&mut reader_a, &mut buf_a)?;
        let n_b = read_full(&mut reader_b, &mut buf_b)?;

        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Fill as much of the buffer as possible, tolerating short reads
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_same_content_same_hash() {
        let a = temp_with(b"test content");
        let b = temp_with(b"test content");
        assert_eq!(
            compute_file_hash(a.path()).unwrap(),
            compute_file_hash(b.path()).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_hash() {
        let a = temp_with(b"content 1");
        let b = temp_with(b"content 2");
        assert_ne!(
            compute_file_hash(a.path()).unwrap(),
            compute_file_hash(b.path()).unwrap()
        );
    }

    #[test]
    fn test_files_identical() {
        let a = temp_with(b"same bytes");
        let b = temp_with(b"same bytes");
        assert!(files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_files_differ_same_length() {
        let a = temp_with(b"same length A");
        let b = temp_with(b"same length B");
        assert!(!files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_files_differ_by_length() {
        let a = temp_with(b"short");
        let b = temp_with(b"a bit longer");
        assert!(!files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_empty_files_identical() {
        let a = temp_with(b"");
        let b = temp_with(b"");
        assert!(files_identical(a.path(), b.path()).unwrap());
    }
}
