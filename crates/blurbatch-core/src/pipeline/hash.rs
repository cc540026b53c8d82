//! Content hashing used to recognise files that have not changed between scans.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// BLAKE3 digest of a file's contents, streamed so large files are not
/// loaded into memory at once.
pub fn content_hash(path: &Path) -> std::io::Result<blake3::Hash> {
    let reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
    let mut hasher = blake3::Hasher::new();
    hasher.update_reader(reader)?;
    Ok(hasher.finalize())
}
