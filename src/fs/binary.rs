use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected when classifying a file.
pub const SNIFF_LEN: u64 = 512;

/// Check whether a file looks binary by searching its first [`SNIFF_LEN`]
/// bytes for a NUL byte.
///
/// Only a failure to open the file is reported as an error. A read error
/// after a successful open classifies the file as text so that the caller
/// can still attempt to count it. Empty files are text.
pub fn is_binary(path: &Path) -> std::io::Result<bool> {
    let file = File::open(path)?;

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    if let Err(e) = file.take(SNIFF_LEN).read_to_end(&mut head) {
        tracing::trace!(path = %path.display(), error = %e, "read failed while sniffing, treating as text");
        return Ok(false);
    }

    Ok(head.contains(&0))
}
