use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::fs::binary::is_binary;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Count the text lines in a file.
///
/// Binary files count as zero lines and are not read past the sniffed
/// prefix. A trailing line without a newline still counts as one line.
/// Open and read failures are returned to the caller, which decides whether
/// to skip the file.
pub fn count_lines(path: &Path) -> std::io::Result<usize> {
    if is_binary(path)? {
        return Ok(0);
    }

    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    let mut lines = 0;
    let mut last_byte = None;
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        lines += chunk.iter().filter(|&&b| b == b'\n').count();
        last_byte = chunk.last().copied();
        let consumed = chunk.len();
        reader.consume(consumed);
    }

    if matches!(last_byte, Some(b) if b != b'\n') {
        lines += 1;
    }

    Ok(lines)
}
