use std::io;
use std::path::Path;

use crate::fs::{FileSystem, RangeReader};
use crate::types::EdgeLines;

pub const DEFAULT_HEAD_BYTES: usize = 8 * 1024;
pub const DEFAULT_TAIL_BYTES: usize = 64 * 1024;

/// Byte bounds for the head and tail reads.
#[derive(Debug, Clone, Copy)]
pub struct EdgeReadLimits {
    pub head_bytes: usize,
    pub tail_bytes: usize,
}

impl Default for EdgeReadLimits {
    fn default() -> Self {
        Self {
            head_bytes: DEFAULT_HEAD_BYTES,
            tail_bytes: DEFAULT_TAIL_BYTES,
        }
    }
}

/// Read the first line and the last non-empty line of a file without loading
/// the whole thing.
///
/// Returns `Ok(None)` for an empty file. A first line longer than
/// `head_bytes` is truncated, and a last line longer than `tail_bytes` comes
/// back partial. The file handle is dropped before returning, on error paths too.
pub async fn read_edge_lines<F>(
    fs: &F,
    path: &Path,
    limits: EdgeReadLimits,
) -> io::Result<Option<EdgeLines>>
where
    F: FileSystem + ?Sized,
{
    let mut reader = fs.open(path).await?;
    read_from(reader.as_mut(), limits).await
}

async fn read_from(
    reader: &mut dyn RangeReader,
    limits: EdgeReadLimits,
) -> io::Result<Option<EdgeLines>> {
    let size = reader.len().await?;
    if size == 0 {
        return Ok(None);
    }

    let head_len = size.min(limits.head_bytes as u64) as usize;
    let head = reader.read_range(0, head_len).await?;
    let first = first_line(&head);

    if size < 2 {
        return Ok(Some(EdgeLines {
            last: first.clone(),
            first,
        }));
    }

    let tail_start = size.saturating_sub(limits.tail_bytes as u64);
    let tail = reader
        .read_range(tail_start, (size - tail_start) as usize)
        .await?;
    let last = last_non_empty_line(&tail).unwrap_or_else(|| first.clone());

    Ok(Some(EdgeLines { first, last }))
}

fn first_line(head: &[u8]) -> String {
    let line = match head.iter().position(|&b| b == b'\n') {
        Some(end) => &head[..end],
        None => head,
    };
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

fn last_non_empty_line(tail: &[u8]) -> Option<String> {
    tail.split(|&b| b == b'\n')
        .rev()
        .map(|fragment| String::from_utf8_lossy(fragment).trim().to_string())
        .find(|fragment| !fragment.is_empty())
}
