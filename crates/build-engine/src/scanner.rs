//! Frame source scanning.

use std::path::Path;

use snaplapse_common::error::SnapResult;

use crate::session::{FRAME_EXTENSION, FRAME_PAD_WIDTH, FRAME_PREFIX};

/// Count the frames in a session directory.
///
/// Only entries matching the fixed naming convention
/// (`img_` + zero-padded index + `.jpg`) are counted. A missing or
/// unreadable directory is an I/O error the caller surfaces without
/// retry; it indicates a missing session, not a transient encoder issue.
pub fn count_frames(dir: &Path) -> SnapResult<usize> {
    let mut count = 0usize;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if is_frame_name(name) {
                count += 1;
            }
        }
    }

    tracing::debug!(dir = %dir.display(), count, "Scanned frame sequence");
    Ok(count)
}

/// Whether a file name matches the frame naming convention.
fn is_frame_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(FRAME_PREFIX) else {
        return false;
    };
    let Some(index) = rest.strip_suffix(&format!(".{FRAME_EXTENSION}")) else {
        return false;
    };
    index.len() == FRAME_PAD_WIDTH && index.bytes().all(|b| b.is_ascii_digit())
}
