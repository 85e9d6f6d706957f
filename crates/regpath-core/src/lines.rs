//! Line reading for pipeline text files.
//!
//! Upstream tools write plain bytes and names are not guaranteed to be UTF-8,
//! so lines are split on `\n` and decoded lossily instead of going through
//! [`BufRead::lines`].

use std::io::{self, BufRead};

/// Lines of `reader` without the trailing `\n` or `\r\n`. Invalid UTF-8 is
/// replaced with U+FFFD.
pub(crate) fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').map(|bytes| {
        bytes.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            }
        })
    })
}
