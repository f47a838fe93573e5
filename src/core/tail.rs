//! # Out-file cursor
//!
//! Reads the backend's `out` file in two modes:
//!
//! - **Replay** ([`Tail::replay`]): seek to byte 0 and read every complete
//!   line. Used for full redraws after a resize.
//! - **Incremental** ([`Tail::read_new`]): continue from the persisted cursor
//!   and return only lines appended since the last call.
//!
//! A trailing fragment without a newline is held back until the backend
//! finishes the line, so no record is ever rendered twice or half.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// What an incremental read found.
#[derive(Debug, PartialEq, Eq)]
pub enum TailRead {
    /// Complete lines appended since the last read (possibly none).
    Lines(Vec<String>),
    /// The file is shorter than the cursor: it was truncated or replaced.
    Truncated,
}

pub struct Tail<R> {
    reader: BufReader<R>,
    /// Offset just past the last complete line handed out.
    cursor: u64,
}

impl<R: Read + Seek> Tail<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Rewind to the start and read every complete line.
    pub fn replay(&mut self) -> io::Result<Vec<String>> {
        self.cursor = 0;
        self.reader.seek(SeekFrom::Start(0))?;
        self.read_complete_lines()
    }

    /// Read lines appended since the previous call.
    pub fn read_new(&mut self) -> io::Result<TailRead> {
        let len = self.reader.seek(SeekFrom::End(0))?;
        if len < self.cursor {
            return Ok(TailRead::Truncated);
        }
        self.reader.seek(SeekFrom::Start(self.cursor))?;
        self.read_complete_lines().map(TailRead::Lines)
    }

    fn read_complete_lines(&mut self) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self.reader.read_until(b'\n', &mut buf)?;
            if n == 0 || buf.last() != Some(&b'\n') {
                // EOF, or a fragment still being written.
                break;
            }
            self.cursor += n as u64;
            lines.push(String::from_utf8_lossy(&buf).into_owned());
        }
        Ok(lines)
    }
}
