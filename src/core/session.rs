//! # Session
//!
//! One session directory = one network/channel conversation for the lifetime
//! of the process. The backend appends records to `<dir>/out` and consumes
//! commands written to `<dir>/in`.
//!
//! ```text
//! ~/irc/irc.libera.chat/#rust/
//! ├── in    (write-only here, one command per line)
//! └── out   (read-only here, one record per line)
//! ```
//!
//! Both files are opened once in [`Session::open`] and held until the session
//! is dropped. The one exception is a backend that renames a fresh file over
//! `out`: [`Session::reopen_if_replaced`] notices the new file identity and
//! switches to it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::core::error::SessionError;
use crate::core::tail::{Tail, TailRead};

pub const OUT_FILE: &str = "out";
pub const IN_FILE: &str = "in";

pub struct Session {
    network: String,
    channel: String,
    out_path: PathBuf,
    out: Tail<File>,
    /// Device and inode of the open `out`, where the platform has them.
    out_id: Option<(u64, u64)>,
    input: File,
}

/// Check that `path` is a directory and resolve it to an absolute path.
pub fn resolve_dir(path: &Path) -> Result<PathBuf, SessionError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(SessionError::NotADirectory(path.to_path_buf())),
    }
    fs::canonicalize(path).map_err(|source| SessionError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}

/// Network and channel names: the last two non-empty segments of `dir`.
pub fn names_from_path(dir: &Path) -> (String, String) {
    let mut segments = dir.components().rev().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    });
    let channel = segments.next().unwrap_or_default();
    let network = segments.next().unwrap_or_default();
    (network, channel)
}

impl Session {
    /// Open the backend files of an already validated, absolute directory.
    pub fn open(dir: PathBuf) -> Result<Self, SessionError> {
        let out_path = dir.join(OUT_FILE);
        let in_path = dir.join(IN_FILE);

        let out = File::open(&out_path).map_err(|source| SessionError::Open {
            path: out_path.clone(),
            source,
        })?;
        let input = OpenOptions::new()
            .append(true)
            .open(&in_path)
            .map_err(|source| SessionError::Open {
                path: in_path.clone(),
                source,
            })?;

        let out_id = out.metadata().ok().as_ref().and_then(file_id);
        let (network, channel) = names_from_path(&dir);
        info!(
            "Session opened: dir={} network={} channel={}",
            dir.display(),
            network,
            channel
        );

        Ok(Self {
            network,
            channel,
            out_path,
            out: Tail::new(out),
            out_id,
            input,
        })
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// Forward one line to the backend, verbatim, and flush it.
    pub fn send(&mut self, line: &str) -> io::Result<()> {
        debug!("Sending {} bytes to backend", line.len());
        writeln!(self.input, "{line}")?;
        self.input.flush()
    }

    /// Every complete line of `out`, from byte 0.
    pub fn replay(&mut self) -> io::Result<Vec<String>> {
        self.out.replay()
    }

    /// Lines appended to `out` since the previous read.
    pub fn read_new(&mut self) -> io::Result<TailRead> {
        self.out.read_new()
    }

    /// Whether the backend's `out` file is still reachable by path.
    pub fn backend_alive(&self) -> bool {
        self.out_path.is_file()
    }

    /// Whether the file now at `out_path` is a different file from the one
    /// being read (the backend renamed a new `out` into place).
    pub fn out_replaced(&self) -> bool {
        let current = fs::metadata(&self.out_path).ok().as_ref().and_then(file_id);
        match (self.out_id, current) {
            (Some(open), Some(current)) => open != current,
            _ => false,
        }
    }

    /// Switch to the file now at `out_path` if it replaced the open one.
    /// The cursor starts over, so callers must replay afterwards.
    pub fn reopen_if_replaced(&mut self) -> io::Result<bool> {
        if !self.out_replaced() {
            return Ok(false);
        }
        let out = File::open(&self.out_path)?;
        self.out_id = out.metadata().ok().as_ref().and_then(file_id);
        self.out = Tail::new(out);
        info!("Reopened replaced {}", self.out_path.display());
        Ok(true)
    }
}

#[cfg(unix)]
fn file_id(meta: &fs::Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_id(_meta: &fs::Metadata) -> Option<(u64, u64)> {
    None
}
