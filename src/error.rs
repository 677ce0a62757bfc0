//! Error types for drm-info

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{request} failed: {source}")]
    Ioctl {
        request: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Blob {id}: {len} bytes, short read (need 4)")]
    ShortBlob { id: u32, len: usize },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Underlying OS error, if the failure came from the kernel
    fn os_error(&self) -> Option<&io::Error> {
        match self {
            Error::Open { source, .. } | Error::Ioctl { source, .. } => Some(source),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }

    /// `(<errno>): <message>` as printed in report diagnostics
    pub fn diagnostic(&self) -> String {
        match self.os_error() {
            Some(e) => format!("({}): {}", e.raw_os_error().unwrap_or(0), strip_os_suffix(e)),
            None => format!("(0): {}", self),
        }
    }
}

/// io::Error's Display appends " (os error N)"; the errno is printed separately
fn strip_os_suffix(e: &io::Error) -> String {
    let text = e.to_string();
    match text.rfind(" (os error ") {
        Some(pos) => text[..pos].to_string(),
        None => text,
    }
}
