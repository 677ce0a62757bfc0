//! Read-only DRM/KMS device report
//!
//! Opens DRM device nodes (`/dev/dri/card*`), queries driver capabilities and
//! display resources through the kernel's mode ioctls, and prints a
//! line-oriented, indented text report.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  report   (device walk, text layout)         │
//! │     │                      │                 │
//! │  format (lists, masks,   device::KmsQuery    │
//! │          mode lines)       │                 │
//! │                         device::Card         │
//! │                            │                 │
//! │                         ffi (ioctl structs)  │
//! └──────────────────────────────────────────────┘
//!                              │
//!                    DRM ioctls (read-only)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut out = std::io::stdout();
//! let summary = drm_info::run(&["/dev/dri/card0"], &mut out)?;
//! assert!(summary.success());
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod ffi;
pub mod format;
pub mod report;
pub mod types;

pub use config::{Config, Destination};
pub use device::{Card, KmsQuery};
pub use error::Error;
pub use report::{report_device, run, Outcome, Summary};

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
