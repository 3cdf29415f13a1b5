//! Update layer
//!
//! Reads the installed version, fetches the release manifest, and applies
//! every newer release in order.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ VersionStore │──▶│   Manifest   │──▶│   Planner    │
//! │ (version.txt)│   │   (fetch)    │   │  (suffix)    │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │ for each entry
//!                                              ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │    Hooks     │◀──│   Archive    │◀──│   Download   │
//! │(todelete.txt)│   │  (extract)   │   │  (temp zip)  │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`version_store`]: Reads the local version marker
//! - [`manifest`]: `ManifestSource` trait and its HTTP implementation
//! - [`planner`]: Selects the entries after the installed version
//! - [`download`]: `Downloader` trait and a streaming HTTP implementation
//! - [`archive`]: ZIP extraction onto the installation root
//! - [`deletion`]: Deletion manifest parsing and execution
//! - [`hooks`]: Control files consumed after extraction
//! - [`applier`]: One update step from download to hooks
//! - [`runner`]: The whole run, wiring the pieces together
//! - [`error`]: Error types for the update layer
//! - [`types`]: `Manifest` and `UpdateEntry`

pub mod applier;
pub mod archive;
pub mod deletion;
pub mod download;
pub mod error;
pub mod hooks;
pub mod manifest;
pub mod planner;
pub mod runner;
pub mod types;
pub mod version_store;

/// Drops a leading UTF-8 byte order mark, as written by some Windows editors
pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
