//! Cross-references a package registry with a source forge.
//!
//! The registry reports the latest published version of each package; the
//! forge reports the latest release tag of the matching repository. The
//! [`report`] module joins the two views into per-package rows so that
//! packages whose published version has drifted from the repository tag can
//! be singled out.

pub mod config;
pub mod forge;
pub mod registry;
pub mod report;
