//! Evidence-pack directory loader.
//!
//! This crate provides:
//! - Reading `events.json`, `batches.json` and `anchors.json` from a pack directory
//! - Mapping I/O, JSON and structural failures to a single [`PackError`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vcp_core::{Verifier, VerifyOptions};
//! use vcp_pack::load_pack;
//!
//! let pack = load_pack("evidence/")?;
//! let report = Verifier::new(VerifyOptions::default()).verify(&pack);
//! println!("verified: {}", report.verified());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`PackReader`] - Read documents from a pack directory
//! - [`load_pack`] - Open and load in one call

#![deny(missing_docs)]

/// Error types for pack loading.
pub mod errors;
/// Pack directory reader.
pub mod reader;

pub use errors::PackError;
pub use reader::{load_pack, PackDocuments, PackReader, ANCHORS_FILE, BATCHES_FILE, EVENTS_FILE};
