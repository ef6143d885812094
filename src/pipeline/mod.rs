//! Pipeline stages for PDF-to-text conversion.
//!
//! Each submodule implements exactly one step. The PDF engine sits behind
//! [`extract::TextEngine`] so tests can substitute a scripted one.
//!
//! ## Data Flow
//!
//! ```text
//! enumerate ──▶ write::is_processed ──▶ validate ──▶ extract ──▶ write
//! (list dir)     (skip if done)         (%PDF)       (pages)     (atomic)
//! ```
//!
//! 1. [`enumerate`]: list candidate files in the input directory
//! 2. [`write`]: output-exists check, then the atomic text write
//! 3. [`validate`]: magic-byte check before any parsing
//! 4. [`extract`]: walk pages through a [`extract::TextEngine`], one
//!    outcome per page
//! 5. [`pdfium`]: the production engine

pub mod enumerate;
pub mod extract;
pub mod pdfium;
pub mod validate;
pub mod write;
