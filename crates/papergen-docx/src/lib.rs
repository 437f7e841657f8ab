//! # papergen-docx
//!
//! DOCX generation engine for exam papers and answer keys.
//!
//! Compiles a [`Paper`](papergen_core::Paper) — header metadata, ordered
//! questions carrying the editor's rich-text trees, and a flat style record
//! — into a complete OOXML document package, returned as an in-memory byte
//! buffer. A reduced variant lists only the correct MCQ options as an
//! answer key.
//!
//! ## Architecture
//!
//! | Component | Module | Responsibility |
//! |-----------|--------|----------------|
//! | Document assembler | [`builder`] | Page setup, header block, question loop, answer-key mode |
//! | Rich-text tree compiler | internal | Recursive mapping of editor nodes to paragraphs/runs/lists/tables/images |
//! | WordprocessingML writer | [`docx`] | Part markup, OPC container, page geometry, run formatting |
//! | Asset resolver | [`assets`] | Filename-addressed byte store, tolerant of missing files |
//!
//! Renders are stateless and synchronous: each call reads an immutable
//! paper and returns a fresh buffer, so concurrent renders need no
//! coordination.
//!
//! ## Quick Start
//!
//! ```
//! use papergen_core::{Paper, PaperHeader};
//! use papergen_docx::{AssetStore, DocxRenderer};
//!
//! # fn main() -> papergen_core::Result<()> {
//! let renderer = DocxRenderer::new(AssetStore::new("data/uploads"));
//!
//! let paper = Paper {
//!     header: PaperHeader {
//!         title: "Science Midterm".to_string(),
//!         ..PaperHeader::default()
//!     },
//!     ..Paper::default()
//! };
//!
//! let bytes = renderer.render_paper(&paper)?;
//! assert!(!bytes.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! A render either completes or fails whole with a
//! [`PapergenError`](papergen_core::PapergenError); a *missing* asset is
//! not a failure — the logo or image is skipped and the rest of the
//! document renders normally.

pub mod assets;
pub mod builder;
pub mod docx;
mod richtext;

pub use assets::AssetStore;
pub use builder::DocxRenderer;
pub use papergen_core::{PapergenError, Result};
