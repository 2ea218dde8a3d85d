//! Heuristic title and abstract extraction from academic PDFs
//!
//! Given the first page of a paper as positioned text lines, this crate
//! decides which lines form the title and which the abstract, despite wildly
//! inconsistent layouts: single and double column, rotated "Abstract"
//! labels, missing labels, multi-line titles, author-block noise.
//!
//! The pipeline:
//! 1. [`pdf`] renders the first page into a layout tree (lopdf)
//! 2. [`layout`] flattens it into ordered [`TextLine`] records with geometry
//! 3. [`title`] ranks and filters lines to pick the title
//! 4. [`abstracts`] tries four detection strategies in order

pub mod abstracts;
pub mod config;
pub mod layout;
pub mod pdf;
pub mod title;

pub use abstracts::resolve_abstract;
pub use config::ExtractConfig;
pub use layout::{extract_lines, BBox, LayoutNode, TextLine};
pub use title::{resolve_title, Title};

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Extracted paper metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperMeta {
    /// Resolved title
    pub title: String,
    /// Resolved abstract; empty when no strategy matched
    pub abstract_text: String,
}

/// Extract title and abstract from the first page of a PDF file
pub fn extract_meta<P: AsRef<Path>>(path: P) -> Result<PaperMeta, MetaError> {
    extract_meta_with_config(path, &ExtractConfig::default())
}

/// Extract with custom thresholds
pub fn extract_meta_with_config<P: AsRef<Path>>(
    path: P,
    config: &ExtractConfig,
) -> Result<PaperMeta, MetaError> {
    let page = pdf::first_page_layout(path)?;
    resolve_from_layout(&page, config)
}

/// Extract title and abstract from a PDF in memory
pub fn extract_meta_mem(buffer: &[u8]) -> Result<PaperMeta, MetaError> {
    extract_meta_mem_with_config(buffer, &ExtractConfig::default())
}

/// Extract from memory with custom thresholds
pub fn extract_meta_mem_with_config(
    buffer: &[u8],
    config: &ExtractConfig,
) -> Result<PaperMeta, MetaError> {
    let page = pdf::first_page_layout_mem(buffer)?;
    resolve_from_layout(&page, config)
}

/// Run the resolvers over an already built layout tree.
///
/// Useful when the rendering collaborator is not lopdf, and for tests that
/// construct layout trees directly.
pub fn resolve_from_layout(
    page: &LayoutNode,
    config: &ExtractConfig,
) -> Result<PaperMeta, MetaError> {
    let lines = layout::extract_lines(page);
    let title = title::resolve_title(&lines, config)?;
    let abstract_text = abstracts::resolve_abstract(&lines, title.first_line, config);
    Ok(PaperMeta {
        title: title.text,
        abstract_text,
    })
}

/// Extract metadata from many files in parallel.
///
/// Files are independent, so failures are carried per file and never stop
/// the batch.
pub fn extract_meta_batch(paths: &[PathBuf]) -> Vec<(PathBuf, Result<PaperMeta, MetaError>)> {
    paths
        .par_iter()
        .map(|path| {
            let result = extract_meta(path);
            if let Err(ref e) = result {
                log::warn!("extraction failed for {}: {}", path.display(), e);
            }
            (path.clone(), result)
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("text extraction is not allowed for this document")]
    ExtractionNotAllowed,
    #[error("no line qualifies as a title candidate")]
    NoTitleCandidate,
}

impl From<lopdf::Error> for MetaError {
    fn from(e: lopdf::Error) -> Self {
        MetaError::Parse(e.to_string())
    }
}
