//! Statement discovery and layout sidecar loading.
//!
//! Each `statement-2023-01.pdf` is expected to have a
//! `statement-2023-01.layout.json` next to it: the page/word dump produced
//! by the external layout engine.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use teller_ingest::{DocumentLayout, StatementInfo, StatementLoader};
use walkdir::WalkDir;

/// Every `*.pdf` below `root`, sorted by path.
pub fn find_statements(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if entry.file_type().is_file() && is_pdf(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

pub fn layout_path(statement: &Path) -> PathBuf {
    statement.with_extension("layout.json")
}

/// Loads the layout dump sitting next to each statement file.
pub struct SidecarLoader;

impl StatementLoader for SidecarLoader {
    type Document = DocumentLayout;

    fn load(&self, info: &StatementInfo) -> Result<DocumentLayout> {
        let path = layout_path(&info.path);
        DocumentLayout::load(&path)
            .with_context(|| format!("layout for {}", info.path.display()))
    }
}
