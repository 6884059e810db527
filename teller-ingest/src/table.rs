//! Template-driven table extraction.
//!
//! Deposit-account statements are read as tables whose column boundaries
//! come from a template picked by page count. The [`TableExtractor`] trait is
//! the seam; [`TemplateTableExtractor`] implements it over any
//! [`LayoutDocument`] by bucketing words into template columns.
//!
//! Template format:
//!
//! ```json
//! { "areas": [ { "page": 1, "top": 210.0, "bottom": 720.0,
//!                "columns": [ { "name": "Date Description", "x0": 30.0, "x1": 300.0 },
//!                             { "name": "Withdrawals ($)", "x0": 300.0, "x1": 400.0 } ] } ] }
//! ```

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::layout::{BBox, DocumentLayout, LayoutDocument, LayoutPage, group_lines};

/// Field name -> cell text, `None` for a blank cell.
pub type TableRow = BTreeMap<String, Option<String>>;

pub trait TableExtractor {
    /// All tables the template describes, in template order.
    fn extract_tables(&self, template: &Path) -> Result<Vec<Vec<TableRow>>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableTemplate {
    pub areas: Vec<TemplateArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateArea {
    /// 1-based page number.
    pub page: usize,
    pub top: f64,
    pub bottom: f64,
    pub columns: Vec<TemplateColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateColumn {
    pub name: String,
    pub x0: f64,
    pub x1: f64,
}

impl TableTemplate {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("read table template {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parse table template {}", path.display()))
    }
}

impl TemplateArea {
    fn bbox(&self) -> BBox {
        let x0 = self.columns.iter().map(|c| c.x0).fold(f64::INFINITY, f64::min);
        let x1 = self.columns.iter().map(|c| c.x1).fold(f64::NEG_INFINITY, f64::max);
        BBox {
            x0,
            top: self.top,
            x1,
            bottom: self.bottom,
        }
    }

    fn column_at(&self, x: f64) -> Option<&TemplateColumn> {
        self.columns.iter().find(|c| x >= c.x0 && x < c.x1)
    }
}

pub struct TemplateTableExtractor<'a, D> {
    document: &'a D,
}

impl<'a, D: LayoutDocument> TemplateTableExtractor<'a, D> {
    pub fn new(document: &'a D) -> Self {
        Self { document }
    }

    /// Rows of one template area; one row per text line.
    pub fn extract_area(&self, area: &TemplateArea) -> Result<Vec<TableRow>> {
        let page = area
            .page
            .checked_sub(1)
            .and_then(|i| self.document.pages().get(i))
            .ok_or_else(|| {
                anyhow!(
                    "template references page {} but document has {} pages",
                    area.page,
                    self.document.page_count()
                )
            })?;

        if area.columns.is_empty() {
            return Ok(Vec::new());
        }

        let bbox = area.bbox();
        let mut rows = Vec::new();
        for line in group_lines(page.words().iter().filter(|w| bbox.holds(w))) {
            let mut cells: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for word in line {
                if let Some(column) = area.column_at(word.centre_x()) {
                    cells.entry(column.name.as_str()).or_default().push(&word.text);
                }
            }
            if cells.is_empty() {
                continue;
            }

            let row: TableRow = area
                .columns
                .iter()
                .map(|c| {
                    let value = cells.get(c.name.as_str()).map(|parts| parts.join(" "));
                    (c.name.clone(), value)
                })
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

impl<D: LayoutDocument> TableExtractor for TemplateTableExtractor<'_, D> {
    fn extract_tables(&self, template: &Path) -> Result<Vec<Vec<TableRow>>> {
        let template = TableTemplate::load(template)?;
        template
            .areas
            .iter()
            .map(|area| self.extract_area(area))
            .collect()
    }
}

impl TableExtractor for DocumentLayout {
    fn extract_tables(&self, template: &Path) -> Result<Vec<Vec<TableRow>>> {
        TemplateTableExtractor::new(self).extract_tables(template)
    }
}
