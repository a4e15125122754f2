//! Paginated fixed-width rendering of a report table.
//!
//! One header line of column names, then one line per row. Every cell is cut
//! to `cell_width` characters and placed in a `column_width` slot. A page
//! holds `lines_per_page` lines and the header is printed on the first page
//! only.

use crate::error::{RenderError, RenderResult};
use crate::models::{cell_text, Table};

/// Form feed between pages in the serialized document.
pub const PAGE_BREAK: char = '\x0c';

/// Turns a report table into a document.
pub trait Renderer: Send + Sync {
    fn render(&self, table: &Table) -> RenderResult<Document>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<String>,
}

/// A rendered, paginated report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain-text form: lines joined by `\n`, pages by a form feed.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.lines.join("\n"))
            .collect::<Vec<_>>()
            .join(&format!("\n{}", PAGE_BREAK))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_text().into_bytes()
    }
}

/// Fixed-width text layout.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub cell_width: usize,
    pub column_width: usize,
    pub lines_per_page: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            cell_width: 15,
            column_width: 16,
            lines_per_page: 50,
        }
    }
}

impl TextRenderer {
    fn line(&self, cells: impl Iterator<Item = String>) -> String {
        cells
            .map(|cell| {
                let cut: String = cell.chars().take(self.cell_width).collect();
                format!("{:<width$}", cut, width = self.column_width)
            })
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

impl Renderer for TextRenderer {
    fn render(&self, table: &Table) -> RenderResult<Document> {
        if table.is_empty() {
            return Err(RenderError::EmptyTable);
        }
        if self.lines_per_page < 2 || self.cell_width == 0 || self.column_width < self.cell_width {
            return Err(RenderError::InvalidLayout(format!(
                "cell_width={}, column_width={}, lines_per_page={}",
                self.cell_width, self.column_width, self.lines_per_page
            )));
        }

        let mut lines = Vec::with_capacity(table.len() + 1);
        lines.push(self.line(table.columns.iter().cloned()));
        for row in &table.rows {
            lines.push(self.line(table.columns.iter().map(|col| {
                row.get(col).map(cell_text).unwrap_or_default()
            })));
        }

        let pages = lines
            .chunks(self.lines_per_page)
            .map(|chunk| Page { lines: chunk.to_vec() })
            .collect();

        Ok(Document { pages })
    }
}
