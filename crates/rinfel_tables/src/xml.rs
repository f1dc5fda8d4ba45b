//! Minimal HTML-table reader over `quick-xml`.
//!
//! Tables are saved as XHTML fragments whose document element holds a
//! `tbody`. Only `<root>/tbody/tr/td` cells are read, in document order;
//! header rows under `thead` and anything nested deeper are ignored.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::TableError;

/// Element path (below the document element) of the cells we read.
const CELL_PARENTS: [&[u8]; 2] = [b"tbody", b"tr"];
const CELL: &[u8] = b"td";

/// Text content of one table cell; `None` when the cell is blank.
pub type Cell = Option<String>;

/// Read every `tbody/tr/td` cell of an XML table.
///
/// Text of elements nested inside a cell is part of the cell. Cells holding
/// only whitespace are blank.
pub fn read_cells(table: &str, content: &str) -> Result<Vec<Cell>, TableError> {
    let mut reader = Reader::from_str(content);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<String> = None;
    let mut cells = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| xml_error(table, &reader, e))?;
        match event {
            Event::Start(e) => {
                if current.is_none() && is_cell(&path, e.name().as_ref()) {
                    current = Some(String::new());
                }
                path.push(e.name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                if current.is_none() && is_cell(&path, e.name().as_ref()) {
                    cells.push(None);
                }
            }
            Event::End(_) => {
                path.pop();
                if path.len() == CELL_PARENTS.len() + 1 {
                    if let Some(text) = current.take() {
                        cells.push(normalize(text));
                    }
                }
            }
            Event::Text(t) => {
                if let Some(text) = current.as_mut() {
                    let unescaped = t.unescape().map_err(|e| xml_error(table, &reader, e))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(c) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if cells.is_empty() {
        tracing::warn!(table, "table has no tbody/tr/td cells");
    }
    Ok(cells)
}

/// Read a table file and return its cells.
pub fn load_cells(path: &Path) -> Result<Vec<Cell>, TableError> {
    let content = std::fs::read_to_string(path).map_err(|e| TableError::io(path, &e))?;
    read_cells(&path.display().to_string(), &content)
}

/// Whether an element named `name`, opened under `path`, is a table cell.
fn is_cell(path: &[Vec<u8>], name: &[u8]) -> bool {
    name == CELL
        && path.len() == CELL_PARENTS.len() + 1
        && path[1..]
            .iter()
            .zip(CELL_PARENTS)
            .all(|(seen, want)| seen.as_slice() == want)
}

fn normalize(text: String) -> Cell {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

fn xml_error(table: &str, reader: &Reader<&[u8]>, e: quick_xml::Error) -> TableError {
    TableError::Xml {
        table: table.to_string(),
        message: format!("at byte {}: {e}", reader.buffer_position()),
    }
}
