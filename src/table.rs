use crate::document::{Document, Table};
use crate::dom;
use crate::error::{Error, Result};
use markup5ever_rcdom::Handle;

/// Appends the table rooted at `node` to `doc`.
///
/// The column count comes from the first row: its `th` cells, or its `td`
/// cells when there are no headers. A table without either is skipped.
pub fn materialize(doc: &mut Document, node: &Handle) -> Result<()> {
    let Some(first_row) = dom::find_first(node, "tr") else {
        log::debug!("skipping table without rows");
        return Ok(());
    };
    let mut columns = dom::find_all(&first_row, "th").len();
    if columns == 0 {
        columns = dom::find_all(&first_row, "td").len();
    }
    if columns == 0 {
        log::debug!("skipping table with no header or data cells in its first row");
        return Ok(());
    }

    let header = match dom::find_first(node, "thead").and_then(|thead| dom::find_first(&thead, "tr")) {
        Some(tr) => cell_texts(&dom::find_all(&tr, "th"), 0, columns)?,
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for (i, tr) in own_rows(node).iter().enumerate() {
        rows.push(cell_texts(&dom::find_all(tr, "td"), i + 1, columns)?);
    }

    let mut table = Table::new(columns);
    for (slot, text) in table.header.iter_mut().zip(header) {
        *slot = text;
    }
    for texts in rows {
        let cells = table.add_row();
        for (slot, text) in cells.iter_mut().zip(texts) {
            *slot = text;
        }
    }
    doc.add_table(table);
    Ok(())
}

fn cell_texts(cells: &[Handle], row: usize, columns: usize) -> Result<Vec<String>> {
    if cells.len() > columns {
        return Err(Error::TableBounds {
            row,
            cells: cells.len(),
            columns,
        });
    }
    Ok(cells
        .iter()
        .map(|c| dom::collapse_ws(dom::text_content(c).trim()))
        .collect())
}

/// Rows that belong to this table: `tr` children of the table itself or of
/// its `tbody`/`tfoot` sections. Header rows and rows of nested tables are
/// left out.
fn own_rows(table: &Handle) -> Vec<Handle> {
    let mut rows = Vec::new();
    for child in dom::element_children(table) {
        match dom::tag_lower(&child).as_deref() {
            Some("tr") => rows.push(child),
            Some("tbody") | Some("tfoot") => rows.extend(
                dom::element_children(&child)
                    .into_iter()
                    .filter(|c| dom::is_tag(c, "tr")),
            ),
            _ => {}
        }
    }
    rows
}
