//! PDF text and table extraction

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::error::ExtractionError;
use super::types::PdfContent;

type Table = Vec<Vec<String>>;

/// Extract text from every page plus any column-aligned tables
///
/// All-or-nothing: a parser failure on any page discards what was read so far.
pub fn extract(data: &[u8]) -> Result<PdfContent, ExtractionError> {
    let pages = read_pages(data)?;
    tracing::debug!(page_count = pages.len(), "PDF pages read");

    Ok(PdfContent {
        text: render_pages(&pages),
        page_count: pages.len(),
    })
}

fn read_pages(data: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf-extract panics instead of erroring on some malformed inputs
    let outcome =
        panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem_by_pages(data)));

    match outcome {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(payload) => Err(ExtractionError::Pdf(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "parser panicked".to_string()
    }
}

/// Lay out page texts with page markers, followed by each page's tables
pub fn render_pages(pages: &[String]) -> String {
    let mut text = String::new();

    for (index, page) in pages.iter().enumerate() {
        let page_number = index + 1;

        if !page.trim().is_empty() {
            text.push_str(&format!(
                "\n--- Page {} ---\n{}\n",
                page_number,
                page.trim()
            ));
        }

        for (table_index, table) in detect_tables(page).iter().enumerate() {
            text.push_str(&format!(
                "\n--- Table {} on Page {} ---\n",
                table_index + 1,
                page_number
            ));
            for row in table {
                text.push_str(&row.join(" | "));
                text.push('\n');
            }
            text.push('\n');
        }
    }

    text.trim().to_string()
}

/// Find runs of at least two consecutive lines that split into two or more
/// cells on tabs or wide (2+ space) gaps.
pub fn detect_tables(page: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    for line in page.lines() {
        let cells = split_cells(line);
        if cells.len() >= 2 {
            current.push(cells);
        } else {
            flush_table(&mut tables, &mut current);
        }
    }
    flush_table(&mut tables, &mut current);

    tables
}

fn flush_table(tables: &mut Vec<Table>, current: &mut Table) {
    if current.len() >= 2 {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut spaces = 0usize;

    for ch in line.chars() {
        match ch {
            '\t' => {
                push_cell(&mut cells, &mut cell);
                spaces = 0;
            }
            ' ' => spaces += 1,
            _ => {
                if spaces >= 2 {
                    push_cell(&mut cells, &mut cell);
                } else if spaces == 1 {
                    cell.push(' ');
                }
                spaces = 0;
                cell.push(ch);
            }
        }
    }
    push_cell(&mut cells, &mut cell);

    cells
}

fn push_cell(cells: &mut Vec<String>, cell: &mut String) {
    let trimmed = cell.trim();
    if !trimmed.is_empty() {
        cells.push(trimmed.to_string());
    }
    cell.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("Name    Qty  Price"), vec!["Name", "Qty", "Price"]);
        assert_eq!(split_cells("  New York\t12"), vec!["New York", "12"]);
        assert_eq!(split_cells("plain sentence here"), vec!["plain sentence here"]);
        assert!(split_cells("   ").is_empty());
    }

    #[test]
    fn test_detect_tables() {
        let page = "Quarterly report\n\nRegion   Revenue\nNorth    10\nSouth    12\n\nClosing words.";
        let tables = detect_tables(page);

        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0],
            vec![
                vec!["Region".to_string(), "Revenue".to_string()],
                vec!["North".to_string(), "10".to_string()],
                vec!["South".to_string(), "12".to_string()],
            ]
        );
    }

    #[test]
    fn test_single_aligned_line_is_not_a_table() {
        assert!(detect_tables("Title    Page 1\nBody text follows.").is_empty());
        assert!(detect_tables("").is_empty());
    }

    #[test]
    fn test_render_pages_with_markers() {
        let text = render_pages(&pages(&["First page text", "Second page text"]));
        assert_eq!(
            text,
            "--- Page 1 ---\nFirst page text\n\n--- Page 2 ---\nSecond page text"
        );
    }

    #[test]
    fn test_render_pages_strips_leading_blank_lines() {
        let text = render_pages(&pages(&["\n\n\nQ1 revenue grew 10%\n\n", "\n  Next"]));
        assert_eq!(
            text,
            "--- Page 1 ---\nQ1 revenue grew 10%\n\n--- Page 2 ---\nNext"
        );
    }

    #[test]
    fn test_render_pages_skips_blank_pages_but_keeps_numbering() {
        let text = render_pages(&pages(&["", "  \n", "Third"]));
        assert_eq!(text, "--- Page 3 ---\nThird");
    }

    #[test]
    fn test_render_pages_appends_tables() {
        let text = render_pages(&pages(&["Item   Qty\nApple  3\nPear   10"]));
        assert!(text.starts_with("--- Page 1 ---\nItem   Qty"));
        assert!(text.contains("--- Table 1 on Page 1 ---\nItem | Qty\nApple | 3\nPear | 10"));
    }

    #[test]
    fn test_render_no_text_is_empty() {
        assert_eq!(render_pages(&pages(&["", ""])), "");
        assert_eq!(render_pages(&[]), "");
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let err = extract(b"This is dummy file content for testing purposes.").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
        assert!(err.to_string().starts_with("PDF processing error: "));
    }

    #[test]
    fn test_extract_rejects_empty_input() {
        assert!(matches!(extract(b""), Err(ExtractionError::Pdf(_))));
    }
}
