//! Word (.docx) text extraction

use std::io::Cursor;

use docx_rust::document::{
    BodyContent, Paragraph, ParagraphContent, Run, RunContent, Table, TableCellContent,
    TableRowContent,
};
use docx_rust::DocxFile;

use super::error::ExtractionError;
use super::types::WordContent;

/// Paragraph text in document order, then every table row as `a | b | c`
pub fn extract(data: &[u8]) -> Result<WordContent, ExtractionError> {
    let file = DocxFile::from_reader(Cursor::new(data))
        .map_err(|e| ExtractionError::Word(e.to_string()))?;
    let docx = file
        .parse()
        .map_err(|e| ExtractionError::Word(e.to_string()))?;

    let mut paragraphs = Vec::new();
    let mut tables = Vec::new();
    for content in &docx.document.body.content {
        match content {
            BodyContent::Paragraph(para) => paragraphs.push(para),
            BodyContent::Table(table) => tables.push(table),
            _ => {}
        }
    }

    let mut text = String::new();

    for para in &paragraphs {
        let para_text = paragraph_text(para);
        if !para_text.trim().is_empty() {
            text.push_str(&para_text);
            text.push('\n');
        }
    }

    for table in &tables {
        text.push_str(&table_text(table));
        text.push('\n');
    }

    Ok(WordContent {
        text: text.trim().to_string(),
        paragraphs: paragraphs.len(),
        tables: tables.len(),
    })
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();

    for content in &para.content {
        match content {
            ParagraphContent::Run(run) => push_run_text(&mut text, run),
            ParagraphContent::Link(link) => {
                if let Some(run) = &link.content {
                    push_run_text(&mut text, run);
                }
            }
            _ => {}
        }
    }

    text
}

fn push_run_text(text: &mut String, run: &Run) {
    for content in &run.content {
        match content {
            RunContent::Text(t) => text.push_str(&t.text),
            RunContent::Tab(_) => text.push('\t'),
            RunContent::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

/// One line per row with at least one non-empty cell
fn table_text(table: &Table) -> String {
    let mut text = String::new();

    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .filter_map(|cell| match cell {
                TableRowContent::TableCell(cell) => Some(cell),
                _ => None,
            })
            .map(|cell| {
                cell.content
                    .iter()
                    .map(|content| {
                        let TableCellContent::Paragraph(para) = content;
                        paragraph_text(para)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
                    .trim()
                    .to_string()
            })
            .filter(|cell| !cell.is_empty())
            .collect();

        if !cells.is_empty() {
            text.push_str(&cells.join(" | "));
            text.push('\n');
        }
    }

    text
}
