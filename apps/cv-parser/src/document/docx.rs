//! DOCX body text: one line per paragraph, no styling.
//!
//! Table cells and content controls are walked in document order, so contact
//! details laid out in a header table still reach the field extractors.

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, StructuredDataTag,
    StructuredDataTagChild, Table, TableCellContent, TableChild, TableRowChild,
};

use crate::errors::DocumentFormatError;

/// Reads the packaged `word/document.xml` and returns the non-empty
/// paragraphs in document order, including those inside tables and
/// structured-document tags.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocumentFormatError> {
    let docx =
        read_docx(bytes).map_err(|e| DocumentFormatError::DocxExtractionFailed(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_line(paragraph_text(paragraph), &mut lines),
            DocumentChild::Table(table) => push_table(table, &mut lines),
            DocumentChild::StructuredDataTag(tag) => push_tag(tag, &mut lines),
            _ => {}
        }
    }
    Ok(lines)
}

fn push_line(text: String, lines: &mut Vec<String>) {
    let text = text.trim();
    if !text.is_empty() {
        lines.push(text.to_string());
    }
}

// Row by row, cell by cell; one line per cell paragraph.
fn push_table(table: &Table, lines: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        push_line(paragraph_text(paragraph), lines)
                    }
                    TableCellContent::Table(nested) => push_table(nested, lines),
                    TableCellContent::StructuredDataTag(tag) => push_tag(tag, lines),
                    _ => {}
                }
            }
        }
    }
}

// Runs placed directly in a tag form a single line.
fn push_tag(tag: &StructuredDataTag, lines: &mut Vec<String>) {
    let mut inline = String::new();
    for child in &tag.children {
        match child {
            StructuredDataTagChild::Run(run) => push_run(run, &mut inline),
            StructuredDataTagChild::Paragraph(paragraph) => {
                push_line(std::mem::take(&mut inline), lines);
                push_line(paragraph_text(paragraph), lines);
            }
            StructuredDataTagChild::Table(table) => {
                push_line(std::mem::take(&mut inline), lines);
                push_table(table, lines);
            }
            StructuredDataTagChild::StructuredDataTag(nested) => {
                push_line(std::mem::take(&mut inline), lines);
                push_tag(nested, lines);
            }
            _ => {}
        }
    }
    push_line(inline, lines);
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&paragraph.children, &mut out);
    out
}

// Hyperlinks nest runs; e-mail addresses usually live there.
fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => out.push_str(&text.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
