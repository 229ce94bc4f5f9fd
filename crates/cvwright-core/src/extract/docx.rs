use std::path::Path;

use crate::Result;

#[cfg(feature = "docx")]
const CONTEXT: &str = "Failed to extract text from DOCX";

/// Extract body paragraphs and flattened table rows from a DOCX file
#[cfg(feature = "docx")]
pub fn extract_docx_text(path: &Path) -> Result<String> {
    use std::io::Read;

    use crate::Error;

    let file = std::fs::File::open(path).map_err(|e| Error::extraction(CONTEXT, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| Error::extraction(CONTEXT, e))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| Error::extraction(CONTEXT, e))?
        .read_to_string(&mut xml)
        .map_err(|e| Error::extraction(CONTEXT, e))?;

    text_from_document_xml(&xml)
}

#[cfg(not(feature = "docx"))]
pub fn extract_docx_text(_path: &Path) -> Result<String> {
    Err(crate::Error::MissingDependency(
        "DOCX support is not available. Rebuild with: cargo install cvwright-cli --features docx"
            .to_string(),
    ))
}

/// Walk `word/document.xml`.
///
/// Top-level paragraphs are kept in document order when they contain
/// non-whitespace text. Each row of a top-level table becomes one entry: its
/// non-empty cell texts joined with ` | `. Paragraphs come first, then table
/// rows, all separated by a blank line. Text boxes and other embedded
/// drawing content are not part of the paragraph they are anchored in.
#[cfg(feature = "docx")]
fn text_from_document_xml(xml: &str) -> Result<String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    use crate::Error;

    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();

    let mut table_depth = 0usize;
    let mut embedded_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut paragraph: Option<String> = None;
    let mut cell: Option<Vec<String>> = None;
    let mut row: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if is_embedded(e.local_name().as_ref()) => embedded_depth += 1,
            Ok(Event::End(e)) if is_embedded(e.local_name().as_ref()) => {
                embedded_depth = embedded_depth.saturating_sub(1)
            }
            Ok(Event::Start(_) | Event::Empty(_) | Event::Text(_) | Event::End(_))
                if embedded_depth > 0 => {}
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"tr" if table_depth == 1 => row.clear(),
                b"tc" if table_depth == 1 => cell = Some(Vec::new()),
                b"p" if table_depth <= 1 => paragraph = Some(String::new()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if run_depth > 0 => {
                if let Some(p) = paragraph.as_mut() {
                    match e.local_name().as_ref() {
                        b"tab" => p.push('\t'),
                        b"br" | b"cr" => p.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(e)) if in_text => {
                if let Some(p) = paragraph.as_mut() {
                    let text = e.unescape().map_err(|e| Error::extraction(CONTEXT, e))?;
                    p.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"tr" if table_depth == 1 => {
                    if !row.is_empty() {
                        rows.push(row.join(" | "));
                    }
                    row.clear();
                }
                b"tc" if table_depth == 1 => {
                    if let Some(parts) = cell.take() {
                        let text = parts.join("\n");
                        let text = text.trim();
                        if !text.is_empty() {
                            row.push(text.to_string());
                        }
                    }
                }
                b"p" if table_depth <= 1 => {
                    if let Some(text) = paragraph.take() {
                        if table_depth == 0 {
                            if !text.trim().is_empty() {
                                paragraphs.push(text);
                            }
                        } else if let Some(parts) = cell.as_mut() {
                            parts.push(text);
                        }
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::extraction(CONTEXT, e)),
            _ => {}
        }
    }

    paragraphs.extend(rows);
    Ok(paragraphs.join("\n\n"))
}

/// Run children holding drawings, VML shapes or alternate renderings
#[cfg(feature = "docx")]
fn is_embedded(local_name: &[u8]) -> bool {
    matches!(
        local_name,
        b"drawing" | b"pict" | b"object" | b"AlternateContent" | b"txbxContent"
    )
}
