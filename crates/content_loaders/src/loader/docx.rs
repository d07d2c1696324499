//! Word document loader.
//!
//! A `.docx` file is a zip archive; the document body lives in
//! `word/document.xml` as WordprocessingML. Text is carried in `<w:t>` runs
//! grouped into `<w:p>` paragraphs. The archive is read entirely in memory.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::{Document, LoaderError};

#[tracing::instrument(skip(data), fields(len = data.len()))]
pub fn load(name: &str, data: &[u8]) -> Result<Vec<Document>, LoaderError> {
    let xml = read_document_xml(name, data)?;
    let text = extract_paragraph_text(&xml).map_err(|reason| LoaderError::Fetch {
        source_id: name.to_string(),
        reason,
    })?;

    if text.trim().is_empty() {
        return Err(LoaderError::Fetch {
            source_id: name.to_string(),
            reason: "document contains no text".into(),
        });
    }

    Ok(vec![Document::new(text, name)])
}

fn read_document_xml(name: &str, data: &[u8]) -> Result<String, LoaderError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| LoaderError::Fetch {
        source_id: name.to_string(),
        reason: format!("not a valid docx archive: {e}"),
    })?;

    let mut file = archive
        .by_name("word/document.xml")
        .map_err(|e| LoaderError::Fetch {
            source_id: name.to_string(),
            reason: format!("missing word/document.xml: {e}"),
        })?;

    let mut xml = String::new();
    file.read_to_string(&mut xml).map_err(|e| LoaderError::Fetch {
        source_id: name.to_string(),
        reason: format!("failed to read document body: {e}"),
    })?;
    Ok(xml)
}

fn extract_paragraph_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_run = false,
            Ok(Event::Text(t)) if in_run => {
                text.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("malformed document XML: {e}")),
        }
    }

    Ok(text.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with_body(body_xml: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body_xml}</w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_paragraphs_with_breaks() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>",
        );
        let docs = load("notes.docx", &data).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "First paragraph.\nSecond paragraph.");
        assert_eq!(docs[0].source_id, "notes.docx");
    }

    #[test]
    fn empty_body_is_a_fetch_error() {
        let data = docx_with_body("<w:p></w:p>");
        let err = load("empty.docx", &data).unwrap_err();
        assert!(matches!(err, LoaderError::Fetch { .. }));
    }

    #[test]
    fn non_zip_bytes_are_a_fetch_error() {
        let err = load("broken.docx", b"plain text").unwrap_err();
        assert!(matches!(err, LoaderError::Fetch { .. }));
    }
}
