//! PDF loader: extracts text from an uploaded PDF byte stream in memory.

use crate::{Document, LoaderError};

#[tracing::instrument(skip(data), fields(len = data.len()))]
pub fn load(name: &str, data: &[u8]) -> Result<Vec<Document>, LoaderError> {
    let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
        tracing::error!(error = %e, "Failed to extract PDF text");
        LoaderError::Fetch {
            source_id: name.to_string(),
            reason: format!("PDF extraction failed: {e}"),
        }
    })?;

    if text.trim().is_empty() {
        return Err(LoaderError::Fetch {
            source_id: name.to_string(),
            reason: "PDF contains no extractable text".into(),
        });
    }

    Ok(vec![Document::new(text, name)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_fetch_error() {
        let err = load("broken.pdf", b"this is not a pdf").unwrap_err();
        assert!(matches!(err, LoaderError::Fetch { .. }), "{err:?}");
    }
}
