use std::sync::{Arc, Mutex};

use content_loaders::{ContentSource, Document, LoaderError, SourceInput, SourceKind};

#[derive(Clone)]
pub struct MockLoader {
    pub documents: Vec<Document>,
    pub calls: Arc<Mutex<Vec<SourceKind>>>,
    pub fail_with: Option<String>,
}

impl MockLoader {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self::new(vec![Document::new(text, "mock-source")])
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            documents: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl ContentSource for MockLoader {
    async fn fetch(
        &self,
        kind: SourceKind,
        _input: &SourceInput,
    ) -> Result<Vec<Document>, LoaderError> {
        self.calls.lock().unwrap().push(kind);
        if let Some(ref msg) = self.fail_with {
            return Err(LoaderError::Fetch {
                source_id: "mock-source".to_string(),
                reason: msg.clone(),
            });
        }
        Ok(self.documents.clone())
    }
}
