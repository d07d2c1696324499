use std::collections::HashMap;

/// Raw text extracted from one logical unit of a source (a transcript, a
/// page, a file). Immutable once produced by a loader.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub source_id: String,
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Document {
            text: text.into(),
            source_id: source_id.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The kind of content behind an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Video,
    WebPage,
    Pdf,
    Docx,
}

/// Loader input: a URL for remote sources, a named byte stream for uploads.
#[derive(Clone)]
pub enum SourceInput {
    Url(String),
    Bytes { name: String, data: Vec<u8> },
}

impl SourceInput {
    pub fn url(url: impl Into<String>) -> Self {
        SourceInput::Url(url.into())
    }

    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        SourceInput::Bytes {
            name: name.into(),
            data,
        }
    }
}

impl std::fmt::Debug for SourceInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceInput::Url(url) => f.debug_tuple("Url").field(url).finish(),
            // elide file contents from logs
            SourceInput::Bytes { name, data } => f
                .debug_struct("Bytes")
                .field("name", name)
                .field("len", &data.len())
                .finish(),
        }
    }
}
