use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Where the bytes of a pending file live until the upload reads them.
#[derive(Debug, Clone)]
pub enum FileContent {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl FileContent {
    pub async fn load(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileContent::Path(path) => tokio::fs::read(path).await,
            FileContent::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct PendingFile {
    pub name: String,
    pub size: u64,
    pub mime: Option<String>,
    #[derivative(Debug = "ignore")]
    pub content: FileContent,
}

impl PendingFile {
    pub fn from_path(name: impl Into<String>, size: u64, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            size,
            mime: None,
            content: FileContent::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime: None,
            content: FileContent::Bytes(bytes),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Two files are the same selection when name and size agree; content is not compared.
    pub fn same_selection(&self, other: &PendingFile) -> bool {
        self.name == other.name && self.size == other.size
    }
}

/// Files waiting for the next batch, in the order they were admitted.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    files: Vec<PendingFile>,
}

impl PendingSet {
    pub fn contains(&self, file: &PendingFile) -> bool {
        self.files.iter().any(|f| f.same_selection(file))
    }

    /// Appends `file` unless an equal selection is already pending, in which
    /// case the file is handed back.
    pub fn insert(&mut self, file: PendingFile) -> Result<(), PendingFile> {
        if self.contains(&file) {
            return Err(file);
        }
        self.files.push(file);
        Ok(())
    }

    pub fn remove_batch(&mut self, batch: &[PendingFile]) {
        self.files
            .retain(|pending| !batch.iter().any(|sent| sent.same_selection(pending)));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn to_vec(&self) -> Vec<PendingFile> {
        self.files.clone()
    }
}

/// Destination identifier for an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetCollection(Uuid);

impl TargetCollection {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TargetCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TargetCollection {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone)]
pub struct FileRejection {
    pub file: PendingFile,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidType,
    TooLarge,
}

/// Everything the transport needs to send one file.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub target: TargetCollection,
    pub file_name: String,
    pub mime: Option<String>,
    pub content: FileContent,
}

impl UploadPayload {
    pub fn new(file: &PendingFile, target: TargetCollection) -> Self {
        Self {
            target,
            file_name: file.name.clone(),
            mime: file.mime.clone(),
            content: file.content.clone(),
        }
    }
}

/// Body of a well-formed upload answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UploadResponse {
    Success {
        #[serde(default)]
        message: Option<String>,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Failure(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: &[UploadOutcome]) -> Self {
        let succeeded = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, UploadOutcome::Success))
            .count();
        Self {
            attempted: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}
