use crate::upload::types::{FileRejection, PendingFile, RejectionReason};
use ignore::Walk;
use std::path::{Path, PathBuf};

// 100 MB. Older docs call this "1 MB"; the byte value is the one enforced.
pub const MAX_FILE_SIZE: u64 = 100_000_000;

const ACCEPTED_TYPES: &[(&str, &[&str])] = &[
    ("text/plain", &["txt"]),
    ("text/csv", &["csv"]),
    ("text/markdown", &["md", "markdown"]),
    ("audio/x-m4a", &["m4a"]),
    ("audio/mpeg", &["mp3", "mpga", "mpeg"]),
    ("audio/webm", &["webm"]),
    ("video/mp4", &["mp4"]),
    ("audio/wav", &["wav"]),
    ("application/pdf", &["pdf"]),
    ("text/html", &["html"]),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        &["pptx"],
    ),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &["docx"],
    ),
    ("application/vnd.oasis.opendocument.text", &["odt"]),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        &["xlsx", "xls"],
    ),
    ("application/epub+zip", &["epub"]),
    ("application/x-ipynb+json", &["ipynb"]),
    ("text/x-python", &["py"]),
];

/// Result of classifying one drop or picker selection.
#[derive(Debug, Default)]
pub struct DropBatch {
    pub accepted: Vec<PendingFile>,
    pub rejected: Vec<FileRejection>,
}

#[derive(Debug, Clone)]
pub struct AcceptPolicy {
    max_size: u64,
    types: &'static [(&'static str, &'static [&'static str])],
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self {
            max_size: MAX_FILE_SIZE,
            types: ACCEPTED_TYPES,
        }
    }
}

impl AcceptPolicy {
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn classify(&self, candidates: Vec<PendingFile>) -> DropBatch {
        let mut batch = DropBatch::default();
        for file in candidates {
            let reason = if !self.accepts_type(&file) {
                Some(RejectionReason::InvalidType)
            } else if file.size > self.max_size {
                Some(RejectionReason::TooLarge)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    tracing::debug!(file = %file.name, size = file.size, ?reason, "rejected file");
                    batch.rejected.push(FileRejection { file, reason });
                }
                None => batch.accepted.push(file),
            }
        }
        batch
    }

    /// Matches on MIME type when the source supplied one, otherwise on extension.
    fn accepts_type(&self, file: &PendingFile) -> bool {
        if let Some(mime) = &file.mime {
            if self.types.iter().any(|(accepted, _)| *accepted == mime.as_str()) {
                return true;
            }
        }

        let Some(ext) = Path::new(&file.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
        else {
            return false;
        };
        self.types
            .iter()
            .any(|(_, extensions)| extensions.contains(&ext.as_str()))
    }

    /// Extensions for the native file picker filter.
    pub fn file_dialog_extensions(&self) -> Vec<&'static str> {
        self.types
            .iter()
            .flat_map(|(_, extensions)| extensions.iter().copied())
            .collect()
    }
}

/// Turns dropped or picked paths into candidates. Folders are walked,
/// skipping anything their `.gitignore` excludes.
pub fn collect_paths<I>(paths: I) -> Vec<PendingFile>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in Walk::new(&path) {
                match entry {
                    Ok(entry) if entry.path().is_file() => {
                        if let Some(file) = pending_from_path(entry.path()) {
                            files.push(file);
                        }
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "skipping unreadable entry"),
                }
            }
        } else if let Some(file) = pending_from_path(&path) {
            files.push(file);
        }
    }
    files
}

fn pending_from_path(path: &Path) -> Option<PendingFile> {
    let name = path.file_name()?.to_string_lossy().to_string();
    match std::fs::metadata(path) {
        Ok(metadata) => Some(PendingFile::from_path(
            name,
            metadata.len(),
            path.to_path_buf(),
        )),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read file metadata");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    fn sized(name: &str, size: u64) -> PendingFile {
        PendingFile::from_path(name, size, PathBuf::from(name))
    }

    #[test]
    fn size_limit_is_inclusive() {
        let policy = AcceptPolicy::default();
        let batch = policy.classify(vec![
            sized("exact.pdf", MAX_FILE_SIZE),
            sized("over.pdf", MAX_FILE_SIZE + 1),
        ]);

        assert_eq!(batch.accepted.len(), 1);
        assert_eq!(batch.accepted[0].name, "exact.pdf");
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].reason, RejectionReason::TooLarge);
    }

    #[test]
    fn type_is_checked_before_size() {
        let batch = AcceptPolicy::default().classify(vec![sized("movie.mkv", MAX_FILE_SIZE + 1)]);
        assert_eq!(batch.rejected[0].reason, RejectionReason::InvalidType);
    }

    #[test]
    fn extensions_match_case_insensitively() {
        let batch = AcceptPolicy::default().classify(vec![
            sized("Slides.PPTX", 10),
            sized("notebook.ipynb", 10),
            sized("budget.xls", 10),
            sized("script.rs", 10),
            sized("README", 10),
        ]);

        let accepted: Vec<_> = batch.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(accepted, vec!["Slides.PPTX", "notebook.ipynb", "budget.xls"]);
        assert_eq!(batch.rejected.len(), 2);
    }

    #[test]
    fn mime_type_is_enough_without_extension() {
        let file = PendingFile::from_bytes("clipboard", Arc::from(&b"a,b"[..])).with_mime("text/csv");
        let batch = AcceptPolicy::default().classify(vec![file]);
        assert_eq!(batch.accepted.len(), 1);
    }

    #[test]
    fn picker_filter_lists_every_extension() {
        let extensions = AcceptPolicy::default().file_dialog_extensions();
        assert!(extensions.contains(&"markdown"));
        assert!(extensions.contains(&"py"));
        assert_eq!(extensions.len(), 21);
    }

    #[test]
    fn folders_are_walked_respecting_gitignore() {
        let dir = tempfile::Builder::new().prefix("drop").tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".gitignore"), "secret.txt\n").unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        fs::write(dir.path().join("secret.txt"), b"hidden").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("data.csv"), b"1,2,3").unwrap();

        let mut files = collect_paths([dir.path().to_path_buf()]);
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let found: Vec<_> = files.iter().map(|f| (f.name.as_str(), f.size)).collect();
        assert_eq!(found, vec![("data.csv", 5), ("notes.txt", 5)]);
    }

    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let files = collect_paths([dir.path().join("gone.txt")]);
        assert!(files.is_empty());
    }
}
