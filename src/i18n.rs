//! User-facing message catalog.

use crate::upload::MAX_FILE_SIZE;
use crate::utils::file_size::format_size;

/// A notification text before localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    UploadSuccess,
    UploadError { message: String },
    InvalidFileType,
    MaxSizeError,
    AlreadyAdded { file_name: String },
    AddFiles,
    SelectCollection,
    UploadInProgress,
}

pub trait Translate: Send + Sync {
    fn translate(&self, message: &Message) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Translate for English {
    fn translate(&self, message: &Message) -> String {
        match message {
            Message::UploadSuccess => "File uploaded successfully".to_string(),
            Message::UploadError { message } => format!("Failed to upload file: {message}"),
            Message::InvalidFileType => "Invalid file type".to_string(),
            Message::MaxSizeError => format!(
                "File too big, the maximum size is {}",
                format_size(MAX_FILE_SIZE)
            ),
            Message::AlreadyAdded { file_name } => format!("{file_name} was already added"),
            Message::AddFiles => "Please add files to upload".to_string(),
            Message::SelectCollection => "Please select a collection to upload to".to_string(),
            Message::UploadInProgress => "An upload is already in progress".to_string(),
        }
    }
}
