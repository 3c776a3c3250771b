mod controller;
mod dropzone;
mod notify;
mod transport;
mod types;

pub use controller::UploadBatchController;
pub use dropzone::{collect_paths, AcceptPolicy, MAX_FILE_SIZE};
pub use notify::{NotificationSink, Toast, ToastVariant};
pub use transport::HttpTransport;
pub use types::{BatchReport, PendingFile, TargetCollection};
