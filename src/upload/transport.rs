use crate::upload::types::{FileContent, UploadPayload, UploadResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upload rejected with status {status}")]
    Status {
        status: StatusCode,
        detail: Option<Value>,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, TransportError::Status { status, .. } if *status == StatusCode::FORBIDDEN)
    }

    /// The server's `detail` as sent: strings unquoted, anything else as JSON.
    /// Falls back to the status line when the body carried no detail.
    pub fn raw_detail(&self) -> String {
        match self {
            TransportError::Status {
                detail: Some(Value::String(detail)),
                ..
            } => detail.clone(),
            TransportError::Status {
                detail: Some(detail),
                ..
            } => detail.to_string(),
            TransportError::Status { status, .. } => status.to_string(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait FileTransport: Send + Sync {
    async fn upload(&self, payload: UploadPayload) -> Result<UploadResponse, TransportError>;
}

/// Multipart upload to the collection endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    upload_url: Url,
    access_token: Option<String>,
}

impl HttpTransport {
    pub fn new(upload_url: Url, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            upload_url,
            access_token,
        }
    }

    async fn build_form(payload: &UploadPayload) -> Result<Form, TransportError> {
        let bytes = payload.content.load().await.map_err(|source| {
            let path = match &payload.content {
                FileContent::Path(path) => path.clone(),
                FileContent::Bytes(_) => PathBuf::from(&payload.file_name),
            };
            TransportError::Read { path, source }
        })?;

        let mut part = Part::bytes(bytes).file_name(payload.file_name.clone());
        if let Some(mime) = &payload.mime {
            part = part.mime_str(mime)?;
        }
        Ok(Form::new().part("uploadFile", part))
    }
}

#[async_trait]
impl FileTransport for HttpTransport {
    async fn upload(&self, payload: UploadPayload) -> Result<UploadResponse, TransportError> {
        let form = Self::build_form(&payload).await?;

        let mut url = self.upload_url.clone();
        url.query_pairs_mut()
            .append_pair("brain_id", &payload.target.to_string());

        let mut request = self.client.post(url).multipart(form);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(file = %payload.file_name, %status, "upload response");

        if !status.is_success() {
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail").cloned());
            return Err(TransportError::Status { status, detail });
        }

        Ok(response.json::<UploadResponse>().await?)
    }
}
