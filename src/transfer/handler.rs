//! The two-route transfer handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info, warn};
use thiserror::Error;

use crate::parser::ParsedRequest;
use crate::server::{HandlerFn, HandlerFuture, Responder};
use crate::transfer::import::{BookImporter, ImportError};
use crate::transfer::page::UPLOAD_PAGE;
use crate::transfer::upload::{classify_upload, UploadParse, UploadRequest};

/// Errors on the upload processing path. All of them are translated into a
/// `500` response; the variants exist for logging.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

/// Answers `GET /` with the upload page, `POST /upload` with the import flow,
/// and everything else with `404`.
#[derive(Clone)]
pub struct TransferHandler {
    importer: Arc<dyn BookImporter>,
    staging_dir: PathBuf,
}

impl TransferHandler {
    /// Create a handler that stages uploads under `staging_dir` and forwards
    /// them to `importer`.
    pub fn new(importer: Arc<dyn BookImporter>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            importer,
            staging_dir: staging_dir.into(),
        }
    }

    /// Wrap this handler into the server's handler type.
    pub fn into_handler(self) -> HandlerFn {
        let this = Arc::new(self);
        Arc::new(move |request, responder| -> HandlerFuture {
            let this = this.clone();
            Box::pin(async move { this.handle(request, responder).await })
        })
    }

    async fn handle(&self, request: ParsedRequest, responder: Responder) {
        match (request.method.as_str(), request.path.as_str()) {
            ("GET", "/") => responder.send(200, "text/html", UPLOAD_PAGE),
            ("POST", "/upload") => self.handle_upload(&request.body, responder).await,
            _ => responder.send(404, "text/plain", "Not Found"),
        }
    }

    async fn handle_upload(&self, body: &str, responder: Responder) {
        match classify_upload(body) {
            UploadParse::MissingFields => {
                warn!("upload rejected: missing fileName or fileData");
                responder.send(400, "text/plain", "Missing file data");
            }
            UploadParse::Malformed(e) => {
                warn!("upload body is not valid JSON: {e}");
                responder.send(500, "text/plain", "Internal Server Error");
            }
            UploadParse::Valid(upload) => match self.stage_and_import(&upload).await {
                Ok(()) => {
                    info!("imported \"{}\"", upload.file_name);
                    responder.send(200, "text/plain", "OK");
                }
                Err(e) => {
                    error!("import of \"{}\" failed: {e}", upload.file_name);
                    responder.send(500, "text/plain", "Internal Server Error");
                }
            },
        }
    }

    /// Decode the payload, write it to the staging directory and hand the
    /// staged file to the import pipeline.
    async fn stage_and_import(&self, upload: &UploadRequest) -> Result<(), TransferError> {
        let bytes = upload.decode_bytes()?;
        let path = self.staging_dir.join(staging_name(&upload.file_name));
        tokio::fs::write(&path, &bytes).await?;
        self.importer.import_file(&path, &upload.file_name)?;
        Ok(())
    }
}

/// Reduce a client-supplied file name to its final path component, so an
/// upload cannot escape the staging directory.
fn staging_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string())
}
