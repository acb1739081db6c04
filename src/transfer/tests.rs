//! Tests for the transfer handler.

#[cfg(test)]
mod transfer_tests {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use crate::parser::ParsedRequest;
    use crate::server::{HttpServer, Responder, ResponseSpec, ServerConfig};
    use crate::transfer::{classify_upload, BookImporter, ImportError, TransferHandler, UploadParse};

    /// Importer that records every call and can be told to fail.
    struct RecordingImporter {
        calls: Mutex<Vec<(PathBuf, String)>>,
        fail: bool,
    }

    impl RecordingImporter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn calls(&self) -> Vec<(PathBuf, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl BookImporter for RecordingImporter {
        fn import_file(&self, path: &Path, display_name: &str) -> Result<(), ImportError> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_path_buf(), display_name.to_string()));
            if self.fail {
                Err(ImportError::Rejected("shelf is full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn request(method: &str, path: &str, body: &str) -> ParsedRequest {
        ParsedRequest {
            method: method.to_string(),
            path: path.to_string(),
            headers: Default::default(),
            body: body.to_string(),
        }
    }

    /// Run one request through the handler and collect the response.
    async fn dispatch(handler: &TransferHandler, req: ParsedRequest) -> ResponseSpec {
        let handler = handler.clone().into_handler();
        let (responder, rx) = Responder::new();
        handler(req, responder).await;
        rx.await.expect("handler must respond")
    }

    fn upload_body(file_name: &str, contents: &[u8]) -> String {
        format!(
            r#"{{"fileName": "{}", "fileData": "{}"}}"#,
            file_name,
            STANDARD.encode(contents)
        )
    }

    #[test]
    fn test_classify_valid_upload() {
        let upload = match classify_upload(r#"{"fileName": "a.epub", "fileData": "aGk="}"#) {
            UploadParse::Valid(upload) => upload,
            other => panic!("expected Valid, got {other:?}"),
        };
        assert_eq!(upload.file_name, "a.epub");
        assert_eq!(upload.decode_bytes().unwrap(), b"hi");
    }

    #[test]
    fn test_classify_empty_object_as_missing_fields() {
        assert!(matches!(classify_upload("{}"), UploadParse::MissingFields));
        assert!(matches!(
            classify_upload(r#"{"fileName": "a.epub"}"#),
            UploadParse::MissingFields
        ));
        assert!(matches!(
            classify_upload(r#"{"fileName": null, "fileData": null}"#),
            UploadParse::MissingFields
        ));
    }

    #[test]
    fn test_classify_garbage_as_malformed() {
        assert!(matches!(
            classify_upload("not json"),
            UploadParse::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_get_root_serves_upload_page() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TransferHandler::new(RecordingImporter::new(), dir.path());

        let response = dispatch(&handler, request("GET", "/", "")).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/html");
        assert!(response.body.contains("<html"));
        assert!(response.body.contains("/upload"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TransferHandler::new(RecordingImporter::new(), dir.path());

        for (method, path) in [
            ("POST", "/nonexistent"),
            ("GET", "/upload"),
            ("DELETE", "/"),
        ] {
            let response = dispatch(&handler, request(method, path, "ignored body")).await;
            assert_eq!(response.status, 404);
            assert_eq!(response.body, "Not Found");
        }
    }

    #[tokio::test]
    async fn test_upload_stages_file_and_imports() {
        let dir = tempfile::tempdir().unwrap();
        let importer = RecordingImporter::new();
        let handler = TransferHandler::new(importer.clone(), dir.path());

        let body = upload_body("novel.epub", b"epub bytes");
        let response = dispatch(&handler, request("POST", "/upload", &body)).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "OK");

        let staged = dir.path().join("novel.epub");
        assert_eq!(std::fs::read(&staged).unwrap(), b"epub bytes");
        assert_eq!(importer.calls(), vec![(staged, "novel.epub".to_string())]);
    }

    #[tokio::test]
    async fn test_upload_missing_fields_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let importer = RecordingImporter::new();
        let handler = TransferHandler::new(importer.clone(), dir.path());

        let response = dispatch(&handler, request("POST", "/upload", "{}")).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, "Missing file data");
        assert!(importer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_malformed_json_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let importer = RecordingImporter::new();
        let handler = TransferHandler::new(importer.clone(), dir.path());

        let response = dispatch(&handler, request("POST", "/upload", "not json")).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "Internal Server Error");
        assert!(importer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_invalid_base64_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let importer = RecordingImporter::new();
        let handler = TransferHandler::new(importer.clone(), dir.path());

        let body = r#"{"fileName": "a.epub", "fileData": "@@not base64@@"}"#;
        let response = dispatch(&handler, request("POST", "/upload", body)).await;
        assert_eq!(response.status, 500);
        // The decode failed before any file-system side effect.
        assert!(importer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failing_importer_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TransferHandler::new(RecordingImporter::failing(), dir.path());

        let body = upload_body("novel.epub", b"bytes");
        let response = dispatch(&handler, request("POST", "/upload", &body)).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_traversal_in_file_name_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let importer = RecordingImporter::new();
        let handler = TransferHandler::new(importer.clone(), dir.path());

        let body = upload_body("../../escape.epub", b"bytes");
        let response = dispatch(&handler, request("POST", "/upload", &body)).await;

        assert_eq!(response.status, 200);
        // Staged inside the staging directory under the final component only.
        assert!(dir.path().join("escape.epub").exists());
    }

    #[tokio::test]
    async fn test_end_to_end_upload_over_real_socket() {
        let dir = tempfile::tempdir().unwrap();
        let importer = RecordingImporter::new();
        let handler = TransferHandler::new(importer.clone(), dir.path());

        let mut server = HttpServer::new(ServerConfig {
            port: 0,
            ..ServerConfig::default()
        });
        server.start(handler.into_handler()).await.unwrap();
        let addr = server.local_addr().unwrap();

        let body = upload_body("wired.epub", b"over the wire");
        let head = format!(
            "POST /upload HTTP/1.1\r\nHost: device\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );

        let mut stream = TcpStream::connect(("127.0.0.1", addr.port())).await.unwrap();
        // Deliver headers and body as separate writes, the way a browser's
        // network stack may chunk them.
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        stream.write_all(body.as_bytes()).await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8_lossy(&response);

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("OK"));
        assert_eq!(
            std::fs::read(dir.path().join("wired.epub")).unwrap(),
            b"over the wire"
        );
        assert_eq!(importer.calls().len(), 1);

        server.stop();
    }
}
