//! A runnable transfer server: serves the upload page and prints every
//! imported file.
//!
//! Run with `cargo run --example transfer_server`, then open the printed URL
//! from a browser on the same network.

use std::path::Path;
use std::sync::Arc;

use bookdrop::transfer::{BookImporter, ImportError};
use bookdrop::{HttpServer, ServerConfig, TransferHandler};

/// Importer that just reports what it received.
struct PrintingImporter;

impl BookImporter for PrintingImporter {
    fn import_file(&self, path: &Path, display_name: &str) -> Result<(), ImportError> {
        let size = std::fs::metadata(path)?.len();
        println!("imported \"{display_name}\" ({size} bytes) from {}", path.display());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let staging_dir = std::env::temp_dir().join("bookdrop-demo");
    std::fs::create_dir_all(&staging_dir)?;

    let handler = TransferHandler::new(Arc::new(PrintingImporter), staging_dir);

    let mut server = HttpServer::new(ServerConfig::with_port(8080));
    server.start(handler.into_handler()).await?;

    let addr = server.local_addr().expect("server just started");
    println!("open http://<device-ip>:{} in a browser on the same network", addr.port());

    tokio::signal::ctrl_c().await?;
    server.stop();
    Ok(())
}
