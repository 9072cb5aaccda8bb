//! rpzgen - RPZ zone builder
//!
//! Fetches domain-list sources and publishes DNS Response Policy Zone files.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rpz_cli::run().await
}
