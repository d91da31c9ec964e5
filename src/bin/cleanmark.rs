//! Cleanmark CLI entry point
//!
//! Command-line interface for batch watermark and overlay removal using the
//! cleanmark library.

#[cfg(feature = "cli")]
use cleanmark::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
