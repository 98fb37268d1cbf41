//! Drisya Studio CLI Tool
//!
//! Command-line interface for compositing product photos onto synthesized
//! studio backgrounds. Built only with the `cli` feature.

use drisya_studio::cli;

fn main() -> anyhow::Result<()> {
    cli::main()
}
