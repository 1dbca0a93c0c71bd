// File: src/bin/medx.rs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medx::tui::run().await
}
