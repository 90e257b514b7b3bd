#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = coursehub_api::run().await {
        eprintln!("coursehub-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
