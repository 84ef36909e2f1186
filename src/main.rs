#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = schoolcard::run().await {
        eprintln!("schoolcard fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
