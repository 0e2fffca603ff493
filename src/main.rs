use anyhow::Context;
use rmcp::{ServiceExt, transport::stdio};
use site_search::{SearchConfig, SearchServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr to avoid interfering with MCP protocol on stdout
    site_search::tracing::init();

    let config = SearchConfig::load().context("Failed to load configuration")?;
    let server = SearchServer::from_config(&config)?;

    tracing::info!(
        "Starting site-search MCP server (index: {})",
        server.store().source().describe()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
