mod app;
mod cli;
mod commands;
mod context;
mod model;
mod rest;
mod storage;
mod tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
