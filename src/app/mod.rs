mod wiring;

use crate::{cli, context, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub struct App {
    pub ctx: context::Context,
    pub storage: storage::SqliteStorage,
    shutdown: CancellationToken,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting postflux");
        log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;

        Ok((App::new(ctx, storage), cli))
    }

    fn new(ctx: context::Context, storage: storage::SqliteStorage) -> Self {
        Self {
            ctx,
            storage,
            shutdown: CancellationToken::new(),
        }
    }

    /// Serves the REST API until Ctrl-C or until the server task exits.
    pub async fn run_daemon(&self) -> Result<()> {
        self.log_runtime_config();

        let mut rest_handle = self.spawn_rest_server();
        self.wait_for_shutdown(&mut rest_handle).await
    }

    fn spawn_rest_server(&self) -> JoinHandle<()> {
        let addr = self.ctx.api_listen;
        let store = self.storage.clone();
        let stream_delay = self.ctx.stream_delay;
        let token = self.shutdown.clone();

        tokio::spawn(
            async move {
                if let Err(e) = rest::serve(addr, store, stream_delay, token).await {
                    log::error!("REST server failed: {:#}", e);
                }
            }
            .instrument(tracing::info_span!("rest")),
        )
    }

    async fn wait_for_shutdown(&self, rest_task: &mut JoinHandle<()>) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("🧨 Ctrl-C received, shutting down..."),
            _ = &mut *rest_task => log::error!("REST task exited unexpectedly"),
        }

        self.shutdown.cancel();

        // Polling a completed JoinHandle again panics.
        if !rest_task.is_finished() {
            rest_task.await.context("joining REST task")?;
        }

        log::info!("✅ Shutdown complete");
        Ok(())
    }

    fn log_runtime_config(&self) {
        log::info!("🌐 REST API: http://{}", self.ctx.api_listen);
        log::info!("⏱️ Stream delay: {:?}", self.ctx.stream_delay);
        if let Some(path) = self.ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.to_string_lossy());
        }
    }
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        let stdout = std::io::stdout();
        return cmd.run(&app.storage, &mut stdout.lock());
    }

    app.run_daemon().await
}
