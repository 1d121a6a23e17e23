use std::{net::SocketAddr, path::PathBuf, time::Duration};

pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
    pub api_listen: SocketAddr,
    pub stream_delay: Duration,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            api_listen: cli.api_listen,
            stream_delay: Duration::from_millis(cli.stream_delay_ms),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("postflux.sqlite")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn from_cli_converts_units_and_paths() {
        let cli = crate::cli::Cli::try_parse_from([
            "postflux",
            "--data-dir",
            "/var/lib/postflux",
            "--stream-delay-ms",
            "250",
            "--log-file",
            "/tmp/postflux.log",
        ])
        .unwrap();

        let ctx = Context::from_cli(&cli);
        assert_eq!(ctx.stream_delay, Duration::from_millis(250));
        assert_eq!(
            ctx.db_path(),
            PathBuf::from("/var/lib/postflux/postflux.sqlite")
        );
        assert_eq!(ctx.log_file, Some(PathBuf::from("/tmp/postflux.log")));
    }
}
