use std::process::{Command, Output};

use tempfile::TempDir;

pub fn base_cmd(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_postflux"));
    cmd.env("DOTENV_PATH", data_dir.path().join("missing.env"))
        .env("RUST_LOG", "warn")
        .env_remove("POSTFLUX_LOG_FILE")
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd
}

pub fn run_ok(cmd: &mut Command) -> String {
    let output: Output = cmd.output().expect("run postflux");
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).expect("utf8 stdout")
}
