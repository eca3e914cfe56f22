//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gradebook_core` wiring: config, logging, store, migrations.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `gradebook_cli [CONFIG.toml]`. Without a path, built-in defaults
//! plus `GRADEBOOK_*` environment overrides are used.

use gradebook_core::db::migrations::{current_version, latest_version};
use gradebook_core::{init_from_config, open_db, GradebookConfig, SqliteGradebookStore};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gradebook_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => GradebookConfig::load(path)?,
        None => {
            let mut config = GradebookConfig::default();
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config.validate()?;
            config
        }
    };
    init_from_config(&config.logging)?;

    let conn = open_db(&config.database.path)?;
    SqliteGradebookStore::try_new(&conn)?;
    let schema_version = current_version(&conn)?;
    info!(
        "event=cli_probe module=cli status=ok schema_version={}",
        schema_version
    );

    println!("gradebook_core version={}", gradebook_core::core_version());
    println!(
        "gradebook_core schema_version={} latest={}",
        schema_version,
        latest_version()
    );
    println!("gradebook_core database={}", config.database.path.display());
    println!("gradebook_core registrar_queue={}", config.registrar.queue);
    Ok(())
}
