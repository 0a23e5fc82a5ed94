//! Interactive parking ledger.
//!
//! Usage: `parkledger [config.json]`. The config path may also come from
//! `PARKING_CONFIG`; `PARKING_*` variables override file values. Logs go to
//! stderr, filtered by `RUST_LOG` (default `warn`).

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use parkledger::{cli::Console, config::LedgerConfig, types::Role};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config_path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("PARKING_CONFIG"))
        .map(PathBuf::from);
    let config = LedgerConfig::load(config_path.as_deref()).context("loading configuration")?;

    let auth = config.authenticator();
    for role in [Role::Attendant, Role::Supervisor] {
        if !auth.has_role(role) {
            warn!(%role, "no credentials configured; this role cannot log in");
        }
    }

    let ledger = config
        .open_ledger()
        .with_context(|| format!("opening event log {}", config.log_path.display()))?;
    info!(
        path = %config.log_path.display(),
        backend = %config.backend,
        capacity = config.capacity,
        "ledger ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(ledger, auth, stdin.lock(), stdout.lock())
        .run()
        .context("parking session aborted")?;
    Ok(())
}
