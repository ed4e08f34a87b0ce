//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `person_core` linkage and store configuration end to end.
//! - Keep output deterministic for quick local sanity checks.

use log::info;
use person_core::db::open_store_from_env;
use person_core::{
    core_version, init_logging, ping, LogConfig, PersonService, SqlitePersonRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("person_core ping={}", ping());
    println!("person_core version={}", core_version());

    match run() {
        Ok(count) => {
            println!("people={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("person_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<u64, Box<dyn Error>> {
    let log_config = LogConfig::from_env();
    if let Some(log_dir) = log_config.log_dir.as_deref() {
        init_logging(&log_config.level, log_dir)?;
    }

    let conn = open_store_from_env()?;
    let service = PersonService::new(SqlitePersonRepository::try_new(&conn)?);
    let count = service.count()?;

    info!("event=cli_status module=cli status=ok people={count}");
    Ok(count)
}
