//! synth-cli: operación local del servicio de síntesis.
//!
//! ```text
//! synth-cli version
//! synth-cli models
//! synth-cli synth request.json [--out salida.wav] [--poll-ms 50]
//! synth-cli status <token>
//! synth-cli fetch <token> --out salida.wav
//! ```
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use synth_core::{CoreError, FingerprintId};
use synthflow::{AppConfig, AppError, SynthService, SynthesisRequest, TaskStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "synth-cli", version, about = "Síntesis con cache direccionada por contenido")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Versión y fecha de publicación.
    Version,
    /// Modelos acústicos disponibles.
    Models,
    /// Envía un request y espera el resultado.
    Synth {
        request: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 50)]
        poll_ms: u64,
    },
    /// Estado de un token en la cache persistente.
    Status { token: String },
    /// Copia el resultado cacheado de un token.
    Fetch {
        token: String,
        #[arg(long)]
        out: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value).map_err(CoreError::from)?);
    Ok(())
}

fn service() -> Result<(AppConfig, SynthService), AppError> {
    let config = AppConfig::from_env()?;
    let service = SynthService::from_config(&config, tokio::runtime::Handle::current())?;
    Ok((config, service))
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    match cli.command {
        Command::Version => print_json(&synthflow::version())?,
        Command::Models => print_json(&service()?.1.models()?)?,
        Command::Synth { request, out, poll_ms } => {
            let (config, service) = service()?;
            let body = std::fs::read_to_string(&request)?;
            let submitted = service.orchestrator().submit(SynthesisRequest::from_json(&body)?)?;
            print_json(&submitted)?;
            let token = submitted.token().clone();
            match service.orchestrator().wait_for(&token, Duration::from_millis(poll_ms.max(1))).await {
                Some(TaskStatus::HitCache) => {
                    let out = out.unwrap_or_else(|| PathBuf::from(format!("{token}.{}", config.store.extension)));
                    write_result(&service, &token, &out)?;
                }
                other => {
                    print_json(&other)?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Status { token } => {
            let token = FingerprintId::parse(&token)?;
            match service()?.1.orchestrator().query(&token) {
                Some(status) => print_json(&status)?,
                None => {
                    eprintln!("[synth-cli] unknown token {token}");
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Command::Fetch { token, out } => {
            let token = FingerprintId::parse(&token)?;
            if !write_result(&service()?.1, &token, &out)? {
                eprintln!("[synth-cli] no cached result for {token}");
                return Ok(ExitCode::from(2));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_result(service: &SynthService, token: &FingerprintId, out: &Path) -> Result<bool, AppError> {
    match service.orchestrator().fetch(token)? {
        Some(bytes) => {
            std::fs::write(out, &bytes)?;
            log::info!("wrote {} bytes to '{}'", bytes.len(), out.display());
            Ok(true)
        }
        None => Ok(false),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env antes del filtro de logs: RUST_LOG puede venir de ahí
    synth_persistence::init_dotenv();
    tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_target(false))
                                  .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                                                                tracing_subscriber::EnvFilter::new("info")
                                                                                            }))
                                  .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[synth-cli] {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_synth_arguments() {
        let cli = Cli::parse_from(["synth-cli", "synth", "req.json", "--out", "a.wav", "--poll-ms", "10"]);
        match cli.command {
            Command::Synth { request, out, poll_ms } => {
                assert_eq!(request, PathBuf::from("req.json"));
                assert_eq!(out, Some(PathBuf::from("a.wav")));
                assert_eq!(poll_ms, 10);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fetch_requires_out() {
        assert!(Cli::try_parse_from(["synth-cli", "fetch", "abc"]).is_err());
    }
}
