//! CLI entrypoint for promptlog
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use promptlog_application::{
    CaptureUseCase, LogStorePort, ManageLogUseCase, SettingsPersistencePort, UserNotifier,
    init_settings,
};
use promptlog_domain::{CaptureSettings, CaptureToggle, LogPath};
use promptlog_infrastructure::{
    ConfigLoader, FileConfig, JsonSettingsFile, build_log_store, jsonl_event_stream,
};
use promptlog_presentation::{Cli, Command, ConsoleNotifier, LogViewer};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_config_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Held until exit so buffered file diagnostics get flushed
    let _log_guard = init_tracing(cli.verbose, config.logging.file_path().as_deref())?;
    info!("Starting promptlog");

    let log_path = validated_log_path(&config)?;

    // === Dependency Injection ===
    let store = build_log_store(&config.store)?;
    let notifier: Arc<dyn UserNotifier> = Arc::new(ConsoleNotifier::new(config.output.color));

    match command {
        Command::Capture { input } => {
            let persistence = settings_file(&config);
            let capture = capture_use_case(&config, store, notifier, log_path, &persistence).await;

            match input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    capture.run(jsonl_event_stream(BufReader::new(file))).await;
                }
                None => {
                    capture
                        .run(jsonl_event_stream(BufReader::new(tokio::io::stdin())))
                        .await;
                }
            }
            flush_settings(&*persistence).await;
        }
        Command::View => {
            let mut viewer = LogViewer::new(ManageLogUseCase::new(store, log_path), notifier);
            println!("{}", viewer.open().await);
        }
        Command::Clear => {
            let mut viewer = LogViewer::new(ManageLogUseCase::new(store, log_path), notifier);
            viewer.clear().await;
        }
        Command::Export { out } => {
            let dir = out.unwrap_or_else(|| config.output.export_dir());
            let viewer = LogViewer::new(ManageLogUseCase::new(store, log_path), notifier);
            if let Some(path) = viewer
                .export_to(&dir, chrono::Local::now().date_naive())
                .await
            {
                println!("{}", path.display());
            }
        }
        Command::Settings { enable, disable } => {
            let persistence = settings_file(&config);
            let mut capture =
                capture_use_case(&config, store, notifier, log_path, &persistence).await;

            let changes = enable
                .into_iter()
                .map(|toggle| (toggle, true))
                .chain(disable.into_iter().map(|toggle| (toggle, false)));
            for (toggle, enabled) in changes {
                capture.set_toggle(CaptureToggle::from(toggle), enabled);
            }
            flush_settings(&*persistence).await;
            print_settings(capture.settings());
        }
    }

    Ok(())
}

/// Install the diagnostic subscriber: stderr always, plus a file when configured.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("logging.file must name a file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Print every config warning; stop on the first batch of errors.
fn validated_log_path(config: &FileConfig) -> Result<LogPath> {
    let issues = config.validate();
    for issue in issues.iter().filter(|issue| !issue.is_error()) {
        warn!("{}", issue.message);
        eprintln!("warning: {}", issue.message);
    }

    let errors: Vec<_> = issues.iter().filter(|issue| issue.is_error()).collect();
    if !errors.is_empty() {
        for issue in &errors {
            eprintln!("error: {}", issue.message);
        }
        bail!("Invalid configuration ({} error(s))", errors.len());
    }

    match config.store.parse_log_path() {
        (Some(path), _) => Ok(path),
        (None, _) => bail!("Invalid store.path: {}", config.store.path),
    }
}

fn settings_file(config: &FileConfig) -> Arc<JsonSettingsFile> {
    Arc::new(JsonSettingsFile::new(
        config.capture.settings_path(),
        config.capture.debounce(),
    ))
}

async fn capture_use_case(
    config: &FileConfig,
    store: Arc<dyn LogStorePort>,
    notifier: Arc<dyn UserNotifier>,
    log_path: LogPath,
    persistence: &Arc<JsonSettingsFile>,
) -> CaptureUseCase {
    let settings = init_settings(&**persistence, &*notifier).await;
    CaptureUseCase::new(store, notifier, log_path, settings)
        .with_event_name(config.capture.event.clone())
        .with_settings_persistence(persistence.clone())
}

/// Write any pending settings before the process exits.
async fn flush_settings(persistence: &dyn SettingsPersistencePort) {
    if let Err(e) = persistence.flush().await {
        warn!("Could not save capture settings: {}", e);
    }
}

fn print_settings(settings: &CaptureSettings) {
    for toggle in CaptureToggle::ALL {
        let state = if settings.is_enabled(toggle) { "on" } else { "off" };
        println!("{:<8} {}", toggle.as_str(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlog_presentation::ToggleArg;

    #[test]
    fn test_default_config_yields_default_log_path() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(validated_log_path(&config).unwrap(), LogPath::default());
    }

    #[test]
    fn test_invalid_log_path_is_fatal() {
        let mut config = ConfigLoader::load_defaults();
        config.store.path = "../outside.jsonl".to_string();
        assert!(validated_log_path(&config).is_err());
    }

    #[test]
    fn test_toggle_args_cover_every_toggle() {
        let mapped: Vec<CaptureToggle> = [ToggleArg::Prompt, ToggleArg::History, ToggleArg::Context]
            .into_iter()
            .map(CaptureToggle::from)
            .collect();
        assert_eq!(mapped, CaptureToggle::ALL.to_vec());
    }
}
