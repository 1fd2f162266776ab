// Clash Dashboard
// Entry point for the application

use anyhow::{Context, Result};
use clap::Parser;
use clash_dashboard::controller::{ControllerSettings, MainController};
use clash_dashboard::engine::Engine;
use clash_dashboard::engine::mock_engine::MockEngine;
use clash_dashboard::settings::Settings;
use clash_dashboard::ui::resources::Resources;
use clash_dashboard::ui::state::Surface;
use clash_dashboard::ui::theme::Palette;
use clash_dashboard::ui::{MainView, Request, UiContext};
use clash_dashboard::{constants, errors};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "clash_dashboard")]
#[command(about = "Clash Dashboard - main screen of a Clash proxy client, driven from the console")]
struct Args {
    #[arg(long, help = "Run without the console; stop with Ctrl+C")]
    headless: bool,

    #[arg(long, help = "Path to settings file (YAML)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Path to string resources file (YAML)")]
    strings: Option<PathBuf>,
}

fn setup_tracing(headless: bool, log_directory: &Path) -> Result<()> {
    std::fs::create_dir_all(log_directory).context(errors::logs::FAILED_TO_CREATE_DIR)?;

    let file_appender = tracing_appender::rolling::daily(log_directory, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if headless {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(non_blocking).json())
            .with(fmt::layer().json().with_writer(std::io::stdout))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(non_blocking).json())
            .with(fmt::layer().pretty().with_writer(std::io::stdout))
            .init();
    }

    std::mem::forget(_guard);

    Ok(())
}

enum ConsoleCommand {
    Tap(Request),
    Quit,
}

fn parse_console_line(line: &str) -> Option<ConsoleCommand> {
    match line.trim() {
        "" => None,
        "quit" | "exit" => Some(ConsoleCommand::Quit),
        other => Request::from_str(other).ok().map(ConsoleCommand::Tap),
    }
}

fn spawn_console(view: MainView, cancellation_token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let names: Vec<String> = Request::all().map(|r| r.to_string()).collect();
        tracing::info!("Console ready. Taps: {}, quit", names.join(", "));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_console_line(&line) {
                    Some(ConsoleCommand::Tap(request)) => view.request(request),
                    Some(ConsoleCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => tracing::warn!("Unknown tap: {}", line.trim()),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading console: {}", e);
                    break;
                }
            }
        }

        cancellation_token.cancel();
    })
}

async fn run(args: Args, settings: Settings) -> Result<()> {
    let resources = match args.strings.as_ref().or(settings.strings_path.as_ref()) {
        Some(path) => Resources::load(path).await,
        None => Resources::default(),
    };

    let (ui, ui_task) = UiContext::spawn(Surface::default());
    let (view, requests) = MainView::new(
        ui.clone(),
        resources,
        Palette::new(),
        settings.request_buffer,
    );

    let engine: Arc<Mutex<dyn Engine>> = Arc::new(Mutex::new(MockEngine::new(&settings.engine)));

    let engine_for_panic = engine.clone();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Application panic: {:?}", panic_info);

        if let Ok(mut engine) = engine_for_panic.try_lock() {
            tracing::info!("Stopping engine due to panic");
            let _ = engine.shutdown();
        }
    }));

    if settings.engine.autostart {
        let mut engine_lock = engine.lock().unwrap();
        match engine_lock.start() {
            Ok(()) => tracing::info!("Autostart: engine started"),
            Err(e) => tracing::error!("Autostart: failed to start engine: {}", e),
        }
    }

    let cancellation_token = CancellationToken::new();
    let controller = MainController::new(
        view.clone(),
        engine.clone(),
        ControllerSettings::new(
            settings.version_name.clone(),
            settings.help_url.clone(),
            settings.engine.tick()?,
        ),
        cancellation_token.clone(),
    );
    let controller_task = tokio::spawn(controller.run(requests));

    let console_task = if args.headless {
        tracing::info!("Headless mode running. Press Ctrl+C to exit.");
        None
    } else {
        Some(spawn_console(view.clone(), cancellation_token.clone()))
    };
    drop(view);

    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Ctrl+C received, shutting down"),
            Err(e) => tracing::error!("Error listening for Ctrl+C: {}", e),
        },
        _ = cancellation_token.cancelled() => tracing::info!("Console closed, shutting down"),
    }

    cancellation_token.cancel();
    if let Some(console_task) = console_task {
        console_task.abort();
        let _ = console_task.await;
    }

    match controller_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Controller stopped with error: {:#}", e),
        Err(e) => tracing::error!("Controller task failed: {}", e),
    }

    tracing::info!("Shutting down engine");
    if let Err(e) = engine.lock().unwrap().shutdown() {
        tracing::error!("Error during shutdown: {}", e);
    }

    let surface = ui.shutdown(ui_task).await?;
    tracing::info!("Final display: {}", surface.main);

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;

    setup_tracing(args.headless, &settings.log_directory)
        .context("Failed to initialize tracing")?;

    tracing::info!("{} {} starting", constants::APP_TITLE, settings.version_name);
    tracing::debug!(
        "Settings loaded from {}",
        args.config
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string())
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let result = runtime.block_on(run(args, settings));

    // stdin reads park a blocking thread that never returns on its own
    runtime.shutdown_background();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_headless() {
        let args = Args::parse_from(["clash_dashboard", "--headless"]);
        assert!(args.headless);
        assert!(args.config.is_none());
        assert!(args.strings.is_none());
    }

    #[test]
    fn test_cli_args_config_path() {
        let args = Args::parse_from(["clash_dashboard", "--config", "dashboard.yaml"]);
        assert!(!args.headless);
        assert_eq!(args.config.unwrap(), PathBuf::from("dashboard.yaml"));
    }

    #[test]
    fn test_cli_args_all_flags() {
        let args = Args::parse_from([
            "clash_dashboard",
            "--headless",
            "--config",
            "test.yaml",
            "--strings",
            "strings.de.yaml",
        ]);
        assert!(args.headless);
        assert_eq!(args.config.unwrap(), PathBuf::from("test.yaml"));
        assert_eq!(args.strings.unwrap(), PathBuf::from("strings.de.yaml"));
    }

    #[test]
    fn test_console_line_parsing() {
        assert!(matches!(
            parse_console_line(" toggle-status "),
            Some(ConsoleCommand::Tap(Request::ToggleStatus))
        ));
        assert!(matches!(
            parse_console_line("open-about"),
            Some(ConsoleCommand::Tap(Request::OpenAbout))
        ));
        assert!(matches!(parse_console_line("quit"), Some(ConsoleCommand::Quit)));
        assert!(parse_console_line("").is_none());
        assert!(parse_console_line("launch").is_none());
    }
}
