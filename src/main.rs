use crate::widgets::Terminal;
use std::io::{IsTerminal, Write};

#[macro_use]
mod macros;

pub mod announcer;
pub mod api;
pub mod app;
pub mod chart;
pub mod cli;
pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod fetch;
pub mod helper;
pub mod logger;
pub mod news;
pub mod pane;
pub mod panel;
pub mod preferences;
pub mod render;
pub mod sentiment;
pub mod state;
pub mod toast;
pub mod ui;
pub mod widgets;

mod views;

#[macro_use]
extern crate rust_i18n;
i18n!("locales", fallback = "en");

pub use cli::Args;
use config::Config;

#[tokio::main]
async fn main() {
    let bin_name = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    };

    let args = match command {
        cli::Command::Help => {
            println!("{}", cli::help_text(&bin_name));
            return;
        }
        cli::Command::Version => {
            println!("{}", cli::version_text());
            return;
        }
        cli::Command::Run(args) => args,
    };

    dotenvy::dotenv().ok();

    if !std::io::stdout().is_terminal() {
        eprintln!("tickerdash needs an interactive terminal (TTY).");
        std::process::exit(1);
    }

    // logging first so config warnings have somewhere to go
    let _guard = match logger::init(Config::data_dir_from_env().as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to initialise logging: {err:#}");
            std::process::exit(1);
        }
    };

    let mut config = Config::from_env();
    config.apply_args(&args);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        api = %config.api_base,
        timeout_ms = config.timeout.as_millis(),
        log_dir = %logger::active_log_dir().display(),
        "starting"
    );

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        Terminal::exit_full_screen();
        hook(info);
    }));

    _ = std::io::stdout().flush();
    if let Err(err) = Terminal::enter_full_screen() {
        Terminal::exit_full_screen();
        eprintln!("Failed to enter full screen: {err}");
        tracing::error!(error = %err, "failed to enter full screen");
        std::process::exit(1);
    }
    scopeguard::defer! {
        Terminal::exit_full_screen();
    }

    tokio::select! {
        result = app::run(args, config) => match result {
            Ok(()) => tracing::info!("main loop exited"),
            Err(err) => tracing::error!(error = %format!("{err:#}"), "main loop failed"),
        },
        () = wait_for_shutdown_signal() => {
            tracing::warn!("shutdown signal received");
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use std::future::pending;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    async fn recv_or_pending(signal: Option<Signal>) {
        if let Some(mut sig) = signal {
            sig.recv().await;
            return;
        }
        pending::<()>().await;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        () = recv_or_pending(signal(SignalKind::terminate()).ok()) => {}
        () = recv_or_pending(signal(SignalKind::hangup()).ok()) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    _ = tokio::signal::ctrl_c().await;
}
