// SPDX-License-Identifier: AGPL-3.0
// Artshelf Shell - Terminal frontend

mod bridge;
mod commands;
mod render;

use artshelf_core::{AppSettings, Notice, Session, SettingsStore};
use bridge::{SessionBridge, ShellEvent};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "artshelf", version, about = "Browse art supplies and keep favorites")]
struct Cli {
    /// Catalog endpoint (overrides settings.json)
    #[arg(long)]
    catalog_url: Option<String>,

    /// Directory for favorites and comments
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Search debounce window in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Keep everything in memory for this run
    #[arg(long)]
    memory: bool,
}

impl Cli {
    fn apply(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(url) = &self.catalog_url {
            settings.catalog_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            settings.data_dir = Some(dir.clone());
        }
        if let Some(ms) = self.debounce_ms.filter(|ms| *ms > 0) {
            settings.search_debounce_ms = ms;
        }
        settings
    }
}

fn load_settings() -> AppSettings {
    match SettingsStore::new() {
        Ok(store) => store.get(),
        Err(e) => {
            tracing::warn!("Using default settings: {}", e);
            AppSettings::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout belongs to the views
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "artshelf_shell=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    let filter = match "artshelf_core=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Artshelf v{}", env!("CARGO_PKG_VERSION"));

    let settings = cli.apply(load_settings());
    let session = if cli.memory {
        Session::in_memory(settings)
    } else {
        Session::from_settings(settings)
    };
    let session = match session {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Cannot start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(session));
    ExitCode::SUCCESS
}

async fn run(session: Session) {
    let bridge = SessionBridge::new(session);
    let events = bridge.event_receiver();

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ShellEvent::View(view) => println!("\n{}\n", view),
                ShellEvent::Notice(notice) => print_notice(notice),
                ShellEvent::ConfirmRemoval { count } => {
                    println!("Remove {} item(s) from favorites? (yes/no)", count)
                }
                ShellEvent::Message(text) => println!("{}", text),
                ShellEvent::Exit => break,
            }
        }
    });

    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                let _ = bridge.send(commands::ShellCommand::Quit).await;
                break;
            }
            Err(e) => {
                tracing::error!("Error reading input: {}", e);
                let _ = bridge.send(commands::ShellCommand::Quit).await;
                break;
            }
        };

        match commands::parse_line(&line) {
            Ok(command) => {
                let quit = command == commands::ShellCommand::Quit;
                if !bridge.send(command).await || quit {
                    break;
                }
            }
            Err(message) => println!("{}", message),
        }
    }

    let _ = printer.await;
}

fn print_notice(notice: Notice) {
    if notice.is_error() {
        println!("! {}", notice);
    } else {
        println!("* {}", notice);
    }
}
