mod analyzer;
mod app;
mod composer;
mod config;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use analyzer::Backend;
use app::App;
use composer::{QuestionComposer, EXAMPLE_PROMPTS};
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "soru")]
#[command(version)]
#[command(about = "Ask natural-language questions about your data from the terminal")]
struct Args {
    /// Print the example questions as JSON
    #[arg(short, long)]
    examples: bool,

    /// Ask a single question without opening the TUI
    #[arg(short, long, value_name = "QUESTION")]
    ask: Option<String>,

    /// Shell command that answers the question (receives it as $1)
    #[arg(short, long, value_name = "CMD")]
    command: Option<String>,

    /// Seconds to wait for the analyze command
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = !args.examples && args.ask.is_none();

    init_logging(interactive);

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(command) = args.command {
        config.analyze_command = Some(command);
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }

    // Handle CLI-only commands
    if args.examples {
        return print_examples();
    }

    if let Some(question) = args.ask {
        return ask_once(&config, &question).await;
    }

    // Run TUI
    run_tui(config).await
}

/// The TUI owns the terminal, so its logs go to a file instead of stderr
fn init_logging(interactive: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    let log_file = if interactive {
        AppConfig::config_dir()
            .ok()
            .and_then(|dir| std::fs::File::create(dir.join("soru.log")).ok())
    } else {
        None
    };

    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(filter)
            .init(),
        None => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init(),
    }
}

fn print_examples() -> Result<()> {
    let output = serde_json::json!({
        "examples": EXAMPLE_PROMPTS,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn ask_once(config: &AppConfig, question: &str) -> Result<()> {
    let backend = Backend::from_command(config.analyze_command.clone(), config.timeout());

    let mut composer = QuestionComposer::new();
    composer.edit_draft(question);

    let mut submitted = None;
    composer.submit(false, &mut |q: &str| submitted = Some(q.to_string()));
    let Some(question) = submitted else {
        anyhow::bail!("Question is empty");
    };

    match backend {
        Backend::Pick => println!("{}", question),
        Backend::Command { command, timeout } => {
            let output = analyzer::run_command(&command, &question, timeout)
                .await
                .context("Analysis failed")?;
            println!("{}", output);
        }
    }
    Ok(())
}

async fn run_tui(config: AppConfig) -> Result<()> {
    let backend = Backend::from_command(config.analyze_command.clone(), config.timeout());
    let mut app = App::new(config, backend);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    // Picker mode: hand the question to whoever called us
    if let Some(question) = app.picked {
        println!("{}", question);
    }
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.result_width = terminal.size()?.width.saturating_sub(2);
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        app.tick();
    }
}
