mod agenda;
mod config;
mod google;
mod shared;

use agenda::galendar::Galendar;
use agenda::presenter::Tone;
use agenda::terminal::TerminalWriter;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(
    name = "galendar",
    about = "Prints your Google Calendar events for the next 48 hours.",
    disable_version_flag = true
)]
struct Cli {
    #[arg(
        value_name = "CALENDAR",
        help = "Calendar to show; the closest calendar id is picked. Defaults to your primary calendar."
    )]
    calendar: Option<String>,
}

fn init_logging() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("{}", e);
    }

    if let Err(e) = run(cli.calendar.as_deref().unwrap_or("")).await {
        tracing::debug!(error = ?e, "galendar failed");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(query: &str) -> anyhow::Result<()> {
    let mut galendar = Galendar::new()?;
    galendar.oauth().await?;

    let agenda = galendar.agenda(query).await?;

    let writer = TerminalWriter::stdout();
    let mut stdout = std::io::stdout().lock();
    if let Some(notice) = agenda.notice() {
        writer.notice(&mut stdout, &notice, Tone::Cautionary)?;
    }
    writer.write_lines(&mut stdout, &agenda.lines)?;

    Ok(())
}
