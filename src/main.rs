use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use lineupcli::{cli, config, error, types::PkceToken, warning};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Show the artists of a festival lineup
    Lineup(LineupOptions),

    /// Add liked songs by lineup artists to a playlist
    Festival(FestivalOptions),

    /// Add tracks played within a time range to a playlist
    History(HistoryOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LineupOptions {
    /// Lineup JSON document (defaults to FESTIVAL_LINEUP_URL)
    #[clap(long)]
    pub url: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct FestivalOptions {
    /// Lineup JSON document (defaults to FESTIVAL_LINEUP_URL)
    #[clap(long)]
    pub url: Option<String>,

    /// Target playlist id (defaults to SPOTIFY_PLAYLIST_ID)
    #[clap(long)]
    pub playlist: Option<String>,

    /// Show the tracks that would be added without changing the playlist
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryOptions {
    /// Start of the range, inclusive (e.g. 2025-03-08 or "2025-03-08 20:00:00")
    #[clap(long)]
    pub start: String,

    /// End of the range, inclusive
    #[clap(long)]
    pub end: String,

    /// IANA timezone for start and end (defaults to DEFAULT_TIMEZONE, then local time)
    #[clap(long)]
    pub timezone: Option<String>,

    /// Reject unknown timezones in the bounds and skip plays whose timezone is
    /// unknown, instead of falling back to local time
    #[clap(long)]
    pub strict_timezone: bool,

    /// Streaming-history export file to read instead of the recently played endpoint
    #[clap(long)]
    pub file: Option<PathBuf>,

    /// Target playlist id (defaults to SPOTIFY_PLAYLIST_ID)
    #[clap(long)]
    pub playlist: Option<String>,

    /// Show the tracks that would be added without changing the playlist
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    // no Spotify call, so no credentials needed
    if let Command::Lineup(opt) = &cli.command {
        cli::lineup(opt.url.clone()).await;
        return;
    }

    let config = match config::Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&config), Arc::clone(&oauth_result)).await;
        }
        Command::Festival(opt) => {
            cli::festival(&config, opt.url, opt.playlist, opt.dry_run).await
        }
        Command::History(opt) => {
            cli::history(
                &config,
                cli::HistoryRequest {
                    start: opt.start,
                    end: opt.end,
                    timezone: opt.timezone,
                    strict_timezone: opt.strict_timezone,
                    file: opt.file,
                    playlist: opt.playlist,
                    dry_run: opt.dry_run,
                },
            )
            .await
        }
        Command::Lineup(_) | Command::Completions(_) => {}
    }
}
