//! teamdex - build a team of up to six creatures from the public catalog
//! and share it as an image or a social post

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use teamdex_core::{FilterState, TeamdexConfig};

mod catalog_cli;
mod session;
mod share_cli;
mod team_cli;

use session::Session;

/// Modules that can be traced individually
#[derive(Debug, Clone, ValueEnum)]
enum TraceModule {
    Catalog,
    Store,
    Share,
    All,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "teamdex",
    about = "Pick your favourite creatures and share the team",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Enable trace logging for modules (comma-separated: catalog,store,share,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    log_json: bool,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Session file holding the current team
    #[clap(long, global = true)]
    session: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog entries, optionally filtered
    List {
        /// Case-insensitive name search
        #[clap(long)]
        search: Option<String>,

        /// Only entries with this type
        #[clap(long = "type")]
        kind: Option<String>,

        /// Only entries of this generation (1-9)
        #[clap(long, value_parser = clap::value_parser!(u8).range(1..=9))]
        generation: Option<u8>,

        /// Page to show, starting at 1
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Rows per page
        #[clap(long, default_value_t = teamdex_core::filter::PAGE_SIZE)]
        limit: usize,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show one entry by id or name
    Show {
        /// Catalog id or canonical name
        key: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Add entries to the team by id or name
    Add {
        #[clap(required = true)]
        keys: Vec<String>,
    },

    /// Remove an entry from the team
    Remove { id: u32 },

    /// Empty the team
    Clear,

    /// Move the entry at position FROM to position TO (0-based)
    Reorder { from: usize, to: usize },

    /// Replace the team with random entries
    Random {
        #[clap(long, default_value_t = teamdex_core::MAX_TEAM_SIZE)]
        count: usize,
    },

    /// Show the current team
    Team {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show or change the theme
    Theme {
        /// Palette key or label
        #[clap(long)]
        palette: Option<String>,

        /// Background color (#rrggbb)
        #[clap(long)]
        background: Option<String>,

        /// Text color (#rrggbb)
        #[clap(long)]
        text: Option<String>,

        /// modern, classic or minimal
        #[clap(long)]
        card_style: Option<String>,
    },

    /// List the available palettes
    Palettes,

    /// Render the team as a PNG
    Export {
        /// Output file (defaults to the configured file name)
        #[clap(long, short)]
        output: Option<PathBuf>,

        /// grid or horizontal
        #[clap(long, default_value = "grid")]
        layout: String,

        /// Leave type badges out
        #[clap(long)]
        hide_types: bool,

        /// Leave catalog numbers out
        #[clap(long)]
        hide_ids: bool,

        /// Palette for this export only
        #[clap(long)]
        palette: Option<String>,
    },

    /// Copy the rendered team to the clipboard
    Copy,

    /// Print the share text
    ShareText,

    /// Build a social share URL
    Intent {
        /// x, facebook or line
        platform: String,

        /// Open the URL in the browser
        #[clap(long)]
        open: bool,
    },
}

fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule], json: bool) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directive = match module {
            TraceModule::Catalog => "teamdex_core::catalog=trace",
            TraceModule::Store => "teamdex_core::store=trace",
            TraceModule::Share => "teamdex_core::share=trace",
            TraceModule::All => "teamdex_core=trace",
        };

        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    // Logs go to stderr; stdout carries command output
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if !trace_modules.is_empty() {
        tracing::info!(trace_modules = ?trace_modules, "teamdex tracing enabled");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace, cli.log_json);

    let config = match &cli.config {
        Some(path) => TeamdexConfig::load_from_path(path),
        None => TeamdexConfig::load(),
    }
    .context("Failed to load configuration")?;

    let session = match cli.session {
        Some(path) => Session::at(path),
        None => Session::default_location()?,
    };

    match cli.command {
        Command::List {
            search,
            kind,
            generation,
            page,
            limit,
            json,
        } => {
            let filters = FilterState {
                search_term: search.unwrap_or_default(),
                selected_type: kind.map(|k| k.to_lowercase()),
                selected_generation: generation,
            };
            catalog_cli::execute_list(&config, &filters, page as usize, limit, json).await
        }
        Command::Show { key, json } => catalog_cli::execute_show(&config, &key, json).await,
        Command::Add { keys } => team_cli::execute_add(&config, &session, &keys).await,
        Command::Remove { id } => team_cli::execute_remove(&session, id),
        Command::Clear => team_cli::execute_clear(&session),
        Command::Reorder { from, to } => team_cli::execute_reorder(&session, from, to),
        Command::Random { count } => team_cli::execute_random(&config, &session, count).await,
        Command::Team { json } => team_cli::execute_team(&session, json),
        Command::Theme {
            palette,
            background,
            text,
            card_style,
        } => team_cli::execute_theme(&session, palette, background, text, card_style),
        Command::Palettes => team_cli::execute_palettes(),
        Command::Export {
            output,
            layout,
            hide_types,
            hide_ids,
            palette,
        } => {
            let options = share_cli::ExportOptions {
                output,
                layout,
                hide_types,
                hide_ids,
                palette,
            };
            share_cli::execute_export(&config, &session, options).await
        }
        Command::Copy => share_cli::execute_copy(&config, &session).await,
        Command::ShareText => share_cli::execute_share_text(&session),
        Command::Intent { platform, open } => {
            share_cli::execute_intent(&config, &session, &platform, open)
        }
    }
}
