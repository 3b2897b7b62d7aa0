use animetime::OutputFormat;
use animetime::calendar::MonthStep;
use animetime::commands;
use animetime::commands::calc::CalcRequest;
use animetime::commands::library::ScheduleRequest;
use animetime::config;
use animetime::logging;
use animetime::platform;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "animetime")]
#[command(about = "How long will it take to watch that series?")]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[arg(long, global = true, default_value = "warn", help = "Log level when RUST_LOG is unset")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute total viewing time
    Calc {
        #[arg(long, allow_hyphen_values = true, help = "Number of episodes")]
        episodes: String,
        #[arg(long, allow_hyphen_values = true, help = "Minutes per episode")]
        duration: String,
        #[arg(long, help = "Anime name (required for --save / --schedule)")]
        name: Option<String>,
        #[arg(long, help = "Image URL to keep with a scheduled entry")]
        image: Option<String>,
        #[arg(long, help = "Save the result")]
        save: bool,
        #[arg(long, help = "Schedule the series starting now")]
        schedule: bool,
    },

    /// List saved results
    Saved,

    /// Browse the episodes vs. viewing time table
    Compare {
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        page: i64,
    },

    /// Schedule a series onto the calendar
    Schedule {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        episodes: i64,
        #[arg(long, allow_hyphen_values = true, help = "Minutes per episode")]
        duration: i64,
        #[arg(long, help = "Start time (RFC 3339, e.g. 2026-10-17T20:00:00+02:00)")]
        start: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },

    /// List scheduled series
    Scheduled,

    /// Delete a scheduled series
    Unschedule {
        #[arg(help = "Scheduled entry ID")]
        id: String,
    },

    /// Show the month calendar
    Calendar(CalendarArgs),

    /// Search the anime catalog
    Search {
        query: String,
        #[arg(long, help = "Use the Nth result (1-based) and compute its viewing time")]
        pick: Option<usize>,
        #[arg(long, requires = "pick", help = "Override minutes per episode")]
        duration: Option<i64>,
    },

    /// Autocomplete from stdin, one line per keystroke state
    Suggest,

    /// Configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct CalendarArgs {
    #[arg(long, help = "Month to show (YYYY-MM), defaults to the current one")]
    month: Option<String>,
    #[arg(long, conflicts_with = "next", help = "Show the month before")]
    prev: bool,
    #[arg(long, help = "Show the month after")]
    next: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = config::load()?;
    let format = cli.format;
    let store = || platform::library_store(config.storage.data_dir_override.as_deref());

    match cli.command {
        Commands::Calc {
            episodes,
            duration,
            name,
            image,
            save,
            schedule,
        } => {
            let request = CalcRequest {
                episodes,
                duration,
                name,
                image_url: image,
                save,
                schedule,
            };
            commands::calc::run(&config, &store()?, &request, format)?;
        }
        Commands::Saved => {
            commands::library::saved(&store()?, format)?;
        }
        Commands::Compare { page } => {
            commands::compare::show(&config, page, format)?;
        }
        Commands::Schedule {
            name,
            episodes,
            duration,
            start,
            image,
        } => {
            let request = ScheduleRequest {
                name,
                episodes,
                duration,
                start,
                image_url: image,
            };
            commands::library::schedule(&config, &store()?, &request, format)?;
        }
        Commands::Scheduled => {
            commands::library::scheduled(&store()?, format)?;
        }
        Commands::Unschedule { id } => {
            commands::library::unschedule(&store()?, &id, format)?;
        }
        Commands::Calendar(args) => {
            let step = if args.prev {
                Some(MonthStep::Prev)
            } else if args.next {
                Some(MonthStep::Next)
            } else {
                None
            };
            commands::calendar::show(
                &store()?,
                args.month.as_deref(),
                step,
                config.display.locale()?,
                format,
            )?;
        }
        Commands::Search {
            query,
            pick,
            duration,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            match pick {
                Some(n) => {
                    runtime.block_on(commands::search::pick(
                        &config, &query, n, duration, format,
                    ))?;
                }
                None => {
                    runtime.block_on(commands::search::search(&config, &query, format))?;
                }
            }
        }
        Commands::Suggest => {
            tokio::runtime::Runtime::new()?.block_on(commands::search::suggest(&config, format))?;
        }
        Commands::Config(args) => match args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(&key, &config)?,
            ConfigAction::Init => {
                commands::config::init()?;
            }
        },
    }

    Ok(())
}
