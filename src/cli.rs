//! Command-line surface over the command layer. Output is JSON on stdout.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::{
    advisor::Persona,
    chat::commands as chat,
    config::{default_data_dir, AppConfig, StorageBackend},
    kpi::{commands as kpi, fiscal_year_of, KpiMetric},
    metrics::commands as metrics,
    settings::{commands as settings, CustomChatInput},
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "lotpulse", version, about = "Used-car dealership analytics dashboard backend")]
pub struct Cli {
    /// Directory holding config.json and the data store
    #[arg(long, global = true, env = "LOTPULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: json, sqlite or memory
    #[arg(long, global = true, env = "LOTPULSE_BACKEND")]
    pub backend: Option<StorageBackend>,

    /// Override the simulated advisor typing delay
    #[arg(long, global = true)]
    pub typing_delay_ms: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }

    /// `config.json` from the data dir, then flags and environment on top.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let data_dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        let mut config = AppConfig::load(&data_dir)?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(delay) = self.typing_delay_ms {
            config.typing_delay_ms = delay;
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Market overview figures
    Overview,
    /// Month-by-month trend for the fiscal year
    Trend,
    /// Competitor metrics and market share
    Competitors,
    /// Trending vehicle ranking
    Trending {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Suggested prices for the sample inventory
    Pricing,
    /// Ask an advisor
    Chat(ChatArgs),
    /// Saved advisor conversations
    #[command(subcommand)]
    History(HistoryCommand),
    /// Registered inventory URLs
    #[command(subcommand)]
    Urls(UrlCommand),
    /// Registered competitor sites
    #[command(subcommand)]
    CompetitorUrls(CompetitorCommand),
    /// User-defined advisors
    #[command(subcommand)]
    CustomChat(CustomChatCommand),
    /// KPI targets and actuals
    #[command(subcommand)]
    Kpi(KpiCommand),
    /// Show or write the effective configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// sales, marketing or custom:<id>
    #[arg(long, default_value = "sales")]
    pub advisor: Persona,

    /// Continue a saved conversation
    #[arg(long)]
    pub history: Option<String>,

    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    List {
        #[arg(long, default_value = "sales")]
        advisor: Persona,
    },
    Show {
        #[arg(long, default_value = "sales")]
        advisor: Persona,
        id: String,
    },
    Delete {
        #[arg(long, default_value = "sales")]
        advisor: Persona,
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum UrlCommand {
    Add {
        url: String,
        #[arg(long, default_value = "")]
        label: String,
    },
    List,
    Remove {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CompetitorCommand {
    Add { name: String, url: String },
    List,
    Remove { id: String },
}

#[derive(Debug, Args)]
pub struct CustomChatFields {
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub instructions: String,
}

impl From<CustomChatFields> for CustomChatInput {
    fn from(fields: CustomChatFields) -> Self {
        CustomChatInput {
            name: fields.name,
            description: fields.description,
            instructions: fields.instructions,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CustomChatCommand {
    Create(CustomChatFields),
    List,
    Update {
        id: String,
        #[command(flatten)]
        fields: CustomChatFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct KpiCell {
    /// Fiscal year (April start); defaults to the current one
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub metric: KpiMetric,
    /// Calendar month, 1-12
    #[arg(long)]
    pub month: u32,
    pub value: f64,
}

#[derive(Debug, Subcommand)]
pub enum KpiCommand {
    Show {
        #[arg(long)]
        year: Option<i32>,
    },
    Summary {
        #[arg(long)]
        year: Option<i32>,
    },
    SetTarget(KpiCell),
    SetActual(KpiCell),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Show,
    /// Write the effective configuration to config.json
    Init,
}

fn current_fiscal_year() -> i32 {
    fiscal_year_of(Utc::now().date_naive())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn surface<T>(result: Result<T, String>) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

pub async fn dispatch(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Overview => print_json(&metrics::get_market_overview(state)),
        Command::Trend => print_json(&metrics::get_monthly_trend(state)),
        Command::Competitors => print_json(&metrics::get_competitor_comparison(state)),
        Command::Trending { limit } => print_json(&metrics::get_trending_vehicles(state, limit)),
        Command::Pricing => print_json(&metrics::get_pricing_suggestions(state)),
        Command::Chat(args) => {
            let text = args.message.join(" ");
            let reply =
                surface(chat::send_chat_message(state, args.advisor, args.history, text).await)?;
            print_json(&reply)
        }
        Command::History(command) => match command {
            HistoryCommand::List { advisor } => {
                print_json(&chat::list_chat_histories(state, &advisor))
            }
            HistoryCommand::Show { advisor, id } => {
                print_json(&surface(chat::get_chat_history(state, &advisor, &id))?)
            }
            HistoryCommand::Delete { advisor, id } => {
                surface(chat::delete_chat_history(state, &advisor, &id))
            }
        },
        Command::Urls(command) => match command {
            UrlCommand::Add { url, label } => {
                print_json(&surface(settings::add_inventory_url(state, &url, &label))?)
            }
            UrlCommand::List => print_json(&settings::list_inventory_urls(state)),
            UrlCommand::Remove { id } => surface(settings::remove_inventory_url(state, &id)),
        },
        Command::CompetitorUrls(command) => match command {
            CompetitorCommand::Add { name, url } => {
                print_json(&surface(settings::add_competitor(state, &name, &url))?)
            }
            CompetitorCommand::List => print_json(&settings::list_competitors(state)),
            CompetitorCommand::Remove { id } => surface(settings::remove_competitor(state, &id)),
        },
        Command::CustomChat(command) => match command {
            CustomChatCommand::Create(fields) => {
                print_json(&surface(settings::create_custom_chat(state, fields.into()))?)
            }
            CustomChatCommand::List => print_json(&settings::list_custom_chats(state)),
            CustomChatCommand::Update { id, fields } => {
                print_json(&surface(settings::update_custom_chat(state, &id, fields.into()))?)
            }
            CustomChatCommand::Delete { id } => surface(settings::delete_custom_chat(state, &id)),
        },
        Command::Kpi(command) => match command {
            KpiCommand::Show { year } => print_json(&kpi::get_kpi_sheet(
                state,
                year.unwrap_or_else(current_fiscal_year),
            )),
            KpiCommand::Summary { year } => print_json(&kpi::get_kpi_summary(
                state,
                year.unwrap_or_else(current_fiscal_year),
            )),
            KpiCommand::SetTarget(cell) => print_json(&surface(kpi::set_kpi_target(
                state,
                cell.year.unwrap_or_else(current_fiscal_year),
                cell.metric,
                cell.month,
                cell.value,
            ))?),
            KpiCommand::SetActual(cell) => print_json(&surface(kpi::set_kpi_actual(
                state,
                cell.year.unwrap_or_else(current_fiscal_year),
                cell.metric,
                cell.month,
                cell.value,
            ))?),
        },
        Command::Config(command) => match command {
            ConfigCommand::Show => print_json(&state.config),
            ConfigCommand::Init => {
                state.config.save()?;
                print_json(&state.config)
            }
        },
    }
}
