use anyhow::Result;
use clap::{Parser, Subcommand};

use promptlens::cli;
use promptlens::config::PromptlensConfig;
use promptlens::web;

#[derive(Debug, Parser)]
#[command(name = "promptlens")]
#[command(about = "LLM observability and prompt evaluation dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the web dashboard
    Web {
        /// Bind address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Submit a single prompt and print the response
    Ask {
        /// The prompt to send
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
        /// Model identifier (default from config)
        #[arg(long)]
        model: Option<String>,
        /// Prompt template label (default from config)
        #[arg(long)]
        template: Option<String>,
    },
    /// Show aggregate feedback and latency statistics
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show recent interaction records
    Log {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Number of records to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Check credential, config, and log-file status
    Health,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Web { addr } => {
            let mut config = PromptlensConfig::load();
            if let Some(addr) = addr {
                config.server_addr = addr;
            }
            web::serve(config)
        }
        Commands::Ask {
            prompt,
            model,
            template,
        } => {
            let prompt = prompt.join(" ");
            cli::run_ask(&prompt, model.as_deref(), template.as_deref())
        }
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt)
        }
        Commands::Log { format, limit } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_log(fmt, limit)
        }
        Commands::Health => cli::run_health(),
    }
}
