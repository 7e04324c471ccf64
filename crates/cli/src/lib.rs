pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "tickertalk",
    about = "Tickertalk operator CLI",
    long_about = "Inspect configuration, dry-run stock intent detection, and send one-off chat turns.",
    after_help = "Examples:\n  tickertalk config\n  tickertalk extract \"What is the share price of Apple?\"\n  tickertalk ask \"What is EBITDA?\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Show which ticker symbol, if any, a message would be enriched with")]
    Extract {
        #[arg(help = "Message text to inspect")]
        text: String,
    },
    #[command(about = "Send one chat message through the full enrichment pipeline")]
    Ask {
        #[arg(help = "Message to send")]
        message: String,
        #[arg(long, help = "Skip the real-time quote lookup")]
        no_market_data: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Extract { text } => commands::extract::run(&text),
        Command::Ask { message, no_market_data } => commands::ask::run(&message, no_market_data),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn ask_accepts_market_data_opt_out() {
        let cli = Cli::parse_from(["tickertalk", "ask", "AAPL stock price", "--no-market-data"]);

        match cli.command {
            Command::Ask { message, no_market_data } => {
                assert_eq!(message, "AAPL stock price");
                assert!(no_market_data);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn extract_takes_positional_text() {
        let cli = Cli::parse_from(["tickertalk", "extract", "tesla share price"]);
        assert!(matches!(cli.command, Command::Extract { text } if text == "tesla share price"));
    }
}
