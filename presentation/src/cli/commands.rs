//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Where a command came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Voice,
    #[default]
    Text,
    Scheduled,
}

/// CLI arguments for skillgate
#[derive(Parser, Debug)]
#[command(name = "skillgate")]
#[command(author, version, about = "Command orchestration with tiered approval gates")]
#[command(long_about = r#"
skillgate classifies a natural-language command, checks it against a tiered
approval policy and, when it is safe to run unattended, routes it to a skill.

Every command goes through four stages:
1. Problem: keyword classification (type, urgency, scope)
2. Amplification: active projects, open tasks and accepted decisions
3. Solution: skill, approach and sub-tasks
4. Approval: auto, draft, confirm or block

Configuration files are loaded from (in priority order):
1. SKILLGATE_* environment variables
2. --config <path>            Explicit config file
3. ./skillgate.toml           Project-level config
4. ~/.config/skillgate/config.toml   Global config

Example:
  skillgate run "what is the status of Relaunch"
  skillgate classify "deploy the new release"
  skillgate review "Signup form" -r "validate email" -r "hash password"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process one or more commands end to end
    Run {
        /// Command texts, processed in order
        #[arg(required = true, value_name = "TEXT")]
        texts: Vec<String>,

        /// Where the command came from
        #[arg(long, value_enum, default_value = "text")]
        source: SourceArg,

        /// Extra user context as KEY=VALUE (repeatable)
        #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        context: Vec<(String, String)>,

        /// Print a performance report after the last command
        #[arg(long)]
        report: bool,
    },

    /// Classify a command and show its approval tier without executing it
    Classify {
        /// The command text
        text: String,
    },

    /// Run the generate/validate/improve loop for a feature
    Review {
        /// Feature name
        feature: String,

        /// Longer description (defaults to the feature name)
        #[arg(short, long)]
        description: Option<String>,

        /// Requirement (repeatable)
        #[arg(short, long = "requirement", value_name = "TEXT")]
        requirements: Vec<String>,

        /// Override the configured iteration cap
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Wall-clock budget in seconds
        #[arg(long, value_name = "SECS")]
        deadline: Option<u64>,
    },

    /// List skills and their metrics
    Skills {
        /// Include inactive skills
        #[arg(long)]
        all: bool,
    },

    /// Show configuration sources and the effective configuration
    ShowConfig,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "skillgate",
            "-vv",
            "run",
            "deploy now",
            "--source",
            "voice",
            "--context",
            "team=ops",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Run {
                texts,
                source,
                context,
                report,
            } => {
                assert_eq!(texts, vec!["deploy now".to_string()]);
                assert!(!report);
                assert_eq!(source, SourceArg::Voice);
                assert_eq!(context, vec![("team".to_string(), "ops".to_string())]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_review() {
        let cli = Cli::parse_from([
            "skillgate",
            "review",
            "Signup",
            "-r",
            "validate email",
            "-r",
            "hash password",
            "--max-iterations",
            "3",
            "-o",
            "json",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Command::Review {
                requirements,
                max_iterations,
                ..
            } => {
                assert_eq!(requirements.len(), 2);
                assert_eq!(max_iterations, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_key_value() {
        assert!(parse_key_value("a=b").is_ok());
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
