//! CLI entrypoint for skillgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context as _, Result, anyhow, bail};
use clap::Parser;
use serde_json::{Map, Value};
use skillgate_application::{
    CodeGenerationSkillExecutor, EngineConfig, ExecutionStore, NoProgress, ProcessCommandUseCase,
    ReviewRunOptions, RunReviewLoopUseCase, SkillRegistry,
};
use skillgate_domain::{CodeGenerationRequest, CommandInput, CommandSource, ExecutionResult};
use skillgate_infrastructure::{
    ConfigLoader, DryRunSkillExecutor, FileConfig, HeuristicCodeValidator, InMemoryExecutionStore,
    InMemorySkillRegistry, JsonlAuditStore, StaticContextStore, TemplateCodeGenerator,
};
use skillgate_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, SourceArg,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Adapters shared by every subcommand.
struct Engine {
    config: EngineConfig,
    registry: Arc<InMemorySkillRegistry>,
    process: ProcessCommandUseCase,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    info!("Starting skillgate");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight review loops");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Command::Run {
            ref texts,
            source,
            ref context,
            report,
        } => {
            let engine = build_engine(&file_config, &cancel)?;
            let user_context = to_context_map(context);

            let mut failures = 0;
            for text in texts {
                let mut input = CommandInput::new(text.as_str(), to_source(source));
                if let Some(map) = &user_context {
                    input = input.with_user_context(map.clone());
                }

                let result = if cli.quiet || cli.output == OutputFormat::Json {
                    engine.process.execute(input).await
                } else {
                    let progress = ProgressReporter::new();
                    engine.process.execute_with_progress(input, &progress).await
                };
                if !result.success && !result.approval_required {
                    failures += 1;
                }
                print_execution(cli.output, text, &result);
            }

            if report {
                let report = engine
                    .process
                    .performance_report()
                    .await
                    .context("failed to build performance report")?;
                match cli.output {
                    OutputFormat::Text => println!("{}", ConsoleFormatter::format_report(&report)),
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&report)),
                }
            }

            if failures > 0 {
                bail!("{} of {} command(s) failed", failures, texts.len());
            }
        }

        Command::Classify { ref text } => {
            let engine = build_engine(&file_config, &cancel)?;
            let preview = engine
                .process
                .preview(&CommandInput::new(text.as_str(), CommandSource::Text))
                .await?;
            match cli.output {
                OutputFormat::Text => println!("{}", ConsoleFormatter::format_preview(&preview)),
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&preview)),
            }
        }

        Command::Review {
            ref feature,
            ref description,
            ref requirements,
            max_iterations,
            deadline,
        } => {
            let engine = build_engine(&file_config, &cancel)?;

            let mut policy = engine.config.review.policy;
            if let Some(max) = max_iterations {
                if max == 0 {
                    bail!("--max-iterations must be at least 1");
                }
                policy = policy.with_max_iterations(max);
            }
            let review_loop = RunReviewLoopUseCase::new(
                Arc::new(TemplateCodeGenerator::new()),
                Arc::new(HeuristicCodeValidator::new()),
            )
            .with_policy(policy);

            let mut request = CodeGenerationRequest::new(
                feature.as_str(),
                description.clone().unwrap_or_else(|| feature.clone()),
            );
            for requirement in requirements {
                request = request.with_requirement(requirement.as_str());
            }

            let mut options = ReviewRunOptions::default().with_cancellation(cancel.child_token());
            if let Some(budget) = deadline
                .map(Duration::from_secs)
                .or(engine.config.review.deadline)
            {
                options = options.with_budget(budget);
            }

            let result = if cli.quiet || cli.output == OutputFormat::Json {
                review_loop
                    .execute_with_progress(&request, &options, &NoProgress)
                    .await?
            } else {
                let progress = ProgressReporter::new();
                review_loop
                    .execute_with_progress(&request, &options, &progress)
                    .await?
            };

            match cli.output {
                OutputFormat::Text => println!(
                    "{}",
                    ConsoleFormatter::format_review(feature, &result, policy.max_iterations)
                ),
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&result)),
            }
        }

        Command::Skills { all } => {
            let engine = build_engine(&file_config, &cancel)?;
            let skills = if all {
                engine.registry.list_skills().await?
            } else {
                engine.process.router().available_skills().await?
            };
            match cli.output {
                OutputFormat::Text => println!("{}", ConsoleFormatter::format_skills(&skills)),
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&skills)),
            }
        }

        Command::ShowConfig => {
            file_config.validate()?;
            match cli.output {
                OutputFormat::Text => {
                    println!("Configuration sources (lowest to highest priority):");
                    if cli.no_config {
                        println!("  - built-in defaults (--no-config)");
                    } else {
                        for source in ConfigLoader::describe_sources(cli.config.as_deref()) {
                            println!("  - {}", source);
                        }
                    }
                    println!();
                    println!(
                        "{}",
                        file_config
                            .to_toml_string()
                            .context("failed to render configuration")?
                    );
                }
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&file_config)),
            }
        }
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `-v` when set. With `--log-file`, events go to
/// stderr and the file; the returned guard flushes the file on exit.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(writer))
        .init();
    Ok(Some(guard))
}

fn build_engine(file_config: &FileConfig, cancel: &CancellationToken) -> Result<Engine> {
    let config = file_config
        .to_engine_config()
        .context("invalid configuration")?;

    let registry = Arc::new(InMemorySkillRegistry::new(file_config.skill_catalog()));
    let context_store = Arc::new(StaticContextStore::from_config(&file_config.context));

    let memory: Arc<dyn ExecutionStore> = Arc::new(InMemoryExecutionStore::new());
    let executions: Arc<dyn ExecutionStore> = match &file_config.audit.log_path {
        Some(path) => match JsonlAuditStore::new(memory.clone(), path) {
            Some(audit) => {
                info!("Mirroring execution records to {}", audit.path().display());
                Arc::new(audit)
            }
            None => {
                warn!("Audit log {} unavailable, keeping records in memory only", path);
                memory
            }
        },
        None => memory,
    };

    let review_loop = Arc::new(
        RunReviewLoopUseCase::new(
            Arc::new(TemplateCodeGenerator::new()),
            Arc::new(HeuristicCodeValidator::new()),
        )
        .with_policy(config.review.policy),
    );
    let executor = Arc::new(
        CodeGenerationSkillExecutor::new(Arc::new(DryRunSkillExecutor), review_loop)
            .with_deadline(config.review.deadline)
            .with_cancellation(cancel.clone()),
    );

    let process = ProcessCommandUseCase::new(
        &config,
        context_store,
        registry.clone(),
        executor,
        executions,
    )?;

    Ok(Engine {
        config,
        registry,
        process,
    })
}

fn to_source(source: SourceArg) -> CommandSource {
    match source {
        SourceArg::Voice => CommandSource::Voice,
        SourceArg::Text => CommandSource::Text,
        SourceArg::Scheduled => CommandSource::Scheduled,
    }
}

fn to_context_map(pairs: &[(String, String)]) -> Option<Map<String, Value>> {
    if pairs.is_empty() {
        return None;
    }
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn print_execution(format: OutputFormat, command: &str, result: &ExecutionResult) {
    match format {
        OutputFormat::Text => println!("{}", ConsoleFormatter::format_execution(command, result)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(result)),
    }
}
