//! switchyard: route prompts and stream answers from the command line.

use std::io::{self, IsTerminal, Read, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use switchyard::{CallerProfile, Config, ModelCatalog, Router};

/// Switchyard CLI
#[derive(Parser)]
#[command(name = "switchyard")]
#[command(version = switchyard::PKG_VERSION)]
#[command(about = "Prompt router and response cache for LLM backends")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "SWITCHYARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog models
    Models,

    /// Show which model would answer a prompt (JSON)
    Route {
        /// Prompt text (or omit to read from stdin)
        prompt: Option<String>,
        /// Requested model id
        #[arg(short, long, default_value = "omni")]
        model: String,
        /// Route as a premium caller that cares little about cost
        #[arg(long)]
        enterprise: bool,
    },

    /// Route a prompt and stream the answer
    Ask {
        /// Prompt text (or omit to read from stdin)
        prompt: Option<String>,
        /// Requested model id
        #[arg(short, long, default_value = "omni")]
        model: String,
        /// Route as a premium caller that cares little about cost
        #[arg(long)]
        enterprise: bool,
    },

    /// Send one prompt to several models and rank them by finishing time
    Race {
        /// Prompt text (or omit to read from stdin)
        prompt: Option<String>,
        /// Requested model ids (repeatable)
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Models => {
            let catalog = match config.models {
                Some(models) => ModelCatalog::new(models)?,
                None => ModelCatalog::builtin(),
            };
            for model in &catalog {
                let e = model.embedding;
                println!(
                    "{:<12} {:<20} [{:.2}, {:.2}, {:.2}, {:.2}] {}",
                    model.id,
                    model.display_name,
                    e.complexity,
                    e.code_affinity,
                    e.language_affinity,
                    e.cost_efficiency,
                    model.description
                );
            }
        }

        Command::Route {
            prompt,
            model,
            enterprise,
        } => {
            let prompt = resolve_text(prompt, "route")?;
            let catalog = match config.models {
                Some(models) => ModelCatalog::new(models)?,
                None => ModelCatalog::builtin(),
            };
            let router = Router::new(catalog.into(), config.routing);
            let decision = router.route(&prompt, &model, &profile(enterprise));
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }

        Command::Ask {
            prompt,
            model,
            enterprise,
        } => {
            let prompt = resolve_text(prompt, "ask")?;
            let orchestrator = config.builder().backend(config.llm_backend()?).build()?;

            let mut stdout = io::stdout().lock();
            let outcome = orchestrator
                .handle(&prompt, &model, &profile(enterprise), |chunk| {
                    // a closed stdout means nobody is reading any more
                    match stdout.write_all(chunk.as_bytes()).and_then(|()| stdout.flush()) {
                        Ok(()) => ControlFlow::Continue(()),
                        Err(_) => ControlFlow::Break(()),
                    }
                })
                .await;
            drop(stdout);
            println!();
            info!(
                model = %outcome.decision.chosen_model_id,
                switched = outcome.decision.caused_switch,
                source = outcome.source.as_str(),
                "request finished"
            );
        }

        Command::Race { prompt, models } => {
            let prompt = resolve_text(prompt, "race")?;
            let orchestrator = config.builder().backend(config.llm_backend()?).build()?;
            let requested: Vec<&str> = models.iter().map(String::as_str).collect();

            let entries = orchestrator
                .race(&prompt, &requested, &CallerProfile::default())
                .await;
            for entry in entries {
                let status = if entry.failed() { "failed" } else { "ok" };
                println!(
                    "#{} {} -> {} ({:.2}s, {status})",
                    entry.rank,
                    entry.requested_model_id,
                    entry.decision.chosen_model_id,
                    entry.elapsed.as_secs_f64()
                );
                println!("{}\n", entry.text.trim());
            }
        }
    }

    Ok(())
}

fn profile(enterprise: bool) -> CallerProfile {
    if enterprise {
        CallerProfile::enterprise()
    } else {
        CallerProfile::standard()
    }
}

/// Resolve input text from a CLI argument, stdin, or both.
///
/// When both are present the argument comes first, followed by stdin.
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_text = if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) => {
            Err(format!("{command}: no input provided (pass text as argument or via stdin)").into())
        }
    }
}
