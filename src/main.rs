use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};

use combine_slices::loader;
use combine_slices::{CombineConfig, CombinedReducer, CompositeState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fold a list of actions through the slices of a schema
    Replay {
        /// Path to the slice schema (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to the action list (YAML or JSON)
        #[arg(short, long)]
        actions: PathBuf,

        /// Path to a JSON object to start from instead of an empty state
        #[arg(long)]
        state: Option<PathBuf>,

        /// Print the final state on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Probe every slice of a schema and list the usable ones
    Check {
        /// Path to the slice schema (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn build(schema: &Path) -> anyhow::Result<CombinedReducer> {
    let schema = loader::load_schema(schema)
        .with_context(|| format!("Failed to load schema {}", schema.display()))?;
    let combined = CombinedReducer::try_new(schema.into_reducer_map(), CombineConfig::default())?;
    Ok(combined)
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Replay {
            schema,
            actions,
            state,
            compact,
        } => {
            let combined = build(&schema)?;
            let actions = loader::load_actions(&actions)
                .with_context(|| format!("Failed to load actions {}", actions.display()))?;

            let mut current = match state {
                Some(path) => loader::load_state(&path)
                    .with_context(|| format!("Failed to load state {}", path.display()))?,
                None => CompositeState::new(),
            };

            log::info!("Replaying {} actions", actions.len());
            for (index, action) in actions.iter().enumerate() {
                current = combined
                    .reduce(Some(&current), action)
                    .with_context(|| format!("Action #{} ({}) failed", index, action.action_type))?;
            }

            let json = current.to_json();
            let output = if compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            println!("{}", output);
        }
        Commands::Check { schema } => {
            let combined = build(&schema)?;
            for name in combined.slice_names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
