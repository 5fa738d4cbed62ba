mod display;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use medguide_ai::{InferencePipeline, evaluate, read_csv_batches};
use medguide_chat::{ChatClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use medguide_core::{DEFAULT_LABEL_COLUMN, PipelineConfig};
use medguide_server::{AppState, start_server};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "medguide", version, about = "Symptom-based diagnosis service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        chat: ChatArgs,
        /// Address to listen on.
        #[arg(long, env = "MEDGUIDE_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },
    /// Predict a diagnosis from symptoms given on the command line.
    Predict {
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Symptom labels (space- or comma-separated).
        #[arg(value_delimiter = ',')]
        symptoms: Vec<String>,
        /// Show the N most likely diagnoses.
        #[arg(long)]
        top: Option<usize>,
    },
    /// List the feature schema in vector order.
    Schema {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Verify the dataset header matches the classifier's feature order.
    Check {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Score the classifier against a labelled CSV dataset.
    Evaluate {
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Labelled data to score (defaults to --dataset).
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Classifier artifact (.json forest, or .onnx with the `onnx` feature).
    #[arg(long, env = "MEDGUIDE_MODEL")]
    model: PathBuf,
    /// Training dataset whose header must match the classifier's features.
    #[arg(long, env = "MEDGUIDE_DATASET")]
    dataset: Option<PathBuf>,
    /// Label column in the dataset.
    #[arg(long, env = "MEDGUIDE_LABEL_COLUMN", default_value = DEFAULT_LABEL_COLUMN)]
    label_column: String,
    /// Accept a dataset header that lacks the label column.
    #[arg(long, env = "MEDGUIDE_ALLOW_MISSING_LABEL")]
    allow_missing_label: bool,
}

impl PipelineArgs {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            model_path: self.model.clone(),
            dataset_path: self.dataset.clone(),
            label_column: self.label_column.clone(),
            allow_missing_label: self.allow_missing_label,
        }
    }

    fn load(&self) -> anyhow::Result<InferencePipeline> {
        InferencePipeline::load(&self.config())
            .with_context(|| format!("loading classifier {}", self.model.display()))
    }
}

#[derive(Args)]
struct ChatArgs {
    /// API key for the chat provider; chat is disabled without one.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    chat_api_key: Option<String>,
    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    chat_base_url: String,
    #[arg(long, env = "MEDGUIDE_CHAT_MODEL", default_value = DEFAULT_MODEL)]
    chat_model: String,
}

impl ChatArgs {
    fn client(&self) -> Option<ChatClient> {
        self.chat_api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .map(|key| {
                ChatClient::new(
                    self.chat_base_url.clone(),
                    key.clone(),
                    self.chat_model.clone(),
                )
            })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medguide=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            pipeline,
            chat,
            bind,
        } => cmd_serve(&pipeline, &chat, bind).await,
        Command::Predict {
            pipeline,
            symptoms,
            top,
        } => cmd_predict(&pipeline, &symptoms, top),
        Command::Schema { pipeline } => {
            let p = pipeline.load()?;
            print!("{}", display::render_schema(p.schema()));
            Ok(())
        }
        Command::Check { pipeline } => cmd_check(&pipeline),
        Command::Evaluate { pipeline, data } => cmd_evaluate(&pipeline, data),
    }
}

async fn cmd_serve(
    pipeline: &PipelineArgs,
    chat: &ChatArgs,
    bind: SocketAddr,
) -> anyhow::Result<()> {
    tracing::info!("medguide v{}", env!("CARGO_PKG_VERSION"));

    // Any load failure aborts here, before a socket is bound.
    let p = pipeline.load()?;
    let chat = chat.client();
    if chat.is_none() {
        tracing::warn!("no chat API key configured; /ask_bot will return 503");
    }

    let server = start_server(AppState::new(p, chat), bind).await?;
    println!("Listening on http://{}", server.addr());

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    server.shutdown().await;
    Ok(())
}

fn cmd_predict(
    pipeline: &PipelineArgs,
    symptoms: &[String],
    top: Option<usize>,
) -> anyhow::Result<()> {
    let p = pipeline.load()?;

    let unknown: Vec<&str> = symptoms
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !p.schema().contains(s))
        .collect();
    if !unknown.is_empty() {
        eprintln!("  Ignoring unknown symptoms: {}", unknown.join(", "));
    }

    match top {
        Some(k) if k > 0 => {
            let ranked = p.rank(symptoms, k)?;
            print!("{}", display::render_ranked(&ranked));
        }
        _ => {
            let prediction = p.predict(symptoms)?;
            println!("{} ({:.1}%)", prediction.label, prediction.confidence * 100.0);
        }
    }
    Ok(())
}

fn cmd_check(pipeline: &PipelineArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        pipeline.dataset.is_some(),
        "check needs a dataset (--dataset or MEDGUIDE_DATASET)"
    );
    let p = pipeline.load()?;
    println!(
        "OK: dataset header matches {} classifier features ({} classes)",
        p.schema().len(),
        p.classes().len()
    );
    Ok(())
}

fn cmd_evaluate(pipeline: &PipelineArgs, data: Option<PathBuf>) -> anyhow::Result<()> {
    let data = data
        .or_else(|| pipeline.dataset.clone())
        .context("evaluate needs --data or --dataset")?;
    let p = pipeline.load()?;

    let batches = read_csv_batches(&data)?;
    let report = evaluate(&p, &batches, &pipeline.label_column)
        .with_context(|| format!("evaluating {}", data.display()))?;
    print!("{}", display::render_eval_report(&report));
    Ok(())
}
