mod render;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rdash_core::TopicId;
use rdash_pipeline::{Orchestrator, PipelineEvent, RunResult};
use rdash_text::Normalizer;
use rdash_topics::WordCloud;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rdash-cli")]
#[command(about = "Reddit sentiment and topic dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect, analyse, and print the dashboard
    Run {
        /// Write the analysis table as CSV
        #[arg(long)]
        export: Option<PathBuf>,

        /// Render a word cloud for this topic id
        #[arg(long, allow_negative_numbers = true)]
        wordcloud_topic: Option<TopicId>,

        /// SVG output path (defaults to `wordcloud_topic_<id>.svg`)
        #[arg(long, requires = "wordcloud_topic")]
        wordcloud_out: Option<PathBuf>,
    },
    /// Print the cleaned form of a piece of text
    Normalize {
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run {
            export,
            wordcloud_topic,
            wordcloud_out,
        }) => {
            let run = run_pipeline().await?;
            let mut stdout = std::io::stdout().lock();
            render::dashboard(&mut stdout, &run)?;
            stdout.flush()?;

            if let Some(path) = export {
                write_export(&run, &path)?;
            }
            if let Some(topic) = wordcloud_topic {
                let path = wordcloud_out
                    .unwrap_or_else(|| PathBuf::from(format!("wordcloud_topic_{topic}.svg")));
                write_word_cloud(&run, topic, &path)?;
            }
        }
        Some(Commands::Normalize { text }) => {
            println!("{}", Normalizer::default().normalize(&text));
        }
        None => println!("rdash-cli: use `run` or `normalize <TEXT>`"),
    }

    Ok(())
}

async fn run_pipeline() -> anyhow::Result<RunResult> {
    let config = rdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let queries = rdash_core::load_queries(config.queries_path.as_deref())?;
    let source = rdash_pipeline::reddit_source(&config, queries)?;
    let mut orchestrator = Orchestrator::from_config(&config, source);
    let run = orchestrator.handle(PipelineEvent::RunRequested).await?;
    Ok(run)
}

fn write_export(run: &RunResult, path: &Path) -> anyhow::Result<()> {
    if !run.completed {
        println!("nothing to export; the run halted before analysis");
        return Ok(());
    }
    let csv = run.export_csv()?;
    std::fs::write(path, csv)?;
    tracing::info!(path = %path.display(), rows = run.table.len(), "exported analysis table");
    println!("exported {} rows to {}", run.table.len(), path.display());
    Ok(())
}

fn write_word_cloud(run: &RunResult, topic: TopicId, path: &Path) -> anyhow::Result<()> {
    match run.word_cloud(topic, &WordCloud::default()) {
        Ok(image) => {
            std::fs::write(path, image.svg)?;
            println!(
                "word cloud for topic {topic} ({} words) written to {}",
                image.words_placed,
                path.display()
            );
        }
        Err(skip) => println!("{skip}"),
    }
    Ok(())
}
