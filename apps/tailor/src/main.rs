mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod pipeline;
mod render;
mod sanitize;
mod sources;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::LlmCollaborators;
use crate::pipeline::stage::STAGE_COUNT;
use crate::pipeline::{
    ConsoleProgress, GraphExecutor, OutputMaterializer, PipelineInputs, ProgressReporter,
    StageRunner,
};
use crate::render::{LatexCompiler, LatexOnlineCompiler};
use crate::sources::{PageFetcher, TavilyClient, WebSearch};

/// Tailor a LaTeX résumé (and optionally a cover letter) to a job posting.
#[derive(Debug, Parser)]
#[command(name = "tailor", version, about)]
struct Cli {
    /// Job posting URL, or path to a local text file with the posting
    #[arg(long, value_name = "URL|PATH")]
    url: String,

    /// LaTeX résumé to tailor
    #[arg(long, value_name = "PATH")]
    resume: PathBuf,

    /// Directory the artifacts are written to
    #[arg(long, value_name = "DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Also write a cover letter
    #[arg(long)]
    cover_letter: bool,

    /// Log collaborator internals at debug level
    #[arg(long)]
    verbose: bool,

    /// Skip remote PDF compilation and keep only the .tex sources
    #[arg(long)]
    no_pdf: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config, cli.verbose);

    print_banner(&cli);

    let resume_latex = tokio::fs::read_to_string(&cli.resume)
        .await
        .with_context(|| format!("Résumé file not found: {}", cli.resume.display()))?;

    let llm = llm_client::shared(&config.anthropic_api_key, &config.llm_model)?;

    let search: Option<Arc<dyn WebSearch>> = match &config.tavily_api_key {
        Some(key) => Some(Arc::new(TavilyClient::new(key.clone())?)),
        None => {
            warn!("TAVILY_API_KEY not set, company research will not use web search");
            None
        }
    };
    let collaborators = Arc::new(LlmCollaborators::new(llm, PageFetcher::new()?, search));

    let compiler: Option<Arc<dyn LatexCompiler>> = if cli.no_pdf {
        None
    } else {
        Some(Arc::new(LatexOnlineCompiler::new(
            config.latex_compile_url.clone(),
        )?))
    };

    let progress: Arc<dyn ProgressReporter> = Arc::new(ConsoleProgress);
    let executor = GraphExecutor::new(
        StageRunner::new(collaborators, progress.clone()),
        OutputMaterializer::new(compiler, progress),
    );

    let inputs = PipelineInputs {
        job_source: cli.url,
        resume_latex,
        output_dir: cli.output_dir,
        generate_cover_letter: cli.cover_letter,
        verbose: cli.verbose,
    };

    let outcome = executor.run(inputs).await.map_err(|e| match e.stage() {
        Some(stage) => anyhow::Error::new(e)
            .context(format!("Pipeline stopped at step {}/{STAGE_COUNT}", stage.ordinal())),
        None => anyhow::Error::new(e).context("Pipeline failed while saving outputs"),
    })?;

    println!("\n{}", "=".repeat(60));
    println!("  All done! Files saved:");
    for path in &outcome.report.saved {
        println!("    {}", path.display());
    }
    for warning in outcome.state.errors() {
        println!("  Warning: {warning}");
    }
    println!("{}\n", "=".repeat(60));

    Ok(())
}

fn init_tracing(config: &Config, verbose: bool) {
    tracing_subscriber::registry()
        .with(log_filter(config, verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `--verbose` wins over `RUST_LOG`, whether it came from the shell or `.env`.
fn log_filter(config: &Config, verbose: bool) -> EnvFilter {
    let crate_directive = |level: &str| format!("{}={level}", env!("CARGO_PKG_NAME"));
    if verbose {
        return EnvFilter::new(crate_directive("debug"));
    }
    EnvFilter::try_new(&config.rust_log)
        .unwrap_or_else(|_| EnvFilter::new(crate_directive("info")))
}

fn print_banner(cli: &Cli) {
    println!("\n{}", "=".repeat(60));
    println!("  Résumé Tailor v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(60));
    println!("  Job source   : {}", cli.url);
    println!("  Résumé       : {}", cli.resume.display());
    println!("  Output dir   : {}", cli.output_dir.display());
    println!(
        "  Cover letter : {}",
        if cli.cover_letter { "yes" } else { "no" }
    );
    println!("{}", "=".repeat(60));
}
