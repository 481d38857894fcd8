use core::time::Duration;
use std::{env, path::PathBuf, process::exit};

use autoblog::{
    generate::{Generator, Outcome, Report},
    provider::{
        ChatCompletionClient, CompletionClient, DEFAULT_BASE_URL, DEFAULT_MODEL, TextProvider,
    },
    topic::{TOPICS, select_topic},
};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{
    config::HookBuilder,
    eyre::{self, WrapErr},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, filter::Directive, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(about = "Generate scheduled blog posts", long_about = None)]
#[command(version, author)]
struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit a machine-readable JSON report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one post and write it under the blog root.
    Generate {
        /// Topic to write about; picked at random from the candidate list
        /// when omitted
        #[arg(long)]
        topic: Option<String>,

        /// Which provider API shape to call
        #[arg(long, value_enum, default_value_t = ProviderKind::Chat)]
        provider: ProviderKind,

        /// Model identifier
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Root of the blog content tree
        #[arg(long, default_value = "src/data/blog")]
        blog_root: PathBuf,

        /// Base URL of the provider API
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Completion token ceiling
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,
    },

    /// List the candidate topics.
    Topics,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProviderKind {
    Chat,
    Completion,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    HookBuilder::default()
        .display_env_section(true)
        .panic_section("It looks like autoblog encountered a bug")
        .install()
        .expect("Failed to install color-eyre hook");

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false);
    let mut filter_layer = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    if let Ok(directive) = "hyper=warn".parse::<Directive>() {
        filter_layer = filter_layer.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    if let Err(err) = entry(cli).await {
        error!("{:#}", err);
        exit(1);
    }
}

async fn entry(cli: Cli) -> eyre::Result<()> {
    match cli.command {
        Commands::Topics => {
            for topic in TOPICS {
                println!("{topic}");
            }
            Ok(())
        }
        Commands::Generate {
            topic,
            provider,
            model,
            blog_root,
            base_url,
            max_tokens,
            temperature,
        } => {
            let api_key = env::var("OPENAI_API_KEY")
                .wrap_err("Set OPENAI_API_KEY in your environment to enable generation")?;

            let topic = topic
                .unwrap_or_else(|| select_topic(&mut rand::thread_rng()).to_string());

            let provider = build_provider(provider, api_key, model, base_url, max_tokens, temperature);
            let generator = Generator::new(provider, blog_root);

            let report = long_task(
                "Generating post...",
                generator.run(&topic),
                "Generation finished",
            )
            .await?;

            emit_report(&report, cli.json)?;
            Ok(())
        }
    }
}

fn build_provider(
    kind: ProviderKind,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
) -> Box<dyn TextProvider> {
    match kind {
        ProviderKind::Chat => {
            let mut client = ChatCompletionClient::new(api_key)
                .with_model(model)
                .with_base_url(base_url);
            if let Some(max_tokens) = max_tokens {
                client = client.with_max_tokens(max_tokens);
            }
            if let Some(temperature) = temperature {
                client = client.with_temperature(temperature);
            }
            Box::new(client)
        }
        ProviderKind::Completion => {
            let mut client = CompletionClient::new(api_key)
                .with_model(model)
                .with_base_url(base_url);
            if let Some(max_tokens) = max_tokens {
                client = client.with_max_tokens(max_tokens);
            }
            if let Some(temperature) = temperature {
                client = client.with_temperature(temperature);
            }
            Box::new(client)
        }
    }
}

fn emit_report(report: &Report, emit_json: bool) -> eyre::Result<()> {
    if emit_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match report.outcome {
        Outcome::Written => info!(
            "Post \"{}\" written to {}",
            report.title,
            report.path.display()
        ),
        Outcome::Skipped => info!(
            "Post {} already exists, nothing to do",
            report.path.display()
        ),
    }
    Ok(())
}

pub async fn long_task<T, E>(
    loading_msg: &'static str,
    f: impl Future<Output = Result<T, E>>,
    complete_msg: &'static str,
) -> Result<T, E> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(loading_msg);

    let result = f.await?;

    pb.finish_with_message(complete_msg);
    Ok(result)
}
