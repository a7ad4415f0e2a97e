//! Finie CLI
//!
//! Interactive finance question-answering on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export ALPHA_VANTAGE_API_KEY="..."   # optional: fundamentals + earnings
//! export FINNHUB_API_KEY="..."         # optional: company news
//!
//! finie                        # interactive session
//! finie -q "How is AAPL doing?"  # one-shot question
//! ```

use clap::Parser;
use finie_agent::{Command, FinieAgent, FinieConfig};
use finie_llm::{OpenAiConfig, OpenAiProvider};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "finie")]
#[command(about = "Finie - AI finance agent", long_about = None)]
struct Args {
    /// Ask a single question and exit
    #[arg(short, long)]
    query: Option<String>,

    /// LLM model to use (default: OPENAI_MODEL or gpt-4o-mini)
    #[arg(short, long)]
    model: Option<String>,

    /// API base URL for OpenAI-compatible servers
    #[arg(long)]
    api_base: Option<String>,
}

fn print_banner(config: &FinieConfig) {
    println!();
    println!("============================================================");
    println!("Finie - AI Finance Agent");
    println!("============================================================");
    println!("Model: {}", config.model);
    println!("Type /help for commands, /exit to quit");
    println!();
}

fn build_provider(args: &Args) -> anyhow::Result<Arc<OpenAiProvider>> {
    let mut provider_config = OpenAiConfig::from_env()?;
    if let Some(api_base) = &args.api_base {
        provider_config = provider_config.with_api_base(api_base.clone());
    }
    Ok(Arc::new(OpenAiProvider::with_config(provider_config)?))
}

fn format_history(agent: &FinieAgent) -> String {
    if agent.conversation().is_empty() {
        return "No conversation history yet.".to_string();
    }

    let mut out = String::new();
    for (i, turn) in agent.conversation().history().iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] You: {}\n",
            i + 1,
            turn.timestamp.format("%H:%M:%S"),
            turn.user_input
        ));
        let excerpt: String = turn.assistant_response.chars().take(120).collect();
        out.push_str(&format!("   Finie: {excerpt}...\n"));
    }
    out
}

async fn run_repl(agent: &mut FinieAgent) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!(">>> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match Command::parse(input) {
            Ok(Command::Exit) => {
                println!("Goodbye!");
                break;
            }
            Ok(Command::Clear) => {
                agent.clear_history();
                println!("[Conversation history cleared]\n");
            }
            Ok(Command::History) => {
                println!("{}\n", format_history(agent));
            }
            Ok(Command::Help) => {
                println!("{}", Command::help_text());
            }
            Ok(Command::Query { text }) => match agent.query(&text).await {
                Ok(response) => {
                    println!("\n{response}\n");
                    println!("------------------------------------------------------------\n");
                }
                Err(e) => {
                    eprintln!("Error: {e}\n");
                }
            },
            Err(e) => {
                eprintln!("Error: {e}\n");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,finie_agent=info,finie_runtime=info")),
        )
        .init();

    let args = Args::parse();

    let provider = match build_provider(&args) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Error initializing Finie: {e}");
            eprintln!("\nMake sure OPENAI_API_KEY is set in your environment.");
            std::process::exit(1);
        }
    };

    let mut config_builder = FinieConfig::builder().with_env_keys().from_env_model();
    if let Some(model) = &args.model {
        config_builder = config_builder.model(model.clone());
    }
    let config = config_builder.build()?;

    let mut agent = FinieAgent::new(provider, config.clone())?;

    // One-shot mode
    if let Some(question) = args.query {
        let answer = agent.query(&question).await?;
        println!("{answer}");
        return Ok(());
    }

    print_banner(&config);
    run_repl(&mut agent).await
}
