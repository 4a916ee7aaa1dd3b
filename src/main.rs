use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use speechcmd::config::{Config, DEFAULT_CONFIG_PATH};
use speechcmd::repl::{handle_transcript, parse_line};
use speechcmd::{
    ManualRecognizer, Notifier, Renderer, SessionEvent, UtteranceProcessor, Vocabulary,
};

#[derive(Parser)]
#[command(name = "speechcmd", about = "Voice command interpreter")]
struct Cli {
    /// Config file with the vocabulary tables
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log every word resolution
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read recognizer results from stdin, one per line (default)
    Run,
    /// Print the vocabulary tables
    Vocab,
    /// Print the effective config as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&config),
        Command::Vocab => {
            print_vocabulary(&build_vocabulary(&config)?);
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_vocabulary(config: &Config) -> anyhow::Result<Vocabulary> {
    config
        .vocabulary
        .build()
        .context("Invalid vocabulary configuration")
}

fn run(config: &Config) -> anyhow::Result<()> {
    let vocabulary = build_vocabulary(config)?;
    let (notifier, events) = Notifier::new();
    let mut processor = UtteranceProcessor::new(vocabulary, ManualRecognizer::new(), notifier);
    let mut renderer = Renderer::stdout();

    tracing::info!(
        "Recognizer language {}, partial results {}",
        config.language,
        if config.partial_results { "on" } else { "off" }
    );
    eprintln!("Say a command (code, count) followed by digits. 'back' undoes, 'reset' clears.");

    processor.start();
    settle(&mut processor, &mut renderer, &events)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read recognizer input")?;
        if let Some(event) = parse_line(&line) {
            handle_transcript(event, &mut processor, config.partial_results);
        }
        settle(&mut processor, &mut renderer, &events)?;
    }

    let log = processor.log();
    tracing::info!("Session ended with {} outputs", log.len());
    for record in log.all() {
        println!("{}\t{}", record.command, record.value);
    }

    Ok(())
}

/// The line recognizer is ready as soon as it is armed
fn settle(
    processor: &mut UtteranceProcessor<ManualRecognizer>,
    renderer: &mut Renderer<io::Stdout>,
    events: &flume::Receiver<SessionEvent>,
) -> anyhow::Result<()> {
    if processor.recognizer_mut().take_armed() {
        processor.on_ready();
    }
    renderer.drain(events)?;
    Ok(())
}

fn print_vocabulary(vocabulary: &Vocabulary) {
    println!("Commands:");
    for word in vocabulary.commands() {
        let spellings: Vec<&str> = word.spellings.iter().map(String::as_str).collect();
        println!("  {:<8} {}", word.value, spellings.join(", "));
    }
    println!("Parameters:");
    for word in vocabulary.parameters() {
        let spellings: Vec<&str> = word.spellings.iter().map(String::as_str).collect();
        println!("  {:<8} {}", word.value, spellings.join(", "));
    }
}
