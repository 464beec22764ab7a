use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use proposal_api::client::clipboard::Osc52Clipboard;
use proposal_api::client::usage::local_today;
use proposal_api::client::{
    FileUsageStore, FormController, GenerationApi, HttpGenerationApi, SubmitOutcome,
    UsageTracker,
};

#[derive(Parser)]
#[command(name = "propose")]
#[command(author, version, about = "Turn a job post into a short proposal", long_about = None)]
struct Cli {
    /// Job description text; read from stdin when omitted or "-"
    description: Option<String>,

    #[arg(long, env = "PROPOSAL_ENDPOINT", default_value = "http://localhost:8080/generate")]
    endpoint: String,

    #[arg(long, default_value = "5")]
    daily_limit: u32,

    /// Usage record location (defaults to the user data directory)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Copy the proposal to the clipboard
    #[arg(short, long)]
    copy: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("proposal-generator").join("usage.json"))
        .unwrap_or_else(|| PathBuf::from(".proposal-usage.json"))
}

fn read_description(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read job description from stdin")?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let today = local_today();
    let state_file = cli.state_file.unwrap_or_else(default_state_file);
    let usage = UsageTracker::load(FileUsageStore::new(state_file), cli.daily_limit, today);
    let api = HttpGenerationApi::new(cli.endpoint)?;

    let mut form = FormController::new(api, usage);
    form.set_description(read_description(cli.description)?);

    let outcome = match form.start(today) {
        Ok(submission) => {
            eprintln!("Generating...");
            let result = form.api().generate(submission.description()).await;
            form.complete(submission, result, today)
        }
        Err(outcome) => outcome,
    };

    match outcome {
        SubmitOutcome::Generated => {
            if !form.special_instructions().is_empty() {
                println!("Special instructions detected & followed:");
                for instruction in form.special_instructions() {
                    println!("  ✓ {instruction}");
                }
                println!();
            }
            println!("{}", form.proposal().unwrap_or_default());

            if cli.copy {
                let mut clipboard = Osc52Clipboard::new(std::io::stdout());
                form.copy(&mut clipboard, Instant::now())?;
                eprintln!("{}", form.copy_label(Instant::now()));
            }

            eprintln!(
                "{} of {} proposals left today",
                form.usage().remaining(),
                form.usage().daily_limit()
            );
            Ok(())
        }
        _ => {
            eprintln!("{}", form.error().unwrap_or("Something went wrong"));
            std::process::exit(1);
        }
    }
}
