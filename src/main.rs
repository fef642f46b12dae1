use catalog_browser::{
    DEFAULT_BASE_URL, DisplayCount, Episode, ErrorContext, FetchError, PickerEntry, Renderer,
    Show, SourceConfig, TvMazeSource, View, ViewController, episode_code,
};
use clap::{ArgAction, Parser};
use dialoguer::{Input, Select};
use std::process;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Browse the TVMaze show catalog from the terminal
#[derive(Debug, Parser)]
#[command(name = "catalog-browser", version, about)]
struct Args {
    /// Root URL of the TVMaze compatible API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Errors that end the interactive session
#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to set up the catalog client: {0}")]
    Setup(#[from] FetchError),

    #[error("Terminal prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Prints lists and errors to stdout/stderr and keeps the picker entries
/// for the prompts.
#[derive(Default)]
struct TerminalRenderer {
    show_picker: Vec<PickerEntry>,
    episode_picker: Vec<PickerEntry>,
}

/// Converts an HTML summary into plain terminal text
fn summary_text(summary: Option<&str>) -> String {
    summary
        .map(|s| nanohtml2text::html2text(s).trim().to_string())
        .unwrap_or_default()
}

impl Renderer for TerminalRenderer {
    fn render_shows(&mut self, shows: &[Show], count: DisplayCount) {
        println!("\n=== Shows ===");
        for show in shows {
            let rating = show
                .rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {} [{}] {} | rated {}",
                show.name,
                show.genres.join(", "),
                show.status,
                rating
            );
        }
        println!("{}", count);
    }

    fn render_episodes(&mut self, show: &Show, episodes: &[Episode], count: DisplayCount) {
        println!("\n=== {} ===", show.name);
        let mut details = vec![show.status.clone()];
        if let Some(runtime) = show.runtime {
            details.push(format!("{} min", runtime));
        }
        if let Some(rating) = show.rating {
            details.push(format!("rated {:.1}", rating));
        }
        println!("{}", details.join(" | "));
        let summary = summary_text(show.summary.as_deref());
        if !summary.is_empty() {
            println!("{}", summary);
        }
        println!();

        for episode in episodes {
            println!("  {} - {}", episode_code(episode), episode.name);
            let summary = summary_text(episode.summary.as_deref());
            if !summary.is_empty() {
                println!("    {}", summary);
            }
            println!("    {}", episode.url);
        }
        println!("{}", count);
    }

    fn render_error(&mut self, context: ErrorContext, error: &FetchError) {
        match context {
            ErrorContext::Shows => eprintln!("\nCould not load shows: {}", error),
            ErrorContext::Episodes(show_id) => {
                eprintln!("\nCould not load episodes of show {}: {}", show_id, error)
            }
        }
    }

    fn fill_show_picker(&mut self, entries: &[PickerEntry]) {
        self.show_picker = entries.to_vec();
    }

    fn fill_episode_picker(&mut self, entries: &[PickerEntry]) {
        self.episode_picker = entries.to_vec();
    }
}

/// Lets the user choose one entry of a picker, returning its value
fn pick(prompt: &str, entries: &[PickerEntry]) -> Result<Option<String>, CliError> {
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| entries[i].value.clone()))
}

/// Shows a menu and returns the index of the chosen action, `None` on escape
fn menu(actions: &[&str]) -> Result<Option<usize>, CliError> {
    Ok(Select::new()
        .with_prompt("What next?")
        .items(actions)
        .default(0)
        .interact_opt()?)
}

fn ask_query(prompt: &str) -> Result<String, CliError> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = SourceConfig::default()
        .with_base_url(args.api_url)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let source = TvMazeSource::new(config)?;
    let mut controller = ViewController::new(source, TerminalRenderer::default());

    println!("Loading show catalog...");
    controller.on_start().await;

    loop {
        match controller.view() {
            View::Listing => {
                match menu(&["Open a show", "Search shows", "Reload listing", "Quit"])? {
                    Some(0) => {
                        let entries = controller.renderer().show_picker.clone();
                        if entries.is_empty() {
                            println!("No shows loaded yet, try reloading the listing.");
                        } else if let Some(value) = pick("Show", &entries)? {
                            controller.on_pick_show(&value).await;
                        }
                    }
                    Some(1) => {
                        let query = ask_query("Search shows")?;
                        controller.on_search(&query);
                    }
                    Some(2) => controller.on_start().await,
                    _ => return Ok(()),
                }
            }
            View::Drilldown(_) => {
                match menu(&[
                    "Pick an episode",
                    "Search episodes",
                    "Switch show",
                    "Back to shows",
                    "Quit",
                ])? {
                    Some(0) => {
                        let entries = controller.renderer().episode_picker.clone();
                        if let Some(value) = pick("Episode", &entries)? {
                            controller.on_pick_episode(&value);
                        }
                    }
                    Some(1) => {
                        let query = ask_query("Search episodes")?;
                        controller.on_search(&query);
                    }
                    Some(2) => {
                        let entries = controller.renderer().show_picker.clone();
                        if let Some(value) = pick("Show", &entries)? {
                            controller.on_pick_show(&value).await;
                        }
                    }
                    Some(3) | None => controller.on_back().await,
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
