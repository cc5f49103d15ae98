use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use postea_client::{ApiClient, FetchConfig, HttpStreamSource, ShortcutRelay, ShortcutRequest, fetch_url};
use postea_core::{
    LibrarySaveStatus, ModelRef, OperateResult, PageListQuery, PageSort, ParserKind, Prompt, SettingsStore, TaskEvent,
    TaskView, normalize_for_dispatch, parse_document,
};

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for page content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Markdown,
    Html,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, html, text", s)),
        }
    }
}

/// Sort mode argument for page listings
#[derive(Debug, Clone, Copy)]
struct SortArg(PageSort);

impl FromStr for SortArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "record-at" => Ok(Self(PageSort::RecordAt)),
            "vote-score" => Ok(Self(PageSort::VoteScore)),
            "created-at" => Ok(Self(PageSort::CreatedAt)),
            _ => Err(format!(
                "Invalid sort: {}. Valid options: record-at, vote-score, created-at",
                s
            )),
        }
    }
}

/// Read-it-later client and AI shortcut runner
#[derive(Parser, Debug)]
#[command(name = "postea")]
#[command(author = "Postea Contributors")]
#[command(version = VERSION)]
#[command(about = "Browse saved pages and run AI shortcuts over them", long_about = None)]
struct Cli {
    /// Server URL override (default: from settings)
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Settings file override (default: per-user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse and mutate saved pages
    Pages {
        #[command(subcommand)]
        command: PagesCommand,
    },
    /// List subscribed sources
    Sources,
    /// Show the collection tree
    Collections,
    /// List content shortcuts enabled on the server
    Shortcuts,
    /// Run an AI shortcut and stream the output
    Run(RunArgs),
    /// Manage prompts
    Prompts {
        #[command(subcommand)]
        command: PromptsCommand,
    },
    /// Read or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PagesCommand {
    /// List pages with cursor pagination
    List {
        /// Page size
        #[arg(long, default_value = "20", value_name = "NUM")]
        count: u32,
        /// Sort mode (record-at, vote-score, created-at)
        #[arg(long, default_value = "record-at", value_name = "SORT")]
        sort: SortArg,
    },
    /// Show one page's content
    Show {
        id: i64,
        /// Output format (markdown, html, text)
        #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,
        /// Re-fetch the full content from the source first
        #[arg(long)]
        full: bool,
    },
    /// Star a page
    Star { id: i64 },
    /// Remove the star from a page
    Unstar { id: i64 },
    /// Add a page to read-later
    ReadLater { id: i64 },
    /// Remove a page from read-later
    UnReadLater { id: i64 },
    /// Archive a page
    Archive { id: i64 },
    /// Save a page to the library
    Save { id: i64 },
    /// Remove a page from the library
    Remove { id: i64 },
    /// Permanently delete a page
    Delete { id: i64 },
    /// Mark a batch of pages read
    MarkRead { ids: Vec<i64> },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Shortcut to run: a prompt id or name (or a server shortcut with
    /// --page-id)
    shortcut: String,

    /// URL to fetch, local HTML file, or "-" for stdin (not needed with
    /// --page-id)
    input: Option<String>,

    /// Model id override, e.g. "acme:fast-1" (default: last selection)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Output language override (default: from settings)
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Run a server shortcut against a saved page
    #[arg(long, value_name = "ID")]
    page_id: Option<i64>,

    /// Parser override (readability, density)
    #[arg(long, value_name = "PARSER", value_parser = ["readability", "density"])]
    parser: Option<String>,
}

#[derive(Subcommand, Debug)]
enum PromptsCommand {
    /// List built-in and user prompts
    List,
    /// Enable a prompt
    Enable { id: String },
    /// Disable a prompt
    Disable { id: String },
    /// Add a user prompt
    Add {
        name: String,
        /// Instruction text; may contain a {lang} placeholder
        content: String,
        /// Target language (default: from settings)
        #[arg(long, value_name = "LANG")]
        language: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print one setting (server-url, parser, language, shortcuts-enabled,
    /// default-provider, model)
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Print the settings file path
    Path,
}

fn open_store(cli: &Cli) -> anyhow::Result<SettingsStore> {
    Ok(match &cli.settings {
        Some(path) => SettingsStore::open(path.clone())?,
        None => SettingsStore::open_default()?,
    })
}

/// Server URL for this invocation: the --server flag wins over settings.
fn server_url(cli: &Cli, store: &SettingsStore) -> Option<String> {
    cli.server.clone().or_else(|| store.server_url())
}

fn api_client(cli: &Cli, store: &SettingsStore) -> anyhow::Result<ApiClient> {
    let server = server_url(cli, store).ok_or(postea_core::PosteaError::ServerNotConfigured)?;
    Ok(ApiClient::with_timeout(&server, cli.timeout)?)
}

fn print_operate_result(result: &OperateResult) {
    let archived = result.library_save_status == LibrarySaveStatus::Archived;
    println!(
        "{} {} {}",
        result.id.to_string().dimmed(),
        echo::status_markers(result.starred, result.read_later, archived),
        format!("{:?}", result.library_save_status).dimmed()
    );
}

async fn run_pages(cli: &Cli, command: &PagesCommand) -> anyhow::Result<()> {
    let store = open_store(cli)?;
    let client = api_client(cli, &store)?;

    match command {
        PagesCommand::List { count, sort } => {
            let query = PageListQuery::first_page(*count, sort.0);
            let pages = client.list_pages(&query).await?;
            if pages.is_empty() {
                echo::print_info("No pages.");
                return Ok(());
            }
            for page in &pages {
                let archived = page.library_save_status == LibrarySaveStatus::Archived;
                println!(
                    "{:>8} {} {} {}",
                    page.id.to_string().dimmed(),
                    echo::status_markers(page.starred, page.read_later, archived),
                    page.title.bright_white(),
                    page.domain.as_deref().unwrap_or("").dimmed()
                );
            }
        }
        PagesCommand::Show { id, format, full } => {
            let detail = client.page_detail(*id).await?;
            let content = if *full {
                client.fetch_full_content(*id).await?.content.unwrap_or_default()
            } else {
                detail.page.content.clone().unwrap_or_default()
            };
            let output = match format {
                OutputFormat::Html => content,
                OutputFormat::Markdown => normalize_for_dispatch(&content)?,
                OutputFormat::Text => postea_core::reader::html_to_text(&content),
            };
            println!("{}", detail.page.title.bold());
            println!("{}", detail.page.url.dimmed());
            println!();
            println!("{}", output);
        }
        PagesCommand::Star { id } => print_operate_result(&client.star_page(*id).await?),
        PagesCommand::Unstar { id } => print_operate_result(&client.unstar_page(*id).await?),
        PagesCommand::ReadLater { id } => print_operate_result(&client.read_later_page(*id).await?),
        PagesCommand::UnReadLater { id } => print_operate_result(&client.un_read_later_page(*id).await?),
        PagesCommand::Archive { id } => print_operate_result(&client.archive_page(*id).await?),
        PagesCommand::Save { id } => print_operate_result(&client.save_page_to_library(*id).await?),
        PagesCommand::Remove { id } => print_operate_result(&client.remove_page_from_library(*id).await?),
        PagesCommand::Delete { id } => {
            client.delete_page(*id).await?;
            echo::print_success(&format!("Deleted page {id}"));
        }
        PagesCommand::MarkRead { ids } => {
            let updated = client.mark_read_batch(ids).await?;
            echo::print_success(&format!("Marked {updated} pages read"));
        }
    }
    Ok(())
}

/// Finds the shortcut to run among enabled prompts, by id or name.
fn find_prompt(prompts: &[Prompt], wanted: &str) -> Option<Prompt> {
    prompts
        .iter()
        .filter(|p| p.enabled)
        .find(|p| p.id == wanted || p.name.eq_ignore_ascii_case(wanted))
        .cloned()
}

/// Reads and normalizes the content input for a local dispatch.
async fn load_content(input: &str, parser: ParserKind, timeout: u64) -> anyhow::Result<String> {
    let (html, url) = if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
        (buffer, None)
    } else if input.starts_with("http://") || input.starts_with("https://") {
        let config = FetchConfig { timeout, ..Default::default() };
        let html = fetch_url(input, &config).await.context("Failed to fetch URL")?;
        (html, Some(input.to_string()))
    } else {
        let html = fs::read_to_string(input).with_context(|| format!("Failed to read file: {input}"))?;
        (html, None)
    };

    let article = parse_document(&html, parser, url.as_deref()).context("Failed to extract article content")?;
    Ok(normalize_for_dispatch(&article.content)?)
}

fn resolve_model(store: &SettingsStore, override_id: Option<&str>) -> anyhow::Result<ModelRef> {
    let models = store.available_models();
    if let Some(wanted) = override_id {
        let model = models
            .iter()
            .find(|m| m.id == wanted)
            .cloned()
            .ok_or_else(|| postea_core::PosteaError::NoModel(format!("model {wanted} is not available")))?;
        // Selection persists across sessions, like picking it in a menu.
        store.set_selected_model_id(&model.id)?;
        return Ok(model);
    }
    Ok(store
        .selected_model()
        .ok_or_else(|| postea_core::PosteaError::NoModel("configure a provider or a server URL first".to_string()))?)
}

async fn run_shortcut(cli: &Cli, args: &RunArgs) -> anyhow::Result<()> {
    let store = open_store(cli)?;
    let model = resolve_model(&store, args.model.as_deref())?;
    let language = args.language.clone().unwrap_or_else(|| store.default_target_language());

    let request = if model.provider == postea_core::SERVER_PROVIDER {
        let Some(page_id) = args.page_id else {
            bail!("the server model runs shortcuts against saved pages; pass --page-id");
        };
        let client = api_client(cli, &store)?;
        let shortcuts = client.enabled_shortcuts().await?;
        let shortcut = shortcuts
            .iter()
            .find(|s| s.id.to_string() == args.shortcut || s.name.eq_ignore_ascii_case(&args.shortcut))
            .with_context(|| format!("no enabled server shortcut named {:?}", args.shortcut))?;
        ShortcutRequest::new(&shortcut.name, &shortcut.content, "", model.clone())
            .for_server_page(page_id, shortcut.id)
    } else {
        let prompts = store.prompts_settings().prompts;
        let mut prompt =
            find_prompt(&prompts, &args.shortcut).with_context(|| format!("no enabled prompt named {:?}", args.shortcut))?;
        prompt.target_language = language;

        let input = args.input.as_deref().context("an INPUT (URL, file, or '-') is required for this model")?;
        let parser = match args.parser.as_deref() {
            Some(name) => ParserKind::from_name(name),
            None => store.parser(),
        };
        let content = load_content(input, parser, cli.timeout).await?;
        ShortcutRequest::new(&prompt.name, &prompt.render(), &content, model.clone())
    };

    if cli.verbose {
        echo::print_info(&format!("Model: {} ({})", model.name, model.provider_name));
        echo::print_info(&format!("Shortcut: {}", request.shortcut_name));
    }

    let source = HttpStreamSource::new(server_url(cli, &store), store.providers())?;
    let (relay, mut events) = ShortcutRelay::new(Arc::new(source));
    let task_id = relay.dispatch(request)?;

    let mut view = TaskView::new(task_id);
    let mut printed = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                relay.cancel(task_id);
                view.cancel();
                eprintln!();
                echo::print_info("Cancelled.");
                return Ok(());
            }
            message = events.recv() => {
                let Some(message) = message else { break };
                if !view.apply(&message) {
                    continue;
                }
                match &message.event {
                    TaskEvent::ProcessingStart => {
                        if cli.verbose {
                            echo::print_info("Processing started");
                        }
                    }
                    TaskEvent::ProcessData { .. } => {
                        // The buffer is cumulative; print only what is new.
                        let text = view.text();
                        if text.len() > printed {
                            print!("{}", &text[printed..]);
                            io::stdout().flush().ok();
                            printed = text.len();
                        }
                    }
                    TaskEvent::ProcessResult => {
                        println!();
                        if cli.verbose {
                            echo::print_success("Done");
                        }
                        return Ok(());
                    }
                    TaskEvent::ProcessError { message } => {
                        eprintln!();
                        echo::print_error(message);
                        bail!("shortcut failed");
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_prompts(cli: &Cli, command: &PromptsCommand) -> anyhow::Result<()> {
    let store = open_store(cli)?;

    match command {
        PromptsCommand::List => {
            let settings = store.prompts_settings();
            println!(
                "{} {}",
                "Target language:".dimmed(),
                settings.default_target_language.bright_white()
            );
            for prompt in &settings.prompts {
                let state = if prompt.enabled { "on ".green().to_string() } else { "off".red().to_string() };
                let kind = if prompt.is_system { "builtin" } else { "user" };
                println!("{state} {:<10} {:<24} {}", kind.dimmed(), prompt.id, prompt.name);
            }
        }
        PromptsCommand::Enable { id } | PromptsCommand::Disable { id } => {
            let enable = matches!(command, PromptsCommand::Enable { .. });
            let mut settings = store.prompts_settings();
            let prompt = settings
                .prompts
                .iter_mut()
                .find(|p| &p.id == id)
                .with_context(|| format!("no prompt with id {id:?}"))?;
            prompt.enabled = enable;
            store.save_prompts_settings(&settings)?;
            echo::print_success(&format!("{} {id}", if enable { "Enabled" } else { "Disabled" }));
        }
        PromptsCommand::Add { name, content, language } => {
            let language = language.clone().unwrap_or_else(|| store.default_target_language());
            let prompt = store.add_user_prompt(name, content, &language)?;
            echo::print_success(&format!("Added prompt {}", prompt.id));
        }
    }
    Ok(())
}

fn run_settings(cli: &Cli, command: &SettingsCommand) -> anyhow::Result<()> {
    let store = open_store(cli)?;

    match command {
        SettingsCommand::Path => println!("{}", store.path().display()),
        SettingsCommand::Get { key } => match key.as_str() {
            "server-url" => println!("{}", store.server_url().unwrap_or_default()),
            "parser" => println!("{}", store.parser().as_str()),
            "language" => println!("{}", store.default_target_language()),
            "shortcuts-enabled" => println!("{}", store.shortcuts_enabled()),
            "default-provider" => println!("{}", store.default_provider().unwrap_or_default()),
            "model" => println!("{}", store.selected_model().map(|m| m.id).unwrap_or_default()),
            _ => bail!(
                "unknown setting {key:?} (server-url, parser, language, shortcuts-enabled, default-provider, model)"
            ),
        },
        SettingsCommand::Set { key, value } => {
            match key.as_str() {
                "server-url" => store.set_server_url(value)?,
                "parser" => store.set_parser(ParserKind::from_name(value))?,
                "language" => store.set_default_target_language(value)?,
                "shortcuts-enabled" => {
                    let enabled = value.parse::<bool>().context("expected true or false")?;
                    store.set_shortcuts_enabled(enabled)?;
                }
                "default-provider" => store.set_default_provider(Some(value))?,
                "model" => store.set_selected_model_id(value)?,
                _ => bail!(
                    "unknown setting {key:?} (server-url, parser, language, shortcuts-enabled, default-provider, model)"
                ),
            }
            echo::print_success(&format!("Set {key}"));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "postea=debug,postea_client=debug,postea_core=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    if cli.verbose {
        echo::print_banner();
    }

    match &cli.command {
        Command::Pages { command } => run_pages(&cli, command).await,
        Command::Sources => {
            let store = open_store(&cli)?;
            let client = api_client(&cli, &store)?;
            for source in client.sources().await? {
                println!("{:>6} {:<32} {}", source.id.to_string().dimmed(), source.site_name, source.total.dimmed());
            }
            Ok(())
        }
        Command::Collections => {
            let store = open_store(&cli)?;
            let client = api_client(&cli, &store)?;
            for option in client.collection_tree().await?.flatten() {
                match option.id {
                    None => println!("{}", option.name.bold()),
                    Some(id) => {
                        println!("{}{} {}", "  ".repeat(option.depth), id.to_string().dimmed(), option.name)
                    }
                }
            }
            Ok(())
        }
        Command::Shortcuts => {
            let store = open_store(&cli)?;
            let client = api_client(&cli, &store)?;
            for shortcut in client.enabled_shortcuts().await? {
                println!("{:>6} {}", shortcut.id.to_string().dimmed(), shortcut.name);
            }
            Ok(())
        }
        Command::Run(args) => run_shortcut(&cli, args).await,
        Command::Prompts { command } => run_prompts(&cli, command),
        Command::Settings { command } => run_settings(&cli, command),
    }
}
