use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use decor_advisor::domain::{mime_type_for_extension, API_KEY_VAR};
use decor_advisor::{
    default_catalog, find_products, AdvisorError, ChatRole, ChatTurn, ClientFactory,
    ConversationSession, GenerativeClient, ImagePayload, MockGenerativeClient, Product,
    ProviderConfig, RoomAnalyzer,
};

#[derive(Parser)]
#[command(name = "decor-advisor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a scripted offline client instead of the hosted provider
    #[arg(long, global = true)]
    mock: bool,

    /// Override the provider model (defaults to GEMINI_MODEL or gemini-2.5-flash)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the design assistant
    Chat {
        /// Send these messages in order and exit instead of reading stdin
        #[arg(short, long)]
        message: Vec<String>,
    },

    /// Recommend catalog items for a room photo
    Analyze {
        image: PathBuf,

        /// Print the raw recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the product catalog
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let local_factory;
    let factory: &ClientFactory = if cli.mock {
        info!("Using mock generative client");
        local_factory = ClientFactory::with_config(Some(ProviderConfig::new("offline")))
            .with_builder(|_| Ok(Arc::new(MockGenerativeClient::new()) as Arc<dyn GenerativeClient>));
        &local_factory
    } else if let Some(model) = cli.model.clone() {
        local_factory =
            ClientFactory::new(move || ProviderConfig::from_env().map(|c| c.with_model(model.as_str())));
        &local_factory
    } else {
        ClientFactory::global()
    };

    match cli.command {
        Commands::Chat { message } => run_chat(factory, message).await?,

        Commands::Analyze { image, json } => {
            let encoded = load_image(&image).await?;
            let catalog = default_catalog();
            let analyzer = RoomAnalyzer::new(factory.get_client());
            if !analyzer.is_available() {
                if let Err(e) = factory.try_client() {
                    warn!("{}", offline_notice(&e));
                }
            }

            let result = analyzer.analyze(&encoded, &catalog).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}\n", result.reasoning());

                let products = find_products(&catalog, result.recommended_ids());
                if products.is_empty() {
                    println!("No matching products.");
                } else {
                    println!("Recommended for this room:\n");
                    for (i, product) in products.iter().enumerate() {
                        println!(
                            "{}. {} [{}] {}",
                            i + 1,
                            product.name(),
                            product.category(),
                            product.display_price()
                        );
                        println!("   {}", product.description());
                    }
                }

                let unknown = unknown_ids(&catalog, result.recommended_ids());
                if !unknown.is_empty() {
                    info!(
                        "Ignored {} recommended ids not in the catalog: {}",
                        unknown.len(),
                        unknown.join(", ")
                    );
                }
            }
        }

        Commands::Catalog => {
            let catalog = default_catalog();
            println!("Catalog ({} items):\n", catalog.len());
            for product in &catalog {
                println!(
                    "  {:>3}  {:<24} {:<12} {:>12}  ({:.1})",
                    product.id(),
                    product.name(),
                    product.category().as_str(),
                    product.display_price(),
                    product.rating()
                );
            }
        }
    }

    Ok(())
}

async fn run_chat(factory: &ClientFactory, messages: Vec<String>) -> Result<()> {
    let client = match factory.try_client() {
        Ok(client) => client,
        Err(e) => {
            println!("{}", offline_notice(&e));
            return Ok(());
        }
    };
    let Some(mut session) = ConversationSession::create(Some(client)) else {
        println!("The design assistant could not start a conversation.");
        return Ok(());
    };

    let mut transcript = vec![ChatTurn::greeting()];
    println!("assistant> {}", transcript[0].text);

    if !messages.is_empty() {
        for text in messages {
            println!("you> {text}");
            let reply = session.send(&text).await;
            println!("assistant> {reply}");
            transcript.push(ChatTurn::user(text));
            transcript.push(ChatTurn::assistant(reply));
        }
        info!("Chat finished after {} turns", user_turns(&transcript));
        return Ok(());
    }

    println!("(type /reset to start over, /quit to leave)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();

        match text {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                session = match ConversationSession::create(factory.get_client()) {
                    Some(s) => s,
                    None => break,
                };
                transcript = vec![ChatTurn::greeting()];
                println!("assistant> {}", transcript[0].text);
                continue;
            }
            _ => {}
        }

        transcript.push(ChatTurn::user(text));
        let reply = session.send(text).await;
        println!("assistant> {reply}");
        transcript.push(ChatTurn::assistant(reply));
    }

    info!("Chat closed after {} turns", user_turns(&transcript));
    Ok(())
}

/// What to tell the user when no provider client could be made.
fn offline_notice(err: &AdvisorError) -> String {
    match err {
        AdvisorError::ConfigurationAbsent => {
            format!("The design assistant is offline. Set {API_KEY_VAR} to enable it.")
        }
        e if e.is_unavailable() => format!("The design assistant could not start: {e}"),
        e => format!("The design assistant is unavailable: {e}"),
    }
}

fn user_turns(transcript: &[ChatTurn]) -> usize {
    transcript
        .iter()
        .filter(|turn| turn.role == ChatRole::User)
        .count()
}

/// Distinct recommended ids with no catalog entry, in recommendation order.
fn unknown_ids<'a>(catalog: &[Product], ids: &'a [String]) -> Vec<&'a str> {
    let mut unknown: Vec<&str> = Vec::new();
    for id in ids {
        let known = catalog.iter().any(|p| p.id() == id);
        if !known && !unknown.contains(&id.as_str()) {
            unknown.push(id);
        }
    }
    unknown
}

/// Read an image file as a `data:` URL for the analyzer.
async fn load_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let payload = ImagePayload::from_bytes(&bytes, mime_type_for_extension(ext));

    Ok(format!("data:{};base64,{}", payload.mime_type(), payload.data()))
}
