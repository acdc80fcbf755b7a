mod api;
mod dashboard;
mod gateway;

use std::collections::HashMap;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use replybot_channels::BridgeChannel;
use replybot_core::{config, engine, message::IncomingMessage, store::ConfigStore, traits::Channel};
use tracing_subscriber::fmt::writer::MakeWriterExt as _;

#[derive(Parser)]
#[command(
    name = "replybot",
    version,
    about = "Keyword auto-reply router for instant-messaging bots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway and dashboard.
    Start,
    /// Show settings and reply-configuration status.
    Status,
    /// Route one message through the engine and print the decision.
    Try {
        /// Source conversation id.
        #[arg(long)]
        chat: String,
        /// Sender contact id (defaults to the chat id).
        #[arg(long)]
        sender: Option<String>,
        /// Sender display name.
        #[arg(long)]
        name: Option<String>,
        /// The message text.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    // Log to stdout and a daily file under {data_dir}/logs.
    let logs_dir = cfg.logs_dir();
    std::fs::create_dir_all(&logs_dir)?;
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "replybot.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.bot.log_level.clone())),
        )
        .with_writer(file_writer.and(std::io::stdout))
        .init();

    let store = ConfigStore::new(cfg.document_path());

    match cli.command {
        Commands::Start => {
            // Seed the document before anything reads it.
            store.load()?;

            let bridge = Arc::new(BridgeChannel::new(cfg.bridge.clone()));
            let injector = bridge.injector();

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
            if cfg.bridge.enabled {
                channels.insert("bridge".to_string(), bridge);
            }
            if channels.is_empty() {
                anyhow::bail!("no channels enabled. Enable the bridge in config.toml.");
            }

            println!("Replybot — starting gateway...");
            let gw = gateway::Gateway::new(channels, store, cfg.clone(), injector);
            Arc::new(gw).run().await?;
        }
        Commands::Status => {
            let doc = store.load()?;
            println!("Replybot — Status\n");
            println!("Settings: {}", cli.config);
            println!(
                "Document: {} (revision {})",
                store.path().display(),
                doc.revision
            );
            println!("  keywords: {}", doc.keywords.len());
            println!("  targets:  {}", doc.targets.len());
            if cfg.dashboard.enabled {
                println!(
                    "Dashboard: http://{}:{}",
                    cfg.dashboard.host, cfg.dashboard.port
                );
            } else {
                println!("Dashboard: disabled");
            }
            println!(
                "Bridge: {} → {}",
                if cfg.bridge.enabled {
                    "enabled"
                } else {
                    "disabled"
                },
                cfg.bridge.deliver_url
            );
        }
        Commands::Try {
            chat,
            sender,
            name,
            message,
        } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: replybot try --chat <id> <message>");
            }

            let doc = store.load()?;
            let msg = IncomingMessage {
                id: uuid::Uuid::new_v4(),
                channel: "cli".to_string(),
                sender_id: sender.unwrap_or_else(|| chat.clone()),
                chat_id: chat,
                sender_name: name,
                sender_number: None,
                text: message.join(" "),
                timestamp: chrono::Utc::now(),
                is_group: false,
            };

            match engine::route(&msg, &doc) {
                Some(action) => println!("{}", serde_json::to_string_pretty(&action)?),
                None => println!("no action"),
            }
        }
    }

    Ok(())
}
