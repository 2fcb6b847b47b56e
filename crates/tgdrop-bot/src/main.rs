use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use teloxide::prelude::*;

use tgdrop_core::config;
use tgdrop_core::fetch::HttpFetcher;
use tgdrop_core::intake::Intake;
use tgdrop_core::logging;
use tgdrop_core::queue::DownloadQueue;

mod handler;
mod telegram;

use handler::App;
use telegram::{TelegramLinkResolver, TelegramNotifier};

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // state dir is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = run().await {
        eprintln!("tgdrop error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_or_init().context("failed to load configuration")?;
    if cfg.bot_token.is_empty() {
        bail!("no bot token configured; set bot_token in config.toml or YOUR_BOT_TOKEN");
    }
    if cfg.allowed_usernames.is_empty() {
        tracing::warn!("allowed_usernames is empty; every message will be rejected");
    }

    let bot = Bot::new(cfg.bot_token.clone());
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let resolver = Arc::new(TelegramLinkResolver::new(bot.clone(), cfg.bot_token.clone()));

    let queue = DownloadQueue::new(
        Arc::new(HttpFetcher::new()),
        notifier.clone(),
        resolver,
        cfg.limits(),
        cfg.save_path.clone(),
        Duration::from_millis(cfg.delay_ms),
    );
    let app = Arc::new(App::new(Intake::new(&cfg), queue, notifier));

    tracing::info!(
        save_path = %cfg.save_path.display(),
        folders = ?cfg.folders,
        "tgdrop starting"
    );

    let message_handler = Update::filter_message().endpoint({
        let app = Arc::clone(&app);
        move |msg: Message| {
            let app = Arc::clone(&app);
            async move {
                app.handle_message(msg).await;
                respond(())
            }
        }
    });

    Dispatcher::builder(bot, message_handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
