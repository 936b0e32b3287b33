use ladder::cache::RatingCache;
use ladder::config::Config;
use ladder::handler::Handler;
use ladder::persistent_state::FileStore;
use ladder::{log_internal, LadderService};
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load().await?;
    let store = FileStore::load(cfg.state_path()?).await?;
    log_internal!("Using state at `{}`", store.path().to_string_lossy());

    let cache = Arc::new(RatingCache::new());
    let service = LadderService::new(Arc::new(store), cache, cfg.rating_settings()).await?;
    let handler = Handler::new(cfg, service);

    // Arguments are a single command line, e.g. `ladder game ivan olga ivan`.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        if let Some(reply) = handler.handle_line(&args.join(" ")).await {
            println!("{}", reply);
        }
        return Ok(());
    }

    handler
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
