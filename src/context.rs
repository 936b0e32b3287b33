use crate::{config::Config, service::LadderService};
use tokio::sync::RwLock;

/// Collection of data that is shared across commands
pub struct Context<'a> {
    pub cfg: &'a RwLock<Config>,
    pub service: &'a LadderService,
}

impl Context<'_> {
    pub async fn prefix(&self) -> String {
        self.cfg.read().await.general.command_prefix.clone()
    }
}
