//! The derived view every read is served from.

use crate::model::{PlayerId, RatedPlayer};
use crate::normalize;
use crate::replay::ReplayedMatch;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One complete, internally consistent result of a rebuild.  Never modified after creation.
#[derive(Debug, Default)]
pub struct Snapshot {
    ranked: Vec<RatedPlayer>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<PlayerId, usize>,
    /// Chronological.
    history: Vec<ReplayedMatch>,
}

impl Snapshot {
    /// `ranked` must already be in rank order.
    pub fn new(ranked: Vec<RatedPlayer>, history: Vec<ReplayedMatch>) -> Self {
        let by_name = ranked
            .iter()
            .enumerate()
            .map(|(index, player)| (normalize::name(player.name()), index))
            .collect();
        let by_id = ranked
            .iter()
            .enumerate()
            .map(|(index, player)| (player.id(), index))
            .collect();

        Snapshot {
            ranked,
            by_name,
            by_id,
            history,
        }
    }

    pub fn ranked(&self) -> &[RatedPlayer] {
        &self.ranked
    }

    pub fn history(&self) -> &[ReplayedMatch] {
        &self.history
    }

    pub fn get_by_name(&self, name: &str) -> Option<&RatedPlayer> {
        self.by_name
            .get(&normalize::name(name))
            .map(|&index| &self.ranked[index])
    }

    pub fn get_by_id(&self, id: PlayerId) -> Option<&RatedPlayer> {
        self.by_id.get(&id).map(|&index| &self.ranked[index])
    }
}

/// Holds the current [`Snapshot`] behind a single pointer.
///
/// Readers take the read lock only long enough to clone the `Arc`, so a rebuild in progress never
/// blocks them; [`RatingCache::update`] only holds the write lock for the swap.
pub struct RatingCache {
    current: RwLock<Arc<Snapshot>>,
}

impl Default for RatingCache {
    fn default() -> Self {
        RatingCache::new()
    }
}

impl RatingCache {
    pub fn new() -> Self {
        RatingCache {
            current: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Replaces the whole snapshot.
    pub async fn update(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = snapshot;
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    pub async fn get_by_name(&self, name: &str) -> Option<RatedPlayer> {
        self.snapshot().await.get_by_name(name).cloned()
    }

    pub async fn ranked_list(&self) -> Vec<RatedPlayer> {
        self.snapshot().await.ranked().to_vec()
    }
}
