//! In-memory actor directory.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use campus_core::result::AppResult;
use campus_core::{Actor, ActorKind};
use campus_entity::ActorProfile;

use crate::store::ActorDirectory;

/// In-memory [`ActorDirectory`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    profiles: Arc<Mutex<BTreeMap<Actor, ActorProfile>>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorDirectory for MemoryDirectory {
    async fn list(&self, kind: Option<ActorKind>) -> AppResult<Vec<ActorProfile>> {
        let profiles = self.profiles.lock().await;
        let mut list: Vec<ActorProfile> = profiles
            .values()
            .filter(|p| kind.is_none_or(|k| p.kind == k))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.display_name.cmp(&b.display_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(list)
    }

    async fn profiles(&self, actors: &[Actor]) -> AppResult<HashMap<Actor, ActorProfile>> {
        let profiles = self.profiles.lock().await;
        Ok(actors
            .iter()
            .filter_map(|a| profiles.get(a).map(|p| (*a, p.clone())))
            .collect())
    }

    async fn upsert(&self, profile: &ActorProfile) -> AppResult<()> {
        self.profiles
            .lock()
            .await
            .insert(profile.actor(), profile.clone());
        Ok(())
    }
}
