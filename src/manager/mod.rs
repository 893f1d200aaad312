mod state;

use std::collections::HashMap;

use log::info;
use tokio::sync::RwLock;

use crate::core::DashError;
use crate::poller::{PollController, PollSchedule, ResourceHandle};
use crate::resource::{Resource, ResourceRequest};

pub use state::Mounted;

/// The handles mounted by one dashboard section, at most one per key.
///
/// Leaving a section is `unmount_all`; nothing mounted here keeps polling
/// after that.
pub struct SectionManager {
    controller: PollController,
    handles: RwLock<HashMap<String, Box<dyn Mounted>>>,
}

impl SectionManager {
    pub fn new(controller: PollController) -> Self {
        Self {
            controller,
            handles: RwLock::new(HashMap::new()),
        }
    }

    pub fn controller(&self) -> &PollController {
        &self.controller
    }

    /// Starts `request` and mounts it under its key, stopping whatever was
    /// mounted there before. Returns a handle sharing the mounted state.
    pub async fn mount<P: Resource>(
        &self,
        request: ResourceRequest,
        schedule: Option<PollSchedule>,
    ) -> Result<ResourceHandle<P>, DashError> {
        let handle = self.controller.start::<P>(request, schedule)?;
        self.insert(Box::new(handle.clone())).await;
        Ok(handle)
    }

    /// Mounts an already started handle.
    pub async fn insert(&self, handle: Box<dyn Mounted>) {
        let key = handle.key().to_string();
        let mut handles = self.handles.write().await;
        if let Some(previous) = handles.insert(key.clone(), handle) {
            info!("Replacing mounted '{}'", key);
            previous.stop();
        }
    }

    /// Returns `false` if nothing was mounted under `key`.
    pub async fn unmount(&self, key: &str) -> bool {
        let mut handles = self.handles.write().await;
        match handles.remove(key) {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    pub async fn unmount_all(&self) {
        let mut handles = self.handles.write().await;
        for (_, handle) in handles.drain() {
            handle.stop();
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        let handles = self.handles.read().await;
        let mut keys: Vec<String> = handles.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn is_mounted(&self, key: &str) -> bool {
        let handles = self.handles.read().await;
        handles.get(key).is_some_and(|h| !h.is_stopped())
    }
}
