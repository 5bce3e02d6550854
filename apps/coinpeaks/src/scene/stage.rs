//! Registry of the visual root attached for the active scene.

use thiserror::Error;
use tracing::trace;

use super::TransitionOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRoot {
    pub id: RootId,
    pub scene: &'static str,
    pub options: TransitionOptions,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("cannot attach '{incoming}': '{current}' is still attached")]
    AlreadyAttached {
        current: &'static str,
        incoming: &'static str,
    },
}

/// Holds at most one attached root.
#[derive(Debug, Default)]
pub struct Stage {
    root: Option<StageRoot>,
    next_id: u64,
    attached_total: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(
        &mut self,
        scene: &'static str,
        options: TransitionOptions,
    ) -> Result<RootId, StageError> {
        if let Some(current) = &self.root {
            return Err(StageError::AlreadyAttached {
                current: current.scene,
                incoming: scene,
            });
        }
        self.next_id += 1;
        let id = RootId(self.next_id);
        self.root = Some(StageRoot { id, scene, options });
        self.attached_total += 1;
        trace!(scene, root = id.0, fade_ms = ?options.fade.map(|d| d.as_millis()), "root attached");
        Ok(id)
    }

    /// Remove the root if `id` is the attached one.
    pub fn detach(&mut self, id: RootId) -> Option<StageRoot> {
        if self.root.as_ref().is_some_and(|r| r.id == id) {
            let root = self.root.take();
            trace!(root = id.0, "root detached");
            root
        } else {
            None
        }
    }

    pub fn root(&self) -> Option<&StageRoot> {
        self.root.as_ref()
    }

    pub fn attached_total(&self) -> u64 {
        self.attached_total
    }
}
