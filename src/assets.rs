//! Asset delivery.
//!
//! Model loading happens outside the core (another thread, a fetch callback, a
//! test). Loaders hold an [`AssetSender`] and post one [`AssetEvent`] per
//! body; the viewer drains the receiving end once per frame, so bodies become
//! clickable whenever their load completes, in whatever order that is.

use glam::Vec3;

use crate::errors::{OrreryError, Result};
use crate::interaction::registry::EntityId;
use crate::scene::Prefab;

/// Where and how large a loaded body is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Uniform scale applied to the body's root.
    pub scale: f32,
}

impl Placement {
    #[must_use]
    pub fn new(position: Vec3, scale: f32) -> Self {
        Self { position, scale }
    }
}

/// Result of one asset load.
#[derive(Debug, Clone)]
pub enum AssetEvent {
    Loaded {
        entity: EntityId,
        prefab: Prefab,
        placement: Placement,
    },
    Failed {
        entity: EntityId,
        reason: String,
    },
}

impl AssetEvent {
    #[must_use]
    pub fn entity(&self) -> &EntityId {
        match self {
            AssetEvent::Loaded { entity, .. } | AssetEvent::Failed { entity, .. } => entity,
        }
    }
}

/// Sending half handed to loaders. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AssetSender {
    tx: flume::Sender<AssetEvent>,
}

impl AssetSender {
    pub fn loaded(&self, entity: EntityId, prefab: Prefab, placement: Placement) -> Result<()> {
        self.tx.send(AssetEvent::Loaded {
            entity,
            prefab,
            placement,
        })?;
        Ok(())
    }

    pub fn failed(&self, entity: EntityId, reason: impl Into<String>) -> Result<()> {
        self.tx.send(AssetEvent::Failed {
            entity,
            reason: reason.into(),
        })?;
        Ok(())
    }

    /// Posts the outcome of a load, whichever way it went.
    pub fn send_result(
        &self,
        entity: EntityId,
        result: std::result::Result<(Prefab, Placement), OrreryError>,
    ) -> Result<()> {
        match result {
            Ok((prefab, placement)) => self.loaded(entity, prefab, placement),
            Err(e) => self.failed(entity, e.to_string()),
        }
    }
}

/// Receiving half owned by the viewer.
#[derive(Debug)]
pub struct AssetReceiver {
    rx: flume::Receiver<AssetEvent>,
}

impl AssetReceiver {
    /// Every event that has arrived so far, without blocking.
    pub fn drain(&self) -> Vec<AssetEvent> {
        self.rx.try_iter().collect()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn asset_channel() -> (AssetSender, AssetReceiver) {
    let (tx, rx) = flume::unbounded();
    (AssetSender { tx }, AssetReceiver { rx })
}
