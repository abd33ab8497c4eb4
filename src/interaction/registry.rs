//! Entity registry.
//!
//! Maps render nodes to the logical bodies they belong to. A loaded planet is
//! usually a small tree (root group, one or more meshes, a cloud shell, a
//! label), and a pick ray hits whichever leaf happens to be in front; the
//! registry walks from that leaf up to the nearest registered root.

use std::fmt;

use glam::Vec3;
use slotmap::SparseSecondaryMap;

use crate::scene::{NodeHandle, Scene};

/// Identity of a logical body in the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Earth,
    Sun,
    /// A catalog exoplanet, identified by its catalog name.
    Exoplanet(String),
}

impl EntityId {
    #[must_use]
    pub fn exoplanet(name: impl Into<String>) -> Self {
        EntityId::Exoplanet(name.into())
    }

    /// Human readable name.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            EntityId::Earth => "Earth",
            EntityId::Sun => "Sun",
            EntityId::Exoplanet(name) => name,
        }
    }

    #[must_use]
    pub fn is_exoplanet(&self) -> bool {
        matches!(self, EntityId::Exoplanet(_))
    }

    /// Text shown in the info box when the body is clicked.
    #[must_use]
    pub fn info_text(&self) -> String {
        match self {
            EntityId::Earth => "Earth: Our home planet with a 23.5° axial tilt.".to_string(),
            EntityId::Sun => {
                "Sun: The star at the center of our solar system, providing light and heat.".to_string()
            }
            EntityId::Exoplanet(name) => match normalize(name).as_str() {
                "kepler186f" => {
                    "Kepler-186F: A mysterious distant world orbiting a faraway star.".to_string()
                }
                "lp79118d" => {
                    "lp_791-18d: Another exoplanet with intriguing possibilities.".to_string()
                }
                _ => format!("Exoplanet_{name}: A mysterious distant world orbiting a faraway star."),
            },
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered body.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Root render node owning every node of the body.
    pub root: NodeHandle,
    /// World-space position recorded at registration (or last refresh).
    pub position: Vec3,
}

/// Tracks which render roots belong to which body.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Registration order, which is also the order candidate roots are tested.
    entities: Vec<Entity>,
    by_root: SparseSecondaryMap<NodeHandle, EntityId>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity` as owning `root` and everything below it.
    ///
    /// Registering an entity again moves it to the new root. A root already
    /// owned by another entity is handed over to `entity`.
    pub fn register(&mut self, entity: EntityId, root: NodeHandle, position: Vec3) {
        if self.unregister(&entity).is_some() {
            log::debug!("Re-registering {entity}");
        }
        if let Some(previous) = self.by_root.get(root).cloned() {
            log::warn!("Root node of {previous} is taken over by {entity}");
            self.unregister(&previous);
        }

        log::info!("Registered {entity} at {position}");
        self.by_root.insert(root, entity.clone());
        self.entities.push(Entity {
            id: entity,
            root,
            position,
        });
    }

    /// Forgets `entity`, returning its last record.
    pub fn unregister(&mut self, entity: &EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| &e.id == entity)?;
        let removed = self.entities.remove(index);
        self.by_root.remove(removed.root);
        Some(removed)
    }

    /// Resolves a render node to the body owning it.
    ///
    /// Walks the parent chain from `node` until a registered root is found.
    /// Nodes of untracked objects, stale handles and nodes of bodies that are
    /// not loaded yet all resolve to `None`.
    #[must_use]
    pub fn resolve(&self, scene: &Scene, node: NodeHandle) -> Option<&EntityId> {
        let mut current = Some(node);
        while let Some(handle) = current {
            let node = scene.get_node(handle)?;
            if let Some(entity) = self.by_root.get(handle) {
                return Some(entity);
            }
            current = node.parent();
        }
        None
    }

    #[must_use]
    pub fn get(&self, entity: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == entity)
    }

    #[must_use]
    pub fn root(&self, entity: &EntityId) -> Option<NodeHandle> {
        self.get(entity).map(|e| e.root)
    }

    #[must_use]
    pub fn position(&self, entity: &EntityId) -> Option<Vec3> {
        self.get(entity).map(|e| e.position)
    }

    /// Re-reads every entity's position from its root's world matrix.
    /// Entities whose root disappeared keep their last known position.
    pub fn refresh_positions(&mut self, scene: &Scene) {
        for entity in &mut self.entities {
            if let Some(position) = scene.world_position(entity.root) {
                entity.position = position;
            }
        }
    }

    /// Root nodes of every registered entity, in registration order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeHandle> {
        self.entities.iter().map(|e| e.root).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
