use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::blueprint::Blueprint;
use crate::bounding_box::{BoundingBox, BoundsAccumulator};
use crate::capture::capture;
use crate::error::LibraryError;
use crate::library::BlueprintLibrary;
use crate::markers::{MarkerBlocks, RegionMarkers};
use crate::nbt_value::NbtMap;
use crate::placement;
use crate::world::{MemoryWorld, WorldReader, WorldWriter};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Where an edited blueprint is placed inside its session world.
pub const EDITOR_ROOT: BlockPosition = BlockPosition::new(0, 128, 0);

/// An isolated world holding one blueprint being edited.
///
/// Every write goes through [`EditSession::set_block`], which also grows the tracked
/// bounds, so committing only has to scan the area that was ever touched.
#[derive(Debug)]
pub struct EditSession {
    blueprint_id: String,
    world: MemoryWorld,
    bounds: BoundsAccumulator,
}

impl EditSession {
    fn new(blueprint_id: &str, world: MemoryWorld, bounds: BoundsAccumulator) -> Self {
        Self {
            blueprint_id: blueprint_id.to_string(),
            world,
            bounds,
        }
    }

    /// Opens a session on an existing blueprint, placed at [`EDITOR_ROOT`].
    pub fn from_blueprint(blueprint_id: &str, blueprint: &Arc<Blueprint>) -> Self {
        let mut world = MemoryWorld::new();
        placement::place(blueprint, &mut world, EDITOR_ROOT, None);
        let bounds = BoundingBox::from_position_and_size(EDITOR_ROOT, blueprint.size)
            .map(BoundsAccumulator::seeded)
            .unwrap_or_default();
        Self::new(blueprint_id, world, bounds)
    }

    /// Opens a session for a blueprint that does not exist yet, seeded with one stone block.
    pub fn new_blueprint(blueprint_id: &str) -> Self {
        let mut session = Self::new(blueprint_id, MemoryWorld::new(), BoundsAccumulator::new());
        session.set_block(EDITOR_ROOT, BlockState::new("minecraft:stone"));
        session
    }

    pub fn blueprint_id(&self) -> &str {
        &self.blueprint_id
    }

    pub fn world(&self) -> &MemoryWorld {
        &self.world
    }

    /// World key used to derive identifiers for markers placed in this session.
    pub fn world_key(&self) -> String {
        format!("blueprint:editor/{}", self.blueprint_id)
    }

    pub fn markers(&self) -> MarkerBlocks {
        MarkerBlocks::new(self.world_key())
    }

    pub fn register_block_entity(&mut self, name: &str) {
        self.world.register_block_entity(name);
    }

    pub fn set_block(&mut self, pos: BlockPosition, state: BlockState) {
        let is_air = state.is_air();
        self.world.set_block(pos, state);
        if !is_air {
            self.bounds.include(pos);
        }
    }

    pub fn set_block_data(&mut self, pos: BlockPosition, data: NbtMap) {
        self.world.set_block_data(pos, data);
    }

    pub fn get_block(&self, pos: BlockPosition) -> BlockState {
        self.world.get_block(pos)
    }

    /// Every area ever written to. May be larger than the current content.
    pub fn tracked_bounds(&self) -> Option<BoundingBox> {
        self.bounds.bounds()
    }

    /// The tight box around the non-air cells inside the tracked bounds.
    pub fn blueprint_bounds(&self) -> Option<BoundingBox> {
        let tracked = self.bounds.bounds()?;
        let mut tight = BoundsAccumulator::new();
        tracked.for_each_position(|pos| {
            if !self.world.get_block(pos).is_air() {
                tight.include(pos);
            }
        });
        tight.bounds()
    }

    /// Captures the current content. An emptied session commits to the empty blueprint.
    pub fn commit(&self, markers: &dyn RegionMarkers) -> Blueprint {
        match self.blueprint_bounds() {
            Some(bounds) => capture(&self.world, markers, bounds.min, bounds.max),
            None => Blueprint::empty(),
        }
    }

    pub fn commit_to(
        &self,
        library: &mut BlueprintLibrary,
        markers: &dyn RegionMarkers,
    ) -> Result<PathBuf, LibraryError> {
        let blueprint = self.commit(markers);
        let path = library.save(&self.blueprint_id, blueprint)?;
        info!(id = %self.blueprint_id, path = %path.display(), "Committed edit session");
        Ok(path)
    }
}

/// The open edit sessions, one per blueprint id.
#[derive(Debug, Default)]
pub struct EditorSessions {
    sessions: HashMap<String, EditSession>,
}

impl EditorSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, opening it if needed. The flag is true when the
    /// library had no such blueprint and a new one was started.
    pub fn open(&mut self, id: &str, library: &BlueprintLibrary) -> (&mut EditSession, bool) {
        let mut created = false;
        let session = self.sessions.entry(id.to_string()).or_insert_with(|| {
            match library.get(id) {
                Some(blueprint) => EditSession::from_blueprint(id, &blueprint),
                None => {
                    created = true;
                    EditSession::new_blueprint(id)
                }
            }
        });
        debug!(id, created, "Opened edit session");
        (session, created)
    }

    pub fn get(&self, id: &str) -> Option<&EditSession> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut EditSession> {
        self.sessions.get_mut(id)
    }

    pub fn close(&mut self, id: &str) -> Option<EditSession> {
        self.sessions.remove(id)
    }

    /// Drops every session, returning how many there were.
    pub fn close_all(&mut self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
