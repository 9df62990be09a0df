//! The boundary between the maze core and the code that renders, spawns and navigates it.

use std::fmt;
use std::sync::Arc;
use std::vec;

use crate::session::Maze;

/// Opaque identifier of an entity owned by a collaborator (a player, the goal trigger...).
pub type EntityId = u64;

/// Called with the entity that entered the goal trigger and the goal entity itself.
pub type GoalReachedHandler = Arc<dyn Fn(EntityId, EntityId) + Send + Sync>;

/// Something that builds artifacts from a generated maze: render geometry, spawned entities,
/// navigation state.
pub trait MazeCollaborator: Send {
    /// Destroy everything built for the previous maze. Called before a new maze is generated.
    fn dispose_generated(&mut self);

    /// A new maze has been published.
    ///
    /// `goal_reached` is the handler the collaborator should attach to the goal trigger it places.
    fn maze_ready(&mut self, maze: &Arc<Maze>, goal_reached: Option<&GoalReachedHandler>);
}

/// Handles of every artifact created for the current maze, disposed of in bulk.
#[derive(Clone, PartialEq)]
pub struct ArtifactRegistry<H> {
    handles: Vec<H>,
}

impl<H: fmt::Debug> fmt::Debug for ArtifactRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ArtifactRegistry :: handles: {:?}", self.handles)
    }
}

impl<H> Default for ArtifactRegistry<H> {
    fn default() -> ArtifactRegistry<H> {
        ArtifactRegistry::new()
    }
}

impl<H> ArtifactRegistry<H> {
    pub fn new() -> ArtifactRegistry<H> {
        ArtifactRegistry { handles: Vec::new() }
    }

    pub fn track(&mut self, handle: H) {
        self.handles.push(handle);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> ::std::slice::Iter<H> {
        self.handles.iter()
    }

    /// Hand every tracked handle to `destroy`, oldest first, leaving the registry empty.
    /// Returns how many handles were disposed of.
    pub fn dispose_all<F: FnMut(H)>(&mut self, destroy: F) -> usize {
        let count = self.handles.len();
        self.handles.drain(..).for_each(destroy);
        count
    }
}

impl<H> IntoIterator for ArtifactRegistry<H> {
    type Item = H;
    type IntoIter = vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

/// A point on the ground plane of the world the maze is built in.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct WorldPosition {
    pub x: f32,
    pub z: f32,
}
