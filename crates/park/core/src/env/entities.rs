use crate::follow::Direction;
use crate::state::{AgentKind, AgentState, BehaviorState, EntityId, EntityRef, WorldPoint};

/// Read-only view of other entities during a tick.
///
/// Implementations serve the positions committed at the start of the tick;
/// writes made by agents updated earlier in the same tick are not visible.
pub trait EntityOracle {
    /// Resolves a reference to the entity it names, or `None` when the slot is
    /// empty or was reused by another entity.
    fn resolve(&self, target: EntityRef) -> Option<EntityView>;

    /// Current reference for whatever occupies `id`'s slot.
    fn handle(&self, id: EntityId) -> Option<EntityRef>;

    /// Agents whose position lies inside the inclusive box `[min, max]`.
    fn agents_within(&self, min: (i32, i32), max: (i32, i32)) -> Vec<(EntityId, WorldPoint)>;
}

/// Snapshot of the fields of an agent that other agents may read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentView {
    pub handle: EntityRef,
    pub kind: AgentKind,
    pub behavior: BehaviorState,
    pub position: WorldPoint,
    pub facing: Direction,
    /// Where the agent itself is walking to.
    pub destination: (i32, i32),
    pub favourite: Option<EntityRef>,
    pub leaving_park: bool,
}

impl AgentView {
    pub fn of(handle: EntityRef, agent: &AgentState) -> Self {
        Self {
            handle,
            kind: agent.kind,
            behavior: agent.behavior,
            position: agent.position,
            facing: agent.facing,
            destination: (agent.destination.x, agent.destination.y),
            favourite: agent.favourite,
            leaving_park: agent.leaving_park,
        }
    }

    pub fn id(&self) -> EntityId {
        self.handle.id
    }

    /// True when `follower` currently holds this agent's follower slot.
    pub fn is_favourite(&self, follower: EntityRef) -> bool {
        self.favourite == Some(follower)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityView {
    Agent(AgentView),
    Litter { position: WorldPoint },
}

impl EntityView {
    /// Kind check applied before following: only agents can be pursued.
    pub fn as_pursuable(&self) -> Option<&AgentView> {
        match self {
            EntityView::Agent(view) => Some(view),
            EntityView::Litter { .. } => None,
        }
    }
}
