use super::{AgentKind, AgentState, EntityId, EntityRef, WorldPoint};

/// Errors raised by entity bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityError {
    #[error("entity {0} not found")]
    NotFound(EntityId),

    #[error("entity {0} is not an agent")]
    NotAgent(EntityId),

    #[error("entity reference {0} is stale")]
    Stale(EntityRef),
}

impl crate::error::ParkError for EntityError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound(_) => "ENTITY_NOT_FOUND",
            EntityError::NotAgent(_) => "ENTITY_NOT_AGENT",
            EntityError::Stale(_) => "ENTITY_STALE",
        }
    }
}

/// Inert dropped litter. Never a valid follow target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LitterState {
    pub id: EntityId,
    pub position: WorldPoint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Entity {
    Agent(AgentState),
    Litter(LitterState),
}

impl Entity {
    pub fn position(&self) -> WorldPoint {
        match self {
            Entity::Agent(agent) => agent.position,
            Entity::Litter(litter) => litter.position,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentState> {
        match self {
            Entity::Agent(agent) => Some(agent),
            Entity::Litter(_) => None,
        }
    }

    pub fn as_agent_mut(&mut self) -> Option<&mut AgentState> {
        match self {
            Entity::Agent(agent) => Some(agent),
            Entity::Litter(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct EntitySlot {
    generation: u32,
    entity: Option<Entity>,
}

/// Generational slot store for every entity in the park.
///
/// Freed slots are reused with a bumped generation so that outstanding
/// [`EntityRef`]s to the old occupant stop resolving.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitiesState {
    slots: Vec<EntitySlot>,
}

impl EntitiesState {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> EntityRef {
        if let Some(index) = self.slots.iter().position(|slot| slot.entity.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            return EntityRef::new(EntityId(index as u32), slot.generation);
        }
        self.slots.push(EntitySlot::default());
        EntityRef::new(EntityId((self.slots.len() - 1) as u32), 0)
    }

    pub fn spawn_agent(&mut self, kind: AgentKind, position: WorldPoint) -> EntityRef {
        let handle = self.allocate();
        self.slots[handle.id.index()].entity =
            Some(Entity::Agent(AgentState::new(handle.id, kind, position)));
        handle
    }

    pub fn spawn_litter(&mut self, position: WorldPoint) -> EntityRef {
        let handle = self.allocate();
        self.slots[handle.id.index()].entity = Some(Entity::Litter(LitterState {
            id: handle.id,
            position,
        }));
        handle
    }

    /// Removes the entity in `id`'s slot, invalidating every reference to it.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.slots.get_mut(id.index())?.entity.take()
    }

    /// Current reference for the entity in `id`'s slot.
    pub fn handle(&self, id: EntityId) -> Option<EntityRef> {
        let slot = self.slots.get(id.index())?;
        slot.entity
            .as_ref()
            .map(|_| EntityRef::new(id, slot.generation))
    }

    pub fn get(&self, handle: EntityRef) -> Option<&Entity> {
        let slot = self.slots.get(handle.id.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn agent(&self, id: EntityId) -> Option<&AgentState> {
        self.slots.get(id.index())?.entity.as_ref()?.as_agent()
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut AgentState> {
        self.slots.get_mut(id.index())?.entity.as_mut()?.as_agent_mut()
    }

    /// Resolves `handle` to a live agent, checking generation and kind.
    pub fn agent_by_ref_mut(&mut self, handle: EntityRef) -> Result<&mut AgentState, EntityError> {
        let slot = self
            .slots
            .get_mut(handle.id.index())
            .ok_or(EntityError::NotFound(handle.id))?;
        if slot.generation != handle.generation {
            return Err(EntityError::Stale(handle));
        }
        slot.entity
            .as_mut()
            .ok_or(EntityError::NotFound(handle.id))?
            .as_agent_mut()
            .ok_or(EntityError::NotAgent(handle.id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityRef, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity
                .as_ref()
                .map(|entity| (EntityRef::new(EntityId(index as u32), slot.generation), entity))
        })
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentState> {
        self.iter().filter_map(|(_, entity)| entity.as_agent())
    }

    /// Ids of all live agents in ascending order, the fixed update order.
    pub fn agent_ids(&self) -> Vec<EntityId> {
        self.agents().map(|agent| agent.id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entity.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn despawned_slot_is_reused_with_new_generation() {
        let mut entities = EntitiesState::new();
        let first = entities.spawn_agent(AgentKind::Guest, WorldPoint::ORIGIN);
        assert!(entities.despawn(first.id).is_some());

        let second = entities.spawn_litter(WorldPoint::new(5, 5, 0));
        assert_eq!(second.id, first.id);
        assert_ne!(second.generation, first.generation);
        assert!(entities.get(first).is_none());
        assert_eq!(
            entities.agent_by_ref_mut(first).unwrap_err(),
            EntityError::Stale(first)
        );
        assert_eq!(
            entities.agent_by_ref_mut(second).unwrap_err(),
            EntityError::NotAgent(second.id)
        );
    }

    #[test]
    fn agent_ids_skip_litter_and_empty_slots() {
        let mut entities = EntitiesState::new();
        let a = entities.spawn_agent(AgentKind::Guest, WorldPoint::ORIGIN);
        entities.spawn_litter(WorldPoint::ORIGIN);
        let c = entities.spawn_agent(AgentKind::Guest, WorldPoint::ORIGIN);
        assert_eq!(entities.agent_ids(), vec![a.id, c.id]);
        assert_eq!(entities.len(), 3);
    }
}
