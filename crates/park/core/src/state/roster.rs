//! Per-tick snapshot of every entity, served through [`EntityOracle`].
use crate::env::{AgentView, EntityOracle, EntityView};
use crate::state::{Entity, EntitiesState, EntityId, EntityRef, WorldPoint};

#[derive(Clone, Debug, Default)]
pub struct Roster {
    slots: Vec<Option<(u32, EntityView)>>,
}

impl Roster {
    /// Captures the committed state of `entities`.
    pub fn capture(entities: &EntitiesState) -> Self {
        let mut slots = Vec::new();
        for (handle, entity) in entities.iter() {
            let index = handle.id.index();
            if slots.len() <= index {
                slots.resize(index + 1, None);
            }
            let view = match entity {
                Entity::Agent(agent) => EntityView::Agent(AgentView::of(handle, agent)),
                Entity::Litter(litter) => EntityView::Litter {
                    position: litter.position,
                },
            };
            slots[index] = Some((handle.generation, view));
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityOracle for Roster {
    fn resolve(&self, target: EntityRef) -> Option<EntityView> {
        match self.slots.get(target.id.index())? {
            Some((generation, view)) if *generation == target.generation => Some(*view),
            _ => None,
        }
    }

    fn handle(&self, id: EntityId) -> Option<EntityRef> {
        self.slots
            .get(id.index())?
            .as_ref()
            .map(|(generation, _)| EntityRef::new(id, *generation))
    }

    fn agents_within(&self, min: (i32, i32), max: (i32, i32)) -> Vec<(EntityId, WorldPoint)> {
        self.slots
            .iter()
            .flatten()
            .filter_map(|(_, view)| view.as_pursuable())
            .filter(|view| {
                let p = view.position;
                p.x >= min.0 && p.x <= max.0 && p.y >= min.1 && p.y <= max.1
            })
            .map(|view| (view.id(), view.position))
            .collect()
    }
}
