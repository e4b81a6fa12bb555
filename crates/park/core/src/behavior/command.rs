use crate::state::{BehaviorState, EntitiesState, EntityError, EntityRef, PursuitMode};

/// A write to another agent, deferred until the emitting agent's update is
/// complete. Later commands overwrite earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetCommand {
    /// Take over `target`'s follower slot.
    ClaimFavourite { target: EntityRef, follower: EntityRef },
    /// `suspect` is now escorted by `officer` and on its way out.
    Arrest { suspect: EntityRef, officer: EntityRef },
    /// Let `suspect` go about its business.
    Release { suspect: EntityRef },
}

impl TargetCommand {
    /// Applies the command. Fails without writing anything when the
    /// receiving agent no longer exists.
    pub fn apply(self, entities: &mut EntitiesState) -> Result<(), EntityError> {
        match self {
            TargetCommand::ClaimFavourite { target, follower } => {
                entities.agent_by_ref_mut(target)?.favourite = Some(follower);
            }
            TargetCommand::Arrest { suspect, officer } => {
                let agent = entities.agent_by_ref_mut(suspect)?;
                agent.behavior = BehaviorState::EscortedBySecurity;
                agent.follow.target = Some(officer);
                agent.follow.mode = PursuitMode::Direct;
                agent.leaving_park = true;
                tracing::debug!(suspect = %suspect, officer = %officer, "arrested");
            }
            TargetCommand::Release { suspect } => {
                let agent = entities.agent_by_ref_mut(suspect)?;
                agent.reset_pathfind_goal();
                agent.return_to_default();
                tracing::debug!(suspect = %suspect, "released");
            }
        }
        Ok(())
    }
}
