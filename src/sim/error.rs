use thiserror::Error;

use super::entity::{Capability, EntityId};

/// Failures surfaced by simulation operations.
///
/// None of these happen during normal play. They mark sequencing bugs in the
/// caller (commanding an entity before it joined a world, reusing an id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("entity {0} is not attached to a world")]
    NotAttached(EntityId),

    #[error("an entity with id {0} is already present")]
    IdConflict(EntityId),

    #[error("entity {id} lacks the {capability} capability")]
    MissingCapability { id: EntityId, capability: Capability },

    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),
}

pub type SimResult<T> = Result<T, SimError>;
