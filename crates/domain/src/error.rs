//! Error types raised by the zone/device organiser.
//!
//! Every variant is a plain sentinel: callers match on the variant, never on
//! the message. Validation always runs before any state is touched, so an
//! error means nothing was applied.

/// Errors returned by organiser operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrganiserError {
    /// A referenced zone or device does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Both operands resolve to the same zone.
    #[error("zone cannot be moved or ordered relative to itself")]
    SameZone,

    /// The move would make a zone its own descendant.
    #[error("zone cannot become a descendant of itself")]
    CircularReference,

    /// The zone still has sub-zones.
    #[error("zone still has sub-zones")]
    OrphanZone,

    /// The zone still has member devices.
    #[error("zone still has devices")]
    HasDevices,

    /// Reordering across different parents.
    #[error("zones must share a parent to be reordered")]
    MustHaveSameParent,
}

/// A zone or device could not be found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of the missing item (`"Zone"`, `"Device"`).
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

impl NotFoundError {
    #[must_use]
    pub fn zone(id: impl ToString) -> Self {
        Self {
            entity: "Zone",
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn device(id: impl ToString) -> Self {
        Self {
            entity: "Device",
            id: id.to_string(),
        }
    }
}
