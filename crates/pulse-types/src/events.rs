//! Observable side effects emitted to the host.
//!
//! The engine never resolves sounds, particles, or watcher notifications
//! itself -- it records them as opaque [`EngineEvent`] values the host
//! drains after each operation and renders however it likes.

use serde::{Deserialize, Serialize};

use crate::position::BlockPos;

/// An observable side effect of an engine operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EngineEvent {
    /// A cell's state was replaced; watchers should refresh.
    BlockChanged {
        /// The cell that changed.
        pos: BlockPos,
    },
    /// A player-facing source was actuated (audio cue).
    Click {
        /// The actuated cell.
        pos: BlockPos,
        /// Whether the source switched on.
        activated: bool,
    },
    /// The toggle-storm guard tripped and froze a block (fizz cue).
    Burnout {
        /// The frozen cell.
        pos: BlockPos,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_roundtrip_serde() {
        let original = EngineEvent::Burnout {
            pos: BlockPos::new(3, -1, 2),
        };
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<EngineEvent, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }
}
