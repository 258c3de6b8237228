//! The whole parsed project: the block arena, every target, and the
//! global broadcast table.

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::BroadcastId;
use scratch_core::LoadError;

use crate::block::BlockArena;
use crate::target::Target;

/// A fully loaded, validated SB3 project.
///
/// Immutable after construction except for `Target` variable/list
/// *contents*; clone creation/destruction is a runtime-owned concern
/// layered on top (see `scratch-engine::Runtime`), not part of this
/// static model.
#[derive(Clone, Debug)]
pub struct Project {
    /// All blocks across every target, addressed by [`crate::BlockHandle`].
    pub arena: Arc<BlockArena>,
    /// Every target. Exactly one has `is_stage == true`.
    pub targets: Vec<Target>,
    /// Index into `targets` of the (unique) Stage.
    pub stage_index: usize,
    /// Broadcast id → display name, merged across all targets (broadcast
    /// channels are global regardless of which target declared them).
    pub broadcasts: HashMap<BroadcastId, Arc<str>>,
}

impl Project {
    /// Validate invariants that span the whole project (currently: the
    /// Stage-count invariant; per-target/per-block validation happens
    /// during loading in `scratch-sb3`).
    pub fn validate(targets: &[Target]) -> Result<usize, LoadError> {
        let stage_positions: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_stage)
            .map(|(i, _)| i)
            .collect();
        if stage_positions.len() != 1 {
            return Err(LoadError::StageCount {
                count: stage_positions.len(),
            });
        }
        Ok(stage_positions[0])
    }

    /// The Stage target.
    pub fn stage(&self) -> &Target {
        &self.targets[self.stage_index]
    }

    /// Find a sprite (non-Stage target) by name.
    pub fn sprite_by_name(&self, name: &str) -> Option<&Target> {
        self.targets
            .iter()
            .find(|t| !t.is_stage && t.name.as_ref() == name)
    }

    /// Find any target (Stage or Sprite) by name.
    pub fn target_by_name(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name.as_ref() == name)
    }
}
