//! Scripts: top-level block chains rooted at a hat block.

use std::sync::Arc;

use scratch_core::id::BroadcastId;

use crate::block::BlockHandle;

/// The activation kind named by a script's hat block.
///
/// All five kinds are represented; only the first three have a
/// triggering entry point on `Runtime` (`broadcast_green_flag`,
/// `event_broadcast`/`event_broadcastandwait`, `broadcast_key`) and
/// `control_create_clone_of` (for clone-start). `SpriteClicked`,
/// `BackdropSwitches`, and `GreaterThan` are recognized by the loader (so
/// hat-block scanning is total over every opcode the format defines) but
/// are never queued by the scheduler, since no host operation drives
/// mouse clicks, backdrop changes, or continuous predicate polling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HatKind {
    /// `event_whenflagclicked`.
    GreenFlag,
    /// `event_whenbroadcastreceived`.
    BroadcastReceived(BroadcastId),
    /// `event_whenkeypressed`, key name already normalized (see
    /// [`crate::keys::normalize`]).
    KeyPressed(Arc<str>),
    /// `event_whenthisspriteclicked`. Never triggered (no mouse driver).
    SpriteClicked,
    /// Implicit hat for a sprite spawned via `control_create_clone_of`.
    CloneStart,
    /// `event_whenbackdropswitchesto`. Never triggered (no backdrop driver).
    BackdropSwitches(Arc<str>),
    /// `event_whengreaterthan`. Never triggered (no continuous polling).
    GreaterThan,
}

/// A top-level block chain: a hat block plus everything hanging off it.
#[derive(Clone, Debug)]
pub struct Script {
    /// The hat block that starts this script.
    pub top_block: BlockHandle,
    /// What activates this script.
    pub hat: HatKind,
}
