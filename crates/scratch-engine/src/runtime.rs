//! The [`Runtime`] facade: hat activation plus the public per-frame
//! driving API.
//!
//! One owning struct wiring together every subsystem — the project model,
//! opcode table, scheduler, host snapshot, and RNG — with a small set of
//! methods that are the only way anything outside this crate touches the
//! interpreter.

use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use scratch_model::{HatKind, ListVar, Project, Variable};
use scratch_ops::{HostState, OpTable};
use scratch_thread::Scheduler;

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;

/// Owns a loaded project and every piece of mutable state needed to step
/// it forward in time: the opcode table, the thread scheduler, the host
/// input snapshot, and the deterministic RNG.
///
/// Not `Sync` (the RNG and scheduler are driven by `&mut self` only) but
/// is `Send` — one `Runtime` is driven from a single thread at a time,
/// but can be handed off between threads (e.g. moved onto a dedicated
/// simulation thread) freely.
pub struct Runtime {
    project: Project,
    ops: OpTable,
    scheduler: Scheduler,
    host: HostState,
    rng: ChaCha8Rng,
    config: RuntimeConfig,
    /// Key names (already normalized) with at least one
    /// `event_whenkeypressed` hat anywhere in the project, computed once
    /// at [`Self::initialize`] and never mutated afterward.
    static_keys: HashSet<Arc<str>>,
    /// Key names seen as a `sensing_keypressed` argument with a
    /// dynamically computed (non-shadow) reporter this frame; cleared by
    /// the scheduler at the start of every [`Self::update`].
    dynamic_keys: HashSet<Arc<str>>,
    /// Opcodes with no registered primitive, logged once each the first
    /// time they are encountered; see the UnknownOpcode policy on
    /// [`scratch_ops::BlockContext::eval`].
    unknown_opcodes: HashSet<Arc<str>>,
}

const _: () = {
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Runtime>();
    }
};

impl Runtime {
    /// Build a runtime over an already-parsed project.
    pub fn new(project: Project, config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        let mut ops = OpTable::new();
        scratch_ops_lib::register_all(&mut ops);
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);

        let mut runtime = Self {
            project,
            ops,
            scheduler: Scheduler::new(),
            host: HostState::default(),
            rng,
            config,
            static_keys: HashSet::new(),
            dynamic_keys: HashSet::new(),
            unknown_opcodes: HashSet::new(),
        };
        runtime.initialize();
        Ok(runtime)
    }

    /// Parse SB3 JSON text and build a runtime over it in one step.
    pub fn load(json: &str, config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let project = scratch_sb3::load_project(json)?;
        Self::new(project, config)
    }

    /// Scan every target's scripts for `event_whenkeypressed` hats and
    /// populate the static half of the active-keys index. Called once by
    /// [`Self::new`]; safe to call again (e.g. after directly mutating
    /// [`Self::project_mut`]) to pick up newly added scripts.
    pub fn initialize(&mut self) {
        self.static_keys.clear();
        for target in &self.project.targets {
            for script in target.scripts.iter() {
                if let HatKind::KeyPressed(key) = &script.hat {
                    self.static_keys.insert(key.clone());
                }
            }
        }
    }

    /// Activate every `event_whenflagclicked` script across every live
    /// target, restarting any that are already running.
    ///
    /// Activates at the hat's `next` block: hat opcodes have no
    /// registered primitive of their own (see
    /// `scratch-ops-lib::events`), so starting at the hat itself would
    /// either spuriously warn about an unknown opcode or, once
    /// dispatched, simply be skipped as a no-op before reaching the
    /// script's first real statement — starting one block later is
    /// equivalent but avoids both.
    pub fn broadcast_green_flag(&mut self) {
        let arena = Arc::clone(&self.project.arena);
        for (idx, target) in self.project.targets.iter().enumerate() {
            if target.removed {
                continue;
            }
            for script in target.scripts.iter() {
                if matches!(script.hat, HatKind::GreenFlag) {
                    if let Some(start) = arena.get(script.top_block).next {
                        self.scheduler.activate(idx, start, true);
                    }
                }
            }
        }
    }

    /// Activate every `event_whenkeypressed` script matching `key`
    /// (normalized the same way load-time hat scanning does), across
    /// every live target. A no-op if `key` matches no hat anywhere in
    /// the project, whether or not the key is actually held — this only
    /// fires the hats, it does not simulate a press arriving via
    /// [`Self::host_mut`].
    pub fn broadcast_key(&mut self, key: &str) {
        let normalized = scratch_model::keys::normalize(key);
        if !self.static_keys.contains(&normalized) && !self.dynamic_keys.contains(&normalized) {
            return;
        }
        let arena = Arc::clone(&self.project.arena);
        for (idx, target) in self.project.targets.iter().enumerate() {
            if target.removed {
                continue;
            }
            for script in target.scripts.iter() {
                if matches!(&script.hat, HatKind::KeyPressed(k) if k.as_ref() == normalized.as_ref())
                {
                    if let Some(start) = arena.get(script.top_block).next {
                        self.scheduler.activate(idx, start, false);
                    }
                }
            }
        }
    }

    /// Advance the project by one frame of `dt` seconds: advances the
    /// host timer, then runs one scheduler pass over every thread.
    pub fn update(&mut self, dt: f64) {
        self.host.advance_timer(dt);
        let arena = Arc::clone(&self.project.arena);
        self.scheduler.run_frame(
            dt,
            self.config.work_budget,
            self.config.clone_cap,
            self.config.max_stack_overflow_warnings,
            &self.ops,
            &arena,
            &mut self.project.targets,
            self.project.stage_index,
            &self.host,
            &mut self.rng,
            &mut self.dynamic_keys,
            &mut self.unknown_opcodes,
        );
    }

    /// Number of threads the scheduler is currently tracking (includes
    /// any that will be pruned once `Done` at the next [`Self::update`]).
    pub fn active_thread_count(&self) -> usize {
        self.scheduler.thread_count()
    }

    /// The loaded project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Mutable access to the loaded project, for hosts that need to
    /// inject state directly (e.g. loading saved variable values before
    /// the first green-flag press).
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// The host input snapshot (keyboard, mouse, timer).
    pub fn host(&self) -> &HostState {
        &self.host
    }

    /// Mutable access to the host input snapshot, for a host to report
    /// newly pressed/released keys, mouse movement, or clicks before the
    /// next [`Self::update`].
    pub fn host_mut(&mut self) -> &mut HostState {
        &mut self.host
    }

    /// The runtime's configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Look up a scalar variable by name on `target_index`, falling back
    /// to the Stage's globals if `target_index` doesn't define one of its
    /// own — the same local-then-global resolution
    /// [`scratch_ops::BlockContext`] applies during block execution, for
    /// hosts that want to read/seed variables directly (e.g. before the
    /// first green-flag press).
    pub fn variable_by_name(&self, target_index: usize, name: &str) -> Option<&Variable> {
        self.project.targets[target_index]
            .variable_by_name(name)
            .or_else(|| {
                if target_index == self.project.stage_index {
                    None
                } else {
                    self.project.stage().variable_by_name(name)
                }
            })
    }

    /// The static half of the active-keys index: key names gathered from
    /// every `event_whenkeypressed` hat at the last [`Self::initialize`]
    /// call.
    pub fn static_active_keys(&self) -> &HashSet<Arc<str>> {
        &self.static_keys
    }

    /// The dynamic half of the active-keys index as of the most recent
    /// frame: key names registered by a non-constant `sensing_keypressed`
    /// evaluation, cleared at the start of every [`Self::update`].
    pub fn dynamic_active_keys(&self) -> &HashSet<Arc<str>> {
        &self.dynamic_keys
    }

    /// Look up a list by name on `target_index`, with the same
    /// local-then-Stage fallback as [`Self::variable_by_name`].
    pub fn list_by_name(&self, target_index: usize, name: &str) -> Option<&ListVar> {
        self.project.targets[target_index]
            .list_by_name(name)
            .or_else(|| {
                if target_index == self.project.stage_index {
                    None
                } else {
                    self.project.stage().list_by_name(name)
                }
            })
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("targets", &self.project.targets.len())
            .field("active_threads", &self.scheduler.thread_count())
            .field("config", &self.config)
            .finish()
    }
}
