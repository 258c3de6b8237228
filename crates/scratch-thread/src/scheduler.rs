//! [`Scheduler`]: round-robin driver over every live [`Thread`].
//!
//! Owns thread creation/activation and the per-frame stepping pass; hat
//! *detection* (which scripts a green-flag/key-press/broadcast should
//! start) is `scratch-engine`'s job — this module only knows how to start,
//! suspend, and resume threads once told which `(target, top_block)` pair
//! to run.

use std::collections::HashSet;
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use scratch_core::id::BroadcastId;
use scratch_model::{BlockArena, BlockHandle, HatKind, Target};
use scratch_ops::{BlockContext, HostState, OpTable};

use crate::thread::{StepOutcome, Thread, ThreadAction, ThreadId, ThreadStatus};

/// Round-robin scheduler over every thread currently running in a
/// project.
///
/// Thread order is creation order (a plain `Vec`, appended to on
/// activation, pruned of finished threads at the end of each frame) —
/// matching the round-robin-by-creation-order contract.
#[derive(Default)]
pub struct Scheduler {
    threads: Vec<Thread>,
    next_id: u64,
    stack_overflow_warnings_logged: u32,
}

impl Scheduler {
    /// Construct a scheduler with no running threads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every thread currently tracked, in creation order.
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Number of threads currently tracked (includes ones that will be
    /// pruned at the end of this frame once they go `Done`).
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Start a thread at `top_block` on `target`.
    ///
    /// `restart_existing` is the green-flag/broadcast rule: if a thread
    /// already exists for this exact `(target, top_block)` pair, it is
    /// reset to start over rather than spawning a duplicate. Key-press
    /// and clone-start activation always queue a fresh thread
    /// (`restart_existing = false`) since Scratch lets the same hat fire
    /// again while a previous run is still in flight.
    pub fn activate(
        &mut self,
        target: usize,
        top_block: BlockHandle,
        restart_existing: bool,
    ) -> ThreadId {
        if restart_existing {
            if let Some(existing) = self
                .threads
                .iter_mut()
                .find(|t| t.target == target && t.top_block == top_block)
            {
                *existing = Thread::new(existing.id(), target, top_block);
                return existing.id();
            }
        }
        let id = ThreadId(self.next_id);
        self.next_id += 1;
        self.threads.push(Thread::new(id, target, top_block));
        id
    }

    /// `control_stop`'s `"all"` target: halt every thread.
    pub fn stop_all(&mut self) {
        for t in &mut self.threads {
            t.halt();
        }
    }

    /// `control_stop`'s `"this script"` target.
    pub fn stop_this_script(&mut self, id: ThreadId) {
        if let Some(t) = self.threads.iter_mut().find(|t| t.id() == id) {
            t.halt();
        }
    }

    /// `control_stop`'s `"other scripts in sprite"` target: halt every
    /// other thread on `target`.
    pub fn stop_other_scripts_in_sprite(&mut self, id: ThreadId, target: usize) {
        for t in self.threads.iter_mut().filter(|t| t.id() != id && t.target == target) {
            t.halt();
        }
    }

    /// Run one scheduler frame.
    ///
    /// Clears `dynamic_keys` (the active-keys index's per-frame half),
    /// advances wait timers by `dt`, re-checks `wait_until` conditions and
    /// `broadcast_and_wait` completion, then round-robins every
    /// [`ThreadStatus::Running`] thread in creation order until it
    /// suspends, yields at a loop-iteration boundary, or exhausts
    /// `work_budget` primitive steps. Threads left `Done` afterward are
    /// pruned.
    #[allow(clippy::too_many_arguments)]
    pub fn run_frame(
        &mut self,
        dt: f64,
        work_budget: usize,
        clone_cap: usize,
        max_stack_overflow_warnings: u32,
        ops: &OpTable,
        arena: &BlockArena,
        targets: &mut Vec<Target>,
        stage_index: usize,
        host: &HostState,
        rng: &mut ChaCha8Rng,
        dynamic_keys: &mut HashSet<Arc<str>>,
        unknown_opcodes: &mut HashSet<Arc<str>>,
    ) {
        dynamic_keys.clear();
        self.advance_timers(dt);
        self.resolve_wait_untils(
            ops,
            arena,
            targets.as_mut_slice(),
            stage_index,
            host,
            rng,
            dynamic_keys,
            unknown_opcodes,
        );
        self.resolve_broadcast_waits();

        let mut i = 0;
        while i < self.threads.len() {
            if *self.threads[i].status() == ThreadStatus::Running {
                self.run_thread(
                    i,
                    work_budget,
                    clone_cap,
                    max_stack_overflow_warnings,
                    ops,
                    arena,
                    targets,
                    stage_index,
                    host,
                    rng,
                    dynamic_keys,
                    unknown_opcodes,
                );
            }
            i += 1;
        }

        self.threads.retain(|t| !matches!(t.status(), ThreadStatus::Done));
    }

    #[allow(clippy::too_many_arguments)]
    fn run_thread(
        &mut self,
        idx: usize,
        work_budget: usize,
        clone_cap: usize,
        max_stack_overflow_warnings: u32,
        ops: &OpTable,
        arena: &BlockArena,
        targets: &mut Vec<Target>,
        stage_index: usize,
        host: &HostState,
        rng: &mut ChaCha8Rng,
        dynamic_keys: &mut HashSet<Arc<str>>,
        unknown_opcodes: &mut HashSet<Arc<str>>,
    ) {
        let mut steps = 0usize;
        loop {
            if *self.threads[idx].status() != ThreadStatus::Running || steps >= work_budget {
                break;
            }
            let target_idx = self.threads[idx].target;
            let proc_args = self.threads[idx].proc_args().cloned();
            let mut ctx = BlockContext::new(
                ops,
                arena,
                targets.as_mut_slice(),
                target_idx,
                stage_index,
                host,
                rng,
                proc_args.as_ref(),
                dynamic_keys,
                unknown_opcodes,
            );
            let result = self.threads[idx].step_once(&mut ctx);
            drop(ctx);
            steps += 1;

            match result {
                Ok((outcome, action)) => {
                    if let Some(action) = action {
                        let id = self.threads[idx].id();
                        self.apply_action(id, target_idx, action, arena, targets, clone_cap);
                    }
                    if outcome == StepOutcome::LoopYielded {
                        break;
                    }
                }
                Err(fault) => {
                    let is_overflow = matches!(fault, crate::error::ThreadFault::StackOverflow { .. });
                    if !is_overflow || self.stack_overflow_warnings_logged < max_stack_overflow_warnings {
                        log::warn!("thread fault, halting this script only: {fault}");
                        if is_overflow {
                            self.stack_overflow_warnings_logged += 1;
                        }
                    }
                    self.threads[idx].halt();
                    break;
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_action(
        &mut self,
        source: ThreadId,
        source_target: usize,
        action: ThreadAction,
        arena: &BlockArena,
        targets: &mut Vec<Target>,
        clone_cap: usize,
    ) {
        match action {
            ThreadAction::Broadcast(id) => {
                self.spawn_broadcast(arena, targets.as_slice(), id);
            }
            ThreadAction::BroadcastAndWait(id) => {
                let spawned = self.spawn_broadcast(arena, targets.as_slice(), id);
                if !spawned.is_empty() {
                    if let Some(t) = self.threads.iter_mut().find(|t| t.id() == source) {
                        t.set_status(ThreadStatus::WaitingOn(spawned));
                    }
                }
            }
            ThreadAction::StopOtherScriptsInSprite { target } => {
                self.stop_other_scripts_in_sprite(source, target);
            }
            ThreadAction::StopAll => {
                self.stop_all();
            }
            ThreadAction::CreateClone(name) => {
                self.create_clone(source_target, &name, arena, targets, clone_cap);
            }
            ThreadAction::DeleteThisClone => {
                if let Some(target) = targets.get_mut(source_target) {
                    if target.is_clone {
                        target.removed = true;
                    } else {
                        log::debug!(
                            "control_delete_this_clone on a non-clone target is a no-op"
                        );
                    }
                }
            }
        }
    }

    /// (Re)start every thread whose `event_whenbroadcastreceived` hat
    /// matches `id`, across every live (non-removed) target. Returns the
    /// ids of the threads started, for `broadcast_and_wait` to track.
    ///
    /// Activates at the hat's `next` block, not the hat itself — hat
    /// opcodes have no registered primitive (see `scratch-ops-lib::events`).
    fn spawn_broadcast(&mut self, arena: &BlockArena, targets: &[Target], id: BroadcastId) -> Vec<ThreadId> {
        let mut started = Vec::new();
        for (idx, target) in targets.iter().enumerate() {
            if target.removed {
                continue;
            }
            for script in target.scripts.iter() {
                if matches!(&script.hat, HatKind::BroadcastReceived(b) if *b == id) {
                    if let Some(start) = arena.get(script.top_block).next {
                        started.push(self.activate(idx, start, true));
                    }
                }
            }
        }
        started
    }

    fn create_clone(
        &mut self,
        source_target: usize,
        name: &str,
        arena: &BlockArena,
        targets: &mut Vec<Target>,
        clone_cap: usize,
    ) {
        let live_clones = targets.iter().filter(|t| t.is_clone && !t.removed).count();
        if live_clones >= clone_cap {
            log::debug!("clone cap ({clone_cap}) reached, create_clone_of ignored");
            return;
        }

        let src_idx = if name == "_myself_" {
            Some(source_target)
        } else {
            targets
                .iter()
                .position(|t| !t.removed && t.name.as_ref() == name)
        };
        let Some(src_idx) = src_idx else {
            log::debug!("create_clone_of '{name}' has no matching live target");
            return;
        };

        let clone = targets[src_idx].spawn_clone();
        let new_idx = targets.len();
        targets.push(clone);

        let clone_start = targets[new_idx]
            .scripts
            .iter()
            .find(|s| matches!(s.hat, HatKind::CloneStart))
            .and_then(|s| arena.get(s.top_block).next);
        if let Some(start) = clone_start {
            self.activate(new_idx, start, false);
        }
    }

    fn advance_timers(&mut self, dt: f64) {
        for t in &mut self.threads {
            let next = match t.status() {
                ThreadStatus::WaitingTimer(remaining) => {
                    let left = remaining - dt;
                    Some(if left <= 0.0 {
                        ThreadStatus::Running
                    } else {
                        ThreadStatus::WaitingTimer(left)
                    })
                }
                _ => None,
            };
            if let Some(status) = next {
                t.set_status(status);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_wait_untils(
        &mut self,
        ops: &OpTable,
        arena: &BlockArena,
        targets: &mut [Target],
        stage_index: usize,
        host: &HostState,
        rng: &mut ChaCha8Rng,
        dynamic_keys: &mut HashSet<Arc<str>>,
        unknown_opcodes: &mut HashSet<Arc<str>>,
    ) {
        for idx in 0..self.threads.len() {
            let condition = match self.threads[idx].status() {
                ThreadStatus::WaitingCondition(c) => *c,
                _ => continue,
            };
            let target_idx = self.threads[idx].target;
            let proc_args = self.threads[idx].proc_args().cloned();
            let mut ctx = BlockContext::new(
                ops,
                arena,
                targets,
                target_idx,
                stage_index,
                host,
                rng,
                proc_args.as_ref(),
                dynamic_keys,
                unknown_opcodes,
            );
            let outcome = ctx.eval(condition);
            drop(ctx);
            match outcome {
                Ok(v) if scratch_core::to_bool(&v) => {
                    self.threads[idx].set_status(ThreadStatus::Running);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("wait_until condition failed, halting this script: {e}");
                    self.threads[idx].halt();
                }
            }
        }
    }

    fn resolve_broadcast_waits(&mut self) {
        for idx in 0..self.threads.len() {
            let ids = match self.threads[idx].status() {
                ThreadStatus::WaitingOn(ids) => ids.clone(),
                _ => continue,
            };
            let all_done = ids.iter().all(|id| {
                self.threads
                    .iter()
                    .find(|t| t.id() == *id)
                    .map(|t| matches!(t.status(), ThreadStatus::Done))
                    .unwrap_or(true)
            });
            if all_done {
                self.threads[idx].set_status(ThreadStatus::Running);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use scratch_core::id::{BlockId, VariableId};
    use scratch_core::Value;
    use scratch_model::{BlockArenaBuilder, FieldLiteral, RawBlock, RawInput};

    use super::*;

    /// Build a one-target project whose script is a `repeat 3` (or
    /// `forever`, if `count` is `None`) loop incrementing a single
    /// variable by one per pass.
    fn build_counter_loop(count: Option<f64>) -> (OpTable, BlockArena, Vec<Target>, VariableId, BlockHandle) {
        let var_id = VariableId::from("counter");
        let inc_id = BlockId::from("inc");
        let loop_id = BlockId::from("loop");

        let mut builder = BlockArenaBuilder::new();
        builder.insert(RawBlock {
            source_id: inc_id.clone(),
            opcode: Arc::from("data_changevariableby"),
            inputs: HashMap::from([(Arc::from("VALUE"), RawInput::Literal(Value::Number(1.0)))]),
            fields: HashMap::from([(Arc::from("VARIABLE"), FieldLiteral::Variable(var_id.clone()))]),
            next: None,
            parent: Some(loop_id.clone()),
            top_level: false,
            shadow: false,
            mutation: None,
        });
        let mut loop_inputs = HashMap::from([(Arc::from("SUBSTACK"), RawInput::Substack(inc_id.clone()))]);
        let opcode = match count {
            Some(n) => {
                loop_inputs.insert(Arc::from("TIMES"), RawInput::Literal(Value::Number(n)));
                "control_repeat"
            }
            None => "control_forever",
        };
        builder.insert(RawBlock {
            source_id: loop_id.clone(),
            opcode: Arc::from(opcode),
            inputs: loop_inputs,
            fields: HashMap::new(),
            next: None,
            parent: None,
            top_level: true,
            shadow: false,
            mutation: None,
        });
        let (arena, index) = builder.build().expect("hand-built arena is well-formed");
        let loop_handle = index[&loop_id];

        let mut ops = OpTable::new();
        scratch_ops_lib::register_all(&mut ops);

        let variables = HashMap::from([(
            var_id.clone(),
            scratch_model::Variable::new(var_id.clone(), "counter", Value::Number(0.0)),
        )]);
        let target = Target::new("Sprite1", false, variables, HashMap::new(), Arc::from([]), 1);

        (ops, arena, vec![target], var_id, loop_handle)
    }

    fn counter_value(targets: &[Target], var_id: &VariableId) -> f64 {
        scratch_core::to_number(&targets[0].variables[var_id].value)
    }

    #[test]
    fn loop_yields_once_per_frame() {
        let (ops, arena, mut targets, var_id, loop_handle) = build_counter_loop(Some(3.0));
        let mut scheduler = Scheduler::new();
        scheduler.activate(0, loop_handle, false);

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let host = HostState::default();
        let mut dynamic_keys = HashSet::new();
        let mut unknown_opcodes = HashSet::new();

        scheduler.run_frame(
            0.0, 10_000, 300, 10, &ops, &arena, &mut targets, 0, &host, &mut rng, &mut dynamic_keys,
            &mut unknown_opcodes,
        );

        assert_eq!(counter_value(&targets, &var_id), 1.0);
        assert_eq!(scheduler.thread_count(), 1);
    }

    #[test]
    fn repeat_loop_runs_to_completion_across_frames() {
        let (ops, arena, mut targets, var_id, loop_handle) = build_counter_loop(Some(3.0));
        let mut scheduler = Scheduler::new();
        scheduler.activate(0, loop_handle, false);

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let host = HostState::default();
        let mut dynamic_keys = HashSet::new();
        let mut unknown_opcodes = HashSet::new();

        for _ in 0..10 {
            if scheduler.thread_count() == 0 {
                break;
            }
            scheduler.run_frame(
                0.0, 10_000, 300, 10, &ops, &arena, &mut targets, 0, &host, &mut rng, &mut dynamic_keys,
                &mut unknown_opcodes,
            );
        }

        assert_eq!(counter_value(&targets, &var_id), 3.0);
        assert_eq!(scheduler.thread_count(), 0);
    }

    #[test]
    fn stop_all_halts_a_forever_loop() {
        let (ops, arena, mut targets, var_id, loop_handle) = build_counter_loop(None);
        let mut scheduler = Scheduler::new();
        scheduler.activate(0, loop_handle, false);

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        let host = HostState::default();
        let mut dynamic_keys = HashSet::new();
        let mut unknown_opcodes = HashSet::new();

        scheduler.run_frame(
            0.0, 10_000, 300, 10, &ops, &arena, &mut targets, 0, &host, &mut rng, &mut dynamic_keys,
            &mut unknown_opcodes,
        );
        assert_eq!(counter_value(&targets, &var_id), 1.0);

        scheduler.stop_all();
        scheduler.run_frame(
            0.0, 10_000, 300, 10, &ops, &arena, &mut targets, 0, &host, &mut rng, &mut dynamic_keys,
            &mut unknown_opcodes,
        );

        assert_eq!(scheduler.thread_count(), 0);
        // Halted mid-pass: no further increments after the stop.
        assert_eq!(counter_value(&targets, &var_id), 1.0);
    }

    #[test]
    fn activate_with_restart_reuses_the_existing_thread() {
        let (_ops, _arena, _targets, _var_id, loop_handle) = build_counter_loop(Some(3.0));
        let mut scheduler = Scheduler::new();
        let first = scheduler.activate(0, loop_handle, true);
        let second = scheduler.activate(0, loop_handle, true);
        assert_eq!(first, second);
        assert_eq!(scheduler.thread_count(), 1);

        let third = scheduler.activate(0, loop_handle, false);
        assert_ne!(first, third);
        assert_eq!(scheduler.thread_count(), 2);
    }
}
