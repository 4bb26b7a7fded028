// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The task pool: priority queue, agent dispatch, and task lifecycle.

use ergon_core::{
    ReuseAllocator, SerialId, StartTaskStatus, Task, TaskAgent, TaskInfo, TaskPoolError,
    TaskPoolResult, TaskStatus,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Counters describing a pool's population at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskPoolStats {
    /// Whether the pool is currently frozen.
    pub paused: bool,
    /// Agents registered over the pool's lifetime.
    pub total_agents: usize,
    /// Agents idle on the free stack.
    pub free_agents: usize,
    /// Agents currently bound to a task.
    pub working_agents: usize,
    /// Tasks queued and not yet bound.
    pub waiting_tasks: usize,
}

/// An agent paired with the task it is working on.
///
/// Keeping the pair together makes the core invariant structural: a task
/// value lives in the waiting queue, in exactly one of these pairs, or
/// has been moved out to the allocator, never in two places at once.
struct WorkingAgent<T: Task> {
    agent: Box<dyn TaskAgent<T>>,
    task: T,
}

impl<T: Task> WorkingAgent<T> {
    fn status(&self) -> TaskStatus {
        if self.task.done() {
            TaskStatus::Done
        } else {
            TaskStatus::Doing
        }
    }
}

/// A priority task pool multiplexing tasks onto a fixed set of agents.
///
/// The pool is single-threaded and cooperative: every state transition
/// happens synchronously inside [`update`](TaskPool::update), which the
/// host calls once per frame or tick. The pool never blocks and never
/// spawns threads of its own; agents that delegate to background I/O
/// surface completion by flipping the task's done flag, which the pool
/// reads on the next tick. A host that ticks the pool on one thread while
/// enqueueing from another must serialize access externally.
///
/// Agents are registered once and recycled across tasks for the pool's
/// whole life: at any point in time every agent is either idle on the
/// free stack or bound to exactly one task.
pub struct TaskPool<T: Task> {
    free_agents: Vec<Box<dyn TaskAgent<T>>>,
    working: Vec<WorkingAgent<T>>,
    waiting: Vec<T>,
    paused: bool,
    allocator: Arc<dyn ReuseAllocator<T>>,
}

impl<T: Task> TaskPool<T> {
    /// Creates an empty pool that retires its tasks through `allocator`.
    #[must_use]
    pub fn new(allocator: Arc<dyn ReuseAllocator<T>>) -> Self {
        Self {
            free_agents: Vec::new(),
            working: Vec::new(),
            waiting: Vec::new(),
            paused: false,
            allocator,
        }
    }

    /// Registers `agent`: initializes it and pushes it onto the free
    /// stack in time for the next tick's admissions.
    pub fn add_agent(&mut self, mut agent: Box<dyn TaskAgent<T>>) {
        agent.initialize();
        self.free_agents.push(agent);
        log::info!(
            "Task agent registered ({} total)",
            self.total_agent_count()
        );
    }

    /// Enqueues `task` at its priority position.
    ///
    /// The waiting queue stays sorted by descending priority, and tasks
    /// of equal priority keep arrival order: a new task joins the end of
    /// its priority band. Insertion is O(n) on purpose; queues here hold
    /// tens of tasks, not thousands.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPoolError::DuplicateSerialId`] if a task with the
    /// same serial id is already waiting or working in this pool.
    pub fn add_task(&mut self, task: T) -> TaskPoolResult<()> {
        let serial_id = task.serial_id();
        if self.contains_serial(serial_id) {
            return Err(TaskPoolError::DuplicateSerialId(serial_id));
        }

        // Walk from the tail past every strictly lower priority; insert
        // right after the first entry at or above ours, so equal
        // priorities keep arrival order.
        let priority = task.priority();
        let mut insert_at = 0;
        for index in (0..self.waiting.len()).rev() {
            if self.waiting[index].priority() >= priority {
                insert_at = index + 1;
                break;
            }
        }
        log::trace!("Task {serial_id} queued at position {insert_at} (priority {priority})");
        self.waiting.insert(insert_at, task);
        Ok(())
    }

    /// Runs one scheduler tick.
    ///
    /// Working agents advance first and finished tasks retire; then free
    /// agents are matched against the waiting queue in priority order, so
    /// an agent freed by the advance phase can pick up a new task within
    /// the same tick. While the pool is paused this is a no-op: nothing
    /// advances and nothing is admitted.
    pub fn update(&mut self, elapsed: Duration, real_elapsed: Duration) {
        if self.paused {
            return;
        }
        self.advance_working(elapsed, real_elapsed);
        self.admit_waiting();
    }

    /// Removes the task with `serial_id`, wherever it currently is.
    ///
    /// A waiting task is unlinked and released. A working task has its
    /// agent stopped and returned to the free stack immediately, then the
    /// task is released. Returns whether a task was found.
    pub fn remove_task(&mut self, serial_id: SerialId) -> bool {
        if let Some(index) = self
            .waiting
            .iter()
            .position(|task| task.serial_id() == serial_id)
        {
            let task = self.waiting.remove(index);
            log::debug!("Removed waiting task {serial_id}");
            self.allocator.release(task);
            return true;
        }

        if let Some(index) = self
            .working
            .iter()
            .position(|entry| entry.task.serial_id() == serial_id)
        {
            let WorkingAgent { mut agent, task } = self.working.remove(index);
            agent.stop_and_reset();
            self.free_agents.push(agent);
            log::debug!("Removed working task {serial_id}");
            self.allocator.release(task);
            return true;
        }

        false
    }

    /// Removes every task whose tag equals `tag`, waiting and working
    /// alike, and returns how many were removed.
    pub fn remove_tasks(&mut self, tag: &str) -> usize {
        let mut removed = 0;

        let mut index = 0;
        while index < self.waiting.len() {
            if self.waiting[index].tag() == Some(tag) {
                let task = self.waiting.remove(index);
                self.allocator.release(task);
                removed += 1;
            } else {
                index += 1;
            }
        }

        let mut index = 0;
        while index < self.working.len() {
            if self.working[index].task.tag() == Some(tag) {
                let WorkingAgent { mut agent, task } = self.working.remove(index);
                agent.stop_and_reset();
                self.free_agents.push(agent);
                self.allocator.release(task);
                removed += 1;
            } else {
                index += 1;
            }
        }

        if removed > 0 {
            log::debug!("Removed {removed} task(s) tagged '{tag}'");
        }
        removed
    }

    /// Removes every task in the pool and returns how many were removed.
    pub fn remove_all_tasks(&mut self) -> usize {
        let removed = self.waiting.len() + self.working.len();

        for task in self.waiting.drain(..) {
            self.allocator.release(task);
        }
        for entry in self.working.drain(..) {
            let WorkingAgent { mut agent, task } = entry;
            agent.stop_and_reset();
            self.free_agents.push(agent);
            self.allocator.release(task);
        }

        if removed > 0 {
            log::debug!("Removed all {removed} task(s)");
        }
        removed
    }

    /// Returns a snapshot of the task with `serial_id`, if the pool knows
    /// it.
    #[must_use]
    pub fn get_task_info(&self, serial_id: SerialId) -> Option<TaskInfo<T::UserData>> {
        for entry in &self.working {
            if entry.task.serial_id() == serial_id {
                return Some(TaskInfo::capture(&entry.task, entry.status()));
            }
        }
        for task in &self.waiting {
            if task.serial_id() == serial_id {
                return Some(TaskInfo::capture(task, TaskStatus::Todo));
            }
        }
        None
    }

    /// Returns snapshots of every task tagged `tag`, working tasks first
    /// (in assignment order), then waiting tasks (in queue order).
    #[must_use]
    pub fn get_task_infos(&self, tag: &str) -> Vec<TaskInfo<T::UserData>> {
        let mut infos = Vec::new();
        for entry in &self.working {
            if entry.task.tag() == Some(tag) {
                infos.push(TaskInfo::capture(&entry.task, entry.status()));
            }
        }
        for task in &self.waiting {
            if task.tag() == Some(tag) {
                infos.push(TaskInfo::capture(task, TaskStatus::Todo));
            }
        }
        infos
    }

    /// Returns snapshots of every task in the pool, working tasks first
    /// (in assignment order), then waiting tasks (in queue order).
    #[must_use]
    pub fn get_all_task_infos(&self) -> Vec<TaskInfo<T::UserData>> {
        let mut infos = Vec::with_capacity(self.working.len() + self.waiting.len());
        for entry in &self.working {
            infos.push(TaskInfo::capture(&entry.task, entry.status()));
        }
        for task in &self.waiting {
            infos.push(TaskInfo::capture(task, TaskStatus::Todo));
        }
        infos
    }

    /// Agents registered over the pool's lifetime.
    #[must_use]
    pub fn total_agent_count(&self) -> usize {
        self.free_agents.len() + self.working.len()
    }

    /// Agents idle on the free stack right now.
    #[must_use]
    pub fn free_agent_count(&self) -> usize {
        self.free_agents.len()
    }

    /// Agents currently bound to a task.
    #[must_use]
    pub fn working_agent_count(&self) -> usize {
        self.working.len()
    }

    /// Tasks queued and not yet bound to an agent.
    #[must_use]
    pub fn waiting_task_count(&self) -> usize {
        self.waiting.len()
    }

    /// Whether the pool is frozen.
    #[must_use]
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Freezes or unfreezes the pool.
    ///
    /// A paused pool ignores `update` entirely: working agents receive no
    /// ticks and waiting tasks are not admitted. The flag is a plain bool
    /// read at the top of each tick; it is not a cross-thread
    /// synchronization point.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns the pool's population counters.
    #[must_use]
    pub fn stats(&self) -> TaskPoolStats {
        TaskPoolStats {
            paused: self.paused,
            total_agents: self.total_agent_count(),
            free_agents: self.free_agents.len(),
            working_agents: self.working.len(),
            waiting_tasks: self.waiting.len(),
        }
    }

    /// Shuts the pool down: removes and releases every task, stops every
    /// working agent, then shuts all agents down. Consumes the pool, so
    /// no call can follow.
    pub fn shutdown(mut self) {
        self.remove_all_tasks();
        for agent in &mut self.free_agents {
            agent.shutdown();
        }
        log::info!("Task pool shut down ({} agents)", self.free_agents.len());
    }

    /// Advance phase: tick every working agent in assignment order and
    /// retire tasks whose done flag is set. A task finished by this very
    /// tick's `update` call retires immediately, so its agent is free
    /// again before admissions run.
    fn advance_working(&mut self, elapsed: Duration, real_elapsed: Duration) {
        let mut index = 0;
        while index < self.working.len() {
            let entry = &mut self.working[index];
            if !entry.task.done() {
                entry.agent.update(&mut entry.task, elapsed, real_elapsed);
            }
            if entry.task.done() {
                let WorkingAgent { mut agent, task } = self.working.remove(index);
                log::trace!("Task {} done; agent recycled", task.serial_id());
                agent.stop_and_reset();
                self.free_agents.push(agent);
                self.allocator.release(task);
            } else {
                index += 1;
            }
        }
    }

    /// Admission phase: walk the waiting queue head to tail while free
    /// agents remain, binding each task to one agent and acting on the
    /// agent's verdict.
    fn admit_waiting(&mut self) {
        // Each agent gets at most one start per tick. Agents that spend
        // theirs without keeping the task (synchronous finish, refusal,
        // failure) park here and rejoin the free stack after the walk.
        let mut spent: Vec<Box<dyn TaskAgent<T>>> = Vec::new();

        let mut cursor = 0;
        while cursor < self.waiting.len() {
            let Some(mut agent) = self.free_agents.pop() else {
                break;
            };
            let mut task = self.waiting.remove(cursor);
            let serial_id = task.serial_id();

            match agent.start(&mut task) {
                StartTaskStatus::Done => {
                    log::trace!("Task {serial_id} finished synchronously");
                    agent.stop_and_reset();
                    spent.push(agent);
                    self.allocator.release(task);
                }
                StartTaskStatus::CanResume => {
                    log::trace!("Task {serial_id} started");
                    self.working.push(WorkingAgent { agent, task });
                }
                StartTaskStatus::HasToWait => {
                    // The task keeps its queue position and is not
                    // retried until the next tick; the cursor moves on.
                    log::trace!("Task {serial_id} has to keep waiting");
                    agent.stop_and_reset();
                    spent.push(agent);
                    self.waiting.insert(cursor, task);
                    cursor += 1;
                }
                StartTaskStatus::UnknownError => {
                    log::warn!("Task {serial_id} failed to start; dropping it");
                    agent.stop_and_reset();
                    spent.push(agent);
                    self.allocator.release(task);
                }
            }
        }

        self.free_agents.append(&mut spent);
    }

    fn contains_serial(&self, serial_id: SerialId) -> bool {
        self.working
            .iter()
            .any(|entry| entry.task.serial_id() == serial_id)
            || self.waiting.iter().any(|task| task.serial_id() == serial_id)
    }
}

impl<T: Task> std::fmt::Debug for TaskPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("free_agents", &self.free_agents.len())
            .field("working", &self.working.len())
            .field("waiting", &self.waiting.len())
            .field("paused", &self.paused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ergon_core::{Reusable, ReusePool, TaskBase};

    #[derive(Default)]
    struct ProbeTask {
        base: TaskBase<u32>,
    }

    impl Reusable for ProbeTask {
        fn clear(&mut self) {
            self.base.clear_base();
        }
    }

    impl Task for ProbeTask {
        type UserData = u32;

        fn serial_id(&self) -> SerialId {
            self.base.serial_id()
        }

        fn tag(&self) -> Option<&str> {
            self.base.tag()
        }

        fn priority(&self) -> i32 {
            self.base.priority()
        }

        fn user_data(&self) -> Option<&u32> {
            self.base.user_data()
        }

        fn done(&self) -> bool {
            self.base.done()
        }

        fn set_done(&mut self, done: bool) {
            self.base.set_done(done);
        }
    }

    fn probe(serial: u64, priority: i32) -> ProbeTask {
        let mut task = ProbeTask::default();
        task.base
            .initialize(SerialId(serial), None, priority, None);
        task
    }

    /// Finishes every task synchronously.
    struct OneShotAgent;

    impl TaskAgent<ProbeTask> for OneShotAgent {
        fn initialize(&mut self) {}

        fn start(&mut self, _task: &mut ProbeTask) -> StartTaskStatus {
            StartTaskStatus::Done
        }

        fn update(&mut self, _task: &mut ProbeTask, _elapsed: Duration, _real_elapsed: Duration) {}

        fn stop_and_reset(&mut self) {}

        fn shutdown(&mut self) {}
    }

    /// Accepts every task and then holds it forever.
    struct HoldAgent;

    impl TaskAgent<ProbeTask> for HoldAgent {
        fn initialize(&mut self) {}

        fn start(&mut self, _task: &mut ProbeTask) -> StartTaskStatus {
            StartTaskStatus::CanResume
        }

        fn update(&mut self, _task: &mut ProbeTask, _elapsed: Duration, _real_elapsed: Duration) {}

        fn stop_and_reset(&mut self) {}

        fn shutdown(&mut self) {}
    }

    fn new_pool() -> TaskPool<ProbeTask> {
        TaskPool::new(Arc::new(ReusePool::<ProbeTask>::new()))
    }

    fn tick(pool: &mut TaskPool<ProbeTask>) {
        pool.update(Duration::from_millis(16), Duration::from_millis(16));
    }

    fn waiting_serials(pool: &TaskPool<ProbeTask>) -> Vec<u64> {
        pool.get_all_task_infos()
            .iter()
            .filter(|info| info.status == TaskStatus::Todo)
            .map(|info| info.serial_id.value())
            .collect()
    }

    #[test]
    fn test_add_task_orders_by_priority_with_fifo_bands() {
        let mut pool = new_pool();
        pool.add_task(probe(1, 0)).unwrap();
        pool.add_task(probe(2, 5)).unwrap();
        pool.add_task(probe(3, 5)).unwrap();
        pool.add_task(probe(4, -1)).unwrap();
        pool.add_task(probe(5, 3)).unwrap();

        assert_eq!(
            waiting_serials(&pool),
            vec![2, 3, 5, 1, 4],
            "queue must be descending by priority and FIFO within a band"
        );
    }

    #[test]
    fn test_add_task_rejects_duplicate_serial() {
        let mut pool = new_pool();
        pool.add_task(probe(7, 0)).unwrap();

        let err = pool.add_task(probe(7, 3)).unwrap_err();
        assert_eq!(err, TaskPoolError::DuplicateSerialId(SerialId(7)));
        assert_eq!(pool.waiting_task_count(), 1);
    }

    #[test]
    fn test_counts_follow_agents_and_tasks() {
        let mut pool = new_pool();
        pool.add_agent(Box::new(OneShotAgent));
        pool.add_agent(Box::new(OneShotAgent));
        pool.add_task(probe(1, 0)).unwrap();

        assert_eq!(pool.total_agent_count(), 2);
        assert_eq!(pool.free_agent_count(), 2);
        assert_eq!(pool.working_agent_count(), 0);
        assert_eq!(pool.waiting_task_count(), 1);

        tick(&mut pool);

        assert_eq!(pool.total_agent_count(), 2);
        assert_eq!(pool.free_agent_count(), 2);
        assert_eq!(pool.waiting_task_count(), 0);
    }

    #[test]
    fn test_remove_task_on_waiting_and_unknown_ids() {
        let allocator: Arc<ReusePool<ProbeTask>> = Arc::new(ReusePool::new());
        let mut pool = TaskPool::new(allocator.clone() as Arc<dyn ReuseAllocator<_>>);
        pool.add_task(probe(1, 0)).unwrap();

        assert!(pool.remove_task(SerialId(1)));
        assert!(!pool.remove_task(SerialId(1)), "removal is not idempotent");
        assert!(!pool.remove_task(SerialId(99)));
        assert_eq!(allocator.stats().released, 1);
    }

    #[test]
    fn test_get_all_task_infos_lists_working_before_waiting() {
        let mut pool = new_pool();
        pool.add_agent(Box::new(HoldAgent));
        pool.add_task(probe(1, 5)).unwrap();
        pool.add_task(probe(2, 0)).unwrap();
        tick(&mut pool);

        let infos = pool.get_all_task_infos();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].serial_id, SerialId(1));
        assert_eq!(infos[0].status, TaskStatus::Doing);
        assert_eq!(infos[1].serial_id, SerialId(2));
        assert_eq!(infos[1].status, TaskStatus::Todo);
    }

    #[test]
    fn test_paused_pool_ignores_update() {
        let mut pool = new_pool();
        pool.add_agent(Box::new(OneShotAgent));
        pool.add_task(probe(1, 0)).unwrap();
        pool.set_paused(true);

        tick(&mut pool);
        tick(&mut pool);

        assert!(pool.paused());
        assert_eq!(pool.waiting_task_count(), 1);
        assert_eq!(pool.free_agent_count(), 1);

        pool.set_paused(false);
        tick(&mut pool);
        assert_eq!(pool.waiting_task_count(), 0);
    }

    #[test]
    fn test_stats_snapshot_matches_counts() {
        let mut pool = new_pool();
        pool.add_agent(Box::new(HoldAgent));
        pool.add_agent(Box::new(HoldAgent));
        pool.add_task(probe(1, 0)).unwrap();
        pool.add_task(probe(2, 0)).unwrap();
        pool.add_task(probe(3, 0)).unwrap();
        tick(&mut pool);

        let stats = pool.stats();
        assert!(!stats.paused);
        assert_eq!(stats.total_agents, 2);
        assert_eq!(stats.free_agents, 0);
        assert_eq!(stats.working_agents, 2);
        assert_eq!(stats.waiting_tasks, 1);
    }
}
