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

//! The contract between a pool and the agents that execute its tasks.

use crate::task::{StartTaskStatus, Task};
use std::time::Duration;

/// A stateful worker that executes tasks one at a time.
///
/// Agents are registered with a pool once and recycled across many tasks.
/// The pool owns the task storage and lends the current task to the bound
/// agent as `&mut`, so while a task is in flight only its agent can touch
/// it. An agent is always in exactly one of three states: free (idle on
/// the pool's stack), bound (working a task), or shut down.
///
/// Call order guaranteed by the pool: `initialize` once at registration;
/// then any number of `start` / `update`* / `stop_and_reset` cycles; then
/// `shutdown` once, after which the agent is dropped.
pub trait TaskAgent<T: Task>: Send {
    /// Prepares the agent for use. Called once at registration, before any
    /// task is bound.
    fn initialize(&mut self);

    /// Binds `task` to this agent and begins work on it.
    ///
    /// Called at most once per binding. The verdict tells the pool whether
    /// the task finished synchronously, wants updates, must keep waiting,
    /// or failed; see [`StartTaskStatus`].
    fn start(&mut self, task: &mut T) -> StartTaskStatus;

    /// Advances in-flight work by one tick.
    ///
    /// `elapsed` is scaled time and `real_elapsed` wall-clock time since
    /// the previous tick. A multi-tick agent reports completion by calling
    /// `task.set_done(true)`; the pool retires the task and recycles the
    /// agent within the same tick.
    fn update(&mut self, task: &mut T, elapsed: Duration, real_elapsed: Duration);

    /// Aborts any in-flight work and returns the agent to a clean idle
    /// state, ready to be bound to a different task.
    fn stop_and_reset(&mut self);

    /// Releases the agent's resources for good. Called once at pool
    /// shutdown; no other call follows.
    fn shutdown(&mut self);
}
