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

//! Generic agent driving one [`BackgroundOp`] per task.

use crate::op::{BackgroundOp, OpStatus};
use ergon_core::{StartTaskStatus, Task, TaskAgent};
use std::marker::PhantomData;
use std::time::Duration;

/// What a runner decided when asked to begin a task.
#[derive(Debug)]
pub enum BeginOp<R> {
    /// The task was satisfied synchronously.
    Finished,
    /// An operation was launched; the agent will poll it every tick.
    Run(BackgroundOp<R>),
    /// The runner cannot take the task right now; retry on a later tick.
    Busy,
    /// The task is invalid and must be discarded.
    Fail,
}

/// Domain half of an [`OpAgent`].
///
/// The runner decides how a task turns into a background operation and
/// how the result lands back on the task. The agent owns the polling,
/// the done flag, and cancellation on reset.
pub trait OpRunner<T: Task>: Send {
    /// Result type produced by the background operation.
    type Output: Send + 'static;

    /// Inspects the task and decides how to serve it.
    fn begin(&mut self, task: &mut T) -> BeginOp<Self::Output>;

    /// Applies a finished operation's output to the task.
    ///
    /// The agent marks the task done right after this returns.
    fn complete(&mut self, task: &mut T, output: Self::Output);

    /// Records a failure on the task after its operation aborted.
    ///
    /// The default does nothing; the agent still marks the task done so
    /// the pool retires it.
    fn fail(&mut self, task: &mut T) {
        let _ = task;
    }
}

/// Reusable agent that runs one cancellable operation per task.
///
/// Each assignment asks the runner to [`begin`] the task; while the
/// resulting operation is in flight, every tick polls it without
/// blocking. Resets cancel the in-flight operation, so abandoning a
/// task never leaks a busy worker.
///
/// [`begin`]: OpRunner::begin
pub struct OpAgent<T, R>
where
    T: Task,
    R: OpRunner<T>,
{
    runner: R,
    op: Option<BackgroundOp<R::Output>>,
    marker: PhantomData<fn(T)>,
}

impl<T, R> OpAgent<T, R>
where
    T: Task,
    R: OpRunner<T>,
{
    /// Wraps `runner` into a pool-ready agent.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            op: None,
            marker: PhantomData,
        }
    }

    /// The wrapped runner.
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<T, R> TaskAgent<T> for OpAgent<T, R>
where
    T: Task,
    R: OpRunner<T>,
{
    fn initialize(&mut self) {}

    fn start(&mut self, task: &mut T) -> StartTaskStatus {
        match self.runner.begin(task) {
            BeginOp::Finished => StartTaskStatus::Done,
            BeginOp::Run(op) => {
                self.op = Some(op);
                StartTaskStatus::CanResume
            }
            BeginOp::Busy => StartTaskStatus::HasToWait,
            BeginOp::Fail => StartTaskStatus::UnknownError,
        }
    }

    fn update(&mut self, task: &mut T, _elapsed: Duration, _real_elapsed: Duration) {
        let Some(mut op) = self.op.take() else {
            return;
        };
        match op.poll() {
            OpStatus::Pending => self.op = Some(op),
            OpStatus::Ready(output) => {
                self.runner.complete(task, output);
                task.set_done(true);
            }
            OpStatus::Aborted => {
                log::warn!(
                    "Background operation for task {} died; completing as failed",
                    task.serial_id()
                );
                self.runner.fail(task);
                task.set_done(true);
            }
        }
    }

    fn stop_and_reset(&mut self) {
        if let Some(op) = self.op.take() {
            op.cancel();
        }
    }

    fn shutdown(&mut self) {
        self.stop_and_reset();
    }
}

impl<T, R> std::fmt::Debug for OpAgent<T, R>
where
    T: Task,
    R: OpRunner<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpAgent")
            .field("in_flight", &self.op.is_some())
            .finish()
    }
}
