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

//! Lifecycle state observable from outside, and the start verdict agents
//! report back to the pool.

use serde::Serialize;
use std::fmt::Display;

/// Externally observable lifecycle state of a task inside a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    /// In the waiting queue; no agent bound yet.
    Todo,
    /// Bound to an agent and still in flight.
    Doing,
    /// Bound to an agent with the done flag set; retired on the next tick.
    Done,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        };
        write!(f, "{label}")
    }
}

/// What an agent's `start` call tells the pool to do with the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTaskStatus {
    /// The task finished synchronously; retire it and recycle the agent.
    Done,
    /// The task needs further ticks; keep the pairing and deliver updates.
    CanResume,
    /// The agent cannot take the task right now; leave it queued and try
    /// again on a later tick.
    HasToWait,
    /// The agent failed to start the task; drop it and recycle the agent.
    UnknownError,
}
