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

//! Error types shared by the pool crates.

use crate::task::SerialId;
use std::fmt::Display;

/// A specialized `Result` type for pool operations.
pub type TaskPoolResult<T> = Result<T, TaskPoolError>;

/// An error that can occur while feeding tasks to a pool.
///
/// Most misuse is unrepresentable here: there are no null tasks or agents
/// to hand in, and a shut-down pool is consumed by its `shutdown` call.
/// What remains is caller mistakes the type system cannot rule out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPoolError {
    /// A task with this serial id is already waiting or working in the
    /// pool. Serial ids must be unique for the pool's lifetime.
    DuplicateSerialId(SerialId),
}

impl Display for TaskPoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPoolError::DuplicateSerialId(id) => {
                write!(f, "Task serial id {id} is already present in the pool")
            }
        }
    }
}

impl std::error::Error for TaskPoolError {}
