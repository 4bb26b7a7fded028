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

//! # Ergon Core
//!
//! Foundational crate containing the task model, the agent contract, and
//! the reuse allocator shared by every Ergon crate.

#![warn(missing_docs)]

pub mod agent;
pub mod error;
pub mod reuse;
pub mod task;

pub use agent::TaskAgent;
pub use error::{TaskPoolError, TaskPoolResult};
pub use reuse::{ReuseAllocator, ReusePool, ReusePoolStats};
pub use task::{
    Reusable, SerialCounter, SerialId, StartTaskStatus, Task, TaskBase, TaskInfo, TaskStatus,
    DEFAULT_PRIORITY,
};
