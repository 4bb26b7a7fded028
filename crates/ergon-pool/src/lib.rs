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

//! # Ergon Pool
//!
//! A priority task pool that multiplexes an unbounded stream of tasks
//! onto a small, fixed set of reusable agents, driven by an external
//! tick. Working agents advance before waiting tasks are admitted, the
//! waiting queue keeps strict descending priority with FIFO inside each
//! band, and retired tasks flow back through an injected reuse allocator.

#![warn(missing_docs)]

pub mod pool;

pub use pool::{TaskPool, TaskPoolStats};
