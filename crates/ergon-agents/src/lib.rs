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

//! # Ergon Agents
//!
//! Agents that bridge cancellable background operations into the
//! cooperative tick contract: the work runs on worker threads, but
//! completion surfaces only through the task's done flag, read by the
//! pool on its next tick. The pool thread never blocks.

#![warn(missing_docs)]

pub mod op;
pub mod op_agent;

pub use op::{BackgroundOp, CancelToken, OpStatus};
pub use op_agent::{BeginOp, OpAgent, OpRunner};
