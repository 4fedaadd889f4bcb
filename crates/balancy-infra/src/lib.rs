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

//! # Balancy Infra
//!
//! Concrete implementations of the boundary contracts declared in
//! `balancy-core`: schedulers for cooperative and threaded hosts, an in-memory
//! asset source, and a static URL provider.

#![warn(missing_docs)]

pub mod platform;
pub mod schedule;
pub mod source;

pub use platform::StaticUrlProvider;
pub use schedule::{FrameScheduler, TokioScheduler};
pub use source::{MemorySource, SourceRequest};
