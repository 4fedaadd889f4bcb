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

//! # Balancy Core
//!
//! Foundational crate containing the traits, core types, and interface contracts
//! shared by the asset runtime. It knows nothing about how assets are fetched,
//! cached, or scheduled; those live in `balancy-data`, `balancy-infra` and
//! `balancy-agents`.

#![warn(missing_docs)]

pub mod address;
pub mod asset;
pub mod error;
pub mod event;
pub mod platform;
pub mod schedule;

pub use address::{AddressResolver, UrlProvider};
pub use error::AssetError;
pub use schedule::Scheduler;
