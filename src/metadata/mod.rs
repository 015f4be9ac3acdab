// Copyright (c) 2025 ADBC Drivers Contributors
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

//! Database metadata for the ADBC Connection interface.
//!
//! ## Module Structure
//!
//! - `database`: the `DatabaseMetadata` snapshot and its accessors
//! - `resolver`: builds the snapshot from a connection's executor
//! - `info`: renders the snapshot as a `get_info` Arrow result

pub mod database;
pub mod info;
pub mod resolver;

pub use database::DatabaseMetadata;
pub use info::{build_info, InfoBuilder, InfoReader};
pub use resolver::resolve;
