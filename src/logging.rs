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

//! Logging configuration for the Neo4j HTTP ADBC driver.
//!
//! Initializes a `tracing-subscriber` writing to a file or stderr.
//!
//! ## Configuration priority
//!
//! 1. `neo4j.log_level` / `neo4j.log_file` database options (highest)
//! 2. `RUST_LOG` environment variable
//! 3. Default: `warn`
//!
//! ```bash
//! RUST_LOG=neo4j_adbc_http=debug ./my_adbc_app
//! ```

use std::sync::OnceLock;
use tracing_subscriber::{
    fmt::{self, time::SystemTime, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET: &str = "neo4j_adbc_http";
const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Logging settings collected from database options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LogConfig {
    /// Normalized (lowercase) level, see [`parse_level`].
    pub level: Option<String>,
    /// Log file path. If unset, logs go to stderr.
    pub file: Option<String>,
}

/// Validate a level name such as `DEBUG` and return it lowercased.
pub(crate) fn parse_level(level: &str) -> Option<String> {
    let level = level.trim().to_ascii_lowercase();
    LEVELS.contains(&level.as_str()).then_some(level)
}

/// Filter for `config`, or `None` when logging is switched off.
fn build_filter(config: &LogConfig) -> Option<EnvFilter> {
    match config.level.as_deref() {
        Some("off") => None,
        Some(level) => Some(EnvFilter::new(format!("{}={}", TARGET, level))),
        None => Some(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", TARGET))),
        ),
    }
}

/// Install the global subscriber.
///
/// Runs at most once per process: the first `Database::new_connection()`
/// configures logging and later calls are no-ops. An already installed
/// global subscriber is left in place.
pub(crate) fn init_logging(config: &LogConfig) {
    LOGGING_INITIALIZED.get_or_init(|| {
        let Some(filter) = build_filter(config) else {
            return;
        };

        let (writer, ansi) = match config.file {
            Some(ref path) => {
                match std::fs::OpenOptions::new().create(true).append(true).open(path) {
                    Ok(file) => (BoxMakeWriter::new(file), false),
                    Err(e) => {
                        eprintln!("neo4j-adbc-http: failed to open log file {}: {}", path, e);
                        return;
                    }
                }
            }
            None => (BoxMakeWriter::new(std::io::stderr), true),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(false)
                    .with_ansi(ansi)
                    .with_timer(SystemTime),
            )
            .try_init()
            .ok();
    });
}
