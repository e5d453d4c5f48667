// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborator implementations for exercising reconciliation
//! passes without a remote system.

mod directory;
mod gateway;

pub use directory::StaticDirectory;
pub use gateway::{GatewayCall, GatewayError, RecordingGateway};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
