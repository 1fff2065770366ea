// SPDX-License-Identifier: MIT OR Apache-2.0
//! GLSL Generator - node graph editor.
//!
//! Press the add key (Space by default) to drop a node under the pointer,
//! drag a node body to move it, and drag from one pin to a pin of the
//! opposite direction to connect them.
//!
//! Logging honours `RUST_LOG`; `GLSLGEN_CONFIG` may name a RON config file.

mod app;
mod config;
mod pacing;

use app::EditorApp;
use config::EditorConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let mut env_filter = EnvFilter::from_default_env();
    for directive in ["glslgen_editor_app=debug", "wgpu=warn", "naga=warn"] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GLSL Generator v{}", env!("CARGO_PKG_VERSION"));

    let result = EditorConfig::from_env()
        .map_err(app::AppError::from)
        .and_then(EditorApp::run);

    if let Err(e) = result {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
