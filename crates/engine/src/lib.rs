// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestration kernel: a durable event log plus the cooperating
//! activities that drive it -- the OrchestratorLoop state machine, the
//! Notifier, the Heartbeat Reaper, and the role-scoped ToolSurface agents
//! call into. Adapter implementations (panes, notifications, workspaces)
//! live in `aio-adapters`; this crate only depends on their traits.

pub mod config;
pub mod error;
pub mod executor;
pub mod notifier;
pub mod orchestrator;
pub mod paths;
pub mod reaper;
pub mod safety_guard;
pub mod tool_config;
pub mod tool_surface;

pub use config::EngineConfig;
pub use error::EngineError;
pub use executor::{ExecuteError, Executor};
pub use notifier::Notifier;
pub use orchestrator::OrchestratorLoop;
pub use reaper::HeartbeatReaper;
pub use safety_guard::SafetyGuard;
pub use tool_config::write_generated_tool_configs;
pub use tool_surface::{CheckEventsResult, CommandOutput, ToolSurface};
