//! Frame pipeline: capture thread, keep-latest handoff, analyzer worker and
//! the UI state it feeds.
//!
//! ```text
//! Camera --run_capture--> latest slot --Analyzer--> UiEvent channel --> UiState
//! ```

pub mod analyzer;
pub mod capture;
pub mod latest;
pub mod permission;
pub mod ui;

pub use analyzer::{Analyzer, AnalyzerStats, UI_CHANNEL_CAPACITY};
pub use capture::{run_capture, spawn_capture, CaptureStats};
pub use latest::{channel, LatestReceiver, LatestSender, SendError, SlotStats};
pub use permission::{AlwaysGranted, DeviceAccessGate, Permission, PermissionGate};
pub use ui::{UiEvent, UiState, NOTICE_DURATION, PERMISSION_PROMPT, READY_MESSAGE};
