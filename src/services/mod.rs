/// Debounced celebration window after successful scoring commands.
pub mod celebration;
/// Teacher command execution and outcome reporting.
pub mod dispatcher;
/// Recurring fetch-and-normalize loop.
pub mod sync_loop;

pub use self::celebration::Celebration;
pub use self::dispatcher::{Command, CommandDispatcher, DispatchOutcome};
pub use self::sync_loop::{LoopPhase, SyncLoop};
