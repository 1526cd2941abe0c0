use std::process::{Command, Output, Stdio};
use std::time::Duration;

use crate::state::State;

/// Run a Command with a timeout. Returns TimedOut error if the command exceeds the limit.
pub fn run_with_timeout(mut cmd: Command, timeout_secs: u64) -> std::io::Result<Output> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());
    let child = cmd.spawn()?;
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait_with_output());
    });
    match rx.recv_timeout(Duration::from_secs(timeout_secs)) {
        Ok(result) => result,
        Err(_) => {
            Err(std::io::Error::new(std::io::ErrorKind::TimedOut, format!("Command timed out after {}s", timeout_secs)))
        }
    }
}

/// A module that contributes state and panels to the view.
///
/// Modules are stateless: all runtime state lives in `State`.
pub trait Module: Send + Sync {
    /// Unique identifier (e.g., "git")
    fn id(&self) -> &'static str;
    /// Display name
    fn name(&self) -> &'static str;

    /// Initialize module-owned state in the State extension map.
    /// Called once at startup. Use `state.set_ext(MyState { ... })`.
    fn init_state(&self, _state: &mut State) {}
}
