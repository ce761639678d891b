//! Break display collaborator
//!
//! Something the user cannot miss while a break is running. The display
//! is opened on entering a break, closed on leaving it, and fed the same
//! tick/phase snapshots as any other view.

use std::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::{state::Snapshot, utils::format_remaining};

pub trait BreakDisplay: Send {
    fn open(&mut self) -> Result<(), String>;
    fn close(&mut self) -> Result<(), String>;
    fn is_open(&self) -> bool;

    /// Receive the latest snapshot while open
    fn update(&mut self, _snapshot: &Snapshot) -> Result<(), String> {
        Ok(())
    }
}

/// Default break display.
///
/// Tracks whether the break is on screen and, when configured, launches
/// an external command (a browser pointed at the daemon, a lock screen,
/// ...) for the duration of the break.
#[derive(Debug, Default)]
pub struct BreakBoard {
    command: Option<String>,
    child: Option<Child>,
    open: bool,
    last_shown: Option<String>,
}

impl BreakBoard {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command,
            child: None,
            open: false,
            last_shown: None,
        }
    }

    fn spawn_command(command: &str) -> Result<Child, String> {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        cmd.spawn()
            .map_err(|e| format!("Failed to launch break command '{}': {}", command, e))
    }
}

impl BreakDisplay for BreakBoard {
    fn open(&mut self) -> Result<(), String> {
        if self.open {
            return Ok(());
        }
        self.open = true;
        self.last_shown = None;
        info!("Break display opened");

        if let Some(command) = &self.command {
            let child = Self::spawn_command(command)?;
            debug!("Break command started with pid {}", child.id());
            self.child = Some(child);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.last_shown = None;
        info!("Break display closed");

        if let Some(mut child) = self.child.take() {
            // try_wait reaps a command that already exited on its own
            if let Ok(Some(status)) = child.try_wait() {
                debug!("Break command already exited with {}", status);
                return Ok(());
            }
            if let Err(e) = child.kill() {
                let _ = child.try_wait();
                return Err(format!("Failed to stop break command: {}", e));
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap break command: {}", e);
            }
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn update(&mut self, snapshot: &Snapshot) -> Result<(), String> {
        if !self.open {
            return Ok(());
        }
        let shown = format_remaining(snapshot.remaining_ms);
        if self.last_shown.as_deref() != Some(shown.as_str()) {
            debug!("Break remaining: {}", shown);
            self.last_shown = Some(shown);
        }
        Ok(())
    }
}

impl Drop for BreakBoard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
