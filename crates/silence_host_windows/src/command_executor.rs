use std::collections::VecDeque;

use silence_host_protocol::Command;
use silence_platform::WindowId;

use crate::app::App;

/// Upper bound on commands processed in one chain.
const MAX_ITERATIONS: usize = 1000;

/// FIFO command queue.
///
/// Commands returned while executing are appended to the back, so a chain runs breadth-first
/// without recursion.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
    executed_count: usize,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Command::None` is dropped.
    pub fn push(&mut self, command: Command) {
        if !matches!(command, Command::None) {
            self.pending.push_back(command);
        }
    }

    pub fn push_batch(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.push(command);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn executed_count(&self) -> usize {
        self.executed_count
    }

    /// Run until the queue drains or [`MAX_ITERATIONS`] is hit.
    pub fn process_all<E: CommandExecutor + ?Sized>(&mut self, executor: &mut E, window: WindowId) {
        let mut iteration = 0;

        while let Some(command) = self.pending.pop_front() {
            self.executed_count += 1;
            let new_commands = executor.execute_command(command, window);
            self.push_batch(new_commands);

            iteration += 1;
            if iteration >= MAX_ITERATIONS {
                tracing::warn!(
                    dropped = self.pending.len(),
                    "command chain exceeded {MAX_ITERATIONS} iterations, stopping"
                );
                self.pending.clear();
                break;
            }
        }
    }
}

pub trait CommandExecutor {
    /// Execute one command and return any follow-up commands.
    fn execute_command(&mut self, command: Command, window: WindowId) -> Vec<Command>;

    fn execute_commands(&mut self, commands: Vec<Command>, window: WindowId) -> Vec<Command> {
        let mut result_commands = Vec::new();
        for command in commands {
            result_commands.extend(self.execute_command(command, window));
        }
        result_commands
    }

    /// Execute `commands` and everything they produce, in order.
    fn execute_command_chain(&mut self, commands: Vec<Command>, window: WindowId) {
        let mut queue = CommandQueue::new();
        queue.push_batch(commands);
        queue.process_all(self, window);
    }
}

impl CommandExecutor for App {
    fn execute_command(&mut self, command: Command, window: WindowId) -> Vec<Command> {
        match command {
            Command::Core(action) => self.dispatch_core_action(action),
            Command::Hotkey(action) => self.dispatch_hotkey_action(action),
            Command::ToggleMute => self.toggle_mute(),
            Command::SyncMuteState => self.sync_mute_state(),

            Command::ConfigureOverlay => self.configure_overlay(),
            Command::RenderOverlay => self.render_overlay(),
            Command::ShowOverlay => {
                // Push a frame first so the window never flashes stale content.
                let follow_up = self.render_overlay();
                self.with_overlay(|platform, overlay| platform.show_window(overlay));
                follow_up
            }
            Command::HideOverlay => {
                self.with_overlay(|platform, overlay| platform.hide_window(overlay));
                vec![]
            }
            Command::SetClickThrough(enabled) => {
                self.with_overlay(|platform, overlay| platform.set_click_through(overlay, enabled));
                vec![]
            }
            Command::SavePlacement(placement) => {
                self.save_placement(&placement);
                vec![]
            }
            Command::ScheduleTick => {
                self.schedule_tick(window);
                vec![]
            }

            Command::UpdateTray => {
                self.update_tray();
                vec![]
            }
            Command::PlayFeedback { muted } => {
                self.play_feedback(muted);
                vec![]
            }
            Command::ShowTrayMenu => self.show_tray_menu(window),
            Command::Tray(tray_command) => self.handle_tray_command(tray_command),

            Command::Notify(message) => {
                self.notify(&message);
                vec![]
            }
            Command::ShowError(message) => {
                tracing::error!("{message}");
                self.host_platform()
                    .show_error_message(window, crate::constants::APP_TITLE, &message);
                vec![]
            }
            Command::QuitApp => {
                self.cleanup_before_quit(window);
                if let Err(e) = self.host_platform().destroy_window(window) {
                    tracing::warn!("failed to destroy message window: {e}");
                }
                vec![]
            }
            Command::None => vec![],
        }
    }
}
