//! Front panel application state and event loop.

use crate::cpu::{Cpu, CpuState};
use crate::image::{load_image, save_image};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Tick interval while running normally.
const RUN_INTERVAL: Duration = Duration::from_millis(1000);
/// Tick interval while a single step is armed.
const STEP_INTERVAL: Duration = Duration::from_millis(250);
/// How long a status message stays on screen.
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// A transient status message with its display deadline.
///
/// Owned by the app state rather than living in module globals.
pub struct StatusLine {
    text: String,
    shown_at: Instant,
}

impl StatusLine {
    fn new() -> Self {
        Self {
            text: String::new(),
            shown_at: Instant::now(),
        }
    }

    /// Replace the message and restart its display window.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.shown_at = Instant::now();
    }

    /// The message, or `None` once it has expired.
    pub fn current(&self) -> Option<&str> {
        if self.text.is_empty() || self.shown_at.elapsed() > STATUS_DURATION {
            None
        } else {
            Some(&self.text)
        }
    }
}

/// Front panel application state.
pub struct ConsoleApp {
    /// The machine being driven.
    pub cpu: Cpu,
    /// File used by dump (F6) and restore (F7).
    pub image_path: PathBuf,
    /// Transient status message.
    pub status: StatusLine,
    /// Should we quit?
    pub should_quit: bool,
    /// Current execution cadence.
    tick_interval: Duration,
    /// When the machine last executed an instruction.
    last_exec: Instant,
}

impl ConsoleApp {
    /// Create a front panel around a cold-constructed machine.
    pub fn new(image_path: PathBuf) -> Self {
        Self {
            cpu: Cpu::new(),
            image_path,
            status: StatusLine::new(),
            should_quit: false,
            tick_interval: RUN_INTERVAL,
            last_exec: Instant::now(),
        }
    }

    /// Execute one instruction if the cadence interval has elapsed.
    pub fn on_tick(&mut self) {
        if self.last_exec.elapsed() >= self.tick_interval {
            self.cpu.execute_current();
            self.last_exec = Instant::now();
        }
    }

    /// Pause a running machine.
    pub fn pause(&mut self) {
        if self.cpu.is_running() {
            self.cpu.pause();
        }
    }

    /// Resume a paused machine, or soft-reset a halted one.
    pub fn resume_or_reset(&mut self) {
        match self.cpu.state {
            CpuState::Halted => {
                self.tick_interval = RUN_INTERVAL;
                self.cpu.soft_reset();
            }
            CpuState::Paused => {
                self.tick_interval = RUN_INTERVAL;
                self.cpu.resume();
            }
            _ => {}
        }
    }

    /// Hard-reset a halted machine back to the factory image.
    pub fn hard_reset(&mut self) {
        if self.cpu.is_halted() {
            self.tick_interval = RUN_INTERVAL;
            self.cpu.hard_reset();
        }
    }

    /// Arm a single step and speed the cadence up for it.
    pub fn step(&mut self) {
        if matches!(self.cpu.state, CpuState::Paused | CpuState::Halted) {
            self.cpu.request_step();
            self.tick_interval = STEP_INTERVAL;
        }
    }

    /// Dump memory cells 1-99 to the image file.
    pub fn dump_memory(&mut self) {
        match save_image(&self.image_path, &self.cpu.mem) {
            Ok(()) => self
                .status
                .set(format!("Memory dumped to {}", self.image_path.display())),
            Err(e) => self.status.set(format!("Error dumping memory: {}", e)),
        }
    }

    /// Restore memory from the image file. Applies nothing on error.
    pub fn restore_memory(&mut self) {
        match load_image(&self.image_path) {
            Ok(image) => {
                image.apply(&mut self.cpu);
                self.status.set(format!(
                    "Restored {} words from {}",
                    image.len(),
                    self.image_path.display()
                ));
            }
            Err(e) => self.status.set(format!("Error restoring memory: {}", e)),
        }
    }
}

/// Run the front panel until the operator quits.
pub fn run_console(image_path: PathBuf) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create app
    let mut app = ConsoleApp::new(image_path);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        // Handle input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('p') => app.pause(),
                        KeyCode::Char('r') => app.resume_or_reset(),
                        KeyCode::Char('h') => app.hard_reset(),
                        KeyCode::Char('s') => app.step(),
                        KeyCode::F(6) => app.dump_memory(),
                        KeyCode::F(7) => app.restore_memory(),
                        _ => {}
                    }
                }
            }
        }

        // Tick the machine
        app.on_tick();

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
