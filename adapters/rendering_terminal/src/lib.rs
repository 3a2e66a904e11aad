#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering backend for Hamster Maze built on crossterm.

mod layout;

use std::{
    io::{self, Stdout, Write},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as TerminalEvent, KeyCode, KeyEvent,
        KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    style::{Color as TerminalColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand, QueueableCommand,
};
use glam::Vec2;
use hamster_maze_core::{Cell, CellCoord};
use hamster_maze_rendering::{
    Color, Cue, FrameInput, Palette, Presentation, RenderingBackend, Scene,
};
use hamster_maze_system_input::{InputEvent, Key};

use self::layout::{actor_glyph, swipe_point, Layout};

const DEFAULT_FRAME_RATE: u32 = 30;
const BELL: &str = "\x07";

/// Rendering backend drawing the maze with coloured terminal cells.
#[derive(Debug)]
pub struct TerminalBackend {
    frame_interval: Duration,
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBackend {
    /// Returns a backend redrawing at the default frame rate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_interval: frame_interval(DEFAULT_FRAME_RATE),
        }
    }

    /// Configures how many frames per second the backend polls input and redraws.
    #[must_use]
    pub fn with_frame_rate(mut self, frames_per_second: u32) -> Self {
        self.frame_interval = frame_interval(frames_per_second);
        self
    }
}

fn frame_interval(frames_per_second: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(frames_per_second.max(1)))
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        let entered = stdout
            .execute(EnterAlternateScreen)
            .and_then(|out| out.execute(EnableMouseCapture))
            .and_then(|out| out.execute(Hide))
            .map(|_| ())
            .context("failed to prepare the terminal");

        let result = match entered {
            Ok(()) => run_loop(&mut stdout, self.frame_interval, presentation, update_scene),
            Err(error) => Err(error),
        };

        let restored = stdout
            .execute(Show)
            .and_then(|out| out.execute(DisableMouseCapture))
            .and_then(|out| out.execute(LeaveAlternateScreen))
            .map(|_| ())
            .context("failed to restore the terminal");
        terminal::disable_raw_mode().context("failed to leave raw terminal mode")?;

        result.and(restored)
    }
}

/// What a key press asks the game loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    Steer(Key),
    Restart,
    Quit,
    Ignore,
}

fn key_action(key: &KeyEvent) -> KeyAction {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return KeyAction::Ignore;
    }

    match key.code {
        KeyCode::Up => KeyAction::Steer(Key::ArrowUp),
        KeyCode::Down => KeyAction::Steer(Key::ArrowDown),
        KeyCode::Left => KeyAction::Steer(Key::ArrowLeft),
        KeyCode::Right => KeyAction::Steer(Key::ArrowRight),
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

/// Input collected between two frames.
#[derive(Debug, Default)]
struct PendingInput {
    frame: FrameInput,
    swipe_start: Option<Vec2>,
    quit: bool,
    resized: bool,
}

impl PendingInput {
    fn record(&mut self, event: TerminalEvent) {
        match event {
            TerminalEvent::Key(key) => match key_action(&key) {
                KeyAction::Steer(key) => self.frame.inputs.push(InputEvent::Key(key)),
                KeyAction::Restart => self.frame.restart = true,
                KeyAction::Quit => self.quit = true,
                KeyAction::Ignore => {}
            },
            TerminalEvent::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    self.swipe_start = Some(swipe_point(column, row));
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    if let Some(start) = self.swipe_start.take() {
                        self.frame.inputs.push(InputEvent::Swipe {
                            start,
                            end: swipe_point(column, row),
                        });
                    }
                }
                _ => {}
            },
            TerminalEvent::Resize(..) => self.resized = true,
            _ => {}
        }
    }

    fn take_frame(&mut self) -> FrameInput {
        std::mem::take(&mut self.frame)
    }
}

fn run_loop<F>(
    stdout: &mut Stdout,
    frame_interval: Duration,
    presentation: Presentation,
    mut update_scene: F,
) -> Result<()>
where
    F: FnMut(Duration, FrameInput, &mut Scene),
{
    let Presentation {
        window_title,
        palette,
        mut scene,
    } = presentation;

    let mut pending = PendingInput::default();
    let mut last_drawn: Option<Scene> = None;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::ZERO).context("failed to poll terminal events")? {
            pending.record(event::read().context("failed to read terminal event")?);
        }
        if pending.quit {
            return Ok(());
        }

        let dt = last_frame.elapsed();
        last_frame = Instant::now();
        update_scene(dt, pending.take_frame(), &mut scene);

        let cues = std::mem::take(&mut scene.cues);
        if pending.resized || last_drawn.as_ref() != Some(&scene) {
            draw(stdout, &window_title, &palette, &scene)?;
            last_drawn = Some(scene.clone());
            pending.resized = false;
        }

        for cue in cues {
            match cue {
                Cue::FailureSound => {
                    let _ = stdout.queue(Print(BELL)).context("failed to ring the bell")?;
                }
                Cue::PauseAmbient => log::debug!("ambient track paused"),
                Cue::RewindAmbient => log::debug!("ambient track rewound"),
                Cue::Alert(message) => {
                    if show_alert(stdout, &message)? {
                        return Ok(());
                    }
                    last_drawn = None;
                    last_frame = Instant::now();
                }
            }
        }
        stdout.flush().context("failed to flush terminal output")?;

        let remaining = frame_interval.saturating_sub(frame_start.elapsed());
        if !remaining.is_zero() && event::poll(remaining).context("failed to poll")? {
            pending.record(event::read().context("failed to read terminal event")?);
        }
    }
}

/// Displays a blocking message. Returns `true` when the player asked to quit.
fn show_alert(stdout: &mut Stdout, message: &str) -> Result<bool> {
    let (width, height) = terminal::size().context("failed to query terminal size")?;
    let text = format!(" {message} (press any key) ");
    let text_width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let column = width.saturating_sub(text_width) / 2;

    let _ = stdout
        .queue(MoveTo(column, height.saturating_sub(1)))?
        .queue(SetBackgroundColor(TerminalColor::White))?
        .queue(SetForegroundColor(TerminalColor::Black))?
        .queue(Print(text))?
        .queue(ResetColor)?;
    stdout.flush().context("failed to show alert")?;

    loop {
        if let TerminalEvent::Key(key) = event::read().context("failed to read terminal event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            return Ok(key_action(&key) == KeyAction::Quit && key.code != KeyCode::Esc);
        }
    }
}

fn draw(stdout: &mut Stdout, title: &str, palette: &Palette, scene: &Scene) -> Result<()> {
    let (width, height) = terminal::size().context("failed to query terminal size")?;
    let _ = stdout
        .queue(ResetColor)?
        .queue(Clear(ClearType::All))?
        .queue(MoveTo(0, 0))?
        .queue(SetForegroundColor(to_terminal_color(palette.text)))?
        .queue(Print(format!(
            "{title}  {}  Level {}",
            scene.score_text, scene.level
        )))?
        .queue(ResetColor)?;

    let layout = match Layout::fit(width, height, scene.rows, scene.columns) {
        Ok(layout) => layout,
        Err(error) => {
            let _ = stdout.queue(MoveTo(0, 1))?.queue(Print(error.to_string()))?;
            return Ok(());
        }
    };

    for row in 0..scene.rows {
        for column in 0..scene.columns {
            let cell = CellCoord::new(column, row);
            let (background, glyph) = if cell == scene.actor.cell {
                (palette.actor, actor_glyph(&scene.actor))
            } else if cell == scene.goal {
                (palette.goal, '*')
            } else {
                match scene.tile(cell) {
                    Some(Cell::Open) => (palette.floor, ' '),
                    _ => (palette.wall, ' '),
                }
            };

            let text: String = std::iter::repeat(glyph)
                .take(usize::from(layout.tile_columns))
                .collect();
            let (x, y) = layout.cell_origin(cell);
            let _ = stdout
                .queue(SetBackgroundColor(to_terminal_color(background)))?
                .queue(SetForegroundColor(TerminalColor::Black))?;
            for line in 0..layout.tile_rows {
                let _ = stdout.queue(MoveTo(x, y + line))?.queue(Print(&text))?;
            }
        }
    }
    let _ = stdout.queue(ResetColor)?;
    Ok(())
}

fn to_terminal_color(color: Color) -> TerminalColor {
    let (r, g, b) = color.to_rgb_u8();
    TerminalColor::Rgb { r, g, b }
}
