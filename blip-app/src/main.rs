//! Blip - terminal soundboard
//!
//! Interactive front end for the procedural cue engine: trigger any catalog
//! sound, toggle the ambient loop, adjust master volume, or run the
//! scripted boot sequence.

use std::fs;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use blip_engine::{Prefs, SfxEngine, SoundName};

/// Frame rate for UI updates
const FPS: u64 = 30;

/// Catalog entries with a one-line description for the list view.
const SOUNDS: [(SoundName, &str); 12] = [
    (SoundName::Click, "short high tick for button presses"),
    (SoundName::Alert, "two-pitch alarm alternation"),
    (SoundName::Success, "rising confirmation sweep"),
    (SoundName::Error, "distorted low buzz"),
    (SoundName::Typing, "percussive keypress tick"),
    (SoundName::Startup, "long rising power-on sweep"),
    (SoundName::LoadingAmbient, "looping low drone (press 'a')"),
    (SoundName::LoadingBeep, "short mid-range milestone beep"),
    (SoundName::LoadingProgress, "quick upward chirp"),
    (SoundName::LoadingComplete, "major-triad completion chord"),
    (SoundName::SystemInitialize, "slow two-octave boot sweep"),
    (SoundName::DataTransfer, "rapid warble with noise sprinkles"),
];

fn main() -> Result<()> {
    init_logging();

    let mut engine = SfxEngine::with_prefs(Prefs::load());
    engine.initialize();
    tracing::info!(initialized = engine.is_initialized(), "soundboard starting");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, engine);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Route log output to a file under the data dir so the TUI stays clean.
fn init_logging() {
    let log_path = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blip")
        .join("blip.log");
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}

/// One timed step of the scripted boot sequence.
struct BootStep {
    at: Duration,
    action: BootAction,
}

#[derive(Clone, Copy)]
enum BootAction {
    SystemInitialize,
    AmbientOn,
    Beep,
    Progress,
    Complete,
    AmbientOff,
}

/// Plays the loading-cue family on a fixed timeline.
struct BootSequence {
    started: Instant,
    steps: Vec<BootStep>,
    next: usize,
}

impl BootSequence {
    fn new() -> Self {
        let step = |secs: f64, action| BootStep {
            at: Duration::from_secs_f64(secs),
            action,
        };
        Self {
            started: Instant::now(),
            steps: vec![
                step(0.0, BootAction::SystemInitialize),
                step(0.2, BootAction::AmbientOn),
                step(1.0, BootAction::Beep),
                step(1.25, BootAction::Progress),
                step(1.5, BootAction::Beep),
                step(1.75, BootAction::Progress),
                step(2.0, BootAction::Beep),
                step(2.25, BootAction::Progress),
                step(2.5, BootAction::Beep),
                step(2.75, BootAction::Progress),
                step(3.2, BootAction::Complete),
                step(3.6, BootAction::AmbientOff),
            ],
            next: 0,
        }
    }

    /// Fire every step whose time has come. Returns false once exhausted.
    fn tick(&mut self, engine: &SfxEngine) -> bool {
        let elapsed = self.started.elapsed();
        while let Some(step) = self.steps.get(self.next) {
            if step.at > elapsed {
                break;
            }
            match step.action {
                BootAction::SystemInitialize => engine.system_initialize(),
                BootAction::AmbientOn => engine.start_ambient(),
                BootAction::Beep => engine.loading_beep(),
                BootAction::Progress => engine.loading_progress(),
                BootAction::Complete => engine.loading_complete(),
                BootAction::AmbientOff => engine.stop_ambient(),
            }
            self.next += 1;
        }
        self.next < self.steps.len()
    }
}

struct App {
    engine: SfxEngine,
    list_state: ListState,
    boot: Option<BootSequence>,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(engine: SfxEngine) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            engine,
            list_state,
            boot: None,
            message: None,
            should_quit: false,
        }
    }

    fn selected_sound(&self) -> SoundName {
        SOUNDS[self.list_state.selected().unwrap_or(0)].0
    }

    fn select_next(&mut self) {
        let i = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((i + 1) % SOUNDS.len()));
    }

    fn select_prev(&mut self) {
        let i = self.list_state.selected().unwrap_or(0);
        self.list_state
            .select(Some((i + SOUNDS.len() - 1) % SOUNDS.len()));
    }

    /// Trigger the selected cue through its convenience wrapper.
    fn play_selected(&mut self) {
        let name = self.selected_sound();
        match name {
            SoundName::Click => self.engine.click(),
            SoundName::Alert => self.engine.alert(),
            SoundName::Success => self.engine.success(),
            SoundName::Error => self.engine.error(),
            SoundName::Typing => self.engine.typing(),
            SoundName::Startup => self.engine.startup(),
            SoundName::LoadingAmbient => {
                if self.engine.is_ambient_active() {
                    self.engine.stop_ambient();
                } else {
                    self.engine.start_ambient();
                }
            }
            SoundName::LoadingBeep => self.engine.loading_beep(),
            SoundName::LoadingProgress => self.engine.loading_progress(),
            SoundName::LoadingComplete => self.engine.loading_complete(),
            SoundName::SystemInitialize => self.engine.system_initialize(),
            SoundName::DataTransfer => self.engine.data_transfer(),
        }
        self.message = Some(format!("▶ {name}"));
    }

    fn adjust_volume(&mut self, delta: f32) {
        let volume = self.engine.master_volume() + delta;
        self.engine.set_master_volume(volume);
        self.message = Some(format!("Volume {:.0}%", self.engine.master_volume() * 100.0));
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, engine: SfxEngine) -> Result<()> {
    let mut app = App::new(engine);
    app.engine.startup();
    app.message = Some(if app.engine.is_initialized() {
        "Blip soundboard | Enter to play, 'b' for boot sequence, 'q' to quit".to_string()
    } else {
        "No audio output available - running silent".to_string()
    });

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    loop {
        if app.should_quit {
            break;
        }

        // Advance the scripted boot sequence, if one is running
        let boot_finished = match app.boot.as_mut() {
            Some(boot) => !boot.tick(&app.engine),
            None => false,
        };
        if boot_finished {
            app.boot = None;
            app.message = Some("Boot sequence complete".to_string());
        }

        terminal.draw(|frame| render_ui(frame, &mut app))?;

        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true
                    }
                    KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                    KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
                    KeyCode::Enter | KeyCode::Char(' ') => app.play_selected(),
                    KeyCode::Char('a') => {
                        if app.engine.is_ambient_active() {
                            app.engine.stop_ambient();
                            app.message = Some("Ambient loop off".to_string());
                        } else {
                            app.engine.start_ambient();
                            app.message = Some("Ambient loop on".to_string());
                        }
                    }
                    KeyCode::Char('b') => {
                        app.boot = Some(BootSequence::new());
                        app.message = Some("Running boot sequence...".to_string());
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_volume(0.1),
                    KeyCode::Char('-') => app.adjust_volume(-0.1),
                    KeyCode::Char('m') => {
                        let muted = !app.engine.is_muted();
                        app.engine.set_muted(muted);
                        app.message =
                            Some(if muted { "Muted" } else { "Unmuted" }.to_string());
                    }
                    _ => {}
                }
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }

    app.engine.save_prefs();
    app.engine.cleanup();
    Ok(())
}

fn render_ui(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Min(8),    // Sound list
        Constraint::Length(3), // Volume gauge
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0]);
    render_sound_list(frame, chunks[1], app);
    render_volume(frame, chunks[2], app);
    render_status(frame, chunks[3], app);
}

fn render_title(frame: &mut ratatui::Frame, area: Rect) {
    let title = Line::from(Span::styled(
        " BLIP - Interface Sound Board ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title).centered(), area);
}

fn render_sound_list(frame: &mut ratatui::Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = SOUNDS
        .iter()
        .map(|(name, description)| {
            let marker = if *name == SoundName::LoadingAmbient && app.engine.is_ambient_active() {
                "● "
            } else {
                "  "
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(
                    format!("{:<18}", name.as_str()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(*description, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Catalog "))
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_volume(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let ratio = f64::from(app.engine.master_volume() / 2.0).clamp(0.0, 1.0);
    let label = if app.engine.is_muted() {
        "MUTED".to_string()
    } else {
        format!("{:.0}%", app.engine.master_volume() * 100.0)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Master "))
        .gauge_style(Style::default().fg(if app.engine.is_muted() {
            Color::DarkGray
        } else {
            Color::Cyan
        }))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_status(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let engine_state = if !app.engine.is_initialized() {
        Span::styled("SILENT", Style::default().fg(Color::Red))
    } else if app.engine.is_muted() {
        Span::styled("MUTED", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("READY", Style::default().fg(Color::Green))
    };

    let mut spans = vec![
        Span::raw(" "),
        engine_state,
        Span::raw(format!(" | voices: {}", app.engine.active_voices())),
    ];
    if let Some(message) = &app.message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::styled(
        " | ↑↓ select · Enter play · a ambient · b boot · +/- vol · m mute · q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
