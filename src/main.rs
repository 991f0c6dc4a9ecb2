mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::Color,
    terminal, ExecutableCommand,
};
use log::info;

use ballistic_game::config::{default_stages, load_stages};
use ballistic_game::entities::{Campaign, CampaignStatus, Level, LevelState, TargetKind};

use display::Hud;

// ── Screens ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    /// "Stage n" card shown before a stage starts.
    Intro,
    Aiming,
    /// A stage was won and another one follows.
    Cleared,
    GameOver,
    GameWon,
}

struct App {
    /// Pristine copy of the stages, used to restart.
    stages: Vec<Level>,
    campaign: Campaign,
    screen: Screen,
    angle: i32,
    force: i32,
    message: String,
    /// The stage that just ended, kept to show the final shot.
    finished: Option<Level>,
}

impl App {
    fn new(stages: Vec<Level>) -> Self {
        let campaign = Campaign::new(stages.clone());
        let screen = match campaign.status() {
            CampaignStatus::Won => Screen::GameWon,
            _ => Screen::Intro,
        };
        Self {
            stages,
            campaign,
            screen,
            angle: 0,
            force: 0,
            message: String::new(),
            finished: None,
        }
    }

    fn restart(&mut self) {
        info!("campaign restarted");
        *self = App::new(std::mem::take(&mut self.stages));
    }

    fn fire(&mut self) {
        let Some(level) = self.campaign.current_level_mut() else {
            return;
        };

        match level.simulate_attempt(self.angle, self.force) {
            Err(e) => {
                info!("shot rejected: {e}");
                self.message = format!("Invalid shot: {e}");
                return;
            }
            Ok(None) => self.message = "Missed!".to_string(),
            Ok(Some(target)) => {
                self.message = match (target.kind(), target.health()) {
                    (TargetKind::Boss, Some(0)) => "Boss destroyed!".to_string(),
                    (TargetKind::Boss, Some(h)) => format!("Boss hit! {h} health left"),
                    _ => format!("{target} hit!"),
                };
            }
        }

        if level.state() == LevelState::Active {
            return;
        }
        self.finished = Some(level.clone());

        self.screen = match self.campaign.advance() {
            CampaignStatus::Lost => Screen::GameOver,
            CampaignStatus::Won => Screen::GameWon,
            CampaignStatus::InProgress => Screen::Cleared,
        };
    }

    fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let finished = self.finished.as_ref();
        match self.screen {
            Screen::Intro => {
                let title = format!("Stage {}", self.campaign.stage_number());
                let attempts = self
                    .campaign
                    .current_level()
                    .map(|l| format!("Number of attempts: {}", l.attempts()))
                    .unwrap_or_default();
                display::render_banner(
                    out,
                    None,
                    &[
                        (title.as_str(), Color::Cyan),
                        (attempts.as_str(), Color::White),
                        ("", Color::White),
                        ("SPACE : Start   Q : Quit", Color::DarkGrey),
                    ],
                )
            }
            Screen::Aiming => match self.campaign.current_level() {
                Some(level) => {
                    let hud = Hud {
                        stage: self.campaign.stage_number(),
                        stage_count: self.campaign.stage_count(),
                        angle: self.angle,
                        force: self.force,
                        message: &self.message,
                    };
                    display::render(out, level, &hud)
                }
                None => Ok(()),
            },
            Screen::Cleared => display::render_banner(
                out,
                finished,
                &[
                    ("╔════════════════════╗", Color::Green),
                    ("║  STAGE  COMPLETED  ║", Color::Green),
                    ("╚════════════════════╝", Color::Green),
                    ("SPACE : Next   Q : Quit", Color::White),
                ],
            ),
            Screen::GameOver => display::render_banner(
                out,
                finished,
                &[
                    ("╔══════════════════╗", Color::Red),
                    ("║    GAME  OVER    ║", Color::Red),
                    ("╚══════════════════╝", Color::Red),
                    ("R : Play Again   Q : Quit", Color::White),
                ],
            ),
            Screen::GameWon => display::render_banner(
                out,
                finished,
                &[
                    ("╔══════════════════════╗", Color::Yellow),
                    ("║   CONGRATULATIONS!   ║", Color::Yellow),
                    ("║ You have won the game║", Color::Yellow),
                    ("╚══════════════════════╝", Color::Yellow),
                    ("R : Play Again   Q : Quit", Color::White),
                ],
            ),
        }
    }

    /// Returns `true` when the player asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
            return true;
        }
        let confirm = matches!(code, KeyCode::Char(' ') | KeyCode::Enter);

        match self.screen {
            Screen::Intro if confirm => {
                self.message.clear();
                self.screen = Screen::Aiming;
            }
            Screen::Cleared if confirm => {
                self.finished = None;
                self.screen = Screen::Intro;
            }
            Screen::GameOver | Screen::GameWon
                if matches!(code, KeyCode::Char('r') | KeyCode::Char('R')) =>
            {
                self.restart();
            }
            Screen::Aiming => match code {
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                    self.angle = (self.angle + 1).min(90);
                }
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.angle = (self.angle - 1).max(0);
                }
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                    self.force = (self.force + 1).min(100);
                }
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                    self.force = (self.force - 1).max(0);
                }
                KeyCode::PageUp => self.force = (self.force + 10).min(100),
                KeyCode::PageDown => self.force = (self.force - 10).max(0),
                _ if confirm => self.fire(),
                _ => {}
            },
            _ => {}
        }
        false
    }
}

// ── Event loop ────────────────────────────────────────────────────────────────

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, app: &mut App) -> std::io::Result<()> {
    loop {
        app.render(out)?;

        // Turn-based: nothing moves until the player presses a key
        let Ok(event) = rx.recv() else {
            return Ok(());
        };
        if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event {
            if kind != KeyEventKind::Press {
                continue;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            if app.handle_key(code) {
                return Ok(());
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Quiet by default so log lines don't tear the alternate screen;
    // `RUST_LOG=info ballistic_game 2>game.log` to follow a session.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .try_init();

    let stages = match std::env::args().nth(1) {
        Some(arg) if arg == "-h" || arg == "--help" => {
            println!("usage: ballistic_game [STAGES.toml]");
            return Ok(());
        }
        Some(arg) => {
            let path = PathBuf::from(arg);
            load_stages(&path)
                .with_context(|| format!("loading stages from {}", path.display()))?
        }
        None => default_stages().context("building the built-in stages")?,
    };
    let mut app = App::new(stages);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread to blocking event reads so the loop only ever
    // waits on the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &mut app);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal i/o failed")
}
