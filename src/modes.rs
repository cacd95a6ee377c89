//! The three interactive flows: show, learn, and quiz, plus the main menu.
//!
//! Everything here is terminal glue; the simulation and quiz state machines
//! live in `sim` and `quiz`. The quit key is polled between script records
//! and menu iterations, so a launched firework always finishes its arc.

use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::style::Color;
use crossterm::{cursor, queue, style, terminal};
use rand::rngs::StdRng;

use crate::audio::{Audio, AudioSink, Cue};
use crate::error::PyroError;
use crate::quiz::{CHEMICALS, Feedback, QuizEngine, Verdict};
use crate::render::{ColorMode, RenderMode};
use crate::script::{self, ShowEntry, ShowScript};
use crate::sim::{Firework, FireworkGroup, FireworkSpec};
use crate::stage::{Stage, TermStage};

/// Shows compiled into the binary: (key, title, script text).
pub const BUILTIN_SHOWS: &[(&str, &str, &str)] = &[
    (
        "fourth-of-july",
        "Fourth of July — solos and finale volleys over a skyline",
        include_str!("../shows/fourth_of_july.txt"),
    ),
    (
        "prism",
        "Prism — a rainbow walked across open sky",
        include_str!("../shows/prism.txt"),
    ),
];

/// Everything a flow needs besides the terminal itself.
pub struct Session {
    pub render: RenderMode,
    pub color: ColorMode,
    pub fps: u32,
    pub audio: Audio,
    pub rng: StdRng,
}

/// Main menu: 1/2/3 pick a flow, q leaves.
pub fn main_menu(sess: &mut Session) -> Result<(), PyroError> {
    loop {
        paint_menu(
            "T E R M P Y R O",
            &[
                "[1] show   — run a scripted fireworks show",
                "[2] learn  — launch a firework per chemical",
                "[3] quiz   — match chemicals to their colors",
                "",
                "[q] quit",
            ],
        )?;
        match read_key()? {
            KeyCode::Char('1') => run_show_picker(sess)?,
            KeyCode::Char('2') => run_learn(sess)?,
            KeyCode::Char('3') => run_quiz(sess)?,
            KeyCode::Char('q') | KeyCode::Char('9') | KeyCode::Esc => return Ok(()),
            _ => {}
        }
    }
}

/// Pick one of the bundled shows.
pub fn run_show_picker(sess: &mut Session) -> Result<(), PyroError> {
    loop {
        let mut lines: Vec<String> = BUILTIN_SHOWS
            .iter()
            .enumerate()
            .map(|(i, (_, title, _))| format!("[{}] {}", i + 1, title))
            .collect();
        lines.push(String::new());
        lines.push("[q] back".to_string());
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        paint_menu("PICK A SHOW", &refs)?;

        match read_key()? {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let i = c.to_digit(10).unwrap_or(0) as usize;
                if i >= 1 && i <= BUILTIN_SHOWS.len() {
                    let show = script::parse(BUILTIN_SHOWS[i - 1].2)?;
                    run_show(sess, &show)?;
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            _ => {}
        }
    }
}

/// Load and run a script from disk.
pub fn run_show_file(sess: &mut Session, path: &Path) -> Result<(), PyroError> {
    let text = std::fs::read_to_string(path)?;
    let show = script::parse(&text)?;
    run_show(sess, &show)
}

/// Drive one parsed show end to end.
pub fn run_show(sess: &mut Session, show: &ShowScript) -> Result<(), PyroError> {
    let (cols, rows) = terminal::size()?;
    let mut stage = TermStage::new(
        cols as usize,
        rows as usize,
        sess.render,
        sess.color,
        sess.fps,
        &show.backdrop,
    );
    sess.audio.play(Cue::Song(show.song.clone()));
    stage.present()?;

    for entry in &show.entries {
        if quit_requested()? {
            return Ok(());
        }
        match entry {
            ShowEntry::Solo(spec) => {
                let mut fw = Firework::new(spec, &mut sess.rng);
                fw.launch(&mut stage, &mut sess.rng)?;
                fw.burst(&mut stage, &mut sess.audio, &mut sess.rng)?;
            }
            ShowEntry::Volley(specs) => {
                let mut group = FireworkGroup::new();
                for spec in specs {
                    group.push(Firework::new(spec, &mut sess.rng));
                }
                group.perform(&mut stage, &mut sess.audio, &mut sess.rng)?;
            }
        }
        stage.present()?;
    }
    Ok(())
}

/// Learn mode: one keypress, one firework in that chemical's color.
pub fn run_learn(sess: &mut Session) -> Result<(), PyroError> {
    loop {
        let mut lines: Vec<String> = CHEMICALS
            .iter()
            .enumerate()
            .map(|(i, c)| format!("[{}] {:<28} {}", i + 1, c.name, c.color_name))
            .collect();
        lines.push(String::new());
        lines.push("[q] back".to_string());
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        paint_menu("WHAT BURNS WHICH COLOR?", &refs)?;

        match read_key()? {
            KeyCode::Char(c) if ('1'..='6').contains(&c) => {
                let chem = &CHEMICALS[c as usize - '1' as usize];
                let (r, g, b) = chem.rgb;
                let spec = FireworkSpec {
                    count: 100,
                    px: 0.0,
                    py: -5.0,
                    vx: 0.0,
                    vy: 0.5,
                    ax: 0.0,
                    ay: -0.0098,
                    size: 0.1,
                    r,
                    g,
                    b,
                };
                let (cols, rows) = terminal::size()?;
                let mut stage = TermStage::new(
                    cols as usize,
                    rows as usize,
                    sess.render,
                    sess.color,
                    sess.fps,
                    "midnight",
                );
                let mut fw = Firework::new(&spec, &mut sess.rng);
                fw.launch(&mut stage, &mut sess.rng)?;
                fw.burst(&mut stage, &mut sess.audio, &mut sess.rng)?;
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            _ => {}
        }
    }
}

/// Quiz mode: weighted questions until the deck runs dry.
pub fn run_quiz(sess: &mut Session) -> Result<(), PyroError> {
    let mut engine = QuizEngine::new();

    while let Some((_, chemical)) = engine.pose(&mut sess.rng) {
        let question = format!("Which color is produced by {}?", chemical);
        let left = engine.remaining();
        paint_quiz(&question, engine.score(), left, None)?;

        let selected = loop {
            match read_key()? {
                KeyCode::Char(c) if ('1'..='6').contains(&c) => {
                    break CHEMICALS[c as usize - '1' as usize].color_name;
                }
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                _ => {}
            }
        };

        if let Some(verdict) = engine.answer(selected) {
            paint_quiz(&question, engine.score(), engine.remaining(), Some(verdict))?;
            thread::sleep(Duration::from_millis(1200));
        }
    }

    let closing = match engine.feedback() {
        Feedback::Perfect => "Great job — a perfect match!",
        Feedback::RoomToImprove => "Try again for a perfect score.",
        Feedback::ReviewSuggested => "Consider a pass through learn mode.",
    };
    let score_line = format!("final score: {}", engine.score());
    paint_menu(
        "QUIZ OVER",
        &[score_line.as_str(), closing, "", "press any key"],
    )?;
    let _ = read_key()?;
    Ok(())
}

/// Drain pending input; true if the user asked to leave.
fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(KeyEvent { code, .. }) = event::read()?
            && matches!(code, KeyCode::Char('q') | KeyCode::Esc)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Block for the next key press.
fn read_key() -> io::Result<KeyCode> {
    loop {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            return Ok(code);
        }
    }
}

/// Simple centered text screen for menus.
fn paint_menu(title: &str, lines: &[&str]) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (cols, rows) = terminal::size()?;
    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;

    let top = (rows / 2).saturating_sub(lines.len() as u16 / 2 + 2);
    let center = |s: &str| (cols / 2).saturating_sub(s.chars().count() as u16 / 2);

    queue!(
        stdout,
        cursor::MoveTo(center(title), top),
        style::SetForegroundColor(Color::Yellow),
        style::Print(title),
        style::ResetColor
    )?;
    for (i, line) in lines.iter().enumerate() {
        queue!(
            stdout,
            cursor::MoveTo(center(line), top + 2 + i as u16),
            style::Print(line)
        )?;
    }
    stdout.flush()
}

/// The quiz board: score, question, answer key, and an optional verdict.
fn paint_quiz(question: &str, score: i32, left: usize, verdict: Option<Verdict>) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (cols, rows) = terminal::size()?;
    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;

    let top = (rows / 2).saturating_sub(8);
    let center = |s: &str| (cols / 2).saturating_sub(s.chars().count() as u16 / 2);

    let score_line = format!("score: {}   {} to go", score, left);
    queue!(
        stdout,
        cursor::MoveTo(center(&score_line), top),
        style::Print(&score_line),
        cursor::MoveTo(center(question), top + 2),
        style::SetForegroundColor(Color::Yellow),
        style::Print(question),
        style::ResetColor
    )?;

    for (i, chem) in CHEMICALS.iter().enumerate() {
        let line = format!("[{}] {}", i + 1, chem.color_name);
        let (r, g, b) = chem.rgb;
        queue!(
            stdout,
            cursor::MoveTo(center("[0] XXXXXX"), top + 4 + i as u16),
            style::SetForegroundColor(Color::Rgb {
                r: (r * 255.0) as u8,
                g: (g * 255.0) as u8,
                b: (b * 255.0) as u8,
            }),
            style::Print(line),
            style::ResetColor
        )?;
    }

    if let Some(v) = verdict {
        let (msg, color) = match v {
            Verdict::Correct => ("Correct!", Color::Green),
            Verdict::Incorrect => ("Incorrect :(", Color::Red),
        };
        queue!(
            stdout,
            cursor::MoveTo(center(msg), top + 11),
            style::SetForegroundColor(color),
            style::Print(msg),
            style::ResetColor
        )?;
    }
    stdout.flush()
}
