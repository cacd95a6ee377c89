mod audio;
mod backdrop;
mod config;
mod error;
mod modes;
mod quiz;
mod render;
mod script;
mod sim;
mod stage;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{cursor, execute, terminal};
use rand::SeedableRng;
use rand::rngs::StdRng;

use audio::Audio;
use error::PyroError;
use modes::Session;
use render::{ColorMode, RenderMode};

#[derive(Parser)]
#[command(name = "termpyro", about = "Fireworks shows in the terminal")]
struct Cli {
    /// Flow to start in: show, learn, or quiz (omit for the main menu)
    mode: Option<String>,

    /// Show script file (show mode; omit to pick a bundled show)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Render mode
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Color mode
    #[arg(short, long, value_enum)]
    color: Option<ColorMode>,

    /// Target FPS (1-120)
    #[arg(short, long)]
    fps: Option<u32>,

    /// Seed the simulation RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Disable synthesized sound
    #[arg(long)]
    no_audio: bool,

    /// List bundled shows and exit
    #[arg(short, long)]
    list: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        println!("Bundled shows:");
        for (key, title, _) in modes::BUILTIN_SHOWS {
            println!("  {:<16} {}", key, title);
        }
        println!("\nRun one with: termpyro show (pick from the menu)");
        println!("Or bring your own: termpyro show --script my_show.txt");
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("termpyro: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), PyroError> {
    let file_config = config::load_config();

    let render = cli
        .render
        .or(file_config.render.map(Into::into))
        .unwrap_or(RenderMode::Braille);
    let color = cli
        .color
        .or(file_config.color.map(Into::into))
        .unwrap_or(ColorMode::TrueColor);
    let fps = cli.fps.or(file_config.fps).unwrap_or(30).clamp(1, 120);
    let audio_on = !cli.no_audio && file_config.audio.unwrap_or(true);

    let rng = match cli.seed.or(file_config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut sess = Session {
        render,
        color,
        fps,
        audio: Audio::open(audio_on),
        rng,
    };

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = dispatch(cli, &mut sess);

    // Cleanup
    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn dispatch(cli: &Cli, sess: &mut Session) -> Result<(), PyroError> {
    match cli.mode.as_deref() {
        Some("show") => match &cli.script {
            Some(path) => modes::run_show_file(sess, path),
            None => modes::run_show_picker(sess),
        },
        Some("learn") => modes::run_learn(sess),
        Some("quiz") => modes::run_quiz(sess),
        Some(other) => Err(PyroError::UnknownMode(other.to_string())),
        None => modes::main_menu(sess),
    }
}
