/// Terminal front-end for the wave renderer: a crossterm alternate-screen
/// loop that advances simulation time in fixed 45 ms ticks and prints the
/// glyph spans with 24-bit color.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs;
use std::io::{self, Stdout, Write};
use std::time::Duration;
use swell_core::{CellColor, ColorMode, EdgeMode, WaveConfig, WaveModel, WaveRenderer};

/// Simulation time per tick, seconds.
const TICK_DT: f32 = 0.045;

const MIN_COLS: usize = 90;
const MAX_COLS: usize = 240;
const MIN_ROWS: usize = 32;
const MAX_ROWS: usize = 120;

#[derive(Parser, Debug)]
#[command(name = "swell", about = "Animated ocean surface in braille glyphs")]
struct Args {
    /// Path to a JSON settings record. Flags below override its fields.
    #[arg(long)]
    config: Option<String>,

    /// Wave model: trochoidal, spectrum, basin, or tsunami.
    #[arg(short, long)]
    model: Option<WaveModel2>,

    /// Color mode: mono, depth, or phase.
    #[arg(short, long)]
    color: Option<ColorMode2>,

    /// Seed for the spectrum and the basin forcing.
    #[arg(long)]
    seed: Option<u32>,

    /// Time scale, 0.05 to 2.5.
    #[arg(long)]
    speed: Option<f32>,
}

// Thin wrappers so clap parses the settings enums through their canonical
// string forms.
#[derive(Debug, Clone)]
struct WaveModel2(WaveModel);
#[derive(Debug, Clone)]
struct ColorMode2(ColorMode);

impl std::str::FromStr for WaveModel2 {
    type Err = swell_core::config::ParseVariantError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl std::str::FromStr for ColorMode2 {
    type Err = swell_core::config::ParseVariantError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

struct App {
    cfg: WaveConfig,
    renderer: WaveRenderer,
    t: f32,
    paused: bool,
    columns: usize,
    rows: usize,
}

impl App {
    fn new(cfg: WaveConfig, term_w: u16, term_h: u16) -> Self {
        let (columns, rows) = cell_grid(term_w, term_h);
        Self {
            cfg,
            renderer: WaveRenderer::new(),
            t: 0.0,
            paused: false,
            columns,
            rows,
        }
    }

    fn tick(&mut self) {
        if !self.paused {
            self.t += TICK_DT;
        }
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('m') => {
                self.cfg.model = match self.cfg.model {
                    WaveModel::Trochoidal => WaveModel::Spectrum,
                    WaveModel::Spectrum => WaveModel::Basin,
                    WaveModel::Basin => WaveModel::Tsunami,
                    WaveModel::Tsunami => WaveModel::Trochoidal,
                };
            }
            KeyCode::Char('c') => {
                self.cfg.color_mode = match self.cfg.color_mode {
                    ColorMode::Mono => ColorMode::Depth,
                    ColorMode::Depth => ColorMode::Phase,
                    ColorMode::Phase => ColorMode::Mono,
                };
            }
            KeyCode::Char('e') => {
                self.cfg.basin_edge = match self.cfg.basin_edge {
                    EdgeMode::Free => EdgeMode::Fixed,
                    EdgeMode::Fixed => EdgeMode::Free,
                };
            }
            KeyCode::Left => self.cfg.wind_dir -= 10.0,
            KeyCode::Right => self.cfg.wind_dir += 10.0,
            KeyCode::Up => self.cfg.speed = (self.cfg.speed + 0.1).min(2.5),
            KeyCode::Down => self.cfg.speed = (self.cfg.speed - 0.1).max(0.05),
            _ => {}
        }
        false
    }

    fn resize(&mut self, term_w: u16, term_h: u16) {
        let (columns, rows) = cell_grid(term_w, term_h);
        self.columns = columns;
        self.rows = rows;
    }

    fn render(&mut self, stdout: &mut Stdout) -> io::Result<()> {
        let frame = self.renderer.render(&self.cfg, self.t, self.columns, self.rows);

        queue!(stdout, cursor::MoveTo(0, 0))?;
        for (cy, row) in frame.rows.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, cy as u16))?;
            for span in row {
                match span.color {
                    Some(c) => queue!(stdout, SetForegroundColor(to_rgb(c)))?,
                    None => queue!(stdout, ResetColor)?,
                }
                queue!(stdout, Print(span.text.as_str()))?;
            }
        }
        queue!(stdout, ResetColor)?;
        Ok(())
    }
}

/// Cell grid from the terminal size, clamped to the supported range.
fn cell_grid(term_w: u16, term_h: u16) -> (usize, usize) {
    let columns = (term_w as usize).clamp(MIN_COLS, MAX_COLS);
    let rows = (term_h as usize).clamp(MIN_ROWS, MAX_ROWS);
    (columns, rows)
}

/// Quantized HSL color to a terminal RGB color.
fn to_rgb(c: CellColor) -> Color {
    let (r, g, b) = hsl_to_rgb(
        c.hue as f32,
        c.saturation as f32 / 100.0,
        c.lightness as f32 / 100.0,
    );
    Color::Rgb { r, g, b }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

fn load_config(args: &Args) -> Result<WaveConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading settings file {path}"))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing settings file {path}"))?
        }
        None => WaveConfig::default(),
    };
    if let Some(m) = &args.model {
        cfg.model = m.0;
    }
    if let Some(c) = &args.color {
        cfg.color_mode = c.0;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(speed) = args.speed {
        cfg.speed = speed;
    }
    Ok(cfg)
}

fn run(mut app: App) -> Result<()> {
    let mut stdout = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let tick = Duration::from_millis(45);

    'outer: loop {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    if app.handle_key(k.code) {
                        break 'outer;
                    }
                }
                Event::Resize(w, h) => {
                    app.resize(w, h);
                    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
                }
                _ => {}
            }
        }

        app.tick();
        app.render(&mut stdout)?;
        stdout.flush()?;

        std::thread::sleep(tick);
    }

    execute!(stdout, ResetColor, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_config(&args)?;
    let (tw, th) = terminal::size().unwrap_or((90, 32));
    run(App::new(cfg, tw, th))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_grid_clamps_to_the_supported_range() {
        assert_eq!(cell_grid(10, 5), (90, 32));
        assert_eq!(cell_grid(120, 40), (120, 40));
        assert_eq!(cell_grid(1000, 500), (240, 120));
    }

    #[test]
    fn hsl_conversion_hits_the_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (255, 255, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), (0, 0, 0));
    }

    #[test]
    fn model_cycle_visits_all_four_models() {
        let mut app = App::new(WaveConfig::default(), 90, 32);
        let start = app.cfg.model;
        let mut seen = vec![start];
        for _ in 0..3 {
            app.handle_key(KeyCode::Char('m'));
            seen.push(app.cfg.model);
        }
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.cfg.model, start);
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn speed_keys_respect_the_clamp_range() {
        let mut app = App::new(WaveConfig::default(), 90, 32);
        for _ in 0..100 {
            app.handle_key(KeyCode::Up);
        }
        assert!(app.cfg.speed <= 2.5);
        for _ in 0..100 {
            app.handle_key(KeyCode::Down);
        }
        assert!(app.cfg.speed >= 0.05);
    }
}
