//! Rain scene: falling glyph streams that fade in, fall off the bottom, and
//! hand over to the next scene once the screen is empty.
//!
//! Cells are written straight into the frame buffer; a `Paragraph` per
//! glyph would be far too slow at this density.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Block};
use tracing::debug;

use crate::{
    terminal::{EventPump, Tui},
    theme::{lerp_color, rgb, C_BG, RGB_RAIN_HEAD},
};

use super::{frame_clock, SceneExit};

pub const STREAMS: usize = 21;
pub const TRAIL_SEGMENTS: usize = 14;
const TRAIL_STEP: f64 = 0.07;
const TRAIL_LEVEL: f64 = 0.4;
const FADE_IN_SECS: f64 = 2.0;
const DRIFT_CHANCE: f64 = 0.2;
const FRAME_MS: u64 = 55;
/// Blank screen after the last stream is gone.
const END_HOLD: Duration = Duration::from_millis(400);

const ASCII_GLYPHS: &str = "01<>\\/=-+*{}[]!@#$%^&*ABCDEFGHJKLMNPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Katakana,
    Ascii,
}

impl Charset {
    pub fn glyphs(self) -> Vec<char> {
        match self {
            Charset::Katakana => (0x30A0u32..0x30FF).filter_map(char::from_u32).collect(),
            Charset::Ascii => ASCII_GLYPHS.chars().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stream {
    pub column: u16,
    /// Head position in rows; negative while still above the screen.
    pub drop: f64,
    pub speed: f64,
    pub drift: f64,
    pub active: bool,
}

pub struct RainField {
    streams: Vec<Stream>,
    height: u16,
    glyphs: Vec<char>,
}

/// Trail brightness: 0.4 at the head segment, fading toward the tail.
pub fn trail_level(segment: usize) -> f64 {
    (1.0 - segment as f64 * TRAIL_STEP).max(0.0) * TRAIL_LEVEL
}

/// Global brightness during the fade-in.
pub fn fade_in(elapsed: f64) -> f64 {
    (elapsed / FADE_IN_SECS).clamp(0.0, 1.0)
}

impl RainField {
    pub fn new<R: Rng + ?Sized>(width: u16, height: u16, charset: Charset, rng: &mut R) -> Self {
        let spacing = width as f64 / STREAMS as f64;
        let streams = (0..STREAMS)
            .map(|i| Stream {
                column: (i as f64 * spacing) as u16,
                drop: rng.gen_range(-25.0..-5.0),
                speed: rng.gen_range(0.7..1.15),
                drift: rng.gen_range(-0.15..0.15),
                active: true,
            })
            .collect();
        Self {
            streams,
            height,
            glyphs: charset.glyphs(),
        }
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn is_finished(&self) -> bool {
        self.streams.iter().all(|s| !s.active)
    }

    /// Move every stream down one frame. A stream retires once its head is
    /// a full row below the bottom edge.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let limit = self.height as f64 + 1.0;
        for s in self.streams.iter_mut().filter(|s| s.active) {
            s.drop += s.speed;
            if rng.gen_bool(DRIFT_CHANCE) {
                s.drop += s.drift * 0.1;
            }
            if s.drop > limit {
                s.active = false;
            }
        }
    }

    /// Paint trails and heads into `area`, scaled by `brightness`.
    pub fn render<R: Rng + ?Sized>(&self, buf: &mut Buffer, area: Rect, brightness: f64, rng: &mut R) {
        let mut utf8 = [0u8; 4];
        for s in self.streams.iter().filter(|s| s.active) {
            if s.column >= area.width {
                continue;
            }
            let x = area.x + s.column;
            for seg in 0..TRAIL_SEGMENTS {
                let y = s.drop - seg as f64;
                if y < 0.0 || y >= area.height as f64 {
                    continue;
                }
                let Some(&glyph) = self.glyphs.choose(rng) else {
                    return;
                };
                let g = (255.0 * trail_level(seg) * brightness) as u8;
                let cell = &mut buf[(x, area.y + y as u16)];
                cell.set_symbol(glyph.encode_utf8(&mut utf8));
                cell.set_fg(rgb((0, g, 0)));
            }
            if s.drop >= 0.0 && s.drop < area.height as f64 {
                let Some(&glyph) = self.glyphs.choose(rng) else {
                    return;
                };
                let cell = &mut buf[(x, area.y + s.drop as u16)];
                cell.set_symbol(glyph.encode_utf8(&mut utf8));
                cell.set_fg(rgb(lerp_color((0, 0, 0), RGB_RAIN_HEAD, brightness)));
            }
        }
    }
}

pub async fn run(
    terminal: &mut Tui,
    pump: &mut EventPump,
    charset: Charset,
) -> anyhow::Result<SceneExit> {
    let size = terminal.size()?;
    let mut rng = StdRng::from_entropy();
    let mut field = RainField::new(size.width, size.height, charset, &mut rng);
    debug!("rain: {}x{} {:?}", size.width, size.height, charset);

    let mut clock = frame_clock(FRAME_MS);
    let start = clock.now();
    loop {
        clock.tick().await;
        if pump.quit_pending() {
            return Ok(SceneExit::Quit);
        }
        let brightness = fade_in(clock.now() - start);
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(Block::default().style(Style::default().bg(C_BG)), area);
            field.render(f.buffer_mut(), area, brightness, &mut rng);
        })?;
        field.step(&mut rng);
        if field.is_finished() {
            break;
        }
    }

    terminal.draw(|f| {
        f.render_widget(Block::default().style(Style::default().bg(C_BG)), f.area())
    })?;
    tokio::time::sleep(END_HOLD).await;
    Ok(SceneExit::Finished)
}
