//! Quote loop scene: every quote typed with typos, blinked and deleted, in
//! shuffled order, forever.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tracing::debug;

use crate::{
    anim::typing::{TypingStyle, Typewriter},
    quotes::LINES,
    terminal::{EventPump, Tui},
    theme::{style_cursor_block, C_BG, C_GREEN},
};

use super::{frame_clock, SceneExit};

const FRAME_MS: u64 = 30;
/// Empty line between two quotes.
const GAP_SECS: f64 = 0.25;

pub struct QuoteLoop<'a> {
    lines: &'a [&'a str],
    order: Vec<usize>,
    pos: usize,
    writer: Typewriter,
    gap_until: Option<f64>,
    style: TypingStyle,
    rng: StdRng,
    passes: u64,
}

impl<'a> QuoteLoop<'a> {
    pub fn new(lines: &'a [&'a str], mistake_probability: f64, now: f64, mut rng: StdRng) -> Self {
        let mut order: Vec<usize> = (0..lines.len()).collect();
        order.shuffle(&mut rng);
        let style = TypingStyle::quote(mistake_probability);
        let first = order.first().map(|&i| lines[i]).unwrap_or_default();
        let writer = Typewriter::new(first, style.clone(), now, &mut rng);
        Self {
            lines,
            order,
            pos: 0,
            writer,
            gap_until: None,
            style,
            rng,
            passes: 0,
        }
    }

    pub fn current_quote(&self) -> &'a str {
        self.order
            .get(self.pos)
            .map(|&i| self.lines[i])
            .unwrap_or_default()
    }

    pub fn visible_text(&self) -> String {
        if self.gap_until.is_some() {
            String::new()
        } else {
            self.writer.visible_text()
        }
    }

    pub fn cursor_visible(&self) -> bool {
        self.writer.cursor_visible()
    }

    /// Completed passes over the whole list.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn update(&mut self, now: f64) {
        loop {
            if let Some(until) = self.gap_until {
                if now < until {
                    return;
                }
                self.gap_until = None;
                self.advance();
                self.writer =
                    Typewriter::new(self.current_quote(), self.style.clone(), until, &mut self.rng);
            }
            self.writer.update(now, &mut self.rng);
            if !self.writer.is_done() || self.order.is_empty() {
                return;
            }
            self.gap_until = Some(now + GAP_SECS);
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
        if self.pos >= self.order.len() {
            self.pos = 0;
            self.passes += 1;
            self.order.shuffle(&mut self.rng);
            debug!("quotes: pass {} done, reshuffled", self.passes);
        }
    }
}

pub async fn run(
    terminal: &mut Tui,
    pump: &mut EventPump,
    mistake_probability: f64,
) -> anyhow::Result<SceneExit> {
    let mut clock = frame_clock(FRAME_MS);
    let mut scene = QuoteLoop::new(LINES, mistake_probability, clock.now(), StdRng::from_entropy());
    loop {
        clock.tick().await;
        if pump.quit_pending() {
            return Ok(SceneExit::Quit);
        }
        scene.update(clock.now());

        let mut spans = vec![Span::styled(scene.visible_text(), Style::default().fg(C_GREEN))];
        if scene.cursor_visible() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled("█", style_cursor_block()));
        }
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(Block::default().style(Style::default().bg(C_BG)), area);
            let row = Rect {
                x: area.x + 1,
                width: area.width.saturating_sub(1),
                height: area.height.min(1),
                ..area
            };
            f.render_widget(Paragraph::new(Line::from(spans)), row);
        })?;
    }
}
