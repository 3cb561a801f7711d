//! QuoteBar component — a random quote typed out under the title, replaced
//! after every scan.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use crate::{
    action::{Action, ComponentId},
    anim::blink_on,
    anim::typing::QuoteLine,
    app_state::AppState,
    component::Component,
    quotes::LINES,
    theme::{style_cursor_block, C_QUOTE},
};

pub struct QuoteBar {
    line: QuoteLine,
    rng: StdRng,
}

impl QuoteBar {
    pub fn new(char_interval: f64, now: f64) -> Self {
        let mut bar = Self {
            line: QuoteLine::new(char_interval),
            rng: StdRng::from_entropy(),
        };
        bar.next_quote(now);
        bar
    }

    fn next_quote(&mut self, now: f64) {
        let quote = LINES.choose(&mut self.rng).copied().unwrap_or_default();
        debug!("quote: {}", quote);
        self.line.restart(quote, now);
    }

    pub fn visible_text(&self) -> String {
        self.line.visible_text()
    }
}

impl Component for QuoteBar {
    fn id(&self) -> ComponentId {
        ComponentId::QuoteBar
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        self.line.tick(state.now);
        Vec::new()
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::ScanCompleted = action {
            self.next_quote(state.now);
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let cursor = if blink_on(state.now, 2.0) { "█" } else { " " };
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(self.line.visible_text(), Style::default().fg(C_QUOTE)),
            Span::raw(" "),
            Span::styled(cursor, style_cursor_block()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
