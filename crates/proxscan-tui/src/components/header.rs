//! Header component — one row: animated title, version tag, countdown.
//!
//! Not focusable.

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::ComponentId,
    anim::countdown::{countdown_view, CountdownView},
    anim::reveal::{scanning_frame, FlashTiming, TitleFrame, TitleReveal},
    app_state::AppState,
    component::Component,
    theme::{rgb, style_accent, style_title, style_version, C_BG},
};

pub struct Header {
    reveal: TitleReveal,
    rng: StdRng,
}

impl Header {
    pub fn new(timing: FlashTiming) -> Self {
        Self {
            reveal: TitleReveal::new(timing),
            rng: StdRng::from_entropy(),
        }
    }

    fn title_frame(&mut self, state: &AppState) -> TitleFrame {
        if state.cycle.scanning() {
            scanning_frame(&state.title, state.now)
        } else {
            self.reveal.frame(
                &state.title,
                state.cycle.elapsed,
                state.interval,
                state.now,
                &mut self.rng,
            )
        }
    }
}

fn title_line(title: &TitleFrame, version: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::with_capacity(title.glyphs.len() + 3);
    spans.push(Span::raw(" "));
    for &(c, color) in &title.glyphs {
        spans.push(Span::styled(c.to_string(), style_title().fg(rgb(color))));
    }
    spans.push(Span::styled(title.caret.to_string(), style_accent()));
    if !version.is_empty() {
        spans.push(Span::styled(format!(" {}", version), style_version()));
    }
    Line::from(spans)
}

fn countdown_line(view: &CountdownView) -> Line<'static> {
    match view {
        CountdownView::Scanning => {
            Line::from(Span::styled(view.label(), style_accent())).right_aligned()
        }
        CountdownView::Remaining {
            number,
            color,
            number_hidden,
        } => {
            let fg = if *number_hidden { C_BG } else { rgb(*color) };
            Line::from(vec![
                Span::styled(number.clone(), Style::default().fg(fg)),
                Span::styled("s ", Style::default().fg(rgb(*color))),
            ])
            .right_aligned()
        }
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let view = countdown_view(state.cycle.remaining, state.cycle.scanning(), state.now);
        let countdown_w = (view.label().width() + 1) as u16;

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(countdown_w)])
            .split(area);

        let title = self.title_frame(state);
        frame.render_widget(Paragraph::new(title_line(&title, &state.version)), cols[0]);
        frame.render_widget(Paragraph::new(countdown_line(&view)), cols[1]);
    }
}
