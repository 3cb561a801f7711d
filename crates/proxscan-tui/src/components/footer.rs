//! Footer component — separator plus the scrolling status ticker.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use proxscan_proto::host::{self, SlowFacts, StaticFacts};

use crate::{
    action::ComponentId,
    anim::ticker::{CellLine, CellRenderer, FactSource, Field, Fields, Scroller, StatusTicker},
    app::AppMessage,
    app_state::AppState,
    component::Component,
    theme::{style_accent, style_separator},
};

/// Host facts backed by the network. `slow()` answers from the last
/// delivered result and kicks off a background refresh; the result comes
/// back through the app's message channel and is handed over with
/// [`Footer::deliver`], which also puts it on the ticker straight away.
pub struct LiveFacts {
    client: reqwest::Client,
    tx: mpsc::Sender<AppMessage>,
    latest: SlowFacts,
    in_flight: bool,
}

impl LiveFacts {
    pub fn new(client: reqwest::Client, tx: mpsc::Sender<AppMessage>) -> Self {
        Self {
            client,
            tx,
            latest: SlowFacts::default(),
            in_flight: false,
        }
    }

    /// Start a fetch unless one is already running.
    pub fn request(&mut self) {
        if self.in_flight {
            trace!("facts: fetch already in flight");
            return;
        }
        self.in_flight = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let facts = host::slow_facts(&client).await;
            debug!("facts: public={} geo={}", facts.public_ip, facts.geo);
            let _ = tx.send(AppMessage::SlowFacts(facts)).await;
        });
    }

    pub fn deliver(&mut self, facts: SlowFacts) {
        self.latest = facts;
        self.in_flight = false;
    }
}

impl FactSource for LiveFacts {
    fn slow(&mut self) -> SlowFacts {
        self.request();
        self.latest.clone()
    }

    fn clock(&mut self) -> String {
        host::local_time()
    }
}

/// Copy a laid-out line into one buffer row starting at column `x`
/// (relative to `area`, may be negative). Glyphs outside the area are
/// dropped.
pub fn paint_line(buf: &mut Buffer, area: Rect, x: f64, line: &CellLine, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let origin = x.floor() as i64;
    let right = area.width as i64;
    let mut utf8 = [0u8; 4];
    for &(c, col) in &line.glyphs {
        let at = origin + col as i64;
        if at < 0 {
            continue;
        }
        if at >= right {
            break;
        }
        let cell = &mut buf[(area.x + at as u16, area.y)];
        cell.set_symbol(c.encode_utf8(&mut utf8));
        cell.set_style(style);
    }
}

pub struct Footer {
    ticker: StatusTicker<LiveFacts, CellRenderer>,
    started: bool,
}

impl Footer {
    pub fn new(
        version: &str,
        facts: StaticFacts,
        source: LiveFacts,
        dwell: f64,
        speed: f64,
    ) -> Self {
        let mut fixed = Fields::new();
        fixed.insert(Field::Version, version.to_string());
        fixed.insert(Field::Lan, facts.lan_ip);
        fixed.insert(Field::Model, facts.model);
        fixed.insert(Field::Os, facts.os);
        Self {
            ticker: StatusTicker::new(source, CellRenderer, fixed, dwell, Scroller::new(0.0, speed)),
            started: false,
        }
    }

    /// Store a finished fetch and show it on the next frame.
    pub fn deliver(&mut self, facts: SlowFacts) {
        self.ticker.source_mut().deliver(facts.clone());
        self.ticker.apply_slow(facts);
    }
}

impl Component for Footer {
    fn id(&self) -> ComponentId {
        ComponentId::Footer
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let sep = "─".repeat(area.width.saturating_sub(2) as usize);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {}", sep), style_separator()))),
            Rect { height: 1, ..area },
        );
        if area.height < 2 {
            return;
        }

        let row = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        let viewport = row.width as f64;
        if !self.started {
            self.ticker.reset_scroll(viewport);
            self.started = true;
        }
        let (x, line) = self.ticker.frame(state.now, viewport);
        paint_line(frame.buffer_mut(), row, x, line, style_accent());
    }

    fn height(&self) -> u16 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ticker::TextRenderer;

    fn row_text(buf: &Buffer, area: Rect) -> String {
        (area.x..area.x + area.width)
            .map(|x| buf[(x, area.y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_delivered_facts_reach_ticker_text() {
        let (tx, _rx) = mpsc::channel(1);
        let facts = StaticFacts {
            lan_ip: "192.168.1.20".to_string(),
            model: "RASPBERRY PI 4".to_string(),
            os: "DEBIAN".to_string(),
        };
        let mut footer = Footer::new("v0.1.0", facts, LiveFacts::new(host::http_client(), tx), 7.0, 0.25);
        assert!(footer.ticker.text().contains("PUBLIC N/A"));

        footer.deliver(SlowFacts {
            public_ip: "1.2.3.4".to_string(),
            geo: "52.52,13.40".to_string(),
        });
        assert!(footer.ticker.text().contains("PUBLIC 1.2.3.4"));
        assert!(footer.ticker.text().contains("LOC 52.52,13.40"));
    }

    #[test]
    fn test_paint_clips_left_edge() {
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        let line = CellRenderer.render("ABCDEFGH");
        paint_line(&mut buf, area, -1.5, &line, Style::default());
        assert_eq!(row_text(&buf, area), "CDEFGH");
    }

    #[test]
    fn test_paint_clips_right_edge() {
        let area = Rect::new(2, 1, 6, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        let line = CellRenderer.render("XYZ");
        paint_line(&mut buf, area, 4.0, &line, Style::default());
        assert_eq!(row_text(&buf, area), "    XY");
    }
}
