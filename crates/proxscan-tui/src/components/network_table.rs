//! NetworkTable component — latest scan, one row per access point.
//!
//! Left click on a row toggles its lab flag.

use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use proxscan_proto::network::Network;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{rgb, style_separator, Rgb, C_DIM_WHITE},
};

const SSID_WIDTH: usize = 18;
const SEC_WIDTH: usize = 4;
const BAR_GLYPHS: [char; 4] = ['▂', '▄', '▆', '█'];
const LAB_MARK: &str = "✔";

/// Green scaled by signal strength.
pub fn signal_color(signal: u8) -> Rgb {
    let s = signal.min(100) as f64 / 100.0;
    (0, (80.0 + 175.0 * s) as u8, 0)
}

/// Row color, brightened for lab devices.
pub fn row_color(signal: u8, lab_active: bool) -> Rgb {
    let base = signal_color(signal);
    if lab_active {
        (0, base.1.max(240), 0)
    } else {
        base
    }
}

/// Number of filled bars, 0-4.
pub fn signal_level(signal: u8) -> usize {
    match signal {
        80.. => 4,
        60..=79 => 3,
        40..=59 => 2,
        20..=39 => 1,
        _ => 0,
    }
}

fn fit(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn row_line(net: &Network, lab_active: bool) -> Line<'static> {
    let color = Style::default().fg(rgb(row_color(net.signal, lab_active)));
    let dim = Style::default().fg(C_DIM_WHITE);
    let level = signal_level(net.signal);

    let mut spans = vec![
        Span::styled(format!(" {}  ", fit(&net.ssid, SSID_WIDTH)), color),
        Span::styled(format!("{}  ", fit(&net.security, SEC_WIDTH)), color),
    ];
    for (i, glyph) in BAR_GLYPHS.iter().enumerate() {
        let style = if i < level { color } else { dim };
        spans.push(Span::styled(glyph.to_string(), style));
    }
    spans.push(Span::styled(format!(" {:>3}%  ", net.signal), color));
    if lab_active {
        spans.push(Span::styled(LAB_MARK, color));
    }
    Line::from(spans)
}

/// Counts shown in the table's top rule.
fn summary_label(state: &AppState) -> String {
    match &state.last_report {
        Some(r) => format!(
            " {} IN RANGE  {} NEW  {} KNOWN ",
            r.observed,
            r.new_devices,
            state.store.discovered().len()
        ),
        None => String::new(),
    }
}

pub struct NetworkTable {
    /// Screen row → hardware address, from the last draw.
    row_map: Vec<(u16, String)>,
}

impl NetworkTable {
    pub fn new() -> Self {
        Self {
            row_map: Vec::new(),
        }
    }

    pub fn bssid_at(&self, row: u16) -> Option<&str> {
        self.row_map
            .iter()
            .find(|(y, _)| *y == row)
            .map(|(_, b)| b.as_str())
    }
}

impl Component for NetworkTable {
    fn id(&self) -> ComponentId {
        ComponentId::NetworkTable
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            if let Some(bssid) = self.bssid_at(event.row) {
                return vec![Action::ToggleLab(bssid.to_string())];
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.row_map.clear();
        if area.height == 0 {
            return;
        }

        let summary = summary_label(state);
        let fill = (area.width as usize).saturating_sub(summary.chars().count() + 4);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" ──{}{}", summary, "─".repeat(fill)),
                style_separator(),
            ))),
            Rect { height: 1, ..area },
        );

        let rows = area.height.saturating_sub(1) as usize;
        let mut lines = Vec::with_capacity(rows);
        for (i, net) in state.networks.iter().take(rows).enumerate() {
            let lab_active = state.store.is_lab_active(&net.bssid);
            lines.push(row_line(net, lab_active));
            if !net.bssid.is_empty() {
                self.row_map.push((area.y + 1 + i as u16, net.bssid.clone()));
            }
        }

        let body = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };
        frame.render_widget(Paragraph::new(lines), body);
    }

    fn height(&self) -> u16 {
        0
    }
}
