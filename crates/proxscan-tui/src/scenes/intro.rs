//! Intro scene: a few typed sentences, then a shell-style loader whose
//! commands are typed and whose responses appear at once.

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tracing::debug;

use crate::{
    anim::typing::{DelayRange, TypingStyle, Typewriter},
    terminal::{EventPump, Tui},
    theme::{style_cursor_block, C_BG, C_GREEN, C_LOADER_RESPONSE},
};

use super::{frame_clock, SceneExit};

pub const SENTENCES: [&str; 4] = [
    "Wake up, Neo",
    "The Matrix has you...",
    "Follow the white rabbit.",
    "Knock, knock, Neo.",
];

pub const PROMPT: &str = "zion@nebuchadnezzar:~# ";

pub const LOADER_SCRIPT: [(&str, &str); 4] = [
    ("Boot Nebuchadnezzar.os", "nebuchadnezzar: core systems online"),
    (
        "scan_matrix --trace-signal neo",
        "matrix: carrier signal locked | host: NEO | status: AWAKE",
    ),
    (
        "open_tunnel --zion-mainframe --stealth",
        "tunnel: encrypted backdoor opened | route: zion/core/matrix",
    ),
    (
        "establish_link --agent-free",
        "link: secure channel established | agents: NOT PRESENT",
    ),
];

pub const SECURING_LABEL: &str = "Securing link against Agents";

const FRAME_MS: u64 = 30;
const COMMAND_PAUSE: f64 = 0.12;
const RESPONSE_PAUSE: f64 = 0.15;
const DOT_PERIOD: f64 = 0.25;
const SECURING_SECS: f64 = 4.0;
const SETTLE_SECS: f64 = 0.6;
/// First loader row.
const LOADER_TOP: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Command,
    Response,
}

enum Stage {
    Sentence { index: usize, writer: Typewriter },
    Command { index: usize, writer: Typewriter },
    CommandPause { index: usize, until: f64 },
    Response { index: usize, until: f64 },
    Securing { started: f64 },
    Settle { until: f64, dots: usize },
    Done,
}

/// The whole intro as a state machine over explicit time.
pub struct IntroScene {
    stage: Stage,
    history: Vec<(String, LineKind)>,
    rng: StdRng,
}

fn sentence_style(index: usize) -> TypingStyle {
    if index + 1 == SENTENCES.len() {
        TypingStyle::intro_final()
    } else {
        TypingStyle::intro()
    }
}

fn command_text(index: usize) -> String {
    format!("{}{}", PROMPT, LOADER_SCRIPT[index].0)
}

/// 0-8 trailing dots, one more every quarter second.
pub fn securing_dots(elapsed: f64) -> usize {
    ((elapsed.max(0.0) / DOT_PERIOD).floor() as usize) % 9
}

impl IntroScene {
    pub fn new(now: f64, mut rng: StdRng) -> Self {
        let writer = Typewriter::new(SENTENCES[0], sentence_style(0), now, &mut rng);
        Self {
            stage: Stage::Sentence { index: 0, writer },
            history: Vec::new(),
            rng,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    pub fn history(&self) -> &[(String, LineKind)] {
        &self.history
    }

    pub fn in_loader(&self) -> bool {
        !matches!(self.stage, Stage::Sentence { .. })
    }

    /// Line being written right now, with whether the cursor block shows.
    pub fn current(&self, now: f64) -> Option<(String, LineKind, bool)> {
        match &self.stage {
            Stage::Sentence { writer, .. } => Some((
                writer.visible_text(),
                LineKind::Command,
                writer.cursor_visible(),
            )),
            Stage::Command { writer, .. } => {
                Some((writer.visible_text(), LineKind::Command, true))
            }
            Stage::CommandPause { .. } => None,
            Stage::Response { index, .. } => Some((
                LOADER_SCRIPT[*index].1.to_string(),
                LineKind::Response,
                false,
            )),
            Stage::Securing { started } => Some((
                format!("{}{}", SECURING_LABEL, ".".repeat(securing_dots(now - started))),
                LineKind::Response,
                true,
            )),
            Stage::Settle { dots, .. } => Some((
                format!("{}{}", SECURING_LABEL, ".".repeat(*dots)),
                LineKind::Response,
                true,
            )),
            Stage::Done => None,
        }
    }

    pub fn update(&mut self, now: f64) {
        loop {
            let rng = &mut self.rng;
            let next = match &mut self.stage {
                Stage::Sentence { index, writer } => {
                    writer.update(now, rng);
                    if !writer.is_done() {
                        return;
                    }
                    let i = *index + 1;
                    if i < SENTENCES.len() {
                        Stage::Sentence {
                            index: i,
                            writer: Typewriter::new(SENTENCES[i], sentence_style(i), now, rng),
                        }
                    } else {
                        debug!("intro: loader");
                        Stage::Command {
                            index: 0,
                            writer: Typewriter::new(
                                &command_text(0),
                                TypingStyle::plain(DelayRange::millis(25, 55)),
                                now,
                                rng,
                            ),
                        }
                    }
                }
                Stage::Command { index, writer } => {
                    writer.update(now, rng);
                    if !writer.is_done() {
                        return;
                    }
                    self.history.push((command_text(*index), LineKind::Command));
                    Stage::CommandPause {
                        index: *index,
                        until: now + COMMAND_PAUSE,
                    }
                }
                Stage::CommandPause { index, until } => {
                    if now < *until {
                        return;
                    }
                    Stage::Response {
                        index: *index,
                        until: now + RESPONSE_PAUSE,
                    }
                }
                Stage::Response { index, until } => {
                    if now < *until {
                        return;
                    }
                    self.history
                        .push((LOADER_SCRIPT[*index].1.to_string(), LineKind::Response));
                    let i = *index + 1;
                    if i < LOADER_SCRIPT.len() {
                        Stage::Command {
                            index: i,
                            writer: Typewriter::new(
                                &command_text(i),
                                TypingStyle::plain(DelayRange::millis(25, 55)),
                                now,
                                rng,
                            ),
                        }
                    } else {
                        Stage::Securing { started: now }
                    }
                }
                Stage::Securing { started } => {
                    let elapsed = now - *started;
                    if elapsed < SECURING_SECS {
                        return;
                    }
                    Stage::Settle {
                        until: now + SETTLE_SECS,
                        dots: securing_dots(elapsed),
                    }
                }
                Stage::Settle { until, .. } => {
                    if now < *until {
                        return;
                    }
                    Stage::Done
                }
                Stage::Done => return,
            };
            self.stage = next;
        }
    }
}

fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Command => Style::default().fg(C_GREEN),
        LineKind::Response => Style::default().fg(C_LOADER_RESPONSE),
    }
}

fn current_line(text: String, kind: LineKind, cursor: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(text, line_style(kind))];
    if cursor {
        spans.push(Span::raw(" "));
        spans.push(Span::styled("█", style_cursor_block()));
    }
    Line::from(spans)
}

fn draw(frame: &mut Frame, scene: &IntroScene, now: f64) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);
    let inner = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(1),
        ..area
    };

    if !scene.in_loader() {
        if let Some((text, kind, cursor)) = scene.current(now) {
            let row = Rect { height: 1.min(inner.height), ..inner };
            frame.render_widget(Paragraph::new(current_line(text, kind, cursor)), row);
        }
        return;
    }

    let mut lines: Vec<Line> = scene
        .history()
        .iter()
        .map(|(text, kind)| Line::from(Span::styled(text.clone(), line_style(*kind))))
        .collect();
    if let Some((text, kind, cursor)) = scene.current(now) {
        lines.push(current_line(text, kind, cursor));
    }
    let body = Rect {
        y: inner.y + LOADER_TOP.min(inner.height),
        height: inner.height.saturating_sub(LOADER_TOP),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines), body);
}

pub async fn run(terminal: &mut Tui, pump: &mut EventPump) -> anyhow::Result<SceneExit> {
    let mut clock = frame_clock(FRAME_MS);
    let mut scene = IntroScene::new(clock.now(), StdRng::from_entropy());
    loop {
        clock.tick().await;
        if pump.quit_pending() {
            return Ok(SceneExit::Quit);
        }
        let now = clock.now();
        scene.update(now);
        if scene.is_done() {
            return Ok(SceneExit::Finished);
        }
        terminal.draw(|f| draw(f, &scene, now))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> IntroScene {
        IntroScene::new(0.0, StdRng::seed_from_u64(5))
    }

    fn run_until(scene: &mut IntroScene, from: f64, to: f64) -> f64 {
        let mut t = from;
        while t < to && !scene.is_done() {
            t += 0.03;
            scene.update(t);
        }
        t
    }

    #[test]
    fn test_dots_cycle() {
        assert_eq!(securing_dots(0.0), 0);
        assert_eq!(securing_dots(0.26), 1);
        assert_eq!(securing_dots(2.0), 8);
        assert_eq!(securing_dots(2.25), 0);
    }

    #[test]
    fn test_first_sentence_types_out() {
        let mut s = scene();
        run_until(&mut s, 0.0, 1.5);
        let (text, _, _) = s.current(1.5).expect("typing line");
        assert!(SENTENCES[0].starts_with(&text));
        assert!(!text.is_empty());
    }

    #[test]
    fn test_loader_history_in_order() {
        let mut s = scene();
        let t = run_until(&mut s, 0.0, 120.0);
        assert!(s.is_done());
        assert!(t < 60.0);
        let history = s.history();
        assert_eq!(history.len(), LOADER_SCRIPT.len() * 2);
        assert_eq!(history[0].0, format!("{}Boot Nebuchadnezzar.os", PROMPT));
        assert_eq!(history[0].1, LineKind::Command);
        assert_eq!(history[1].0, "nebuchadnezzar: core systems online");
        assert_eq!(history[1].1, LineKind::Response);
        assert_eq!(history[7].0, LOADER_SCRIPT[3].1);
    }

    #[test]
    fn test_securing_runs_four_seconds() {
        let mut s = scene();
        let mut t = 0.0;
        while !matches!(s.stage, Stage::Securing { .. }) {
            t += 0.03;
            s.update(t);
        }
        let started = t;
        s.update(started + 3.9);
        assert!(matches!(s.stage, Stage::Securing { .. }));
        s.update(started + 4.01);
        assert!(matches!(s.stage, Stage::Settle { .. }));
        s.update(started + 4.7);
        assert!(s.is_done());
    }
}
