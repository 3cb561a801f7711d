//! Scrolling status ticker.
//!
//! Facts come from a [`FactSource`] on two cadences: network-backed facts at
//! most once per dwell period, the clock on every frame. The composed line is
//! only re-rendered when its text changes.

use std::collections::BTreeMap;

use proxscan_proto::host::SlowFacts;
use unicode_width::UnicodeWidthChar;

pub const FIELD_SEPARATOR: &str = "  |  ";
pub const LOOP_SEPARATOR: &str = "   •   ";
pub const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Version,
    Lan,
    Public,
    Model,
    Os,
    Loc,
    Time,
}

impl Field {
    pub const ORDER: [Field; 7] = [
        Field::Version,
        Field::Lan,
        Field::Public,
        Field::Model,
        Field::Os,
        Field::Loc,
        Field::Time,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Version => "VERSION",
            Field::Lan => "LAN",
            Field::Public => "PUBLIC",
            Field::Model => "MODEL",
            Field::Os => "OS",
            Field::Loc => "LOC",
            Field::Time => "TIME",
        }
    }
}

pub type Fields = BTreeMap<Field, String>;

/// `LABEL value` pairs in display order, upper-cased, NULs removed, with the
/// loop separator appended.
pub fn compose(fields: &Fields) -> String {
    let base = Field::ORDER
        .iter()
        .map(|f| {
            let value = fields.get(f).map(String::as_str).unwrap_or(MISSING);
            format!("{} {}", f.label(), value)
        })
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR);
    let mut out = base.replace('\0', "").to_uppercase();
    out.push_str(LOOP_SEPARATOR);
    out
}

/// Turns ticker text into a drawable form.
pub trait TextRenderer {
    type Rendered;

    fn render(&mut self, text: &str) -> Self::Rendered;

    /// Width of a rendered form, in viewport units.
    fn width(rendered: &Self::Rendered) -> f64;
}

/// Keeps the rendered form of the last text it was asked for.
pub struct RenderCache<R: TextRenderer> {
    renderer: R,
    text: String,
    rendered: Option<R::Rendered>,
}

impl<R: TextRenderer> RenderCache<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            text: String::new(),
            rendered: None,
        }
    }

    /// Rendered form of `text`, rendering only when `text` differs from the
    /// cached key.
    pub fn get(&mut self, text: &str) -> &R::Rendered {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.rendered = None;
        }
        let renderer = &mut self.renderer;
        self.rendered.get_or_insert_with(|| renderer.render(text))
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

/// Horizontal scroll position with wrap-around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scroller {
    pub x: f64,
    pub speed: f64,
}

impl Scroller {
    pub fn new(start_x: f64, speed: f64) -> Self {
        Self { x: start_x, speed }
    }

    /// Returns the position to draw at this frame and moves on. Once the
    /// whole line is past the left edge the position jumps to `viewport`.
    pub fn step(&mut self, width: f64, viewport: f64) -> f64 {
        let draw_at = self.x;
        self.x -= self.speed;
        if self.x < -width {
            self.x = viewport;
        }
        draw_at
    }
}

/// Where the ticker's variable facts come from.
pub trait FactSource {
    /// Network-backed facts. Only called when the dwell period has passed.
    fn slow(&mut self) -> SlowFacts;

    /// Local clock text, called every frame.
    fn clock(&mut self) -> String;
}

pub struct StatusTicker<S: FactSource, R: TextRenderer> {
    source: S,
    fields: Fields,
    dwell: f64,
    last_slow_refresh: Option<f64>,
    text: String,
    cache: RenderCache<R>,
    scroll: Scroller,
}

impl<S: FactSource, R: TextRenderer> StatusTicker<S, R> {
    pub fn new(source: S, renderer: R, fixed: Fields, dwell: f64, scroll: Scroller) -> Self {
        let text = compose(&fixed);
        Self {
            source,
            fields: fixed,
            dwell,
            last_slow_refresh: None,
            text,
            cache: RenderCache::new(renderer),
            scroll,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn renderer(&self) -> &R {
        self.cache.renderer()
    }

    /// Restart the scroll at `x`, typically the right edge.
    pub fn reset_scroll(&mut self, x: f64) {
        self.scroll.x = x;
    }

    fn set(&mut self, field: Field, value: String) -> bool {
        if self.fields.get(&field) == Some(&value) {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    fn set_slow(&mut self, slow: SlowFacts) -> bool {
        let public = self.set(Field::Public, slow.public_ip);
        let loc = self.set(Field::Loc, slow.geo);
        public || loc
    }

    /// Take slow facts that arrived outside a refresh. They show up in the
    /// text at once; the dwell schedule is left alone.
    pub fn apply_slow(&mut self, slow: SlowFacts) -> bool {
        let changed = self.set_slow(slow);
        if changed {
            self.text = compose(&self.fields);
        }
        changed
    }

    /// Pull due facts. Returns whether the composed text changed.
    pub fn refresh(&mut self, now: f64) -> bool {
        let mut changed = false;

        let due = self
            .last_slow_refresh
            .map_or(true, |last| now - last >= self.dwell);
        if due {
            let slow = self.source.slow();
            changed |= self.set_slow(slow);
            self.last_slow_refresh = Some(now);
        }

        let clock = self.source.clock();
        changed |= self.set(Field::Time, clock);

        if changed {
            self.text = compose(&self.fields);
        }
        changed
    }

    /// Refresh, render (cached) and scroll one frame. Returns the draw
    /// position and the rendered line.
    pub fn frame(&mut self, now: f64, viewport: f64) -> (f64, &R::Rendered) {
        self.refresh(now);
        let width = R::width(self.cache.get(&self.text));
        let x = self.scroll.step(width, viewport);
        (x, self.cache.get(&self.text))
    }
}

/// A ticker line laid out into terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLine {
    /// Each glyph with the column it starts at.
    pub glyphs: Vec<(char, usize)>,
    pub width: usize,
}

/// Lays text out by display width.
#[derive(Debug, Default)]
pub struct CellRenderer;

impl TextRenderer for CellRenderer {
    type Rendered = CellLine;

    fn render(&mut self, text: &str) -> CellLine {
        let mut col = 0;
        let mut glyphs = Vec::with_capacity(text.len());
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            glyphs.push((c, col));
            col += w;
        }
        CellLine { glyphs, width: col }
    }

    fn width(rendered: &CellLine) -> f64 {
        rendered.width as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingRenderer {
        renders: usize,
    }

    impl TextRenderer for CountingRenderer {
        type Rendered = usize;

        fn render(&mut self, text: &str) -> usize {
            self.renders += 1;
            text.chars().count()
        }

        fn width(rendered: &usize) -> f64 {
            *rendered as f64
        }
    }

    struct FakeSource {
        public_ip: String,
        clock: String,
        slow_calls: usize,
    }

    impl FactSource for FakeSource {
        fn slow(&mut self) -> SlowFacts {
            self.slow_calls += 1;
            SlowFacts {
                public_ip: self.public_ip.clone(),
                geo: "52.52,13.40".to_string(),
            }
        }

        fn clock(&mut self) -> String {
            self.clock.clone()
        }
    }

    fn fixed() -> Fields {
        let mut f = Fields::new();
        f.insert(Field::Version, "v0.1.0".to_string());
        f.insert(Field::Lan, "192.168.1.20".to_string());
        f
    }

    fn ticker() -> StatusTicker<FakeSource, CountingRenderer> {
        StatusTicker::new(
            FakeSource {
                public_ip: "1.2.3.4".to_string(),
                clock: "12:00:00 UTC".to_string(),
                slow_calls: 0,
            },
            CountingRenderer { renders: 0 },
            fixed(),
            7.0,
            Scroller::new(480.0, 0.25),
        )
    }

    #[test]
    fn test_compose_order_and_missing() {
        let text = compose(&fixed());
        assert_eq!(
            text,
            "VERSION V0.1.0  |  LAN 192.168.1.20  |  PUBLIC N/A  |  MODEL N/A  |  OS N/A  |  LOC N/A  |  TIME N/A   •   "
        );
    }

    #[test]
    fn test_compose_strips_nul() {
        let mut f = Fields::new();
        f.insert(Field::Model, "pi\0 4".to_string());
        assert!(compose(&f).contains("MODEL PI 4"));
    }

    #[test]
    fn test_unchanged_text_reuses_render() {
        let mut t = ticker();
        t.frame(100.0, 480.0);
        t.frame(100.05, 480.0);
        t.frame(100.10, 480.0);
        assert_eq!(t.renderer().renders, 1);
    }

    #[test]
    fn test_one_change_renders_once() {
        let mut t = ticker();
        t.frame(100.0, 480.0);
        t.source_mut().clock = "12:00:01 UTC".to_string();
        t.frame(100.05, 480.0);
        t.frame(100.10, 480.0);
        assert_eq!(t.renderer().renders, 2);
    }

    #[test]
    fn test_slow_facts_respect_dwell() {
        let mut t = ticker();
        t.refresh(100.0);
        t.refresh(103.0);
        t.refresh(106.9);
        assert_eq!(t.source_mut().slow_calls, 1);
        t.refresh(107.0);
        assert_eq!(t.source_mut().slow_calls, 2);
    }

    #[test]
    fn test_slow_change_shows_after_dwell() {
        let mut t = ticker();
        t.refresh(0.0);
        assert!(t.text().contains("PUBLIC 1.2.3.4"));
        t.source_mut().public_ip = "5.6.7.8".to_string();
        assert!(!t.refresh(1.0));
        assert!(t.text().contains("PUBLIC 1.2.3.4"));
        assert!(t.refresh(7.5));
        assert!(t.text().contains("PUBLIC 5.6.7.8"));
    }

    #[test]
    fn test_applied_slow_facts_show_before_dwell() {
        let mut t = ticker();
        t.refresh(0.0);
        assert!(t.apply_slow(SlowFacts {
            public_ip: "9.9.9.9".to_string(),
            geo: "48.85,2.35".to_string(),
        }));
        assert!(t.text().contains("PUBLIC 9.9.9.9"));
        assert!(t.text().contains("LOC 48.85,2.35"));

        t.refresh(1.0);
        assert_eq!(t.source_mut().slow_calls, 1);
        assert!(t.text().contains("PUBLIC 9.9.9.9"));
    }

    #[test]
    fn test_scroll_wraps_to_viewport() {
        let mut s = Scroller::new(-51.0, 0.25);
        s.step(50.0, 480.0);
        assert_eq!(s.x, 480.0);
    }

    #[test]
    fn test_scroll_moves_left() {
        let mut s = Scroller::new(10.0, 0.25);
        assert_eq!(s.step(50.0, 480.0), 10.0);
        assert_eq!(s.x, 9.75);
    }

    #[test]
    fn test_cell_renderer_widths() {
        let line = CellRenderer.render("A•ア");
        assert_eq!(line.glyphs, vec![('A', 0), ('•', 1), ('ア', 2)]);
        assert_eq!(line.width, 4);
    }
}
