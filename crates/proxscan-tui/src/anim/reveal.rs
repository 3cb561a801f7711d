//! Title "de-hash" animation.
//!
//! Over one scan cycle the title goes from fully scrambled to fully legible,
//! left to right. The last second of every cycle is always legible. Each
//! glyph flashes white when it is revealed, then fades into the accent color.

use std::collections::HashMap;

use rand::Rng;

use super::blink_on;
use crate::theme::{lerp_color, Rgb, RGB_ACCENT, RGB_FLASH};

/// Glyphs drawn in place of unrevealed characters.
pub const SCRAMBLE_GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#$%&@\\/_<>[]{}()=-_";

pub const CARET: char = '▌';

/// Number of leading characters shown as-is.
///
/// `cycle_len <= 1` is always fully revealed. Otherwise the reveal runs over
/// the first `cycle_len - 1` seconds and the rest of the cycle is legible.
pub fn reveal_progress(len: usize, cycle_elapsed: f64, cycle_len: f64) -> usize {
    if cycle_len <= 1.0 || len == 0 {
        return len;
    }
    let window = cycle_len - 1.0;
    let t = cycle_elapsed.rem_euclid(cycle_len);
    if t >= window {
        return len;
    }
    let p = ((t / window) * len as f64).floor();
    if p.is_nan() || p < 0.0 {
        0
    } else {
        (p as usize).min(len)
    }
}

/// Replace every non-space character at or after `progress` with a random
/// glyph. A fresh glyph is drawn on every call.
pub fn scramble<R: Rng + ?Sized>(text: &str, progress: usize, rng: &mut R) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            if c == ' ' || i < progress {
                c
            } else {
                SCRAMBLE_GLYPHS[rng.gen_range(0..SCRAMBLE_GLYPHS.len())] as char
            }
        })
        .collect()
}

/// Green for unrevealed glyphs, pulsing with a period of about 2.1 s.
pub fn pulse_green(now: f64) -> Rgb {
    let g = 150.0 + 105.0 * (0.5 + 0.5 * (now * 3.0).sin());
    (0, g.clamp(0.0, 255.0) as u8, 0)
}

/// Caret glyph for this frame; a space while hidden so the width is stable.
pub fn caret(now: f64) -> char {
    if blink_on(now, 2.0) {
        CARET
    } else {
        ' '
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashTiming {
    /// Seconds a freshly revealed glyph stays in the flash color.
    pub flash: f64,
    /// Seconds to fade from the flash color to the accent.
    pub fade: f64,
}

impl FlashTiming {
    pub fn from_millis(flash_ms: u64, fade_ms: u64) -> Self {
        Self {
            flash: flash_ms as f64 / 1000.0,
            fade: fade_ms as f64 / 1000.0,
        }
    }

    /// Color of a glyph revealed at `revealed_at`.
    pub fn color_at(&self, revealed_at: f64, now: f64) -> Rgb {
        let dt = now - revealed_at;
        if dt < self.flash {
            RGB_FLASH
        } else if dt < self.flash + self.fade {
            lerp_color(RGB_FLASH, RGB_ACCENT, (dt - self.flash) / self.fade)
        } else {
            RGB_ACCENT
        }
    }
}

impl Default for FlashTiming {
    fn default() -> Self {
        Self::from_millis(150, 600)
    }
}

/// One rendered title: colored glyphs plus the caret.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleFrame {
    pub glyphs: Vec<(char, Rgb)>,
    pub progress: usize,
    pub caret: char,
}

impl TitleFrame {
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|(c, _)| *c).collect()
    }
}

/// Per-title reveal state. Remembers when each index was first revealed in
/// the current cycle.
#[derive(Debug, Clone, Default)]
pub struct TitleReveal {
    timing: FlashTiming,
    revealed_at: HashMap<usize, f64>,
    last_title: String,
    last_progress: usize,
}

impl TitleReveal {
    pub fn new(timing: FlashTiming) -> Self {
        Self {
            timing,
            ..Default::default()
        }
    }

    /// Reveal time of `index`, if it has been revealed this cycle.
    pub fn revealed_at(&self, index: usize) -> Option<f64> {
        self.revealed_at.get(&index).copied()
    }

    pub fn tracked(&self) -> usize {
        self.revealed_at.len()
    }

    /// Compute the countdown-phase title for this frame.
    pub fn frame<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        cycle_elapsed: f64,
        cycle_len: f64,
        now: f64,
        rng: &mut R,
    ) -> TitleFrame {
        let len = text.chars().count();
        let progress = reveal_progress(len, cycle_elapsed, cycle_len);

        if text != self.last_title || progress < self.last_progress {
            self.revealed_at.clear();
            self.last_title.clear();
            self.last_title.push_str(text);
        }
        self.last_progress = progress;

        for i in 0..progress {
            self.revealed_at.entry(i).or_insert(now);
        }

        let pulse = pulse_green(now);
        let glyphs = scramble(text, progress, rng)
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let color = match self.revealed_at.get(&i) {
                    Some(&at) if i < progress => self.timing.color_at(at, now),
                    _ => pulse,
                };
                (c, color)
            })
            .collect();

        TitleFrame {
            glyphs,
            progress,
            caret: caret(now),
        }
    }
}

/// Title while a scan is pending: plain text in the accent color.
pub fn scanning_frame(text: &str, now: f64) -> TitleFrame {
    TitleFrame {
        glyphs: text.chars().map(|c| (c, RGB_ACCENT)).collect(),
        progress: text.chars().count(),
        caret: caret(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TITLE: &str = "~/MATRIX PROXIMITY NET SCAN//";

    #[test]
    fn test_degenerate_cycle_is_revealed() {
        for e in [0.0, 0.3, 0.99, 5.0] {
            assert_eq!(reveal_progress(10, e, 1.0), 10);
            assert_eq!(reveal_progress(10, e, 0.0), 10);
        }
    }

    #[test]
    fn test_progress_monotone_within_cycle() {
        for &l in &[1.5, 2.0, 7.0, 21.0] {
            let mut prev = 0;
            let steps = 2000;
            for k in 0..steps {
                let e = l * k as f64 / steps as f64;
                let p = reveal_progress(29, e, l);
                assert!(p >= prev, "L={} e={} p={} prev={}", l, e, p, prev);
                assert!(p <= 29);
                prev = p;
            }
        }
    }

    #[test]
    fn test_final_window_fully_revealed() {
        for e in [20.0, 20.25, 20.5, 20.999] {
            assert_eq!(reveal_progress(29, e, 21.0), 29);
        }
        // next cycle starts scrambled again
        assert_eq!(reveal_progress(29, 21.0, 21.0), 0);
        assert_eq!(reveal_progress(29, 10.0, 21.0), 14);
    }

    #[test]
    fn test_scramble_keeps_spaces_and_prefix() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = scramble("AB CD EF", 2, &mut rng);
        let chars: Vec<char> = out.chars().collect();
        assert_eq!(chars.len(), 8);
        assert_eq!(&chars[..2], &['A', 'B']);
        assert_eq!(chars[2], ' ');
        assert_eq!(chars[5], ' ');
        for &c in &[chars[3], chars[4], chars[6], chars[7]] {
            assert!(SCRAMBLE_GLYPHS.contains(&(c as u8)));
        }
    }

    #[test]
    fn test_scramble_deterministic_with_seed() {
        let a = scramble(TITLE, 3, &mut StdRng::seed_from_u64(42));
        let b = scramble(TITLE, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_flash_then_fade_then_accent() {
        let t = FlashTiming::from_millis(150, 600);
        assert_eq!(t.color_at(10.0, 10.0), RGB_FLASH);
        assert_eq!(t.color_at(10.0, 10.1), RGB_FLASH);
        let mid = t.color_at(10.0, 10.45);
        assert_ne!(mid, RGB_FLASH);
        assert_ne!(mid, RGB_ACCENT);
        assert_eq!(t.color_at(10.0, 10.75), RGB_ACCENT);
        assert_eq!(t.color_at(10.0, 30.0), RGB_ACCENT);
    }

    #[test]
    fn test_reveal_timestamps_recorded_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = TitleReveal::new(FlashTiming::default());

        let f = r.frame("ABCDEFGHIJ", 5.0, 11.0, 100.0, &mut rng);
        assert_eq!(f.progress, 5);
        assert_eq!(r.revealed_at(0), Some(100.0));
        assert_eq!(r.revealed_at(4), Some(100.0));
        assert_eq!(r.revealed_at(5), None);

        let f = r.frame("ABCDEFGHIJ", 6.0, 11.0, 101.0, &mut rng);
        assert_eq!(f.progress, 6);
        assert_eq!(r.revealed_at(0), Some(100.0));
        assert_eq!(r.revealed_at(5), Some(101.0));
        assert_eq!(f.glyphs[5], ('F', RGB_FLASH));
        assert_eq!(f.glyphs[0], ('A', RGB_ACCENT));
    }

    #[test]
    fn test_progress_regression_clears_timestamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = TitleReveal::new(FlashTiming::default());
        r.frame("ABCDEFGHIJ", 9.0, 11.0, 100.0, &mut rng);
        assert_eq!(r.tracked(), 9);

        // new cycle
        let f = r.frame("ABCDEFGHIJ", 11.5, 11.0, 102.5, &mut rng);
        assert_eq!(f.progress, 0);
        assert_eq!(r.tracked(), 0);
    }

    #[test]
    fn test_title_change_clears_timestamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = TitleReveal::new(FlashTiming::default());
        r.frame("ABCDEFGHIJ", 9.0, 11.0, 100.0, &mut rng);
        r.frame("KLMNOPQRST", 9.0, 11.0, 105.0, &mut rng);
        assert_eq!(r.revealed_at(0), Some(105.0));
    }

    #[test]
    fn test_unrevealed_glyphs_pulse() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut r = TitleReveal::new(FlashTiming::default());
        let f = r.frame("ABCDEFGHIJ", 0.0, 11.0, 50.0, &mut rng);
        assert_eq!(f.progress, 0);
        assert!(f.glyphs.iter().all(|(_, c)| *c == pulse_green(50.0)));
    }

    #[test]
    fn test_pulse_range() {
        for k in 0..100 {
            let (r, g, b) = pulse_green(k as f64 * 0.037);
            assert_eq!((r, b), (0, 0));
            assert!((150..=255).contains(&g));
        }
    }

    #[test]
    fn test_caret_toggles_at_2hz() {
        assert_eq!(caret(4.0), CARET);
        assert_eq!(caret(4.6), ' ');
    }

    #[test]
    fn test_scanning_frame_is_plain_accent() {
        let f = scanning_frame(TITLE, 0.0);
        assert_eq!(f.text(), TITLE);
        assert!(f.glyphs.iter().all(|(_, c)| *c == RGB_ACCENT));
    }
}
