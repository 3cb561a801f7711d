//! Typed-text animation.
//!
//! [`Typewriter`] plays a full typing performance: random per-character
//! delays, occasional wrong characters that get backspaced, then an optional
//! hold, blink and delete. [`QuoteLine`] is the light version used under the
//! console title: it only ever grows, one character per interval.

use rand::Rng;

/// Wrong characters inserted by a simulated typo.
pub const MISTAKE_GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789#$%&*+-=/<>";

/// Uniform delay range in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min: f64,
    pub max: f64,
}

impl DelayRange {
    pub fn millis(min: u64, max: u64) -> Self {
        Self {
            min: min as f64 / 1000.0,
            max: max as f64 / 1000.0,
        }
    }

    pub fn fixed(secs: f64) -> Self {
        Self {
            min: secs,
            max: secs,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypingStyle {
    pub char_delay: DelayRange,
    pub mistake_probability: f64,
    pub mistake_delay: DelayRange,
    /// Pause once the whole line is typed.
    pub hold: f64,
    pub blink_count: u32,
    pub blink_on: f64,
    pub blink_off: f64,
    /// Pause between the blink and the deletion pass.
    pub hold_before_delete: f64,
    /// Backspace delay; `None` leaves the line on screen.
    pub delete: Option<DelayRange>,
}

impl TypingStyle {
    /// Mistake probability as a valid chance; NaN disables mistakes.
    fn mistake_chance(&self) -> f64 {
        if self.mistake_probability.is_finite() {
            self.mistake_probability.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Plain typing, no mistakes, nothing after the last character.
    pub fn plain(char_delay: DelayRange) -> Self {
        Self {
            char_delay,
            mistake_probability: 0.0,
            mistake_delay: char_delay,
            hold: 0.0,
            blink_count: 0,
            blink_on: 0.0,
            blink_off: 0.0,
            hold_before_delete: 0.0,
            delete: None,
        }
    }

    /// Rotating quote: typos, hold, three blinks, delete.
    pub fn quote(mistake_probability: f64) -> Self {
        Self {
            char_delay: DelayRange::millis(30, 90),
            mistake_probability,
            mistake_delay: DelayRange::millis(30, 90),
            hold: 0.4,
            blink_count: 3,
            blink_on: 0.25,
            blink_off: 0.2,
            hold_before_delete: 0.15,
            delete: Some(DelayRange::millis(30, 90)),
        }
    }

    /// Intro sentence that is typed, held and deleted.
    pub fn intro() -> Self {
        Self {
            hold: 0.7,
            delete: Some(DelayRange::millis(40, 80)),
            ..Self::plain(DelayRange::millis(70, 140))
        }
    }

    /// Last intro sentence: held, then blinked four times.
    pub fn intro_final() -> Self {
        Self {
            hold: 1.0,
            blink_count: 4,
            blink_on: 0.2,
            blink_off: 0.2,
            ..Self::plain(DelayRange::millis(70, 140))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    MistakeShown,
    MistakeRemoved,
    Holding,
    Blinking { left: u32, on: bool },
    PreDelete,
    Deleting,
    Done,
}

pub struct Typewriter {
    source: Vec<char>,
    style: TypingStyle,
    visible: usize,
    mistake: Option<char>,
    phase: TypingPhase,
    deadline: f64,
}

impl Typewriter {
    /// Start typing `text` at `now`. The first character appears after one
    /// character delay.
    pub fn new<R: Rng + ?Sized>(text: &str, style: TypingStyle, now: f64, rng: &mut R) -> Self {
        let source: Vec<char> = text.chars().collect();
        let deadline = now + style.char_delay.sample(rng);
        let phase = if source.is_empty() {
            TypingPhase::Holding
        } else {
            TypingPhase::Typing
        };
        Self {
            source,
            style,
            visible: 0,
            mistake: None,
            phase,
            deadline,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == TypingPhase::Done
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Typed prefix plus any pending wrong character.
    pub fn visible_text(&self) -> String {
        let mut s: String = self.source[..self.visible].iter().collect();
        if let Some(c) = self.mistake {
            s.push(c);
        }
        s
    }

    /// Cursor block is hidden during the "off" half of each blink.
    pub fn cursor_visible(&self) -> bool {
        !matches!(self.phase, TypingPhase::Blinking { on: false, .. })
    }

    /// Catch up to `now`. Every step is scheduled from the previous
    /// deadline, so a late frame applies all the steps it missed.
    pub fn update<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) {
        while self.phase != TypingPhase::Done && now >= self.deadline {
            self.step(rng);
        }
    }

    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.phase {
            TypingPhase::Typing => {
                let next = self.source[self.visible];
                if next != ' ' && rng.gen_bool(self.style.mistake_chance()) {
                    let wrong = MISTAKE_GLYPHS[rng.gen_range(0..MISTAKE_GLYPHS.len())] as char;
                    self.mistake = Some(wrong);
                    self.phase = TypingPhase::MistakeShown;
                    self.deadline += self.style.mistake_delay.sample(rng);
                } else {
                    self.commit_char(rng);
                }
            }
            TypingPhase::MistakeShown => {
                self.mistake = None;
                self.phase = TypingPhase::MistakeRemoved;
                self.deadline += self.style.mistake_delay.sample(rng);
            }
            TypingPhase::MistakeRemoved => self.commit_char(rng),
            TypingPhase::Holding => {
                if self.style.blink_count > 0 {
                    self.phase = TypingPhase::Blinking {
                        left: self.style.blink_count,
                        on: true,
                    };
                    self.deadline += self.style.blink_on;
                } else {
                    self.phase = TypingPhase::PreDelete;
                }
            }
            TypingPhase::Blinking { left, on: true } => {
                self.phase = TypingPhase::Blinking { left, on: false };
                self.deadline += self.style.blink_off;
            }
            TypingPhase::Blinking { left, on: false } => {
                if left > 1 {
                    self.phase = TypingPhase::Blinking {
                        left: left - 1,
                        on: true,
                    };
                    self.deadline += self.style.blink_on;
                } else {
                    self.phase = TypingPhase::PreDelete;
                    self.deadline += self.style.hold_before_delete;
                }
            }
            TypingPhase::PreDelete => match self.style.delete {
                Some(delay) if self.visible > 0 => {
                    self.phase = TypingPhase::Deleting;
                    self.deadline += delay.sample(rng);
                }
                _ => self.phase = TypingPhase::Done,
            },
            TypingPhase::Deleting => {
                self.visible -= 1;
                if self.visible == 0 {
                    self.phase = TypingPhase::Done;
                } else if let Some(delay) = self.style.delete {
                    self.deadline += delay.sample(rng);
                }
            }
            TypingPhase::Done => {}
        }
    }

    fn commit_char<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.visible += 1;
        if self.visible >= self.source.len() {
            self.phase = TypingPhase::Holding;
            self.deadline += self.style.hold;
        } else {
            self.phase = TypingPhase::Typing;
            self.deadline += self.style.char_delay.sample(rng);
        }
    }
}

/// Quote under the console title. Grows by at most one character per call to
/// [`QuoteLine::tick`], once `interval` has passed since the last step.
#[derive(Debug, Clone)]
pub struct QuoteLine {
    text: String,
    len: usize,
    visible: usize,
    interval: f64,
    last_step: f64,
}

impl QuoteLine {
    pub fn new(interval: f64) -> Self {
        Self {
            text: String::new(),
            len: 0,
            visible: 0,
            interval,
            last_step: 0.0,
        }
    }

    pub fn restart(&mut self, text: &str, now: f64) {
        self.text = text.to_string();
        self.len = text.chars().count();
        self.visible = 0;
        self.last_step = now;
    }

    pub fn tick(&mut self, now: f64) {
        if self.visible < self.len && now - self.last_step >= self.interval {
            self.visible += 1;
            self.last_step = now;
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn visible_text(&self) -> String {
        self.text.chars().take(self.visible).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.visible >= self.len
    }
}
