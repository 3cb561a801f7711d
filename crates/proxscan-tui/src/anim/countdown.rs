use super::blink_on;
use crate::theme::{lerp_color, Rgb, RGB_ACCENT, RGB_DANGER, RGB_GREEN, RGB_WARNING};

pub const SCANNING_LABEL: &str = "SCANNING...";

/// Base countdown color for `remaining` seconds.
///
/// Green above 15 s, green to yellow from 15 to 10, yellow to red from 10 to
/// 5, red below that.
pub fn countdown_color(remaining: f64) -> Rgb {
    let r = remaining.max(0.0);
    if r > 15.0 {
        RGB_GREEN
    } else if r > 10.0 {
        lerp_color(RGB_GREEN, RGB_WARNING, (15.0 - r) / 5.0)
    } else if r > 5.0 {
        lerp_color(RGB_WARNING, RGB_DANGER, (10.0 - r) / 5.0)
    } else {
        RGB_DANGER
    }
}

/// The countdown area for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownView {
    Scanning,
    Remaining {
        /// Whole seconds, without the `s` suffix.
        number: String,
        color: Rgb,
        /// The number is drawn in the background color this frame.
        number_hidden: bool,
    },
}

impl CountdownView {
    /// Full label text, used for layout.
    pub fn label(&self) -> String {
        match self {
            CountdownView::Scanning => SCANNING_LABEL.to_string(),
            CountdownView::Remaining { number, .. } => format!("{}s", number),
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            CountdownView::Scanning => RGB_ACCENT,
            CountdownView::Remaining { color, .. } => *color,
        }
    }
}

pub fn countdown_view(remaining: f64, scanning: bool, now: f64) -> CountdownView {
    if scanning {
        return CountdownView::Scanning;
    }
    let r = remaining.max(0.0);
    CountdownView::Remaining {
        number: format!("{}", r.floor() as u64),
        color: countdown_color(r),
        number_hidden: r <= 3.0 && !blink_on(now, 4.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(countdown_color(21.0), RGB_GREEN);
        assert_eq!(countdown_color(15.0001), RGB_GREEN);
        assert_eq!(countdown_color(5.0), RGB_DANGER);
        assert_eq!(countdown_color(-2.0), RGB_DANGER);
    }

    #[test]
    fn test_continuous_at_boundaries() {
        assert_eq!(countdown_color(15.0), RGB_GREEN);
        assert_eq!(countdown_color(10.0), RGB_WARNING);
        // just above 10 is next to warning on the green side
        let near = countdown_color(10.0001);
        assert!(near.0 >= 219 && near.1 >= 220);
        let near = countdown_color(5.0001);
        assert!(near.0 == 255 && near.1 <= 1);
    }

    #[test]
    fn test_label_format() {
        let v = countdown_view(12.7, false, 0.0);
        assert_eq!(v.label(), "12s");
        assert_eq!(countdown_view(-1.0, false, 0.0).label(), "0s");
    }

    #[test]
    fn test_scanning_overrides() {
        let v = countdown_view(2.0, true, 0.3);
        assert_eq!(v, CountdownView::Scanning);
        assert_eq!(v.label(), SCANNING_LABEL);
        assert_eq!(v.color(), RGB_ACCENT);
    }

    #[test]
    fn test_blinks_only_in_last_three_seconds() {
        let hidden = |remaining: f64, now: f64| match countdown_view(remaining, false, now) {
            CountdownView::Remaining { number_hidden, .. } => number_hidden,
            CountdownView::Scanning => unreachable!(),
        };
        assert!(!hidden(3.0, 0.0));
        assert!(hidden(3.0, 0.3));
        assert!(!hidden(3.5, 0.3));
        assert!(!hidden(2.0, 0.5));
    }
}
