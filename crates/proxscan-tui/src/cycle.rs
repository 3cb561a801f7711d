//! Countdown/scan cycle state machine.
//!
//! `Countdown` runs for `interval` seconds from `cycle_start`, then the cycle
//! shows `Scanning` for a fixed window. When the window ends the caller runs
//! the scan and reports back with [`ScanCycle::complete_scan`], which starts
//! the next countdown.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Countdown,
    Scanning,
}

/// What one frame needs from the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleStatus {
    pub phase: Phase,
    /// Seconds left in the countdown; 0 while scanning.
    pub remaining: f64,
    /// Seconds since the current cycle started.
    pub elapsed: f64,
    /// The scanning window is over and the scan should run now.
    pub scan_due: bool,
}

impl CycleStatus {
    pub fn scanning(&self) -> bool {
        self.phase == Phase::Scanning
    }
}

#[derive(Debug, Clone)]
pub struct ScanCycle {
    phase: Phase,
    cycle_start: f64,
    scan_until: f64,
    interval: f64,
    scan_duration: f64,
}

impl ScanCycle {
    pub fn new(interval: f64, scan_duration: f64, now: f64) -> Self {
        Self {
            phase: Phase::Countdown,
            cycle_start: now,
            scan_until: 0.0,
            interval,
            scan_duration,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cycle_start(&self) -> f64 {
        self.cycle_start
    }

    /// Advance to `now`. Moves into `Scanning` when the countdown runs out.
    pub fn tick(&mut self, now: f64) -> CycleStatus {
        let elapsed = now - self.cycle_start;
        match self.phase {
            Phase::Countdown => {
                let remaining = self.interval - elapsed;
                if remaining <= 0.0 {
                    self.phase = Phase::Scanning;
                    self.scan_until = now + self.scan_duration;
                    return CycleStatus {
                        phase: Phase::Scanning,
                        remaining: 0.0,
                        elapsed,
                        scan_due: false,
                    };
                }
                CycleStatus {
                    phase: Phase::Countdown,
                    remaining,
                    elapsed,
                    scan_due: false,
                }
            }
            Phase::Scanning => CycleStatus {
                phase: Phase::Scanning,
                remaining: 0.0,
                elapsed,
                scan_due: now >= self.scan_until,
            },
        }
    }

    /// A scan finished (timed or manual): restart the countdown at `now`.
    pub fn complete_scan(&mut self, now: f64) {
        self.cycle_start = now;
        self.scan_until = 0.0;
        self.phase = Phase::Countdown;
    }
}
