//! App — the console scene's event loop.
//!
//! Architecture:
//! - `App` owns all components, the scan cycle and `AppState` (shared
//!   read-only data for components).
//! - A frame interval drives everything: each tick captures one `now`,
//!   advances the cycle, runs a due scan, ticks and draws the components.
//! - Terminal input comes from the shared `EventPump`; background results
//!   come in as `AppMessage`s.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use proxscan_proto::config::Config;
use proxscan_proto::host::{self, SlowFacts, StaticFacts};
use proxscan_proto::scan::{NetworkScan, NmcliScanner};
use proxscan_proto::store::DeviceStore;

use crate::{
    action::{Action, ComponentId},
    anim::now_secs,
    anim::reveal::FlashTiming,
    app_state::AppState,
    component::Component,
    components::{
        footer::{Footer, LiveFacts},
        header::Header,
        network_table::NetworkTable,
        quote_bar::QuoteBar,
    },
    cycle::ScanCycle,
    scenes::SceneExit,
    terminal::{is_quit_key, EventPump, Tui},
    theme::C_BG,
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    /// A background host-facts fetch finished.
    SlowFacts(SlowFacts),
}

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Last-drawn rect of each pane, for mouse hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    header: Rect,
    quote_bar: Rect,
    network_table: Rect,
    footer: Rect,
}

impl PaneAreas {
    fn pane_at(&self, col: u16, row: u16) -> Option<(ComponentId, Rect)> {
        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }
        [
            (ComponentId::Header, self.header),
            (ComponentId::QuoteBar, self.quote_bar),
            (ComponentId::NetworkTable, self.network_table),
            (ComponentId::Footer, self.footer),
        ]
        .into_iter()
        .find(|(_, r)| hit(*r, col, row))
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App<S: NetworkScan = NmcliScanner> {
    pub state: AppState,

    header: Header,
    quote_bar: QuoteBar,
    network_table: NetworkTable,
    footer: Footer,

    pane_areas: PaneAreas,
    cycle: ScanCycle,
    scanner: S,
    /// Seconds on the wall clock; read once per frame and after each scan.
    clock: fn() -> f64,
    frame_period: Duration,
    should_quit: bool,
}

impl App<NmcliScanner> {
    /// Opens the device store and gathers the host facts that never change.
    /// Network-backed facts are requested in the background and arrive on
    /// `tx`.
    pub async fn new(config: &Config, tx: mpsc::Sender<AppMessage>) -> Self {
        let facts = host::static_facts().await;
        info!(
            "host: lan={} model={} os={}",
            facts.lan_ip, facts.model, facts.os
        );
        let mut live = LiveFacts::new(host::http_client(), tx);
        live.request();

        let scanner = NmcliScanner::new(Duration::from_secs(config.scan.command_timeout_secs));
        Self::assemble(config, scanner, facts, live, now_secs)
    }
}

impl<S: NetworkScan> App<S> {
    fn assemble(
        config: &Config,
        scanner: S,
        facts: StaticFacts,
        live: LiveFacts,
        clock: fn() -> f64,
    ) -> Self {
        let now = clock();
        let interval = config.scan.interval_secs.max(1) as f64;

        let mut store = DeviceStore::open(
            config.paths.discovered_file.clone(),
            config.paths.lab_file.clone(),
        );
        let seeded = store.ensure_defaults();
        if seeded > 0 {
            info!("lab: seeded {} default entries", seeded);
        }

        let state = AppState::new(
            store,
            config.display.title.clone(),
            config.display.version.clone(),
            interval,
            now,
        );

        Self {
            header: Header::new(FlashTiming::from_millis(
                config.display.flash_ms,
                config.display.fade_ms,
            )),
            quote_bar: QuoteBar::new(config.typing.quote_char_ms as f64 / 1000.0, now),
            network_table: NetworkTable::new(),
            footer: Footer::new(
                &config.display.version,
                facts,
                live,
                config.ticker.dwell_secs,
                config.ticker.speed,
            ),
            pane_areas: PaneAreas::default(),
            cycle: ScanCycle::new(
                interval,
                config.scan.scan_duration_ms as f64 / 1000.0,
                now,
            ),
            scanner,
            clock,
            frame_period: config.display.frame_period(),
            should_quit: false,
            state,
        }
    }

    pub async fn run(
        mut self,
        terminal: &mut Tui,
        pump: &mut EventPump,
        mut rx: mpsc::Receiver<AppMessage>,
    ) -> anyhow::Result<SceneExit> {
        info!("console: starting, frame period {:?}", self.frame_period);

        // First scan before the first countdown.
        self.run_scan().await;
        self.dispatch(Action::ScanCompleted).await;

        let mut frame_tick = tokio::time::interval(self.frame_period);
        frame_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            tokio::select! {
                _ = frame_tick.tick() => {
                    self.advance().await;
                    terminal.draw(|f| self.draw(f))?;
                }

                ev = pump.next() => match ev {
                    Some(ev) => self.handle_event(ev).await,
                    None => {
                        warn!("console: input closed");
                        self.should_quit = true;
                    }
                },

                Some(msg) = rx.recv() => self.handle_message(msg),
            }

            if self.should_quit {
                break;
            }
        }

        info!("console: {} scans this session", self.state.scans_completed);
        Ok(SceneExit::Quit)
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::SlowFacts(facts) => self.footer.deliver(facts),
        }
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    async fn advance(&mut self) {
        let now = (self.clock)();
        self.state.now = now;
        self.state.cycle = self.cycle.tick(now);

        if self.state.cycle.scan_due {
            self.run_scan().await;
            self.dispatch(Action::ScanCompleted).await;
        }

        let tick_actions: Vec<Action> = {
            let s = &self.state;
            let mut all = Vec::new();
            all.extend(self.header.tick(s));
            all.extend(self.quote_bar.tick(s));
            all.extend(self.network_table.tick(s));
            all.extend(self.footer.tick(s));
            all
        };
        for action in tick_actions {
            self.dispatch(action).await;
        }
    }

    /// Scan, record the result and restart the countdown. Stalls the loop
    /// for as long as the scan takes.
    async fn run_scan(&mut self) {
        let networks = self.scanner.scan().await;
        let report = self.state.store.record_scan(&networks, Utc::now());
        info!(
            "scan: {} observed, {} new devices, {} new lab entries",
            report.observed, report.new_devices, report.new_lab_entries
        );
        self.state.networks = networks;
        self.state.last_report = Some(report);
        self.state.scans_completed += 1;

        let now = (self.clock)();
        self.cycle.complete_scan(now);
        self.state.now = now;
        self.state.cycle = self.cycle.tick(now);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    async fn handle_event(&mut self, ev: Event) {
        let actions = match ev {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => vec![],
        };
        for action in actions {
            self.dispatch(action).await;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if is_quit_key(&key) {
            return vec![Action::Quit];
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => vec![Action::Rescan],
            _ => {
                let s = &self.state;
                let mut out = Vec::new();
                out.extend(self.header.handle_key(key, s));
                out.extend(self.quote_bar.handle_key(key, s));
                out.extend(self.network_table.handle_key(key, s));
                out.extend(self.footer.handle_key(key, s));
                out
            }
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if !matches!(event.kind, MouseEventKind::Down(_)) {
            return vec![];
        }
        let Some((id, area)) = self.pane_areas.pane_at(event.column, event.row) else {
            return vec![];
        };
        let s = &self.state;
        match id {
            ComponentId::Header => self.header.handle_mouse(event, area, s),
            ComponentId::QuoteBar => self.quote_bar.handle_mouse(event, area, s),
            ComponentId::NetworkTable => self.network_table.handle_mouse(event, area, s),
            ComponentId::Footer => self.footer.handle_mouse(event, area, s),
        }
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            // Components see the action first, then the app applies it.
            let secondary: Vec<Action> = {
                let s = &self.state;
                let mut out = Vec::new();
                out.extend(self.header.on_action(&action, s));
                out.extend(self.quote_bar.on_action(&action, s));
                out.extend(self.network_table.on_action(&action, s));
                out.extend(self.footer.on_action(&action, s));
                out
            };
            queue.extend(secondary);
            queue.extend(self.apply_action(action).await);
        }
    }

    async fn apply_action(&mut self, action: Action) -> Vec<Action> {
        debug!("apply_action: {:?}", action);
        match action {
            Action::ToggleLab(bssid) => {
                let dev = self.state.store.toggle(&bssid);
                info!("lab: {} ({}) active={}", bssid, dev.ssid, dev.active);
                vec![]
            }
            Action::Rescan => {
                info!("scan: manual rescan");
                self.run_scan().await;
                vec![Action::ScanCompleted]
            }
            Action::Quit => {
                self.should_quit = true;
                vec![]
            }
            Action::ScanCompleted => vec![],
        }
    }

    // ── Draw ──────────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header.height()),
                Constraint::Length(self.quote_bar.height()),
                Constraint::Min(0),
                Constraint::Length(self.footer.height()),
            ])
            .split(area);

        self.header.draw(frame, rows[0], &self.state);
        self.quote_bar.draw(frame, rows[1], &self.state);
        self.network_table.draw(frame, rows[2], &self.state);
        self.footer.draw(frame, rows[3], &self.state);

        self.pane_areas = PaneAreas {
            header: rows[0],
            quote_bar: rows[1],
            network_table: rows[2],
            footer: rows[3],
        };
    }
}
