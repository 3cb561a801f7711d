//! Scene chain — intro, rain and console run one after another in a single
//! terminal session. Any scene can be skipped; a quit key ends the chain.

pub mod intro;
pub mod quotes_loop;
pub mod rain;

use std::time::{Duration, Instant};

use ratatui::{style::Style, widgets::Block};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};

use proxscan_proto::config::Config;

use crate::{
    app::{App, AppMessage},
    terminal::{self, EventPump, Tui},
    theme::C_BG,
};

use rain::Charset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Intro,
    Rain,
    Console,
    /// Endless typed-quote loop, shown in place of the console.
    Quotes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneExit {
    /// Ran to completion; the chain moves on.
    Finished,
    /// The operator asked to quit; the chain stops.
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChainOptions {
    pub skip_intro: bool,
    pub skip_rain: bool,
    pub skip_console: bool,
    pub quotes: bool,
    pub pause: Duration,
    pub charset: Charset,
}

pub fn build_chain(opts: &ChainOptions) -> Vec<SceneKind> {
    let mut chain = Vec::new();
    if !opts.skip_intro {
        chain.push(SceneKind::Intro);
    }
    if !opts.skip_rain {
        chain.push(SceneKind::Rain);
    }
    if !opts.skip_console {
        chain.push(if opts.quotes {
            SceneKind::Quotes
        } else {
            SceneKind::Console
        });
    }
    chain
}

/// Frame timer plus a monotonic clock in seconds from its creation.
pub struct FrameClock {
    start: Instant,
    interval: Interval,
}

pub fn frame_clock(period_ms: u64) -> FrameClock {
    let mut interval = tokio::time::interval(Duration::from_millis(period_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    FrameClock {
        start: Instant::now(),
        interval,
    }
}

impl FrameClock {
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Run `chain` in one terminal session. The terminal is restored even when
/// a scene fails.
pub async fn run_chain(chain: &[SceneKind], opts: &ChainOptions, config: &Config) -> anyhow::Result<()> {
    let mut terminal = terminal::enter()?;
    let mut pump = EventPump::start();
    let result = run_scenes(&mut terminal, &mut pump, chain, opts, config).await;
    drop(pump);
    if let Err(e) = terminal::leave(&mut terminal) {
        warn!("terminal: restore failed: {}", e);
    }
    result
}

async fn run_scenes(
    terminal: &mut Tui,
    pump: &mut EventPump,
    chain: &[SceneKind],
    opts: &ChainOptions,
    config: &Config,
) -> anyhow::Result<()> {
    for (i, scene) in chain.iter().enumerate() {
        if i > 0
            && !opts.pause.is_zero()
            && pause(terminal, pump, opts.pause).await? == SceneExit::Quit
        {
            info!("chain: quit during pause");
            return Ok(());
        }

        info!("chain: scene {:?}", scene);
        let exit = match scene {
            SceneKind::Intro => intro::run(terminal, pump).await?,
            SceneKind::Rain => rain::run(terminal, pump, opts.charset).await?,
            SceneKind::Quotes => {
                quotes_loop::run(terminal, pump, config.typing.mistake_chance()).await?
            }
            SceneKind::Console => {
                let (tx, rx) = mpsc::channel::<AppMessage>(64);
                let app = App::new(config, tx).await;
                app.run(terminal, pump, rx).await?
            }
        };
        if exit == SceneExit::Quit {
            info!("chain: quit in {:?}", scene);
            return Ok(());
        }
    }
    Ok(())
}

/// Blank screen for `length`, still honoring quit keys.
async fn pause(terminal: &mut Tui, pump: &mut EventPump, length: Duration) -> anyhow::Result<SceneExit> {
    terminal.draw(|f| f.render_widget(Block::default().style(Style::default().bg(C_BG)), f.area()))?;
    let deadline = tokio::time::sleep(length);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => return Ok(SceneExit::Finished),
            ev = pump.next() => match ev {
                Some(ev) if terminal::is_quit_event(&ev) => return Ok(SceneExit::Quit),
                Some(_) => {}
                None => return Ok(SceneExit::Quit),
            },
        }
    }
}
