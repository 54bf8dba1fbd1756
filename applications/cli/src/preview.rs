//! Headless playback preview
//!
//! Runs a scripted sequence of control actions against the simulated
//! primitive and records what the controls would show after each one.

use anyhow::{bail, Context};
use reel_playback::{
    ControlSurface, ControlView, PlayerConfig, SimulatedPrimitive, SyncCore,
};
use std::fmt;
use std::str::FromStr;

/// Interval between simulated `timeupdate` events (browsers fire ~4 Hz)
const TICK_SECS: f64 = 0.25;

/// One scripted control action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Toggle,
    Forward,
    Rewind,
    Seek(f64),
    Ratio(f64),
    Rate(f64),
    /// Let the element play on its own for a while
    Wait(f64),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut parts = s.split_whitespace();
        let Some(action) = parts.next() else {
            bail!("empty step");
        };

        let mut value = || -> anyhow::Result<f64> {
            let raw = parts
                .next()
                .with_context(|| format!("'{}' needs a number", action))?;
            raw.parse()
                .with_context(|| format!("'{}' is not a number", raw))
        };

        let step = match action {
            "toggle" | "play" | "pause" => Step::Toggle,
            "forward" => Step::Forward,
            "rewind" => Step::Rewind,
            "seek" => Step::Seek(value()?),
            "ratio" => Step::Ratio(value()?),
            "rate" => Step::Rate(value()?),
            "wait" => {
                let secs = value()?;
                if !secs.is_finite() || secs < 0.0 {
                    bail!("'wait' needs a finite, non-negative number of seconds");
                }
                Step::Wait(secs)
            }
            other => bail!("unknown step '{}'", other),
        };
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Toggle => f.write_str("toggle"),
            Step::Forward => f.write_str("forward"),
            Step::Rewind => f.write_str("rewind"),
            Step::Seek(t) => write!(f, "seek {}", t),
            Step::Ratio(r) => write!(f, "ratio {}", r),
            Step::Rate(r) => write!(f, "rate {}", r),
            Step::Wait(t) => write!(f, "wait {}", t),
        }
    }
}

/// Parse a comma-separated script such as `toggle, wait 2, forward`
pub fn parse_script(script: &str) -> anyhow::Result<Vec<Step>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Play `source` through `steps`, returning the view after loading and
/// after every step
pub fn run(
    source: &str,
    media_duration: f64,
    config: PlayerConfig,
    steps: &[Step],
) -> anyhow::Result<Vec<(String, ControlView)>> {
    let controls = ControlSurface::from_config(&config);
    let mut core = SyncCore::with_config(SimulatedPrimitive::new(media_duration), config)?;
    let mut frames = Vec::with_capacity(steps.len() + 1);

    core.load(source);
    core.primitive_mut().resolve_metadata();
    settle(&mut core);
    frames.push(("load".to_string(), controls.render(&core)));

    for step in steps {
        match *step {
            Step::Toggle => controls.toggle(&mut core),
            Step::Forward => controls.forward(&mut core),
            Step::Rewind => controls.rewind(&mut core),
            Step::Seek(t) => controls.scrub_to(&mut core, t),
            Step::Ratio(r) => controls.scrub_to_ratio(&mut core, r),
            Step::Rate(r) => core.set_playback_rate(r)?,
            Step::Wait(secs) => {
                let mut remaining = secs.max(0.0);
                while remaining > 0.0 && !core.primitive_mut().is_paused() {
                    let dt = remaining.min(TICK_SECS);
                    core.primitive_mut().advance(dt);
                    settle(&mut core);
                    remaining -= dt;
                }
            }
        }
        settle(&mut core);
        frames.push((step.to_string(), controls.render(&core)));
    }

    Ok(frames)
}

fn settle(core: &mut SyncCore<SimulatedPrimitive>) {
    while let Some(event) = core.poll() {
        tracing::trace!(event = event.name(), "Preview event");
    }
}

/// One line of preview output
pub fn format_frame(label: &str, view: &ControlView) -> String {
    format!(
        "{:<12} {:<7} [{:<5}] {:>13} {:>5.1}%",
        label,
        view.state.as_str(),
        view.toggle_label(),
        view.time_label(),
        view.progress * 100.0
    )
}
