//! Paced run loop
//!
//! Drives `sim::tick` until the simulation finishes, emitting each tick to a
//! [`StateSink`] and polling a [`StopSignal`] between ticks.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::display::{StateSink, snapshot};
use crate::error::Result;
use crate::sim::{Census, SimPhase, SimState, TickInput, tick};

/// Cooperative stop request, checked once per tick boundary
pub trait StopSignal {
    fn stop_requested(&mut self) -> Result<bool>;
}

/// Never asks to stop
#[derive(Debug, Default)]
pub struct NeverStop;

impl StopSignal for NeverStop {
    fn stop_requested(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// Stops on `q`, `Esc` or `Ctrl-C` read from the terminal.
///
/// Polls without blocking, so the terminal should be in raw mode.
#[derive(Debug, Default)]
pub struct KeyboardStop;

impl KeyboardStop {
    fn is_stop_key(key: &KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        matches!(
            (key.code, key.modifiers),
            (KeyCode::Char('q') | KeyCode::Char('Q'), _)
                | (KeyCode::Esc, _)
                | (KeyCode::Char('c'), KeyModifiers::CONTROL)
        )
    }
}

impl StopSignal for KeyboardStop {
    fn stop_requested(&mut self) -> Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && Self::is_stop_key(&key)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Loop tuning
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Pause after each emitted tick
    pub tick_delay: Duration,
    /// Raise the stop signal once this many ticks have run
    pub max_ticks: Option<u64>,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub phase: SimPhase,
    pub census: Census,
}

/// Run until no regulars remain or a stop is requested
pub fn run(
    state: &mut SimState,
    sink: &mut dyn StateSink,
    stop: &mut dyn StopSignal,
    options: &RunOptions,
) -> Result<RunSummary> {
    log::info!(
        "Starting run: {} balls on {}x{} canvas (seed {})",
        state.balls.len(),
        state.width,
        state.height,
        state.seed
    );

    let mut input = TickInput {
        stop: options.max_ticks == Some(0),
    };
    while state.check_termination() == SimPhase::Running {
        let (phase, report) = tick(state, &input);
        if phase == SimPhase::FinishedCancelled {
            break;
        }

        sink.show(state.time_ticks, &snapshot(state))?;
        log::debug!(
            "tick {}: {} collisions, {} removed, {} left",
            state.time_ticks,
            report.collisions,
            report.removed,
            state.balls.len()
        );

        if !options.tick_delay.is_zero() {
            thread::sleep(options.tick_delay);
        }

        let limit_reached = options
            .max_ticks
            .is_some_and(|max| state.time_ticks >= max);
        input.stop = limit_reached || stop.stop_requested()?;
    }

    let summary = RunSummary {
        ticks: state.time_ticks,
        phase: state.phase,
        census: state.census(),
    };
    log::info!(
        "Run finished after {} ticks: {:?} ({} regular, {} monster, {} repellent left)",
        summary.ticks,
        summary.phase,
        summary.census.regular,
        summary.census.monster,
        summary.census.repellent
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::TextDisplay;
    use crate::sim::{Ball, BallKind, Rgb, WorldConfig};
    use glam::DVec2;

    /// Requests a stop after `n` polls
    struct StopAfter(u32);

    impl StopSignal for StopAfter {
        fn stop_requested(&mut self) -> Result<bool> {
            self.0 = self.0.saturating_sub(1);
            Ok(self.0 == 0)
        }
    }

    #[test]
    fn test_stop_key_detection() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(KeyboardStop::is_stop_key(&q));
        assert!(KeyboardStop::is_stop_key(&ctrl_c));
        assert!(!KeyboardStop::is_stop_key(&plain_c));
    }

    #[test]
    fn test_stop_signal_ends_cancelled() {
        let mut state = SimState::with_balls(
            400.0,
            400.0,
            vec![Ball::new(
                BallKind::Regular,
                5.0,
                DVec2::new(200.0, 200.0),
                Rgb::default(),
                DVec2::new(0.5, 0.5),
            )],
        );
        let mut sink = TextDisplay::plain(Vec::new());
        let summary = run(&mut state, &mut sink, &mut StopAfter(3), &RunOptions::default()).unwrap();
        assert_eq!(summary.phase, SimPhase::FinishedCancelled);
        assert_eq!(summary.ticks, 3);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.matches("Tick ").count(), 3);
    }

    #[test]
    fn test_no_regulars_never_ticks() {
        let config = WorldConfig {
            num_regular: 0,
            ..Default::default()
        };
        let mut state = SimState::new(&config, 1);
        let mut sink = TextDisplay::plain(Vec::new());
        let summary = run(&mut state, &mut sink, &mut NeverStop, &RunOptions::default()).unwrap();
        assert_eq!(summary.phase, SimPhase::FinishedNoRegulars);
        assert_eq!(summary.ticks, 0);
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_max_ticks_limit() {
        let mut state = SimState::with_balls(
            400.0,
            400.0,
            vec![Ball::new(
                BallKind::Regular,
                5.0,
                DVec2::new(100.0, 100.0),
                Rgb::default(),
                DVec2::new(1.0, 0.0),
            )],
        );
        let options = RunOptions {
            max_ticks: Some(25),
            ..Default::default()
        };
        let mut sink = TextDisplay::plain(Vec::new());
        let summary = run(&mut state, &mut sink, &mut NeverStop, &options).unwrap();
        assert_eq!(summary.ticks, 25);
        assert_eq!(summary.phase, SimPhase::FinishedCancelled);
        assert_eq!(summary.census.regular, 1);
        assert_eq!(state.balls[0].pos, DVec2::new(125.0, 100.0));
    }
}
