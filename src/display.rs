//! Per-tick state output
//!
//! Every tick re-emits the whole population; there is no diffing.

use std::fmt;
use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::sim::{Ball, BallKind, Rgb, SimState};

/// Output view of one live ball
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallRecord {
    pub kind: BallKind,
    #[serde(serialize_with = "fixed2")]
    pub x: f64,
    #[serde(serialize_with = "fixed2")]
    pub y: f64,
    #[serde(serialize_with = "fixed2")]
    pub radius: f64,
    pub color: Rgb,
}

impl From<&Ball> for BallRecord {
    fn from(ball: &Ball) -> Self {
        Self {
            kind: ball.kind(),
            x: ball.pos.x,
            y: ball.pos.y,
            radius: ball.radius,
            color: ball.color,
        }
    }
}

impl fmt::Display for BallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Ball - Position: ({:.2}, {:.2}), Radius: {:.2}, Color: ({}, {}, {})",
            self.kind, self.x, self.y, self.radius, self.color.r, self.color.g, self.color.b
        )
    }
}

fn fixed2<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

/// Records for every live ball, in population order
pub fn snapshot(state: &SimState) -> Vec<BallRecord> {
    state.balls.iter().map(BallRecord::from).collect()
}

/// Receives the full population after each tick
pub trait StateSink {
    fn show(&mut self, tick: u64, records: &[BallRecord]) -> Result<()>;
}

/// Line-per-ball text output
pub struct TextDisplay<W: Write> {
    out: W,
    /// Clear the terminal before each frame (raw-mode terminal)
    interactive: bool,
}

impl<W: Write> TextDisplay<W> {
    /// Plain appended output, `\n` line endings
    pub fn plain(out: W) -> Self {
        Self {
            out,
            interactive: false,
        }
    }

    /// Redraw the screen each tick, `\r\n` line endings for raw mode
    pub fn interactive(out: W) -> Self {
        Self {
            out,
            interactive: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StateSink for TextDisplay<W> {
    fn show(&mut self, tick: u64, records: &[BallRecord]) -> Result<()> {
        let eol = if self.interactive {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
            "\r\n"
        } else {
            "\n"
        };

        write!(self.out, "Tick {} ({} balls){}", tick, records.len(), eol)?;
        for record in records {
            write!(self.out, "{}{}", record, eol)?;
        }
        if self.interactive {
            write!(self.out, "Press 'Q' to stop the simulation.{}", eol)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    tick: u64,
    balls: &'a [BallRecord],
}

/// Newline-delimited JSON, one object per tick
pub struct JsonDisplay<W: Write> {
    out: W,
}

impl<W: Write> JsonDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StateSink for JsonDisplay<W> {
    fn show(&mut self, tick: u64, records: &[BallRecord]) -> Result<()> {
        serde_json::to_writer(&mut self.out, &Frame { tick, balls: records })?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
