//! Terminal input merged with the two clocks the loop runs on.
//!
//! No background task: `next` races the crossterm stream against a tick
//! and a render interval, so dropping the reader stops everything.

use std::time::Duration;

use crossterm::event::{Event as TerminalEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::warn;

#[derive(Debug)]
pub enum Event {
    /// A key press (releases and repeats are dropped).
    Key(KeyEvent),
    Resize,
    /// Drives the polling clock.
    Tick,
    /// Redraw.
    Render,
}

pub struct EventReader {
    input: EventStream,
    tick: Interval,
    render: Interval,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let clock = |period| {
            let mut clock = interval(period);
            clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
            clock
        };
        Self {
            input: EventStream::new(),
            tick: clock(tick_rate),
            render: clock(render_rate),
        }
    }

    /// Next event, or `None` once terminal input has ended or failed.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Some(Event::Tick),
                _ = self.render.tick() => return Some(Event::Render),
                input = self.input.next() => match input? {
                    Ok(TerminalEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        return Some(Event::Key(key));
                    }
                    Ok(TerminalEvent::Resize(..)) => return Some(Event::Resize),
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%error, "terminal input failed");
                        return None;
                    }
                },
            }
        }
    }
}
