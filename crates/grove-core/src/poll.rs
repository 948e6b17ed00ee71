// ── Poll state machine ──
//
// Tracks whether a fetch is outstanding and how many consecutive fetches
// missed. The machine holds no timer: a clock outside dispatches `Ping`,
// using `backoff` to space requests out while the origin is failing.

use std::time::Duration;

use crate::effect::Effects;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollState {
    #[default]
    Idle,
    /// A fetch has been issued and not yet answered.
    Waiting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollModel {
    pub state: PollState,
    /// Consecutive failed fetches since the last success.
    pub misses: u32,
    /// Successful fetches since start.
    pub pongs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    Ping,
    Pong,
    Miss,
}

impl PollModel {
    pub fn is_waiting(&self) -> bool {
        self.state == PollState::Waiting
    }

    /// Delay before the next `Ping`: `base` while healthy, doubled per
    /// consecutive miss and capped at `max`.
    pub fn backoff(&self, base: Duration, max: Duration) -> Duration {
        let factor = 1u32.checked_shl(self.misses).unwrap_or(u32::MAX);
        base.saturating_mul(factor).min(max.max(base))
    }
}

pub fn init() -> (PollModel, Effects<PollAction>) {
    (PollModel::default(), Effects::none())
}

pub fn update(model: PollModel, action: PollAction) -> (PollModel, Effects<PollAction>) {
    let next = match action {
        PollAction::Ping => PollModel {
            state: PollState::Waiting,
            ..model
        },
        PollAction::Pong => PollModel {
            state: PollState::Idle,
            misses: 0,
            pongs: model.pongs.saturating_add(1),
        },
        PollAction::Miss => PollModel {
            state: PollState::Idle,
            misses: model.misses.saturating_add(1),
            ..model
        },
    };
    (next, Effects::none())
}
