use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

const MAX_EVENTS: usize = 500;
const OVERFLOW_LOG_INTERVAL_FRAMES: u64 = 60;

/// Signals the session raises for hosts (HUD, audio, progression hooks).
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    LevelGenerated { segments: usize, pixel_width: f32 },
    PlayerDamaged { health: i32 },
    PlayerRespawned { x: f32, y: f32 },
    SessionRestarted { restarts: u32 },
    LevelComplete { double_jump_unlocked: bool },
}

#[derive(Serialize, Clone, Debug)]
pub struct GameEvent {
    #[serde(flatten)]
    pub kind: SessionEvent,
    pub frame: u64,
}

#[derive(Default, Clone, Debug)]
pub struct GameEventBus {
    pub recent: VecDeque<GameEvent>,
    pub dropped_events: u64,
    last_overflow_log_frame: Option<u64>,
}

impl GameEventBus {
    pub fn emit(&mut self, kind: SessionEvent, frame: u64) {
        self.recent.push_back(GameEvent { kind, frame });
        if self.recent.len() > MAX_EVENTS {
            let excess = self.recent.len() - MAX_EVENTS;
            for _ in 0..excess {
                self.recent.pop_front();
            }
            self.dropped_events = self.dropped_events.saturating_add(excess as u64);
            let due = self.last_overflow_log_frame.map_or(true, |last| {
                frame.saturating_sub(last) >= OVERFLOW_LOG_INTERVAL_FRAMES
            });
            if due {
                self.last_overflow_log_frame = Some(frame);
                warn!(
                    "[DungeonRunner events] Dropped {} buffered events (total dropped: {})",
                    excess, self.dropped_events
                );
            }
        }
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.recent.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionEvent> {
        self.recent.iter().map(|e| &e.kind)
    }
}
