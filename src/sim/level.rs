//! Scripted levels: timestamped spawn events consumed in order

use serde::{Deserialize, Serialize};

/// What a level event spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnKind {
    Pipe,
}

/// One scripted spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelEvent {
    /// Level-local frame at which the event fires
    pub time: u32,
    #[serde(rename = "type")]
    pub kind: SpawnKind,
    /// Explicit gap top; random when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl LevelEvent {
    pub fn pipe(time: u32, y: Option<f32>) -> Self {
        Self {
            time,
            kind: SpawnKind::Pipe,
            y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub id: String,
    /// Sorted by `time`
    #[serde(rename = "data")]
    pub events: Vec<LevelEvent>,
}

/// Progress through one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRun {
    /// Index into the configured level list
    pub index: usize,
    /// Level-local frame counter
    pub frame: u32,
    pub next_event: usize,
}

impl LevelRun {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            frame: 0,
            next_event: 0,
        }
    }

    /// Advance the level clock by one frame and return the event that fires,
    /// if any. At most one event fires per frame; an event due on the same
    /// frame as the previous one fires on the next frame.
    pub fn advance<'a>(&mut self, level: &'a Level) -> Option<&'a LevelEvent> {
        self.frame += 1;
        let ev = level.events.get(self.next_event)?;
        if self.frame >= ev.time {
            self.next_event += 1;
            Some(ev)
        } else {
            None
        }
    }

    pub fn all_consumed(&self, level: &Level) -> bool {
        self.next_event >= level.events.len()
    }
}

/// The levels that ship with the game
pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level {
            name: "Level 1: The Basics".into(),
            id: "level_1".into(),
            events: vec![
                LevelEvent::pipe(60, None),
                LevelEvent::pipe(130, Some(200.0)),
                LevelEvent::pipe(260, Some(140.0)),
                LevelEvent::pipe(330, None),
                LevelEvent::pipe(400, None),
            ],
        },
        Level {
            name: "Level 2: Gravity Fun".into(),
            id: "level_2".into(),
            events: vec![
                LevelEvent::pipe(100, Some(40.0)),
                LevelEvent::pipe(240, Some(180.0)),
                LevelEvent::pipe(380, Some(50.0)),
                LevelEvent::pipe(520, Some(150.0)),
                LevelEvent::pipe(660, Some(35.0)),
            ],
        },
    ]
}
