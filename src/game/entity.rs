//! Entity - Enemies and boosts travelling down the lanes
//!
//! Entities only know their lane and vertical position; pixel x comes from
//! the layout, so the same entity collides and draws in the same place.

use serde::{Deserialize, Serialize};

/// Number of lanes on the road
pub const LANE_COUNT: usize = 3;

/// Spawn geometry
pub const ENTITY_WIDTH: f32 = 36.0;
pub const ENTITY_HEIGHT: f32 = 60.0;
pub const ENTITY_SPAWN_Y: f32 = -60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Ends the run on contact
    Enemy,
    /// Adds speed and score on contact
    Boost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub kind: EntityKind,
    /// Lane index, always below `LANE_COUNT`
    pub lane: usize,
    /// Top edge in surface pixels; negative while entering from above
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Entity {
    /// Create an entity just above the visible surface
    pub fn spawn(kind: EntityKind, lane: usize) -> Self {
        Self {
            kind,
            lane: lane.min(LANE_COUNT - 1),
            y: ENTITY_SPAWN_Y,
            width: ENTITY_WIDTH,
            height: ENTITY_HEIGHT,
        }
    }

    /// Per-frame travel: road speed plus the kind's own offset
    pub fn advance(&mut self, speed: f32, enemy_offset: f32, boost_offset: f32) {
        self.y += speed
            + match self.kind {
                EntityKind::Enemy => enemy_offset,
                EntityKind::Boost => boost_offset,
            };
    }

    pub fn is_enemy(&self) -> bool {
        self.kind == EntityKind::Enemy
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive overlap test: rectangles that merely touch count as colliding
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x > other.x + other.w
            || self.x + self.w < other.x
            || self.y > other.y + other.h
            || self.y + self.h < other.y)
    }
}
