//! Render - Turn the simulation into a draw list
//!
//! `render` is a pure function of the state; the web page replays the
//! commands onto its canvas. `Layout` is shared with collision so a car is
//! hit exactly where it is drawn.

use serde::{Deserialize, Serialize};

use crate::game::entity::{Entity, EntityKind, Rect, LANE_COUNT};
use crate::game::simulation::SimulationState;

/// Normalized lane centers across the road width
pub const LANE_CENTERS: [f32; LANE_COUNT] = [0.2, 0.5, 0.8];

pub const SURFACE_HEIGHT: f32 = 520.0;
pub const ROAD_MAX_WIDTH: f32 = 560.0;
pub const ROAD_WIDTH_RATIO: f32 = 0.9;
pub const ROAD_RADIUS: f32 = 16.0;

pub const PLAYER_WIDTH: f32 = 38.0;
pub const PLAYER_HEIGHT: f32 = 64.0;
pub const PLAYER_BOTTOM_MARGIN: f32 = 24.0;
pub const PLAYER_RADIUS: f32 = 10.0;
pub const ENTITY_RADIUS: f32 = 8.0;

pub const DIVIDER_WIDTH: f32 = 4.0;
pub const DASH_LENGTH: f32 = 16.0;
pub const DASH_GAP: f32 = 18.0;
/// Dash phase wraps at one dash plus one gap
pub const DASH_PERIOD: f32 = DASH_LENGTH + DASH_GAP;

/// Entities are dropped once their top edge is this far below the surface
pub const DESPAWN_MARGIN: f32 = 80.0;

pub const ROAD_COLOR: &str = "#1a1a1a";
pub const LINE_COLOR: &str = "#3a3a3a";
pub const PLAYER_COLOR: &str = "#ff4d4d";
pub const ENEMY_COLOR: &str = "#3dd9eb";
pub const BOOST_COLOR: &str = "#ffd166";
pub const HUD_COLOR: &str = "white";
pub const HUD_MUTED_COLOR: &str = "#bdbdbd";
pub const HUD_FONT: &str = "600 18px Inter, system-ui, -apple-system, Segoe UI, Roboto";
pub const MESSAGE_FONT: &str = "700 22px Inter, system-ui";

/// Size of the drawable surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// The surface tracks its container's width at a fixed height
    pub fn with_width(width: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: SURFACE_HEIGHT,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_width(640.0)
    }
}

/// Pixel geometry derived from a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    pub road_x: f32,
    pub road_width: f32,
}

impl Layout {
    pub fn new(viewport: Viewport) -> Self {
        let road_width = (viewport.width * ROAD_WIDTH_RATIO).min(ROAD_MAX_WIDTH);
        Self {
            viewport,
            road_x: (viewport.width - road_width) / 2.0,
            road_width,
        }
    }

    pub fn lane_center_x(&self, lane: usize) -> f32 {
        self.road_x + self.road_width * LANE_CENTERS[lane.min(LANE_COUNT - 1)]
    }

    pub fn player_rect(&self, lane: usize) -> Rect {
        Rect::new(
            self.lane_center_x(lane) - PLAYER_WIDTH / 2.0,
            self.viewport.height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }

    pub fn entity_rect(&self, entity: &Entity) -> Rect {
        Rect::new(
            self.lane_center_x(entity.lane) - entity.width / 2.0,
            entity.y,
            entity.width,
            entity.height,
        )
    }

    /// Entities at or beyond this y are gone
    pub fn despawn_y(&self) -> f32 {
        self.viewport.height + DESPAWN_MARGIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Start,
    Center,
}

/// One drawing primitive, replayed in order onto the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    DashedLine {
        x: f32,
        y0: f32,
        y1: f32,
        width: f32,
        dash: [f32; 2],
        dash_offset: f32,
        color: String,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font: String,
        color: String,
        align: TextAlign,
    },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// HUD and message strings, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

fn entity_color(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Enemy => ENEMY_COLOR,
        EntityKind::Boost => BOOST_COLOR,
    }
}

/// Paint the current state: road, dividers, player, entities, then HUD
pub fn render(state: &SimulationState, best_score: u64, viewport: Viewport) -> Frame {
    let layout = Layout::new(viewport);
    let Viewport { width, height } = viewport;
    let mut commands = Vec::with_capacity(8 + state.entities.len());

    commands.push(DrawCommand::Clear { width, height });
    commands.push(DrawCommand::RoundedRect {
        rect: Rect::new(layout.road_x, 0.0, layout.road_width, height),
        radius: ROAD_RADIUS,
        color: ROAD_COLOR.to_string(),
    });

    for i in 1..LANE_COUNT {
        commands.push(DrawCommand::DashedLine {
            x: layout.road_x + layout.road_width * i as f32 / LANE_COUNT as f32,
            y0: 0.0,
            y1: height,
            width: DIVIDER_WIDTH,
            dash: [DASH_LENGTH, DASH_GAP],
            dash_offset: -state.road_offset,
            color: LINE_COLOR.to_string(),
        });
    }

    commands.push(DrawCommand::RoundedRect {
        rect: layout.player_rect(state.lane),
        radius: PLAYER_RADIUS,
        color: PLAYER_COLOR.to_string(),
    });

    for entity in &state.entities {
        commands.push(DrawCommand::RoundedRect {
            rect: layout.entity_rect(entity),
            radius: ENTITY_RADIUS,
            color: entity_color(entity.kind).to_string(),
        });
    }

    commands.push(DrawCommand::Text {
        text: format!("Score: {}", state.score),
        x: layout.road_x + 12.0,
        y: 28.0,
        font: HUD_FONT.to_string(),
        color: HUD_COLOR.to_string(),
        align: TextAlign::Start,
    });
    commands.push(DrawCommand::Text {
        text: format!("Best: {}", best_score),
        x: layout.road_x + 12.0,
        y: 52.0,
        font: HUD_FONT.to_string(),
        color: HUD_MUTED_COLOR.to_string(),
        align: TextAlign::Start,
    });

    if let Some(message) = state.message() {
        commands.push(DrawCommand::Text {
            text: message.to_string(),
            x: width / 2.0,
            y: 80.0,
            font: MESSAGE_FONT.to_string(),
            color: HUD_COLOR.to_string(),
            align: TextAlign::Center,
        });
    }

    Frame { viewport, commands }
}
