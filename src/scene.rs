//! Display list for a frame
//!
//! The simulation knows nothing about drawing; frontends ask for a `Scene`
//! and paint its shapes in order onto whatever 2D surface they have.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::sim::{BallColor, GameState, Gun};

/// Palette used by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    Blue,
    Green,
    Red,
    Brown,
    Orange,
    Black,
}

impl From<BallColor> for Color {
    fn from(color: BallColor) -> Self {
        match color {
            BallColor::Blue => Color::Blue,
            BallColor::Green => Color::Green,
            BallColor::Red => Color::Red,
            BallColor::Brown => Color::Brown,
        }
    }
}

/// A drawable primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        content: String,
        size: f32,
    },
}

/// One frame worth of shapes, back to front
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub shapes: Vec<Shape>,
}

/// Gun barrel thickness
const AIM_LINE_WIDTH: f32 = 7.0;
/// HUD font size
const TEXT_SIZE: f32 = 28.0;

/// Build the display list for the current state
pub fn build_scene(state: &GameState) -> Scene {
    let mut shapes = Vec::with_capacity(state.projectiles.len() + 5);

    shapes.extend(state.live_targets().map(|t| Shape::Circle {
        center: t.body.pos,
        radius: t.body.radius,
        color: Color::Red,
    }));

    shapes.extend(state.projectiles.iter().map(|p| Shape::Circle {
        center: p.body.pos,
        radius: p.body.radius,
        color: p.color.into(),
    }));

    shapes.push(Shape::Line {
        from: Gun::pivot(),
        to: state.gun.aim_line_end(),
        width: AIM_LINE_WIDTH,
        color: if state.gun.charging {
            Color::Orange
        } else {
            Color::Black
        },
    });

    shapes.push(Shape::Text {
        pos: Vec2::new(SCORE_TEXT_X, SCORE_TEXT_Y),
        content: state.score.to_string(),
        size: TEXT_SIZE,
    });

    if let Some(message) = &state.message {
        shapes.push(Shape::Text {
            pos: Vec2::new(MESSAGE_TEXT_X, MESSAGE_TEXT_Y),
            content: message.clone(),
            size: TEXT_SIZE,
        });
    }

    Scene {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        shapes,
    }
}
