use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tile identifiers stored in a [`crate::tilemap::TileGrid`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileType {
    Empty = 0,
    Ground = 1,
}

impl TileType {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => TileType::Ground,
            _ => TileType::Empty,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Which way a body's sprite looks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn from_direction(direction: f32) -> Self {
        if direction < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// Index into the physics collaborator's body registry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct BodyHandle(pub u32);

/// Plain kinematic record owned by an entity. Positions are body centers in
/// y-down pixel space; velocities are pixels per second.
#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub handle: BodyHandle,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub facing: Facing,
}

impl Body {
    pub fn new(handle: BodyHandle, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            handle,
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: Vec2::new(width, height),
            facing: Facing::default(),
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }
}

/// Locomotion state handed to the animation collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Locomotion {
    #[default]
    Idle,
    Walk,
    Crouch,
}
