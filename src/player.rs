use bevy::prelude::*;

use crate::components::{Body, BodyHandle, Facing, Locomotion};
use crate::config::GameConfig;
use crate::input::FrameInput;

/// Result of a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health remains; the player was moved back to the spawn point.
    Respawned { health: i32 },
    /// Health ran out; the session must be rebuilt.
    Died,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub jump_velocity: f32,
    pub crouching: bool,
    pub health: i32,
    pub double_jump_unlocked: bool,
    pub double_jump_armed: bool,
    pub locomotion: Locomotion,
    spawn: Vec2,
}

impl Player {
    pub fn new(config: &GameConfig, handle: BodyHandle) -> Self {
        let (sx, sy) = config.player_spawn;
        let (w, h) = config.player_size;
        Self {
            body: Body::new(handle, sx, sy, w, h),
            speed: config.player_speed,
            jump_velocity: config.player_jump_velocity,
            crouching: false,
            health: config.player_health,
            double_jump_unlocked: false,
            double_jump_armed: false,
            locomotion: Locomotion::Idle,
            spawn: Vec2::new(sx, sy),
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    /// Turn this frame's input into velocity, facing and locomotion.
    /// `grounded` comes from the physics collaborator.
    pub fn update(&mut self, input: &FrameInput, grounded: bool) {
        if input.left {
            self.body.velocity.x = -self.speed;
            self.body.facing = Facing::Left;
            self.locomotion = Locomotion::Walk;
        } else if input.right {
            self.body.velocity.x = self.speed;
            self.body.facing = Facing::Right;
            self.locomotion = Locomotion::Walk;
        } else {
            self.body.velocity.x = 0.0;
            // Reads last frame's crouch flag; it is refreshed below.
            self.locomotion = if self.crouching {
                Locomotion::Crouch
            } else {
                Locomotion::Idle
            };
        }

        // Independent of the horizontal branch, so walking while crouched is possible.
        self.crouching = input.down;

        if input.up_just_pressed {
            if grounded {
                self.body.velocity.y = self.jump_velocity;
                self.double_jump_armed = true;
            } else if self.double_jump_unlocked && self.double_jump_armed {
                self.body.velocity.y = self.jump_velocity;
                self.double_jump_armed = false;
            }
        }
    }

    pub fn take_damage(&mut self) -> DamageOutcome {
        self.health -= 1;
        if self.health <= 0 {
            return DamageOutcome::Died;
        }
        self.body.position = self.spawn;
        DamageOutcome::Respawned {
            health: self.health,
        }
    }

    pub fn unlock_double_jump(&mut self) {
        self.double_jump_unlocked = true;
    }
}
