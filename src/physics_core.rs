//! The physics collaborator seam plus a small tile-based implementation of it.
//!
//! Entity logic only ever produces velocities. Grounded checks, contact tests
//! and velocity-to-position integration go through [`PhysicsWorld`] so a host
//! engine can supply its own solver. [`TilePhysics`] is the built-in one used
//! by the headless runner: gravity, axis-separated AABB resolution against the
//! solid tiles of a [`TileGrid`], and clamping to the level bounds.
//!
//! Pixel space is y-down, so gravity is positive and jumps are negative.

use bevy::prelude::Resource;

use crate::components::Body;
use crate::tilemap::TileGrid;

/// Maximum downward velocity to prevent tunneling through floors at extreme speeds.
pub const MAX_FALL_SPEED: f32 = 800.0;

pub trait PhysicsWorld {
    /// True when the body rests on a solid tile or the bottom of the level.
    fn is_grounded(&mut self, grid: &TileGrid, body: &Body) -> bool;

    fn overlaps(&mut self, a: &Body, b: &Body) -> bool;

    /// Move the body by its velocity over `delta_ms`, resolving tile collisions.
    fn integrate(&mut self, grid: &TileGrid, body: &mut Body, delta_ms: f32);
}

#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            min_x: x - hw,
            min_y: y - hh,
            max_x: x + hw,
            max_y: y + hh,
        }
    }

    pub fn of(body: &Body) -> Self {
        Self::from_center(body.position.x, body.position.y, body.size.x, body.size.y)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max_x > other.min_x
            && self.min_x < other.max_x
            && self.max_y > other.min_y
            && self.min_y < other.max_y
    }
}

#[derive(Clone, Copy)]
pub struct MotionParams {
    pub dt: f32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionResult {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

pub fn apply_gravity(vy: &mut f32, grounded: bool, gravity: f32, dt: f32) {
    if grounded {
        return;
    }
    *vy += gravity * dt;
    *vy = vy.min(MAX_FALL_SPEED);
}

fn collides_solid(grid: &TileGrid, aabb: &Aabb) -> bool {
    let ts = grid.tile_size();
    let min_tx = (aabb.min_x / ts).floor() as i32;
    let max_tx = ((aabb.max_x - 0.01) / ts).floor() as i32;
    let min_ty = (aabb.min_y / ts).floor() as i32;
    let max_ty = ((aabb.max_y - 0.01) / ts).floor() as i32;

    for ty in min_ty..=max_ty {
        for tx in min_tx..=max_tx {
            if grid.is_solid_at(tx, ty) {
                let tile = Aabb {
                    min_x: tx as f32 * ts,
                    min_y: ty as f32 * ts,
                    max_x: (tx + 1) as f32 * ts,
                    max_y: (ty + 1) as f32 * ts,
                };
                if aabb.intersects(&tile) {
                    return true;
                }
            }
        }
    }
    false
}

pub fn resolve_motion(grid: &TileGrid, params: MotionParams) -> MotionResult {
    let MotionParams {
        dt,
        x,
        y,
        vx,
        vy,
        width,
        height,
    } = params;
    let ts = grid.tile_size();
    let mut out = MotionResult { x, y, vx, vy };

    // X first, then Y (separate axis resolution)
    let dx = vx * dt;
    let new_x = out.x + dx;
    let x_aabb = Aabb::from_center(new_x, out.y, width, height);
    if !collides_solid(grid, &x_aabb) {
        out.x = new_x;
    } else {
        if dx > 0.0 {
            let tile_x = (x_aabb.max_x / ts).floor() as i32;
            out.x = tile_x as f32 * ts - width / 2.0 - 0.01;
        } else if dx < 0.0 {
            let tile_x = (x_aabb.min_x / ts).floor() as i32;
            out.x = (tile_x + 1) as f32 * ts + width / 2.0 + 0.01;
        }
        out.vx = 0.0;
    }

    let dy = vy * dt;
    let new_y = out.y + dy;
    let y_aabb = Aabb::from_center(out.x, new_y, width, height);
    if !collides_solid(grid, &y_aabb) {
        out.y = new_y;
    } else {
        if dy > 0.0 {
            // Landing on a tile top
            let tile_y = (y_aabb.max_y / ts).floor() as i32;
            out.y = tile_y as f32 * ts - height / 2.0;
        } else if dy < 0.0 {
            // Head bump
            let tile_y = (y_aabb.min_y / ts).floor() as i32;
            out.y = (tile_y + 1) as f32 * ts + height / 2.0 + 0.01;
        }
        out.vy = 0.0;
    }

    // Level bounds act as walls, floor and ceiling.
    let (hw, hh) = (width / 2.0, height / 2.0);
    let max_x = grid.pixel_width() - hw;
    let max_y = grid.pixel_height() - hh;
    if out.x < hw || out.x > max_x {
        out.x = out.x.clamp(hw, max_x.max(hw));
        out.vx = 0.0;
    }
    if out.y < hh || out.y > max_y {
        out.y = out.y.clamp(hh, max_y.max(hh));
        out.vy = 0.0;
    }

    out
}

pub fn compute_grounded(grid: &TileGrid, body: &Body) -> bool {
    let aabb = Aabb::of(body);
    if aabb.max_y >= grid.pixel_height() - 0.5 {
        return true;
    }
    let ts = grid.tile_size();
    let check_y = aabb.max_y + 0.5;
    let left_tile_x = ((aabb.min_x + 1.0) / ts).floor() as i32;
    let right_tile_x = ((aabb.max_x - 1.0) / ts).floor() as i32;
    let tile_y = (check_y / ts).floor() as i32;

    (left_tile_x..=right_tile_x).any(|tx| grid.is_solid_at(tx, tile_y))
}

#[derive(Resource, Clone, Debug)]
pub struct TilePhysics {
    pub gravity: f32,
}

impl TilePhysics {
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

impl PhysicsWorld for TilePhysics {
    fn is_grounded(&mut self, grid: &TileGrid, body: &Body) -> bool {
        compute_grounded(grid, body)
    }

    fn overlaps(&mut self, a: &Body, b: &Body) -> bool {
        Aabb::of(a).intersects(&Aabb::of(b))
    }

    fn integrate(&mut self, grid: &TileGrid, body: &mut Body, delta_ms: f32) {
        let dt = delta_ms / 1000.0;
        let grounded = compute_grounded(grid, body);
        let mut vy = body.velocity.y;
        // A fresh jump impulse leaves the ground this frame.
        let on_ground = grounded && vy >= 0.0;
        apply_gravity(&mut vy, on_ground, self.gravity, dt);
        let result = resolve_motion(
            grid,
            MotionParams {
                dt,
                x: body.position.x,
                y: body.position.y,
                vx: body.velocity.x,
                vy,
                width: body.size.x,
                height: body.size.y,
            },
        );
        body.position.x = result.x;
        body.position.y = result.y;
        body.velocity.x = result.vx;
        body.velocity.y = result.vy;
    }
}
