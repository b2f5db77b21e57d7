use bevy::prelude::*;
use serde::Serialize;

use crate::components::{Body, BodyHandle, Facing};
use crate::config::GameConfig;
use crate::random::GameRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EnemyArchetype {
    Patrol,
    Jumping,
    Chasing,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 3] = [
        EnemyArchetype::Patrol,
        EnemyArchetype::Jumping,
        EnemyArchetype::Chasing,
    ];
}

/// Per-archetype behavior state.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Bounces between `anchor_x - range` and `anchor_x + range`.
    Patrol {
        direction: i32,
        range: f32,
        anchor_x: f32,
    },
    /// Hops whenever the timer has passed the interval and the body is grounded.
    Jumping {
        timer_ms: f32,
        interval_ms: f32,
        jump_velocity: f32,
    },
    /// Walks toward the player while within range, otherwise stands still.
    Chasing { range: f32 },
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub speed: f32,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(
        archetype: EnemyArchetype,
        x: f32,
        y: f32,
        handle: BodyHandle,
        config: &GameConfig,
        rng: &mut GameRng,
    ) -> Self {
        let (w, h) = config.enemy_size;
        let mut body = Body::new(handle, x, y, w, h);
        let speed = config.enemy_speed;
        let behavior = match archetype {
            EnemyArchetype::Patrol => {
                let direction = if rng.coin() { -1 } else { 1 };
                body.velocity.x = speed * direction as f32;
                body.facing = Facing::from_direction(direction as f32);
                Behavior::Patrol {
                    direction,
                    range: config.patrol_range,
                    anchor_x: x,
                }
            }
            EnemyArchetype::Jumping => {
                let (lo, hi) = config.jump_interval_ms;
                Behavior::Jumping {
                    timer_ms: 0.0,
                    interval_ms: rng.range_inclusive(lo as i64, hi as i64) as f32,
                    jump_velocity: config.enemy_jump_velocity,
                }
            }
            EnemyArchetype::Chasing => Behavior::Chasing {
                range: config.chase_range,
            },
        };
        Self {
            body,
            speed,
            behavior,
        }
    }

    pub fn archetype(&self) -> EnemyArchetype {
        match self.behavior {
            Behavior::Patrol { .. } => EnemyArchetype::Patrol,
            Behavior::Jumping { .. } => EnemyArchetype::Jumping,
            Behavior::Chasing { .. } => EnemyArchetype::Chasing,
        }
    }

    /// Advance the behavior by `delta_ms`. Only this enemy's velocity and
    /// facing change; position integration is left to physics.
    pub fn update(&mut self, delta_ms: f32, player_position: Vec2, grounded: bool) {
        let speed = self.speed;
        let body = &mut self.body;
        match &mut self.behavior {
            Behavior::Patrol {
                direction,
                range,
                anchor_x,
            } => {
                if body.position.x < *anchor_x - *range {
                    *direction = 1;
                } else if body.position.x > *anchor_x + *range {
                    *direction = -1;
                }
                body.velocity.x = speed * *direction as f32;
                body.facing = Facing::from_direction(*direction as f32);
            }
            Behavior::Jumping {
                timer_ms,
                interval_ms,
                jump_velocity,
            } => {
                // Keeps accumulating while airborne; the jump fires on landing.
                *timer_ms += delta_ms;
                if *timer_ms > *interval_ms && grounded {
                    body.velocity.y = *jump_velocity;
                    *timer_ms = 0.0;
                }
            }
            Behavior::Chasing { range } => {
                let distance = body.position.distance(player_position);
                if distance < *range {
                    let dir = if player_position.x < body.position.x {
                        -1.0
                    } else {
                        1.0
                    };
                    body.velocity.x = speed * dir;
                    body.facing = Facing::from_direction(dir);
                } else {
                    body.velocity.x = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(archetype: EnemyArchetype, x: f32) -> Enemy {
        Enemy::new(
            archetype,
            x,
            576.0,
            BodyHandle(1),
            &GameConfig::default(),
            &mut GameRng::new(11),
        )
    }

    #[test]
    fn patrol_starts_moving_and_bounces_at_bounds() {
        let mut e = enemy(EnemyArchetype::Patrol, 500.0);
        assert_eq!(e.body.velocity.x.abs(), 100.0);

        e.body.position.x = 601.0;
        e.update(16.0, Vec2::ZERO, true);
        assert_eq!(e.body.velocity.x, -100.0);
        assert_eq!(e.body.facing, Facing::Left);

        e.body.position.x = 550.0;
        e.update(16.0, Vec2::ZERO, true);
        assert_eq!(e.body.velocity.x, -100.0);

        e.body.position.x = 399.0;
        e.update(16.0, Vec2::ZERO, true);
        assert_eq!(e.body.velocity.x, 100.0);
        assert_eq!(e.body.facing, Facing::Right);
    }

    #[test]
    fn patrol_overshoot_is_bounded_by_one_frame_of_motion() {
        let mut e = enemy(EnemyArchetype::Patrol, 500.0);
        let dt_ms = 16.0;
        let step = 100.0 * dt_ms / 1000.0;
        for _ in 0..2000 {
            e.update(dt_ms, Vec2::ZERO, true);
            e.body.position.x += e.body.velocity.x * dt_ms / 1000.0;
            assert!(e.body.position.x <= 600.0 + step + 1e-3);
            assert!(e.body.position.x >= 400.0 - step - 1e-3);
        }
    }

    #[test]
    fn jump_interval_is_drawn_in_range() {
        let cfg = GameConfig::default();
        let mut rng = GameRng::new(99);
        for i in 0..200 {
            let e = Enemy::new(EnemyArchetype::Jumping, 0.0, 0.0, BodyHandle(i), &cfg, &mut rng);
            let Behavior::Jumping { interval_ms, .. } = e.behavior else {
                panic!("expected jumping behavior");
            };
            assert!((2000.0..=4000.0).contains(&interval_ms));
        }
    }

    #[test]
    fn jumper_waits_for_interval_then_ground() {
        let mut e = enemy(EnemyArchetype::Jumping, 100.0);
        e.behavior = Behavior::Jumping {
            timer_ms: 0.0,
            interval_ms: 2000.0,
            jump_velocity: -200.0,
        };
        e.update(2000.0, Vec2::ZERO, true);
        assert_eq!(e.body.velocity.y, 0.0, "timer must exceed, not equal, the interval");

        e.update(50.0, Vec2::ZERO, false);
        assert_eq!(e.body.velocity.y, 0.0);

        // Debt carries until landing.
        e.update(500.0, Vec2::ZERO, false);
        e.update(16.0, Vec2::ZERO, true);
        assert_eq!(e.body.velocity.y, -200.0);
        let Behavior::Jumping { timer_ms, .. } = e.behavior else {
            unreachable!()
        };
        assert_eq!(timer_ms, 0.0);
    }

    #[test]
    fn chaser_engages_only_inside_range() {
        let mut e = enemy(EnemyArchetype::Chasing, 500.0);
        e.update(16.0, Vec2::new(351.0, 576.0), true);
        assert_eq!(e.body.velocity.x, -100.0);
        assert_eq!(e.body.facing, Facing::Left);

        e.update(16.0, Vec2::new(649.0, 576.0), true);
        assert_eq!(e.body.velocity.x, 100.0);
        assert_eq!(e.body.facing, Facing::Right);

        e.update(16.0, Vec2::new(651.0, 576.0), true);
        assert_eq!(e.body.velocity.x, 0.0);
        assert_eq!(e.body.facing, Facing::Right);
    }

    #[test]
    fn chaser_uses_euclidean_distance() {
        let mut e = enemy(EnemyArchetype::Chasing, 500.0);
        // dx = 100, dy = 120 -> ~156 > 150
        e.update(16.0, Vec2::new(600.0, 456.0), true);
        assert_eq!(e.body.velocity.x, 0.0);
    }
}
