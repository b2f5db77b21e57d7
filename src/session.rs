use bevy::prelude::*;
use serde::Serialize;

use crate::ai::{Enemy, EnemyArchetype};
use crate::components::{BodyHandle, Facing, Locomotion};
use crate::config::GameConfig;
use crate::error::LevelError;
use crate::events::{GameEvent, GameEventBus, SessionEvent};
use crate::generation::{default_catalog, generate, GenerateRequest, LevelLayout, SegmentTemplate};
use crate::input::{FrameInput, InputPlugin, VirtualInput};
use crate::physics_core::{PhysicsWorld, TilePhysics};
use crate::player::{DamageOutcome, Player};
use crate::random::GameRng;
use crate::spawn::spawn_enemies;
use crate::tilemap::TileGrid;

const PLAYER_HANDLE: BodyHandle = BodyHandle(0);

/// What happened during one [`Session::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub damaged: bool,
    pub restarted: bool,
    pub level_completed: bool,
}

/// Everything one play-through owns. Created at session start and rebuilt
/// wholesale when the player runs out of health.
#[derive(Resource)]
pub struct Session {
    config: GameConfig,
    catalog: Vec<SegmentTemplate>,
    rng: GameRng,
    grid: TileGrid,
    layout: LevelLayout,
    pixel_width: f32,
    player: Player,
    enemies: Vec<Enemy>,
    bus: GameEventBus,
    frame: u64,
    restarts: u32,
    level_complete: bool,
}

struct LevelState {
    grid: TileGrid,
    layout: LevelLayout,
    pixel_width: f32,
    player: Player,
    enemies: Vec<Enemy>,
}

fn build_world(
    config: &GameConfig,
    catalog: &[SegmentTemplate],
    rng: &mut GameRng,
) -> Result<LevelState, LevelError> {
    let level = generate(&GenerateRequest::from_config(config), catalog, rng)?;
    let enemies = spawn_enemies(&level.layout, config, rng, PLAYER_HANDLE.0 + 1);
    Ok(LevelState {
        grid: level.grid,
        layout: level.layout,
        pixel_width: level.pixel_width,
        player: Player::new(config, PLAYER_HANDLE),
        enemies,
    })
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, LevelError> {
        Self::with_catalog(config, default_catalog())
    }

    pub fn with_catalog(
        config: GameConfig,
        catalog: Vec<SegmentTemplate>,
    ) -> Result<Self, LevelError> {
        config.validate()?;
        let mut rng = GameRng::new(config.seed);
        let world = build_world(&config, &catalog, &mut rng)?;
        let mut session = Self {
            config,
            catalog,
            rng,
            grid: world.grid,
            layout: world.layout,
            pixel_width: world.pixel_width,
            player: world.player,
            enemies: world.enemies,
            bus: GameEventBus::default(),
            frame: 0,
            restarts: 0,
            level_complete: false,
        };
        session.announce_level();
        Ok(session)
    }

    fn announce_level(&mut self) {
        info!(
            "[DungeonRunner] Level ready: {} segment(s), {} px wide, {} enemies",
            self.layout.num_segments(),
            self.pixel_width,
            self.enemies.len()
        );
        self.bus.emit(
            SessionEvent::LevelGenerated {
                segments: self.layout.num_segments(),
                pixel_width: self.pixel_width,
            },
            self.frame,
        );
    }

    /// Tear down and rebuild grid, player and enemies. The random stream
    /// continues, so the run stays reproducible from the initial seed.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        let world = build_world(&self.config, &self.catalog, &mut self.rng)?;
        self.grid = world.grid;
        self.layout = world.layout;
        self.pixel_width = world.pixel_width;
        self.player = world.player;
        self.enemies = world.enemies;
        self.level_complete = false;
        self.restarts += 1;
        info!("[DungeonRunner] Session restarted (restart #{})", self.restarts);
        self.bus.emit(
            SessionEvent::SessionRestarted {
                restarts: self.restarts,
            },
            self.frame,
        );
        self.announce_level();
        Ok(())
    }

    /// Advance one tick: player intent, then enemy AI (which sees the
    /// player's pre-integration position), level-complete check, physics
    /// integration and finally contact damage.
    pub fn step(
        &mut self,
        input: &FrameInput,
        delta_ms: f32,
        physics: &mut impl PhysicsWorld,
    ) -> Result<StepReport, LevelError> {
        self.frame = self.frame.saturating_add(1);
        let mut report = StepReport::default();

        let grounded = physics.is_grounded(&self.grid, &self.player.body);
        self.player.update(input, grounded);

        let player_position = self.player.body.position;
        for enemy in &mut self.enemies {
            let grounded = physics.is_grounded(&self.grid, &enemy.body);
            enemy.update(delta_ms, player_position, grounded);
        }

        if !self.level_complete
            && self.player.body.x() > self.pixel_width - self.config.level_complete_margin
        {
            self.level_complete = true;
            self.player.unlock_double_jump();
            report.level_completed = true;
            info!("[DungeonRunner] Level complete! New ability unlocked: double jump");
            self.bus.emit(
                SessionEvent::LevelComplete {
                    double_jump_unlocked: true,
                },
                self.frame,
            );
        }

        physics.integrate(&self.grid, &mut self.player.body, delta_ms);
        for enemy in &mut self.enemies {
            physics.integrate(&self.grid, &mut enemy.body, delta_ms);
        }

        let player_body = self.player.body;
        let hit = self
            .enemies
            .iter()
            .any(|enemy| physics.overlaps(&player_body, &enemy.body));
        if hit {
            report.damaged = true;
            match self.player.take_damage() {
                DamageOutcome::Respawned { health } => {
                    info!("[DungeonRunner] Player hit an enemy, health {}", health);
                    self.bus
                        .emit(SessionEvent::PlayerDamaged { health }, self.frame);
                    let spawn = self.player.spawn_point();
                    self.bus.emit(
                        SessionEvent::PlayerRespawned {
                            x: spawn.x,
                            y: spawn.y,
                        },
                        self.frame,
                    );
                }
                DamageOutcome::Died => {
                    info!("[DungeonRunner] Player died, restarting session");
                    self.bus.emit(
                        SessionEvent::PlayerDamaged {
                            health: self.player.health,
                        },
                        self.frame,
                    );
                    self.restart()?;
                    report.restarted = true;
                }
            }
        }

        Ok(report)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn pixel_width(&self) -> f32 {
        self.pixel_width
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn events(&self) -> &GameEventBus {
        &self.bus
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.bus.drain()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let p = &self.player;
        SessionSnapshot {
            frame: self.frame,
            seed: self.config.seed,
            restarts: self.restarts,
            level_complete: self.level_complete,
            pixel_width: self.pixel_width,
            segments: self.layout.num_segments(),
            player: PlayerSnapshot {
                x: p.body.x(),
                y: p.body.y(),
                vx: p.body.velocity.x,
                vy: p.body.velocity.y,
                facing: p.body.facing,
                locomotion: p.locomotion,
                crouching: p.crouching,
                health: p.health,
                double_jump_unlocked: p.double_jump_unlocked,
                double_jump_armed: p.double_jump_armed,
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemySnapshot {
                    archetype: e.archetype(),
                    x: e.body.x(),
                    y: e.body.y(),
                    vx: e.body.velocity.x,
                    vy: e.body.velocity.y,
                    facing: e.body.facing,
                })
                .collect(),
            events: self.bus.recent.iter().cloned().collect(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    pub locomotion: Locomotion,
    pub crouching: bool,
    pub health: i32,
    pub double_jump_unlocked: bool,
    pub double_jump_armed: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct EnemySnapshot {
    pub archetype: EnemyArchetype,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
}

#[derive(Serialize, Clone, Debug)]
pub struct SessionSnapshot {
    pub frame: u64,
    pub seed: u64,
    pub restarts: u32,
    pub level_complete: bool,
    pub pixel_width: f32,
    pub segments: usize,
    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub events: Vec<GameEvent>,
}

/// Runs a [`Session`] on bevy's fixed timestep. Expects a [`GameConfig`]
/// resource; the bundled [`TilePhysics`] is inserted unless one exists.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputPlugin)
            .add_systems(Startup, setup_session)
            .add_systems(
                FixedUpdate,
                step_session.run_if(resource_exists::<Session>),
            );
    }
}

fn setup_session(
    mut commands: Commands,
    config: Option<Res<GameConfig>>,
    physics: Option<Res<TilePhysics>>,
) {
    let config = config.map(|c| (*c).clone()).unwrap_or_default();
    if physics.is_none() {
        commands.insert_resource(TilePhysics::new(config.gravity));
    }
    match Session::new(config) {
        Ok(session) => commands.insert_resource(session),
        Err(e) => error!("[DungeonRunner] Could not start session: {}", e),
    }
}

fn step_session(
    time: Res<Time<Fixed>>,
    mut input: ResMut<VirtualInput>,
    mut session: ResMut<Session>,
    mut physics: ResMut<TilePhysics>,
) {
    let delta_ms = time.delta_secs() * 1000.0;
    let frame_input = input.frame_input();
    // Edges belong to exactly one tick, however many run this frame.
    input.clear_frame();
    if let Err(e) = session.step(&frame_input, delta_ms, &mut *physics) {
        error!("[DungeonRunner] Session step failed: {}", e);
    }
}
