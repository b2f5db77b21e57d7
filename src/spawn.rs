use crate::ai::{Enemy, EnemyArchetype};
use crate::components::BodyHandle;
use crate::config::GameConfig;
use crate::generation::LevelLayout;
use crate::random::GameRng;

/// Place one enemy per segment: uniform archetype, uniform x inside the
/// segment (keeping `spawn_margin` from both edges), fixed height two rows
/// above the floor. Local terrain is not consulted, so an enemy may start
/// floating or inside a platform.
///
/// Body handles are allocated from `first_handle` upward.
pub fn spawn_enemies(
    layout: &LevelLayout,
    config: &GameConfig,
    rng: &mut GameRng,
    first_handle: u32,
) -> Vec<Enemy> {
    let segment_px = layout.segment_pixel_width();
    let margin = config.spawn_margin.round() as i64;
    let y = layout.map_height_tiles.saturating_sub(2) as f32 * layout.tile_size;

    (0..layout.num_segments())
        .map(|seg| {
            let archetype = rng
                .choose(&EnemyArchetype::ALL)
                .copied()
                .unwrap_or(EnemyArchetype::Patrol);
            let (start, _) = layout.segment_span(seg);
            let offset = rng
                .range_inclusive(margin, segment_px as i64 - margin)
                .clamp(0, (segment_px as i64 - 1).max(0));
            let x = start + offset as f32;
            let handle = BodyHandle(first_handle + seg as u32);
            Enemy::new(archetype, x, y, handle, config, rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{default_catalog, generate, GenerateRequest};

    fn layout(width: usize, seed: u64) -> LevelLayout {
        let cfg = GameConfig {
            map_width_tiles: width,
            ..GameConfig::default()
        };
        generate(
            &GenerateRequest::from_config(&cfg),
            &default_catalog(),
            &mut GameRng::new(seed),
        )
        .unwrap()
        .layout
    }

    #[test]
    fn one_enemy_inside_each_segment() {
        let cfg = GameConfig::default();
        for seed in 0..25u64 {
            let layout = layout(50, seed);
            let enemies = spawn_enemies(&layout, &cfg, &mut GameRng::new(seed), 1);
            assert_eq!(enemies.len(), layout.num_segments());
            for (seg, enemy) in enemies.iter().enumerate() {
                let (start, end) = layout.segment_span(seg);
                assert!(enemy.body.x() >= start + 50.0, "seed {seed} seg {seg}");
                assert!(enemy.body.x() <= end - 50.0, "seed {seed} seg {seg}");
                assert_eq!(enemy.body.y(), 576.0);
                assert_eq!(enemy.body.handle, BodyHandle(1 + seg as u32));
            }
        }
    }

    #[test]
    fn remainder_columns_get_no_enemy() {
        let cfg = GameConfig::default();
        let layout = layout(57, 1);
        let enemies = spawn_enemies(&layout, &cfg, &mut GameRng::new(1), 1);
        assert_eq!(enemies.len(), 5);
        assert!(enemies.iter().all(|e| e.body.x() < 1600.0));
    }

    #[test]
    fn narrow_segments_keep_enemies_inside_their_span() {
        let cfg = GameConfig {
            segment_width_tiles: 1,
            ..GameConfig::default()
        };
        // Templates are wider than one tile, so lay out a floor-only level.
        let layout = generate(
            &GenerateRequest::from_config(&cfg),
            &[],
            &mut GameRng::new(4),
        )
        .unwrap()
        .layout;
        let enemies = spawn_enemies(&layout, &cfg, &mut GameRng::new(4), 1);
        assert_eq!(enemies.len(), 50);
        for (seg, enemy) in enemies.iter().enumerate() {
            let (start, end) = layout.segment_span(seg);
            assert!(enemy.body.x() >= start && enemy.body.x() < end, "seg {seg}");
        }
    }

    #[test]
    fn all_archetypes_show_up_over_many_draws() {
        let cfg = GameConfig::default();
        let layout = layout(50, 2);
        let mut rng = GameRng::new(2);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            for e in spawn_enemies(&layout, &cfg, &mut rng, 1) {
                seen.insert(e.archetype());
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn spawning_is_deterministic() {
        let cfg = GameConfig::default();
        let layout = layout(50, 8);
        let a = spawn_enemies(&layout, &cfg, &mut GameRng::new(8), 1);
        let b = spawn_enemies(&layout, &cfg, &mut GameRng::new(8), 1);
        let summary = |v: &[Enemy]| {
            v.iter()
                .map(|e| (e.archetype(), e.body.x(), e.behavior.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&a), summary(&b));
    }
}
