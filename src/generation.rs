use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::TileType;
use crate::config::GameConfig;
use crate::error::LevelError;
use crate::random::GameRng;
use crate::tilemap::TileGrid;

/// A horizontal run of ground tiles, relative to a segment's left column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub offset_x: usize,
    pub offset_y: usize,
    pub width_tiles: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTemplate {
    pub name: String,
    pub platforms: Vec<PlatformSpec>,
}

fn platform(offset_x: usize, offset_y: usize, width_tiles: usize) -> PlatformSpec {
    PlatformSpec {
        offset_x,
        offset_y,
        width_tiles,
    }
}

/// The three built-in 10-tile-wide segments.
pub fn default_catalog() -> Vec<SegmentTemplate> {
    vec![
        SegmentTemplate {
            name: "two_platforms".to_string(),
            platforms: vec![platform(2, 15, 4), platform(6, 12, 3)],
        },
        SegmentTemplate {
            name: "raised_floor".to_string(),
            platforms: vec![platform(0, 17, 10), platform(4, 14, 3)],
        },
        SegmentTemplate {
            name: "gap_and_ledge".to_string(),
            platforms: vec![platform(0, 17, 4), platform(6, 13, 4)],
        },
    ]
}

#[derive(Clone, Debug)]
pub struct GenerateRequest {
    pub map_width_tiles: usize,
    pub map_height_tiles: usize,
    pub segment_width_tiles: usize,
    pub tile_size: f32,
}

impl GenerateRequest {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            map_width_tiles: config.map_width_tiles,
            map_height_tiles: config.map_height_tiles,
            segment_width_tiles: config.segment_width_tiles,
            tile_size: config.tile_size,
        }
    }
}

/// How the grid was partitioned into segments and which template each got.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelLayout {
    pub map_width_tiles: usize,
    pub map_height_tiles: usize,
    pub segment_width_tiles: usize,
    pub tile_size: f32,
    /// Catalog index per segment, left to right. `None` when the catalog was empty.
    pub segment_templates: Vec<Option<usize>>,
    /// Columns past the last full segment; they only carry the floor row.
    pub remainder_columns: usize,
}

impl LevelLayout {
    pub fn num_segments(&self) -> usize {
        self.segment_templates.len()
    }

    pub fn pixel_width(&self) -> f32 {
        self.map_width_tiles as f32 * self.tile_size
    }

    pub fn segment_pixel_width(&self) -> f32 {
        self.segment_width_tiles as f32 * self.tile_size
    }

    /// Pixel span `[start, end)` of segment `index`.
    pub fn segment_span(&self, index: usize) -> (f32, f32) {
        let start = index as f32 * self.segment_pixel_width();
        (start, start + self.segment_pixel_width())
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    pub grid: TileGrid,
    pub layout: LevelLayout,
    pub pixel_width: f32,
}

pub fn generate(
    req: &GenerateRequest,
    catalog: &[SegmentTemplate],
    rng: &mut GameRng,
) -> Result<GeneratedLevel, LevelError> {
    if req.segment_width_tiles == 0 {
        return Err(LevelError::InvalidConfig(
            "segment width must be non-zero".to_string(),
        ));
    }
    if req.map_width_tiles == 0 || req.map_height_tiles == 0 {
        return Err(LevelError::InvalidConfig(format!(
            "map must be at least 1x1 tiles, got {}x{}",
            req.map_width_tiles, req.map_height_tiles
        )));
    }

    let width = req.map_width_tiles;
    let height = req.map_height_tiles;
    let mut grid = TileGrid::new(width, height, req.tile_size);

    // Step 1: continuous floor baseline
    let floor_y = (height - 1) as i32;
    for x in 0..width as i32 {
        grid.set_tile(x, floor_y, TileType::Ground)?;
    }

    // Step 2: one template per full segment
    let num_segments = width / req.segment_width_tiles;
    let remainder_columns = width % req.segment_width_tiles;
    if remainder_columns != 0 {
        warn!(
            "[DungeonRunner gen] Map width {} is not a multiple of segment width {}; {} trailing column(s) get floor only",
            width, req.segment_width_tiles, remainder_columns
        );
    }
    if catalog.is_empty() {
        warn!("[DungeonRunner gen] Empty segment catalog; level has floor only");
    }

    let indices: Vec<usize> = (0..catalog.len()).collect();
    let mut segment_templates = Vec::with_capacity(num_segments);
    for seg in 0..num_segments {
        let chosen = rng.choose(&indices).copied();
        segment_templates.push(chosen);
        let Some(template) = chosen.map(|i| &catalog[i]) else {
            continue;
        };
        for p in &template.platforms {
            let abs_x = seg * req.segment_width_tiles + p.offset_x;
            for x in abs_x..abs_x + p.width_tiles {
                grid.set_tile(x as i32, p.offset_y as i32, TileType::Ground)?;
            }
        }
    }

    // Step 3: collision is enabled once, after every write
    grid.mark_collidable(TileType::Ground);

    let layout = LevelLayout {
        map_width_tiles: width,
        map_height_tiles: height,
        segment_width_tiles: req.segment_width_tiles,
        tile_size: req.tile_size,
        segment_templates,
        remainder_columns,
    };
    let pixel_width = layout.pixel_width();
    debug!(
        "[DungeonRunner gen] Generated {}x{} level: {} segment(s), {} px wide",
        width, height, num_segments, pixel_width
    );

    Ok(GeneratedLevel {
        grid,
        layout,
        pixel_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(width: usize, height: usize) -> GenerateRequest {
        GenerateRequest {
            map_width_tiles: width,
            map_height_tiles: height,
            segment_width_tiles: 10,
            tile_size: 32.0,
        }
    }

    #[test]
    fn reference_scenario_dimensions() {
        let level = generate(&req(50, 20), &default_catalog(), &mut GameRng::new(42)).unwrap();
        assert_eq!(level.layout.num_segments(), 5);
        assert_eq!(level.pixel_width, 1600.0);
        assert_eq!(level.layout.remainder_columns, 0);
    }

    #[test]
    fn same_seed_same_grid() {
        let catalog = default_catalog();
        for seed in [0u64, 1, 42, 777, 123_456_789] {
            let a = generate(&req(50, 20), &catalog, &mut GameRng::new(seed)).unwrap();
            let b = generate(&req(50, 20), &catalog, &mut GameRng::new(seed)).unwrap();
            assert_eq!(a.grid, b.grid, "seed {seed}");
            assert_eq!(a.layout, b.layout, "seed {seed}");
        }
    }

    #[test]
    fn floor_row_is_always_solid() {
        let catalog = default_catalog();
        for seed in 0..20u64 {
            let level = generate(&req(50, 20), &catalog, &mut GameRng::new(seed)).unwrap();
            for x in 0..50 {
                assert!(level.grid.is_solid_at(x, 19), "seed {seed} x {x}");
            }
        }
    }

    #[test]
    fn platforms_follow_chosen_templates() {
        let catalog = default_catalog();
        let level = generate(&req(50, 20), &catalog, &mut GameRng::new(5)).unwrap();
        for (seg, chosen) in level.layout.segment_templates.iter().enumerate() {
            let template = &catalog[chosen.expect("catalog is non-empty")];
            for p in &template.platforms {
                for dx in 0..p.width_tiles {
                    let x = (seg * 10 + p.offset_x + dx) as i32;
                    assert_eq!(
                        level.grid.tile(x, p.offset_y as i32),
                        Ok(TileType::Ground)
                    );
                }
            }
        }
    }

    #[test]
    fn remainder_columns_only_have_floor() {
        let level = generate(&req(55, 20), &default_catalog(), &mut GameRng::new(3)).unwrap();
        assert_eq!(level.layout.num_segments(), 5);
        assert_eq!(level.layout.remainder_columns, 5);
        for x in 50..55 {
            for y in 0..19 {
                assert_eq!(level.grid.tile(x, y), Ok(TileType::Empty));
            }
            assert_eq!(level.grid.tile(x, 19), Ok(TileType::Ground));
        }
    }

    #[test]
    fn narrower_than_one_segment_is_floor_only() {
        let level = generate(&req(7, 20), &default_catalog(), &mut GameRng::new(3)).unwrap();
        assert_eq!(level.layout.num_segments(), 0);
        assert_eq!(level.grid.tiles().iter().filter(|&&t| t == 1).count(), 7);
    }

    #[test]
    fn template_outside_grid_aborts_generation() {
        let catalog = vec![SegmentTemplate {
            name: "too_deep".to_string(),
            platforms: vec![platform(0, 25, 3)],
        }];
        let err = generate(&req(20, 20), &catalog, &mut GameRng::new(1)).unwrap_err();
        assert!(matches!(err, LevelError::OutOfBounds { y: 25, .. }));
    }

    #[test]
    fn empty_catalog_still_builds_floor() {
        let level = generate(&req(30, 10), &[], &mut GameRng::new(1)).unwrap();
        assert_eq!(level.layout.segment_templates, vec![None, None, None]);
        assert!(level.grid.is_solid_at(0, 9));
    }

    #[test]
    fn zero_segment_width_is_rejected() {
        let mut r = req(30, 10);
        r.segment_width_tiles = 0;
        assert!(matches!(
            generate(&r, &default_catalog(), &mut GameRng::new(1)),
            Err(LevelError::InvalidConfig(_))
        ));
    }
}
