use std::collections::BTreeSet;

use crate::components::TileType;
use crate::error::LevelError;

/// Row-major grid of tile ids plus the set of ids that collide.
/// Built once per level and read-only during play.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<u8>,
    solid: BTreeSet<u8>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles: vec![TileType::Empty.id(); width * height],
            solid: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, LevelError> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return Err(LevelError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    /// Overwrite a tile. Last write wins.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType) -> Result<(), LevelError> {
        let idx = self.index(x, y)?;
        self.tiles[idx] = tile.id();
        Ok(())
    }

    pub fn tile(&self, x: i32, y: i32) -> Result<TileType, LevelError> {
        let idx = self.index(x, y)?;
        Ok(TileType::from_u8(self.tiles[idx]))
    }

    /// Lenient read for collision probes: anything off-grid is empty.
    pub fn get_tile(&self, x: i32, y: i32) -> u8 {
        self.index(x, y)
            .map(|idx| self.tiles[idx])
            .unwrap_or(TileType::Empty.id())
    }

    pub fn mark_collidable(&mut self, tile: TileType) {
        self.solid.insert(tile.id());
    }

    pub fn is_solid(&self, tile: TileType) -> bool {
        self.solid.contains(&tile.id())
    }

    pub fn is_solid_at(&self, x: i32, y: i32) -> bool {
        self.solid.contains(&self.get_tile(x, y))
    }

    pub fn solid_set(&self) -> impl Iterator<Item = TileType> + '_ {
        self.solid.iter().map(|&id| TileType::from_u8(id))
    }
}
