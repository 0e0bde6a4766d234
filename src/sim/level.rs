//! Pixel-encoded level maps
//!
//! A level is a raster image where pixel color selects the obstacle in
//! that grid cell: pure red is a hazard triangle, pure green a platform
//! box, anything else empty. Decoding makes two passes — a counting
//! pass that sizes the output, then a population pass in row-major
//! order — and refuses maps where the passes disagree.

use std::error::Error;
use std::fmt;
use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::consts::{CELL_SIZE, SCREEN_HEIGHT};
use crate::sim::state::Obstacle;

/// Exact-match reference colors, all four channels.
pub const HAZARD_PIXEL: [u8; 4] = [255, 0, 0, 255];
pub const PLATFORM_PIXEL: [u8; 4] = [0, 255, 0, 255];

/// Map loading failures.
#[derive(Debug)]
pub enum LevelError {
    /// The map image could not be opened or decoded. Recoverable: the
    /// caller aborts level load and returns to a safe screen.
    Resource { path: String, reason: String },
    /// The counting and population passes disagreed on obstacle totals.
    DataIntegrity {
        counted: (usize, usize),
        populated: (usize, usize),
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Resource { path, reason } => {
                write!(f, "failed to load map image {path:?}: {reason}")
            }
            LevelError::DataIntegrity { counted, populated } => write!(
                f,
                "map decode mismatch: counted {}/{} hazards/platforms, populated {}/{}",
                counted.0, counted.1, populated.0, populated.1
            ),
        }
    }
}

impl Error for LevelError {}

/// Decoded level: typed obstacle lists plus the world width the scroll
/// camera must cover to complete the run.
#[derive(Debug, Clone)]
pub struct MapData {
    pub hazards: Vec<Obstacle>,
    pub platforms: Vec<Obstacle>,
    pub width_px: f32,
}

/// Open a map image from disk and decode it.
pub fn load_map(path: &Path) -> Result<MapData, LevelError> {
    let img = image::open(path).map_err(|e| LevelError::Resource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    decode_map(&img.to_rgba8())
}

/// Decode an already-loaded RGBA map image.
pub fn decode_map(img: &RgbaImage) -> Result<MapData, LevelError> {
    let (width, height) = img.dimensions();

    // Counting pass sizes the output vectors
    let mut hazard_count = 0usize;
    let mut platform_count = 0usize;
    for pixel in img.pixels() {
        if pixel.0 == HAZARD_PIXEL {
            hazard_count += 1;
        } else if pixel.0 == PLATFORM_PIXEL {
            platform_count += 1;
        }
    }

    // Population pass, row-major (top-to-bottom, left-to-right)
    let mut hazards = Vec::with_capacity(hazard_count);
    let mut platforms = Vec::with_capacity(platform_count);
    for row in 0..height {
        for col in 0..width {
            let pixel = img.get_pixel(col, row).0;
            if pixel != HAZARD_PIXEL && pixel != PLATFORM_PIXEL {
                continue;
            }
            let center = cell_center(col, row, height);
            let is_up = row < height / 2;
            if pixel == HAZARD_PIXEL {
                hazards.push(Obstacle::hazard(center, is_up));
            } else {
                platforms.push(Obstacle::platform(center, is_up));
            }
        }
    }

    if hazards.len() != hazard_count || platforms.len() != platform_count {
        return Err(LevelError::DataIntegrity {
            counted: (hazard_count, platform_count),
            populated: (hazards.len(), platforms.len()),
        });
    }

    log::info!(
        "decoded map: {}x{} cells, {} hazards, {} platforms",
        width,
        height,
        hazards.len(),
        platforms.len()
    );

    Ok(MapData {
        hazards,
        platforms,
        width_px: width as f32 * CELL_SIZE,
    })
}

/// World-space center of a grid cell. Row 0 is the top of the image but
/// the top of the playable world; the bottom row is anchored so it
/// rests on the viewport floor.
fn cell_center(col: u32, row: u32, height: u32) -> Vec2 {
    let x = col as f32 * CELL_SIZE + CELL_SIZE / 2.0;
    let y_top = SCREEN_HEIGHT - (height - row) as f32 * CELL_SIZE;
    Vec2::new(x, y_top + CELL_SIZE / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn three_by_three_scenario() {
        let mut img = RgbaImage::new(3, 3);
        img.put_pixel(1, 0, Rgba(HAZARD_PIXEL));
        img.put_pixel(2, 2, Rgba(PLATFORM_PIXEL));

        let map = decode_map(&img).unwrap();
        assert_eq!(map.hazards.len(), 1);
        assert_eq!(map.platforms.len(), 1);

        // Hazard at col 1, row 0 of a 3-row map
        let expected_hazard = cell_center(1, 0, 3);
        assert_eq!(map.hazards[0].source_position, expected_hazard);
        // Platform at col 2, row 2 (bottom row rests on the floor)
        let expected_platform = cell_center(2, 2, 3);
        assert_eq!(map.platforms[0].source_position, expected_platform);
        assert_eq!(
            map.platforms[0].source_position.y + CELL_SIZE / 2.0,
            SCREEN_HEIGHT
        );

        assert_eq!(map.width_px, 3.0 * CELL_SIZE);
    }

    #[test]
    fn near_miss_colors_decode_as_empty() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 254]));
        img.put_pixel(1, 0, Rgba([254, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 255, 1, 255]));

        let map = decode_map(&img).unwrap();
        assert!(map.hazards.is_empty());
        assert!(map.platforms.is_empty());
    }

    #[test]
    fn upper_half_obstacles_are_flagged_up() {
        let mut img = RgbaImage::new(1, 4);
        img.put_pixel(0, 0, Rgba(HAZARD_PIXEL));
        img.put_pixel(0, 3, Rgba(HAZARD_PIXEL));

        let map = decode_map(&img).unwrap();
        assert!(map.hazards[0].states.is_up);
        assert!(!map.hazards[1].states.is_up);
    }

    #[test]
    fn row_major_population_order() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 0, Rgba(PLATFORM_PIXEL));
        img.put_pixel(0, 1, Rgba(PLATFORM_PIXEL));

        let map = decode_map(&img).unwrap();
        // Top row comes first even though its column index is larger
        assert!(map.platforms[0].source_position.y < map.platforms[1].source_position.y);
        assert!(map.platforms[0].source_position.x > map.platforms[1].source_position.x);
    }

    #[test]
    fn missing_file_is_a_resource_error() {
        let err = load_map(Path::new("no/such/map.png")).unwrap_err();
        assert!(matches!(err, LevelError::Resource { .. }));
    }
}
