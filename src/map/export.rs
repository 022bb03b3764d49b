use crate::map::geometry::scanline_crossings;
use crate::map::projection::Projection;
use crate::map::renderer::{Country, Ring};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::path::Path;

/// Base scene size (4:3, matches the on-screen map's aspect)
const BASE_WIDTH: u32 = 1600;
const BASE_HEIGHT: u32 = 1200;
/// Upscale applied on top of the base scene for crisp output
const EXPORT_SCALE: u32 = 2;

/// Output filename, written to the current directory
pub const EXPORT_FILE: &str = "travel-map.png";

const BACKGROUND: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
/// Fill for countries outside the selection
const UNSELECTED: Rgba<u8> = Rgba([0xD6, 0xD6, 0xDA, 0xFF]);

/// One country's rings projected to pixel space, with its resolved fill.
struct Shape {
    rings: Vec<Ring>,
    color: Rgba<u8>,
    y_min: f64,
    y_max: f64,
}

/// Rasterize the scene: white background, every country filled, selected
/// countries in the chosen color. Rows are independent, so the fill is
/// parallelized across them.
pub fn rasterize<F>(countries: &[Country], is_selected: F, fill: (u8, u8, u8), width: u32, height: u32) -> RgbaImage
where
    F: Fn(&str) -> bool,
{
    let proj = Projection::world(width as usize, height as usize);
    let fill = Rgba([fill.0, fill.1, fill.2, 0xFF]);

    let shapes: Vec<Shape> = countries
        .iter()
        .flat_map(|country| {
            let color = if is_selected(&country.name) { fill } else { UNSELECTED };
            let proj = &proj;
            country.polygons.iter().map(move |polygon| {
                let rings: Vec<Ring> = polygon
                    .iter()
                    .map(|ring| ring.iter().map(|&(lon, lat)| proj.project(lon, lat)).collect())
                    .collect();
                let (mut y_min, mut y_max) = (f64::MAX, f64::MIN);
                for &(_, y) in rings.iter().flatten() {
                    y_min = y_min.min(y);
                    y_max = y_max.max(y);
                }
                Shape { rings, color, y_min, y_max }
            })
        })
        .collect();

    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    let row_bytes = width as usize * 4;

    img.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(row, pixels)| {
            let y = row as f64 + 0.5;
            let mut crossings = Vec::new();
            for shape in shapes.iter().filter(|s| s.y_min <= y && y <= s.y_max) {
                scanline_crossings(&shape.rings, y, &mut crossings);
                for pair in crossings.chunks_exact(2) {
                    let x_lo = pair[0].ceil().max(0.0) as usize;
                    let x_hi = (pair[1].floor() as i64).min(width as i64 - 1);
                    if x_hi < x_lo as i64 {
                        continue;
                    }
                    for x in x_lo..=x_hi as usize {
                        pixels[x * 4..x * 4 + 4].copy_from_slice(&shape.color.0);
                    }
                }
            }
        });

    img
}

/// Render the full scene at the upscaled export resolution and write it to
/// `path` as PNG.
pub fn write_png<F>(countries: &[Country], is_selected: F, fill: (u8, u8, u8), path: &Path) -> anyhow::Result<()>
where
    F: Fn(&str) -> bool,
{
    let img = rasterize(
        countries,
        is_selected,
        fill,
        BASE_WIDTH * EXPORT_SCALE,
        BASE_HEIGHT * EXPORT_SCALE,
    );
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_square(name: &str) -> Country {
        Country {
            name: name.to_string(),
            polygons: vec![vec![vec![(-60.0, -30.0), (60.0, -30.0), (60.0, 50.0), (-60.0, 50.0)]]],
        }
    }

    #[test]
    fn test_selected_interior_uses_fill_color() {
        let countries = vec![big_square("Atlantis")];
        let img = rasterize(&countries, |_| true, (0x00, 0x78, 0x48), 160, 120);

        let proj = Projection::world(160, 120);
        let (x, y) = proj.project(0.0, 10.0);
        assert_eq!(img.get_pixel(x as u32, y as u32), &Rgba([0x00, 0x78, 0x48, 0xFF]));
    }

    #[test]
    fn test_unselected_interior_uses_neutral_fill() {
        let countries = vec![big_square("Atlantis")];
        let img = rasterize(&countries, |_| false, (0x00, 0x78, 0x48), 160, 120);

        let proj = Projection::world(160, 120);
        let (x, y) = proj.project(0.0, 10.0);
        assert_eq!(img.get_pixel(x as u32, y as u32), &UNSELECTED);
    }

    #[test]
    fn test_background_stays_white() {
        let countries = vec![big_square("Atlantis")];
        let img = rasterize(&countries, |_| true, (0x00, 0x78, 0x48), 160, 120);
        assert_eq!(img.get_pixel(0, 0), &BACKGROUND);
        assert_eq!(img.get_pixel(159, 119), &BACKGROUND);
    }

    #[test]
    fn test_write_png_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        let countries = vec![big_square("Atlantis")];

        write_png(&countries, |_| true, (0x00, 0x78, 0x48), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
