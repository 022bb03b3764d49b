use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Map center: the view sits on the prime meridian, nudged north so the
/// populated hemispheres fill the frame.
pub const CENTER: (f64, f64) = (0.0, 20.0);

/// Pixels per radian for a 800px-wide scene; wider canvases scale linearly.
/// Slightly tighter than a full-world fit, so the extreme east/west edges
/// crop off-canvas.
const SCALE_PER_WIDTH: f64 = 147.0 / 800.0;

/// Fixed Mercator projection over a pixel canvas. Not user-adjustable:
/// no pan, no zoom, center and scale are functions of the canvas size only,
/// so any two surfaces with the same dimensions agree on every coordinate.
#[derive(Clone, Debug)]
pub struct Projection {
    pub width: usize,
    pub height: usize,
    center_lon: f64,
    center_lat: f64,
    /// Pixels per radian of longitude
    scale: f64,
}

impl Projection {
    /// World view for a canvas of the given pixel dimensions.
    pub fn world(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            center_lon: CENTER.0,
            center_lat: CENTER.1,
            scale: width as f64 * SCALE_PER_WIDTH,
        }
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.width as f64 / 2.0
            + self.scale * (lon.to_radians() - self.center_lon.to_radians());
        let y = self.height as f64 / 2.0
            - self.scale * (mercator_y(lat) - mercator_y(self.center_lat));
        (x, y)
    }

    /// Project to integer pixels for line drawing.
    pub fn project_px(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (x, y) = self.project(lon, lat);
        (x.round() as i32, y.round() as i32)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat).
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let lon_rad =
            self.center_lon.to_radians() + (px as f64 - self.width as f64 / 2.0) / self.scale;
        let y = mercator_y(self.center_lat) + (self.height as f64 / 2.0 - py as f64) / self.scale;
        let lat_rad = 2.0 * y.exp().atan() - FRAC_PI_2;
        (lon_rad.to_degrees(), lat_rad.to_degrees())
    }

    /// Check if a projected point falls on the canvas (small margin for
    /// segments that straddle the edge).
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }
}

/// Mercator ordinate of a latitude, clamped just short of the poles where
/// the projection diverges.
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians().clamp(-89.0_f64.to_radians(), 89.0_f64.to_radians());
    (FRAC_PI_4 + lat_rad / 2.0).tan().ln()
}
