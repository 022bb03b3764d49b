use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_line, point_in_rings, scanline_crossings};
use crate::map::projection::Projection;
use crate::map::spatial::CountryIndex;
use ratatui::style::Color;

/// A closed ring of lon/lat coordinates
pub type Ring = Vec<(f64, f64)>;
/// One polygon: exterior ring followed by any holes
pub type Polygon = Vec<Ring>;

/// Outline color for every country shape; selection state only affects fill.
pub const OUTLINE_COLOR: Color = Color::DarkGray;

/// One territory from the geometry dataset.
#[derive(Debug, Clone)]
pub struct Country {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

impl Country {
    /// Bounding box over all rings: (min_lon, min_lat, max_lon, max_lat)
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for ring in self.polygons.iter().flatten() {
            for &(lon, lat) in ring {
                bbox.0 = bbox.0.min(lon);
                bbox.1 = bbox.1.min(lat);
                bbox.2 = bbox.2.max(lon);
                bbox.3 = bbox.3.max(lat);
            }
        }
        bbox
    }

    fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons.iter().any(|rings| point_in_rings(rings, lon, lat))
    }
}

/// Map renderer: holds the decoded country shapes and a spatial index for
/// resolving clicks back to country names.
pub struct MapRenderer {
    countries: Vec<Country>,
    index: CountryIndex,
}

impl MapRenderer {
    /// Cell size tuned for ~200 countries at world scale
    const CELL_SIZE_DEG: f64 = 5.0;

    pub fn new(countries: Vec<Country>) -> Self {
        let index = CountryIndex::build(countries.iter().map(Country::bbox), Self::CELL_SIZE_DEG);
        Self { countries, index }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Draw outlines for every country, then fill the selected ones so the
    /// fill color owns the shared cells.
    pub fn render<F>(&self, canvas: &mut BrailleCanvas, proj: &Projection, is_selected: F, fill: Color)
    where
        F: Fn(&str) -> bool,
    {
        for country in &self.countries {
            for ring in country.polygons.iter().flatten() {
                self.draw_ring(canvas, ring, proj);
            }
        }

        let mut crossings = Vec::new();
        for country in self.countries.iter().filter(|c| is_selected(&c.name)) {
            for polygon in &country.polygons {
                self.fill_polygon(canvas, polygon, proj, fill, &mut crossings);
            }
        }
    }

    /// Resolve a geographic point to the country covering it.
    pub fn country_at(&self, lon: f64, lat: f64) -> Option<&str> {
        self.index
            .candidates(lon, lat)
            .iter()
            .map(|&idx| &self.countries[idx])
            .find(|country| country.contains(lon, lat))
            .map(|country| country.name.as_str())
    }

    /// Draw a ring outline with closing segment and edge culling.
    fn draw_ring(&self, canvas: &mut BrailleCanvas, ring: &Ring, proj: &Projection) {
        if ring.len() < 2 {
            return;
        }

        let mut prev: Option<(i32, i32)> = None;
        for &(lon, lat) in ring.iter().chain(std::iter::once(&ring[0])) {
            let (px, py) = proj.project_px(lon, lat);

            if let Some((prev_x, prev_y)) = prev {
                if proj.is_visible(prev_x, prev_y) || proj.is_visible(px, py) {
                    draw_line(canvas, prev_x, prev_y, px, py, OUTLINE_COLOR);
                }
            }

            prev = Some((px, py));
        }
    }

    /// Scanline-fill one polygon at braille-pixel resolution.
    fn fill_polygon(
        &self,
        canvas: &mut BrailleCanvas,
        polygon: &Polygon,
        proj: &Projection,
        fill: Color,
        crossings: &mut Vec<f64>,
    ) {
        let projected: Vec<Ring> = polygon
            .iter()
            .map(|ring| ring.iter().map(|&(lon, lat)| proj.project(lon, lat)).collect())
            .collect();

        let (mut y_min, mut y_max) = (f64::MAX, f64::MIN);
        for &(_, y) in projected.iter().flatten() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if y_min > y_max {
            return;
        }

        let y_lo = (y_min.floor().max(0.0)) as i32;
        let y_hi = (y_max.ceil().min(canvas.pixel_height() as f64)) as i32;

        for py in y_lo..y_hi {
            scanline_crossings(&projected, py as f64 + 0.5, crossings);
            for pair in crossings.chunks_exact(2) {
                let x_lo = pair[0].ceil().max(0.0) as i32;
                let x_hi = pair[1].floor().min(canvas.pixel_width() as f64 - 1.0) as i32;
                for px in x_lo..=x_hi {
                    canvas.set_pixel_signed(px, py, fill);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_country(name: &str, lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Country {
        Country {
            name: name.to_string(),
            polygons: vec![vec![vec![(lon0, lat0), (lon1, lat0), (lon1, lat1), (lon0, lat1)]]],
        }
    }

    fn test_renderer() -> MapRenderer {
        MapRenderer::new(vec![
            square_country("Westland", -40.0, 0.0, -20.0, 20.0),
            square_country("Eastland", 20.0, 10.0, 60.0, 40.0),
        ])
    }

    #[test]
    fn test_country_at_resolves_hits() {
        let renderer = test_renderer();
        assert_eq!(renderer.country_at(-30.0, 10.0), Some("Westland"));
        assert_eq!(renderer.country_at(40.0, 25.0), Some("Eastland"));
        assert_eq!(renderer.country_at(0.0, -50.0), None);
    }

    #[test]
    fn test_country_at_edge_of_bbox_cell() {
        let renderer = test_renderer();
        // Inside Eastland's bbox cells but outside the polygon
        assert_eq!(renderer.country_at(21.0, 9.0), None);
    }

    fn cell_char(canvas: &BrailleCanvas, cx: usize, cy: usize) -> char {
        canvas
            .to_string()
            .lines()
            .nth(cy)
            .and_then(|row| row.chars().nth(cx))
            .unwrap()
    }

    #[test]
    fn test_render_fills_selected_only() {
        let renderer = test_renderer();
        let proj = Projection::world(400, 400);
        // A point well inside Westland, away from its outline
        let (px, py) = proj.project_px(-30.0, 10.0);
        let (cx, cy) = (px as usize / 2, py as usize / 4);

        let mut plain = BrailleCanvas::new(200, 100);
        renderer.render(&mut plain, &proj, |_| false, Color::Green);
        assert_eq!(cell_char(&plain, cx, cy), '⠀');

        let mut selected = BrailleCanvas::new(200, 100);
        renderer.render(&mut selected, &proj, |n| n == "Westland", Color::Green);
        assert_eq!(cell_char(&selected, cx, cy), '⣿');
        assert_eq!(selected.cell_color(cx, cy), Color::Green);
    }

    #[test]
    fn test_unselected_country_is_outline_only() {
        let renderer = test_renderer();
        let proj = Projection::world(400, 400);
        let (px, py) = proj.project_px(40.0, 25.0);

        let mut canvas = BrailleCanvas::new(200, 100);
        renderer.render(&mut canvas, &proj, |n| n == "Westland", Color::Green);
        // Eastland's interior stays empty while Westland is filled
        assert_eq!(cell_char(&canvas, px as usize / 2, py as usize / 4), '⠀');
    }

    #[test]
    fn test_bbox() {
        let country = square_country("Box", -10.0, -5.0, 15.0, 25.0);
        assert_eq!(country.bbox(), (-10.0, -5.0, 15.0, 25.0));
    }
}
