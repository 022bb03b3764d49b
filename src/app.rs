use crate::data::{DataError, WorldData};
use crate::list::ListView;
use crate::map::export;
use crate::map::renderer::MapRenderer;
use crate::map::Projection;
use crate::plane::Flight;
use crate::reconcile::compare_country_lists;
use crate::selection::{SelectionSet, Toggle};
use crate::{countries, hash};
use ratatui::layout::Rect;
use std::path::Path;

/// Main-loop tick, ~60fps
pub const TICK_MS: u64 = 16;

/// Splash overlay duration before the UI appears
const SPLASH_FRAMES: u64 = 1000 / TICK_MS;

/// Fill colors offered for selected countries, cycled with the color key;
/// the first entry is the default.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0x00, 0x78, 0x48), // green (default)
    (0x1D, 0x4E, 0xD8), // blue
    (0xB9, 0x1C, 0x1C), // red
    (0xB4, 0x53, 0x09), // amber
    (0x6D, 0x28, 0xD9), // violet
    (0x0E, 0x74, 0x90), // teal
];

/// Loading state of the map view. Failure replaces the map panel entirely;
/// there is no retry.
pub enum MapState {
    Loading,
    Ready(MapRenderer),
    Failed(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    List,
}

/// Application state: the single owner of the selection set, with both
/// views' toggle events routed through `toggle_country`.
pub struct App {
    pub selection: SelectionSet,
    pub map: MapState,
    pub list: ListView,
    pub focus: Focus,
    pub flight: Option<Flight>,
    pub should_quit: bool,
    /// Terminal size, tracked for the flight trajectory
    pub screen: (u16, u16),
    /// Inner map drawing area, recorded at render time for mouse dispatch
    pub map_area: Rect,
    /// List rows area, recorded at render time for mouse dispatch
    pub list_rows_area: Rect,
    color_index: usize,
    frame: u64,
}

impl App {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            selection: SelectionSet::new(),
            map: MapState::Loading,
            list: ListView::new(),
            focus: Focus::List,
            flight: None,
            should_quit: false,
            screen: (width, height),
            map_area: Rect::default(),
            list_rows_area: Rect::default(),
            color_index: 0,
            frame: 0,
        }
    }

    /// Advance one frame: splash countdown and flight animation.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if let Some(flight) = &mut self.flight {
            if !flight.tick() {
                self.flight = None;
            }
        }
    }

    pub fn splash_active(&self) -> bool {
        self.frame < SPLASH_FRAMES
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = (width, height);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Toggle a country in the shared selection. Every addition launches a
    /// plane; removals do not.
    pub fn toggle_country(&mut self, name: &str) {
        if self.selection.toggle(name) == Toggle::Added {
            let seed = hash::hash2(self.frame, self.selection.len() as u64);
            self.flight = Some(Flight::spawn(self.screen.0, self.screen.1, TICK_MS, seed));
        }
    }

    /// One-time map-load completion: reconcile the dataset vocabulary
    /// against the static list (diagnostic only) and swap in the renderer.
    pub fn on_world_loaded(&mut self, world: WorldData) {
        compare_country_lists(&world.names, &countries::ALL).report();
        tracing::info!(names = world.names.len(), shapes = world.countries.len(), "map data loaded");
        self.map = MapState::Ready(MapRenderer::new(world.countries));
    }

    /// One-time map-load failure: the map panel becomes an error panel.
    pub fn on_world_failed(&mut self, err: DataError) {
        self.map = MapState::Failed(format!("Failed to load map data: {err}"));
    }

    pub fn fill_color(&self) -> ratatui::style::Color {
        let (r, g, b) = PALETTE[self.color_index];
        ratatui::style::Color::Rgb(r, g, b)
    }

    pub fn fill_rgb(&self) -> (u8, u8, u8) {
        PALETTE[self.color_index]
    }

    pub fn cycle_color(&mut self) {
        self.color_index = (self.color_index + 1) % PALETTE.len();
    }

    /// Export the current scene as a PNG next to the working directory.
    /// Failures (including "no map yet") are diagnostic-only by design;
    /// the user gets no feedback and no file.
    pub fn export(&self) {
        let MapState::Ready(renderer) = &self.map else {
            tracing::error!("export skipped: map data not loaded");
            return;
        };
        let result = export::write_png(
            renderer.countries(),
            |name| self.selection.contains(name),
            self.fill_rgb(),
            Path::new(export::EXPORT_FILE),
        );
        match result {
            Ok(()) => tracing::info!(file = export::EXPORT_FILE, "map exported"),
            Err(err) => tracing::error!(%err, "export failed"),
        }
    }

    /// A click inside the map area: braille pixel -> geographic point ->
    /// country, then the same toggle path the list uses.
    pub fn click_map(&mut self, column: u16, row: u16) {
        let area = self.map_area;
        if column < area.x || row < area.y || column >= area.x + area.width || row >= area.y + area.height {
            return;
        }

        // Each terminal cell is 2 braille pixels wide, 4 tall; aim at the
        // cell center
        let px = (column - area.x) as i32 * 2 + 1;
        let py = (row - area.y) as i32 * 4 + 2;
        let proj = Projection::world(area.width as usize * 2, area.height as usize * 4);
        let (lon, lat) = proj.unproject(px, py);

        let MapState::Ready(renderer) = &self.map else { return };
        if let Some(name) = renderer.country_at(lon, lat).map(str::to_string) {
            self.toggle_country(&name);
        }
    }

    /// A click on a list row toggles that row's country.
    pub fn click_list(&mut self, row: u16) {
        let area = self.list_rows_area;
        if row < area.y || row >= area.y + area.height {
            return;
        }
        let index = (row - area.y) as usize + self.list.offset();
        if let Some(name) = self.list.select_row(index) {
            self.toggle_country(name);
        }
    }

    /// Toggle the row under the list cursor.
    pub fn toggle_cursor_row(&mut self) {
        if let Some(name) = self.list.cursor_name() {
            self.toggle_country(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::renderer::Country;

    fn square_world() -> WorldData {
        let country = Country {
            name: "Canada".to_string(),
            polygons: vec![vec![vec![(-120.0, 50.0), (-60.0, 50.0), (-60.0, 70.0), (-120.0, 70.0)]]],
        };
        WorldData { countries: vec![country], names: vec!["Canada".to_string()] }
    }

    #[test]
    fn test_list_toggle_scenario() {
        let mut app = App::new(80, 24);
        app.toggle_country("France");
        assert_eq!(app.selection.iter().collect::<Vec<_>>(), ["France"]);
        app.toggle_country("France");
        assert!(app.selection.is_empty());
    }

    #[test]
    fn test_addition_launches_flight_removal_does_not() {
        let mut app = App::new(80, 24);
        app.toggle_country("Japan");
        assert!(app.flight.is_some());

        app.flight = None;
        app.toggle_country("Japan");
        assert!(app.flight.is_none());
    }

    #[test]
    fn test_flight_expires() {
        let mut app = App::new(80, 24);
        app.toggle_country("Japan");
        for _ in 0..200 {
            app.tick();
        }
        assert!(app.flight.is_none());
    }

    #[test]
    fn test_load_failure_keeps_list_functional() {
        let mut app = App::new(80, 24);
        app.on_world_failed(DataError::Invalid("boom".into()));

        let MapState::Failed(message) = &app.map else {
            panic!("expected failed map state");
        };
        assert!(message.contains("Failed to load map data"));

        // The list view keeps working against the static vocabulary
        assert_eq!(app.list.filtered().len(), countries::ALL.len());
        app.toggle_country("France");
        assert!(app.selection.contains("France"));
    }

    #[test]
    fn test_world_loaded_swaps_in_renderer() {
        let mut app = App::new(80, 24);
        app.on_world_loaded(square_world());
        assert!(matches!(app.map, MapState::Ready(_)));
    }

    #[test]
    fn test_click_map_toggles_country() {
        let mut app = App::new(80, 24);
        app.on_world_loaded(square_world());
        app.map_area = Rect::new(0, 0, 80, 20);

        let proj = Projection::world(160, 80);
        let (px, py) = proj.project_px(-90.0, 60.0);
        let (column, row) = ((px / 2) as u16, (py / 4) as u16);

        app.click_map(column, row);
        assert!(app.selection.contains("Canada"));

        app.click_map(column, row);
        assert!(!app.selection.contains("Canada"));
    }

    #[test]
    fn test_click_map_on_ocean_is_a_no_op() {
        let mut app = App::new(80, 24);
        app.on_world_loaded(square_world());
        app.map_area = Rect::new(0, 0, 80, 20);

        let proj = Projection::world(160, 80);
        let (px, py) = proj.project_px(0.0, -40.0);
        app.click_map((px / 2) as u16, (py / 4) as u16);
        assert!(app.selection.is_empty());
    }

    #[test]
    fn test_splash_expires() {
        let mut app = App::new(80, 24);
        assert!(app.splash_active());
        for _ in 0..SPLASH_FRAMES {
            app.tick();
        }
        assert!(!app.splash_active());
    }

    #[test]
    fn test_cycle_color_wraps() {
        let mut app = App::new(80, 24);
        let first = app.fill_rgb();
        for _ in 0..PALETTE.len() {
            app.cycle_color();
        }
        assert_eq!(app.fill_rgb(), first);
    }
}
