use crate::map::renderer::{Country, Polygon, Ring};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// World Atlas TopoJSON, one geometry per country at 110m resolution
pub const WORLD_ATLAS_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Filtered from rendering and interaction; still reported to the
/// reconciler, which sees the dataset's full vocabulary.
const EXCLUDED_NAME: &str = "Antarctica";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed topology: {0}")]
    Parse(#[from] simd_json::Error),
    #[error("malformed geojson: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("invalid topology: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Where the geometry dataset comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

/// Decoded dataset: renderable countries (exclusions applied) plus the full
/// name vocabulary as found in the payload (exclusions not applied), which
/// is what reconciliation runs against.
#[derive(Debug)]
pub struct WorldData {
    pub countries: Vec<Country>,
    pub names: Vec<String>,
}

/// Run the one-shot load on a worker thread, delivering the result over the
/// channel. The receiver side drains it from the event loop; completion
/// happens exactly once, with no retry and no cancellation.
pub fn spawn_load(source: DataSource, tx: Sender<Result<WorldData, DataError>>) {
    std::thread::spawn(move || {
        let result = load(&source);
        if let Err(err) = &result {
            tracing::error!(?source, %err, "loading map data failed");
        }
        // The receiver may already be gone if the app quit during the fetch
        let _ = tx.send(result);
    });
}

fn load(source: &DataSource) -> Result<WorldData, DataError> {
    match source {
        DataSource::Url(url) => fetch_world(url),
        DataSource::File(path) => load_geojson_file(path),
    }
}

/// Fetch and decode the world-atlas topology.
pub fn fetch_world(url: &str) -> Result<WorldData, DataError> {
    tracing::info!(url, "fetching map data");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let mut bytes = response.bytes()?.to_vec();
    parse_topology(&mut bytes)
}

// --- TopoJSON ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    objects: Objects,
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct Objects {
    countries: GeometryCollection,
}

#[derive(Debug, Deserialize)]
struct GeometryCollection {
    geometries: Vec<TopoGeometry>,
}

#[derive(Debug, Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: serde_json::Value,
    #[serde(default)]
    properties: TopoProperties,
}

#[derive(Debug, Deserialize, Default)]
struct TopoProperties {
    #[serde(default)]
    name: String,
}

/// Decode a TopoJSON payload into countries.
pub fn parse_topology(bytes: &mut [u8]) -> Result<WorldData, DataError> {
    let topology: Topology = simd_json::serde::from_slice(bytes)?;
    let arcs = decode_arcs(&topology);

    let mut countries = Vec::new();
    let mut names = Vec::new();

    for geometry in &topology.objects.countries.geometries {
        let name = geometry.properties.name.clone();
        names.push(name.clone());

        if name == EXCLUDED_NAME {
            continue;
        }

        let polygons = match geometry.kind.as_deref() {
            Some("Polygon") => vec![polygon_from_value(&geometry.arcs, &arcs)?],
            Some("MultiPolygon") => {
                let polys = geometry
                    .arcs
                    .as_array()
                    .ok_or_else(|| DataError::Invalid("MultiPolygon arcs not an array".into()))?;
                polys
                    .iter()
                    .map(|poly| polygon_from_value(poly, &arcs))
                    .collect::<Result<Vec<_>, _>>()?
            }
            // Null or point geometries carry nothing to draw
            _ => continue,
        };

        countries.push(Country { name, polygons });
    }

    tracing::debug!(countries = countries.len(), arcs = arcs.len(), "decoded topology");
    Ok(WorldData { countries, names })
}

/// Expand delta-encoded, quantized arcs into absolute lon/lat polylines.
fn decode_arcs(topology: &Topology) -> Vec<Ring> {
    topology
        .arcs
        .iter()
        .map(|arc| {
            let mut x = 0.0;
            let mut y = 0.0;
            arc.iter()
                .filter(|point| point.len() >= 2)
                .map(|point| match &topology.transform {
                    Some(t) => {
                        x += point[0];
                        y += point[1];
                        (t.scale[0] * x + t.translate[0], t.scale[1] * y + t.translate[1])
                    }
                    None => (point[0], point[1]),
                })
                .collect()
        })
        .collect()
}

/// One polygon from its nested arc-index lists: first ring is the exterior,
/// the rest are holes.
fn polygon_from_value(value: &serde_json::Value, arcs: &[Ring]) -> Result<Polygon, DataError> {
    let rings = value
        .as_array()
        .ok_or_else(|| DataError::Invalid("Polygon arcs not an array".into()))?;
    rings
        .iter()
        .map(|ring| {
            let indices: Vec<i64> = ring
                .as_array()
                .ok_or_else(|| DataError::Invalid("ring is not an array".into()))?
                .iter()
                .map(|idx| idx.as_i64().ok_or_else(|| DataError::Invalid("non-integer arc index".into())))
                .collect::<Result<Vec<_>, _>>()?;
            stitch_ring(&indices, arcs)
        })
        .collect()
}

/// Join consecutive arcs into one ring. A negative index `i` means arc
/// `!i` traversed backwards; adjoining arcs share an endpoint, which is
/// dropped from every arc after the first.
fn stitch_ring(indices: &[i64], arcs: &[Ring]) -> Result<Ring, DataError> {
    let mut ring: Ring = Vec::new();
    for &signed in indices {
        let (idx, reversed) = if signed < 0 { (!signed as usize, true) } else { (signed as usize, false) };
        let arc = arcs
            .get(idx)
            .ok_or_else(|| DataError::Invalid(format!("arc index {signed} out of range")))?;

        let skip = usize::from(!ring.is_empty());
        if reversed {
            ring.extend(arc.iter().rev().skip(skip));
        } else {
            ring.extend(arc.iter().skip(skip));
        }
    }
    Ok(ring)
}

// --- Local GeoJSON fallback -------------------------------------------------

/// Load a GeoJSON FeatureCollection from disk (offline alternative to the
/// atlas fetch). Features need a `properties.name` string and Polygon or
/// MultiPolygon geometry; anything else is skipped with a warning.
pub fn load_geojson_file(path: &Path) -> Result<WorldData, DataError> {
    tracing::info!(path = %path.display(), "loading map data from file");
    let content = std::fs::read_to_string(path)?;
    let geojson: geojson::GeoJson = content.parse()?;
    world_from_geojson(geojson)
}

fn world_from_geojson(geojson: geojson::GeoJson) -> Result<WorldData, DataError> {
    let geojson::GeoJson::FeatureCollection(collection) = geojson else {
        return Err(DataError::Invalid("expected a FeatureCollection".into()));
    };

    let mut countries = Vec::new();
    let mut names = Vec::new();

    for feature in collection.features {
        let Some(name) = feature
            .properties
            .as_ref()
            .and_then(|props| props.get("name"))
            .and_then(|value| value.as_str())
            .map(str::to_string)
        else {
            tracing::warn!("skipping feature without properties.name");
            continue;
        };
        names.push(name.clone());

        if name == EXCLUDED_NAME {
            continue;
        }

        let Some(geometry) = feature.geometry else { continue };
        let polygons = match geometry.value {
            geojson::Value::Polygon(rings) => vec![rings_from_positions(rings)],
            geojson::Value::MultiPolygon(polys) => {
                polys.into_iter().map(rings_from_positions).collect()
            }
            _ => {
                tracing::warn!(%name, "skipping non-polygon feature");
                continue;
            }
        };

        countries.push(Country { name, polygons });
    }

    Ok(WorldData { countries, names })
}

fn rings_from_positions(rings: Vec<Vec<Vec<f64>>>) -> Polygon {
    rings
        .into_iter()
        .map(|ring| {
            ring.iter()
                .filter(|position| position.len() >= 2)
                .map(|position| (position[0], position[1]))
                .collect()
        })
        .collect()
}
