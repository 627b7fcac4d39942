//! Map and heat-overlay rendering.
//!
//! The map is rebuilt from scratch on every render: any previous map, marker
//! layer and heat layer are torn down before a new instance is constructed.
//! There is no incremental update path.
//!
//! `MapRenderer` owns the map state as an explicit machine:
//!
//! ```text
//! Absent → Constructing → Active → TearingDown → Absent
//! ```
//!
//! A render requested while the machine is `Constructing` or `TearingDown`
//! is rejected with [`MapError::Busy`].
//!
//! The mapping library itself sits behind [`MapBackend`]. [`SceneBackend`]
//! is an in-memory implementation that records what was built.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::logging::{self, Component};
use crate::model::{AqiReading, Category, Coordinates};
use crate::severity::{coerce_aqi, heat_color, heat_intensity, HeatStop, HEAT_GRADIENT};
use crate::view::region::{DisplayRegion, Panel};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const DEFAULT_ZOOM: u8 = 11;
pub const CONTAINER_HEIGHT_PX: u32 = 270;

const HEAT_RADIUS: u32 = 35;
const HEAT_BLUR: u32 = 20;
const HEAT_MAX_ZOOM: u8 = 12;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// A render was requested while another was constructing or tearing down.
    #[error("map is busy ({0})")]
    Busy(&'static str),
    /// The mapping library refused an operation.
    #[error("{0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Backend interface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerHandle(pub u64);

/// Layout of the map container at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSize {
    pub width_pct: u8,
    pub height_px: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayer {
    /// `(lat, lon, intensity)` triples.
    pub points: Vec<(f64, f64, f64)>,
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u8,
    pub gradient: &'static [HeatStop],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinates,
    pub popup: String,
    pub popup_open: bool,
}

/// The narrow slice of a tile/heatmap library the dashboard needs.
pub trait MapBackend {
    /// Create a map in the container, centered on `center`.
    /// Fails if the container has no size.
    fn create_map(
        &mut self,
        container: ContainerSize,
        center: Coordinates,
        zoom: u8,
    ) -> Result<MapHandle, MapError>;

    fn add_tile_layer(&mut self, map: MapHandle, layer: &TileLayer) -> Result<LayerHandle, MapError>;

    /// Create an empty layer group for markers.
    fn add_layer_group(&mut self, map: MapHandle) -> Result<LayerHandle, MapError>;

    fn add_heat_layer(&mut self, map: MapHandle, layer: &HeatLayer) -> Result<LayerHandle, MapError>;

    fn add_marker(&mut self, group: LayerHandle, marker: &Marker) -> Result<LayerHandle, MapError>;

    /// Destroy the map and every layer attached to it.
    fn remove_map(&mut self, map: MapHandle);

    /// Remove any leftover children of the container element.
    fn clear_container(&mut self);
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Everything that exists while a map is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMap {
    pub map: MapHandle,
    pub marker_layer: LayerHandle,
    pub heat_layer: LayerHandle,
    pub center: Coordinates,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapState {
    Absent,
    Constructing,
    Active(ActiveMap),
    TearingDown,
}

impl MapState {
    fn name(&self) -> &'static str {
        match self {
            MapState::Absent => "absent",
            MapState::Constructing => "constructing",
            MapState::Active(_) => "active",
            MapState::TearingDown => "tearing-down",
        }
    }
}

/// Sole owner of the map, its marker layer and its heat layer.
pub struct MapRenderer<B: MapBackend> {
    backend: B,
    state: MapState,
}

impl<B: MapBackend> MapRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: MapState::Absent,
        }
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Rebuilds the map for a new location.
    ///
    /// The region's busy indicator is cleared and the container sized before
    /// construction. On success the region is filled with a summary of what
    /// the map shows.
    pub fn render(
        &mut self,
        region: &mut DisplayRegion,
        coordinates: Coordinates,
        aqi: AqiReading,
        category: Option<&Category>,
    ) -> Result<ActiveMap, MapError> {
        if matches!(self.state, MapState::Constructing | MapState::TearingDown) {
            return Err(MapError::Busy(self.state.name()));
        }

        region.clear_busy();
        let container = ContainerSize {
            width_pct: 100,
            height_px: CONTAINER_HEIGHT_PX,
        };

        self.teardown();

        self.state = MapState::Constructing;
        let intensity = heat_intensity(match aqi {
            AqiReading::Value(v) => coerce_aqi(Some(v)),
            AqiReading::Placeholder => 0.0,
        });
        let label = category.map(|c| c.label.as_str()).unwrap_or("AQI");
        let marker = Marker {
            position: coordinates,
            popup: format!("{}\nAQI: {}", label, aqi),
            popup_open: true,
        };

        match self.construct(container, coordinates, intensity, &marker) {
            Ok(active) => {
                logging::debug(
                    Component::Map,
                    None,
                    &format!(
                        "map built at {:.4}, {:.4} with heat intensity {}",
                        coordinates.lat, coordinates.lon, intensity
                    ),
                );
                region.fill(
                    Panel::new("Map")
                        .line(format!(
                            "Center: {:.2}, {:.2} · zoom {}",
                            coordinates.lat, coordinates.lon, DEFAULT_ZOOM
                        ))
                        .line(format!("Heat: {} ({})", intensity, heat_color(intensity)))
                        .line(format!("Marker: {}", marker.popup.replace('\n', " · "))),
                );
                self.state = MapState::Active(active.clone());
                Ok(active)
            }
            Err((partial, e)) => {
                if let Some(map) = partial {
                    self.backend.remove_map(map);
                }
                self.backend.clear_container();
                region.reset();
                self.state = MapState::Absent;
                Err(e)
            }
        }
    }

    /// Tears down the current map, if any. Safe to call with no map.
    pub fn teardown(&mut self) {
        if let MapState::Active(active) = std::mem::replace(&mut self.state, MapState::TearingDown) {
            self.backend.remove_map(active.map);
        }
        self.backend.clear_container();
        self.state = MapState::Absent;
    }

    /// Returns the map handle alongside the error if construction got far
    /// enough to create one.
    fn construct(
        &mut self,
        container: ContainerSize,
        center: Coordinates,
        intensity: f64,
        marker: &Marker,
    ) -> Result<ActiveMap, (Option<MapHandle>, MapError)> {
        let map = self
            .backend
            .create_map(container, center, DEFAULT_ZOOM)
            .map_err(|e| (None, e))?;

        let tiles = TileLayer {
            url_template: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
        };
        let heat = HeatLayer {
            points: vec![(center.lat, center.lon, intensity)],
            radius: HEAT_RADIUS,
            blur: HEAT_BLUR,
            max_zoom: HEAT_MAX_ZOOM,
            gradient: HEAT_GRADIENT,
        };

        match self.attach_layers(map, &tiles, &heat, marker) {
            Ok((marker_layer, heat_layer)) => Ok(ActiveMap {
                map,
                marker_layer,
                heat_layer,
                center,
                intensity,
            }),
            Err(e) => Err((Some(map), e)),
        }
    }

    /// Returns `(marker_layer, heat_layer)`.
    fn attach_layers(
        &mut self,
        map: MapHandle,
        tiles: &TileLayer,
        heat: &HeatLayer,
        marker: &Marker,
    ) -> Result<(LayerHandle, LayerHandle), MapError> {
        self.backend.add_tile_layer(map, tiles)?;
        let marker_layer = self.backend.add_layer_group(map)?;
        let heat_layer = self.backend.add_heat_layer(map, heat)?;
        self.backend.add_marker(marker_layer, marker)?;
        Ok((marker_layer, heat_layer))
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SceneLayer {
    Tiles(TileLayer),
    Group { markers: Vec<Marker> },
    Heat(HeatLayer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMap {
    pub center: Coordinates,
    pub zoom: u8,
    pub layers: BTreeMap<LayerHandle, SceneLayer>,
}

/// Records maps and layers in memory. Used by the terminal front end and
/// in tests.
#[derive(Debug, Default)]
pub struct SceneBackend {
    next_id: u64,
    maps: BTreeMap<MapHandle, SceneMap>,
    /// When set, the next `create_map` fails with this message.
    pub fail_next_create: Option<String>,
}

impl SceneBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn map_mut(&mut self, map: MapHandle) -> Result<&mut SceneMap, MapError> {
        self.maps
            .get_mut(&map)
            .ok_or_else(|| MapError::Backend(format!("no such map: {}", map.0)))
    }

    pub fn live_maps(&self) -> usize {
        self.maps.len()
    }

    pub fn maps(&self) -> impl Iterator<Item = &SceneMap> {
        self.maps.values()
    }

    pub fn marker_count(&self) -> usize {
        self.layers()
            .map(|l| match l {
                SceneLayer::Group { markers } => markers.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn heat_layer_count(&self) -> usize {
        self.layers()
            .filter(|l| matches!(l, SceneLayer::Heat(_)))
            .count()
    }

    fn layers(&self) -> impl Iterator<Item = &SceneLayer> {
        self.maps.values().flat_map(|m| m.layers.values())
    }
}

impl MapBackend for SceneBackend {
    fn create_map(
        &mut self,
        container: ContainerSize,
        center: Coordinates,
        zoom: u8,
    ) -> Result<MapHandle, MapError> {
        if let Some(msg) = self.fail_next_create.take() {
            return Err(MapError::Backend(msg));
        }
        if container.height_px == 0 || container.width_pct == 0 {
            return Err(MapError::Backend("map container has no size".to_string()));
        }
        let handle = MapHandle(self.next());
        self.maps.insert(
            handle,
            SceneMap {
                center,
                zoom,
                layers: BTreeMap::new(),
            },
        );
        Ok(handle)
    }

    fn add_tile_layer(&mut self, map: MapHandle, layer: &TileLayer) -> Result<LayerHandle, MapError> {
        let id = LayerHandle(self.next());
        self.map_mut(map)?.layers.insert(id, SceneLayer::Tiles(layer.clone()));
        Ok(id)
    }

    fn add_layer_group(&mut self, map: MapHandle) -> Result<LayerHandle, MapError> {
        let id = LayerHandle(self.next());
        self.map_mut(map)?
            .layers
            .insert(id, SceneLayer::Group { markers: Vec::new() });
        Ok(id)
    }

    fn add_heat_layer(&mut self, map: MapHandle, layer: &HeatLayer) -> Result<LayerHandle, MapError> {
        let id = LayerHandle(self.next());
        self.map_mut(map)?.layers.insert(id, SceneLayer::Heat(layer.clone()));
        Ok(id)
    }

    fn add_marker(&mut self, group: LayerHandle, marker: &Marker) -> Result<LayerHandle, MapError> {
        let id = LayerHandle(self.next());
        let layer = self
            .maps
            .values_mut()
            .find_map(|m| m.layers.get_mut(&group))
            .ok_or_else(|| MapError::Backend(format!("no such layer group: {}", group.0)))?;
        match layer {
            SceneLayer::Group { markers } => {
                markers.push(marker.clone());
                Ok(id)
            }
            _ => Err(MapError::Backend(format!("layer {} is not a group", group.0))),
        }
    }

    fn remove_map(&mut self, map: MapHandle) {
        self.maps.remove(&map);
    }

    fn clear_container(&mut self) {}
}

impl fmt::Display for SceneBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for map in self.maps.values() {
            writeln!(
                f,
                "map @ {:.4}, {:.4} (zoom {})",
                map.center.lat, map.center.lon, map.zoom
            )?;
            for layer in map.layers.values() {
                match layer {
                    SceneLayer::Tiles(t) => writeln!(f, "  tiles: {}", t.attribution)?,
                    SceneLayer::Group { markers } => {
                        for m in markers {
                            writeln!(f, "  marker: {}", m.popup.replace('\n', " · "))?;
                        }
                    }
                    SceneLayer::Heat(h) => {
                        for (_, _, i) in &h.points {
                            writeln!(f, "  heat: {} ({})", i, heat_color(*i))?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
