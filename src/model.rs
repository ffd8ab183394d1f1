//! Core data model for the metro crag map.
//! Stations, gym label regions and overlay layers all live in viewbox
//! coordinates; every mutation goes through the `MapState` reducer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;
use yew::Reducible;

/// ViewBox of the metro map artwork (matches assets/metro-map.svg).
pub const VIEWBOX_W: f64 = 5669.29;
pub const VIEWBOX_H: f64 = 8589.84;

/// Clickable radius around a station marker, in viewbox units.
pub const STATION_RADIUS: f64 = 120.0;

pub const MIN_REGION_W: f64 = 60.0;
pub const MIN_REGION_H: f64 = 24.0;
pub const MIN_LAYER_SIZE: f64 = 20.0;
pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 200.0;

const DEFAULT_IMAGE_W: f64 = 300.0;
const DEFAULT_IMAGE_H: f64 = 150.0;
const DEFAULT_FONT_SIZE: f64 = 48.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Composite identity used for favorites and shared tags.
pub fn gym_key(station_id: &str, gym_name: &str) -> String {
    format!("{station_id}|{gym_name}")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gym {
    pub name: String,
    pub address: String,
    pub best_exit: String,
    pub walking_time: String,
    pub website: String,
    pub google_map_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Multi-line weekly hours, one line per weekday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<String>,
}

/// Gyms keyed by station id, as loaded from data/gyms.json.
pub type GymsByStation = BTreeMap<String, Vec<Gym>>;

/// Static station binding in absolute viewbox units. Also the export
/// format produced by station editing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationBinding {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Editable station marker position as viewbox-relative ratios.
#[derive(Clone, Debug, PartialEq)]
pub struct StationPosition {
    pub id: String,
    pub name: String,
    pub x_ratio: f64,
    pub y_ratio: f64,
}

impl StationPosition {
    pub fn from_binding(b: &StationBinding) -> Self {
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            x_ratio: b.x / VIEWBOX_W,
            y_ratio: b.y / VIEWBOX_H,
        }
    }

    pub fn to_binding(&self) -> StationBinding {
        StationBinding {
            id: self.id.clone(),
            name: self.name.clone(),
            x: (self.x_ratio * VIEWBOX_W).round(),
            y: (self.y_ratio * VIEWBOX_H).round(),
            r: STATION_RADIUS,
        }
    }

    pub fn x(&self) -> f64 {
        self.x_ratio * VIEWBOX_W
    }

    pub fn y(&self) -> f64 {
        self.y_ratio * VIEWBOX_H
    }
}

/// Clickable rectangle overlaid on a gym name printed on the map art.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRegion {
    pub station_id: String,
    pub gym_name: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelRegion {
    pub fn key(&self) -> String {
        gym_key(&self.station_id, &self.gym_name)
    }
}

/// A region only dispatches clicks when its gym still exists.
pub fn resolve_region<'a>(gyms: &'a GymsByStation, region: &LabelRegion) -> Option<&'a Gym> {
    gyms.get(&region.station_id)?
        .iter()
        .find(|g| g.name == region.gym_name)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapAsset {
    pub id: String,
    pub src: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayImage {
    pub id: String,
    pub asset_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayText {
    pub id: String,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

/// File/export shape of data/gym_label_areas.json.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionFile {
    #[serde(default)]
    pub areas: Vec<LabelRegion>,
}

/// File/export shape of data/map_layers.json.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerFile {
    #[serde(default)]
    pub images: Vec<OverlayImage>,
    #[serde(default)]
    pub texts: Vec<OverlayText>,
}

/// Which collection pointer events currently edit. Only one edit mode
/// can be active, so combined-mode states are unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Stations,
    Regions,
    Layers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionOp {
    Move,
    Resize,
}

/// Active label-region drag: anchor pointer plus pre-drag geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionDrag {
    pub key: String,
    pub anchor: Point,
    pub start: LabelRegion,
    pub op: RegionOp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Image,
    Text,
}

/// Active overlay drag; a single slot, so at most one overlay
/// interaction is possible at a time.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerDrag {
    Move {
        kind: LayerKind,
        id: String,
        anchor: Point,
        start: Point,
    },
    Resize {
        id: String,
        anchor: Point,
        start_width: f64,
        start_height: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapState {
    pub mode: EditMode,
    pub stations: Vec<StationPosition>,
    pub regions: Vec<LabelRegion>,
    pub images: Vec<OverlayImage>,
    pub texts: Vec<OverlayText>,
    pub assets: Vec<MapAsset>,
    pub station_drag: Option<String>,
    pub region_drag: Option<RegionDrag>,
    pub layer_drag: Option<LayerDrag>,
}

impl MapState {
    pub fn new(
        bindings: &[StationBinding],
        gyms: &GymsByStation,
        regions: Vec<LabelRegion>,
        layers: LayerFile,
        assets: Vec<MapAsset>,
    ) -> Self {
        let regions = if regions.is_empty() {
            default_label_regions(bindings, gyms)
        } else {
            regions
        };
        Self {
            mode: EditMode::Viewing,
            stations: bindings.iter().map(StationPosition::from_binding).collect(),
            regions,
            images: layers.images,
            texts: layers.texts,
            assets,
            station_drag: None,
            region_drag: None,
            layer_drag: None,
        }
    }

    pub fn has_active_drag(&self) -> bool {
        self.station_drag.is_some() || self.region_drag.is_some() || self.layer_drag.is_some()
    }

    pub fn asset(&self, asset_id: &str) -> Option<&MapAsset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    /// Snapshot of all station positions in absolute viewbox units,
    /// rounded to integers, in static insertion order.
    pub fn export_stations(&self) -> Vec<StationBinding> {
        self.stations.iter().map(StationPosition::to_binding).collect()
    }

    pub fn export_regions(&self) -> RegionFile {
        RegionFile {
            areas: self.regions.clone(),
        }
    }

    pub fn export_layers(&self) -> LayerFile {
        LayerFile {
            images: self.images.clone(),
            texts: self.texts.clone(),
        }
    }
}

/// Fallback label regions when no static list is supplied: stacked
/// below each station marker, one per gym.
pub fn default_label_regions(
    bindings: &[StationBinding],
    gyms: &GymsByStation,
) -> Vec<LabelRegion> {
    let mut areas = Vec::new();
    for b in bindings {
        let Some(list) = gyms.get(&b.id) else { continue };
        for (idx, gym) in list.iter().enumerate() {
            areas.push(LabelRegion {
                station_id: b.id.clone(),
                gym_name: gym.name.clone(),
                x: b.x - 280.0,
                y: b.y + 75.0 + idx as f64 * 48.0,
                w: 560.0,
                h: 40.0,
            });
        }
    }
    areas
}

/// Time-based overlay id; bumps the stamp until it is unused so two
/// adds within the same millisecond cannot collide.
fn fresh_layer_id(prefix: &str, stamp_ms: u64, taken: impl Fn(&str) -> bool) -> String {
    let mut stamp = stamp_ms;
    loop {
        let id = format!("{prefix}-{stamp}");
        if !taken(&id) {
            return id;
        }
        stamp += 1;
    }
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub enum MapAction {
    SetMode(EditMode),
    BeginStationDrag { id: String },
    BeginRegionMove { key: String, at: Point },
    BeginRegionResize { key: String, at: Point },
    BeginLayerMove { kind: LayerKind, id: String, at: Point },
    BeginLayerResize { id: String, at: Point },
    PointerMoved { at: Point },
    PointerReleased,
    AddImage { asset_id: String, stamp_ms: u64 },
    AddText { content: String, stamp_ms: u64 },
    SetTextFontSize { id: String, size: f64 },
    SetImageSize { id: String, width: f64, height: f64 },
    RemoveImage { id: String },
    RemoveText { id: String },
}

impl Reducible for MapState {
    type Action = MapAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use MapAction::*;
        let mut new = (*self).clone();
        match action {
            SetMode(mode) => {
                new.mode = mode;
                new.station_drag = None;
                new.region_drag = None;
                new.layer_drag = None;
            }
            BeginStationDrag { id } => {
                // Last begin wins; there is no drag queue.
                if new.mode == EditMode::Stations && new.stations.iter().any(|p| p.id == id) {
                    new.station_drag = Some(id);
                }
            }
            BeginRegionMove { key, at } => {
                if new.mode == EditMode::Regions {
                    if let Some(area) = new.regions.iter().find(|a| a.key() == key) {
                        new.region_drag = Some(RegionDrag {
                            key,
                            anchor: at,
                            start: area.clone(),
                            op: RegionOp::Move,
                        });
                    }
                }
            }
            BeginRegionResize { key, at } => {
                if new.mode == EditMode::Regions {
                    if let Some(area) = new.regions.iter().find(|a| a.key() == key) {
                        new.region_drag = Some(RegionDrag {
                            key,
                            anchor: at,
                            start: area.clone(),
                            op: RegionOp::Resize,
                        });
                    }
                }
            }
            BeginLayerMove { kind, id, at } => {
                if new.mode == EditMode::Layers {
                    let start = match kind {
                        LayerKind::Image => new
                            .images
                            .iter()
                            .find(|i| i.id == id)
                            .map(|i| Point { x: i.x, y: i.y }),
                        LayerKind::Text => new
                            .texts
                            .iter()
                            .find(|t| t.id == id)
                            .map(|t| Point { x: t.x, y: t.y }),
                    };
                    if let Some(start) = start {
                        new.layer_drag = Some(LayerDrag::Move {
                            kind,
                            id,
                            anchor: at,
                            start,
                        });
                    }
                }
            }
            BeginLayerResize { id, at } => {
                if new.mode == EditMode::Layers {
                    if let Some(img) = new.images.iter().find(|i| i.id == id) {
                        new.layer_drag = Some(LayerDrag::Resize {
                            id,
                            anchor: at,
                            start_width: img.width,
                            start_height: img.height,
                        });
                    }
                }
            }
            PointerMoved { at } => {
                if let Some(id) = new.station_drag.clone() {
                    if let Some(p) = new.stations.iter_mut().find(|p| p.id == id) {
                        p.x_ratio = clamp01(at.x / VIEWBOX_W);
                        p.y_ratio = clamp01(at.y / VIEWBOX_H);
                    }
                } else if let Some(drag) = new.region_drag.clone() {
                    if let Some(a) = new.regions.iter_mut().find(|a| a.key() == drag.key) {
                        match drag.op {
                            RegionOp::Move => {
                                a.x = drag.start.x + (at.x - drag.anchor.x);
                                a.y = drag.start.y + (at.y - drag.anchor.y);
                            }
                            RegionOp::Resize => {
                                // Anchored at the top-left corner.
                                a.w = (at.x - drag.start.x).max(MIN_REGION_W);
                                a.h = (at.y - drag.start.y).max(MIN_REGION_H);
                            }
                        }
                    }
                } else if let Some(drag) = new.layer_drag.clone() {
                    match drag {
                        LayerDrag::Move {
                            kind,
                            id,
                            anchor,
                            start,
                        } => {
                            let dx = at.x - anchor.x;
                            let dy = at.y - anchor.y;
                            match kind {
                                LayerKind::Image => {
                                    if let Some(img) = new.images.iter_mut().find(|i| i.id == id) {
                                        img.x = start.x + dx;
                                        img.y = start.y + dy;
                                    }
                                }
                                LayerKind::Text => {
                                    if let Some(t) = new.texts.iter_mut().find(|t| t.id == id) {
                                        t.x = start.x + dx;
                                        t.y = start.y + dy;
                                    }
                                }
                            }
                        }
                        LayerDrag::Resize {
                            id,
                            anchor,
                            start_width,
                            start_height,
                        } => {
                            if let Some(img) = new.images.iter_mut().find(|i| i.id == id) {
                                img.width = (start_width + at.x - anchor.x).max(MIN_LAYER_SIZE);
                                img.height = (start_height + at.y - anchor.y).max(MIN_LAYER_SIZE);
                            }
                        }
                    }
                }
            }
            PointerReleased => {
                new.station_drag = None;
                new.region_drag = None;
                new.layer_drag = None;
            }
            AddImage { asset_id, stamp_ms } => {
                if new.mode == EditMode::Layers && new.asset(&asset_id).is_some() {
                    let id =
                        fresh_layer_id("img", stamp_ms, |c| new.images.iter().any(|i| i.id == c));
                    new.images.push(OverlayImage {
                        id,
                        asset_id,
                        x: VIEWBOX_W / 2.0 - DEFAULT_IMAGE_W / 2.0,
                        y: VIEWBOX_H / 2.0 - DEFAULT_IMAGE_H / 2.0,
                        width: DEFAULT_IMAGE_W,
                        height: DEFAULT_IMAGE_H,
                    });
                }
            }
            AddText { content, stamp_ms } => {
                let content = content.trim().to_string();
                if new.mode == EditMode::Layers && !content.is_empty() {
                    let id =
                        fresh_layer_id("txt", stamp_ms, |c| new.texts.iter().any(|t| t.id == c));
                    new.texts.push(OverlayText {
                        id,
                        content,
                        x: VIEWBOX_W / 2.0,
                        y: VIEWBOX_H / 2.0,
                        font_size: DEFAULT_FONT_SIZE,
                    });
                }
            }
            SetTextFontSize { id, size } => {
                if let Some(t) = new.texts.iter_mut().find(|t| t.id == id) {
                    t.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
                }
            }
            SetImageSize { id, width, height } => {
                if let Some(img) = new.images.iter_mut().find(|i| i.id == id) {
                    img.width = width.max(MIN_LAYER_SIZE);
                    img.height = height.max(MIN_LAYER_SIZE);
                }
            }
            RemoveImage { id } => {
                new.images.retain(|i| i.id != id);
            }
            RemoveText { id } => {
                new.texts.retain(|t| t.id != id);
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gym(name: &str) -> Gym {
        Gym {
            name: name.to_string(),
            address: String::new(),
            best_exit: String::new(),
            walking_time: String::new(),
            website: String::new(),
            google_map_link: String::new(),
            phone: None,
            business_hours: None,
        }
    }

    fn binding(id: &str, x: f64, y: f64) -> StationBinding {
        StationBinding {
            id: id.to_string(),
            name: id.to_string(),
            x,
            y,
            r: STATION_RADIUS,
        }
    }

    fn test_state() -> MapState {
        let bindings = vec![binding("A", 1000.0, 2000.0), binding("B", 3000.0, 4000.0)];
        let mut gyms = GymsByStation::new();
        gyms.insert("A".to_string(), vec![gym("G")]);
        let regions = vec![LabelRegion {
            station_id: "A".to_string(),
            gym_name: "G".to_string(),
            x: 100.0,
            y: 100.0,
            w: 200.0,
            h: 50.0,
        }];
        let assets = vec![MapAsset {
            id: "ext".to_string(),
            src: "assets/ext.png".to_string(),
            label: "延伸線".to_string(),
        }];
        MapState::new(&bindings, &gyms, regions, LayerFile::default(), assets)
    }

    fn dispatch(state: MapState, action: MapAction) -> MapState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn station_drag_clamps_ratios() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Stations));
        s = dispatch(s, MapAction::BeginStationDrag { id: "A".to_string() });
        s = dispatch(
            s,
            MapAction::PointerMoved {
                at: Point {
                    x: -500.0,
                    y: VIEWBOX_H + 999.0,
                },
            },
        );
        let p = &s.stations[0];
        assert_eq!(p.x_ratio, 0.0);
        assert_eq!(p.y_ratio, 1.0);
        s = dispatch(
            s,
            MapAction::PointerMoved {
                at: Point {
                    x: 1000.0,
                    y: 2000.0,
                },
            },
        );
        let p = &s.stations[0];
        assert!(p.x_ratio > 0.0 && p.x_ratio < 1.0);
        assert!(p.y_ratio > 0.0 && p.y_ratio < 1.0);
    }

    #[test]
    fn station_drag_requires_edit_mode() {
        let s = test_state();
        let s = dispatch(s, MapAction::BeginStationDrag { id: "A".to_string() });
        assert!(s.station_drag.is_none());
    }

    #[test]
    fn last_begin_wins() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Stations));
        s = dispatch(s, MapAction::BeginStationDrag { id: "A".to_string() });
        s = dispatch(s, MapAction::BeginStationDrag { id: "B".to_string() });
        assert_eq!(s.station_drag.as_deref(), Some("B"));
    }

    #[test]
    fn region_resize_floors_at_minimum() {
        let mut s = test_state();
        let key = s.regions[0].key();
        s = dispatch(s, MapAction::SetMode(EditMode::Regions));
        s = dispatch(
            s,
            MapAction::BeginRegionResize {
                key,
                at: Point { x: 300.0, y: 150.0 },
            },
        );
        // Pointer above/left of the anchor corner.
        s = dispatch(
            s,
            MapAction::PointerMoved {
                at: Point { x: 50.0, y: 50.0 },
            },
        );
        assert_eq!(s.regions[0].w, MIN_REGION_W);
        assert_eq!(s.regions[0].h, MIN_REGION_H);
    }

    #[test]
    fn region_move_applies_pointer_delta() {
        let mut s = test_state();
        let key = s.regions[0].key();
        s = dispatch(s, MapAction::SetMode(EditMode::Regions));
        s = dispatch(
            s,
            MapAction::BeginRegionMove {
                key,
                at: Point { x: 500.0, y: 500.0 },
            },
        );
        s = dispatch(
            s,
            MapAction::PointerMoved {
                at: Point { x: 530.0, y: 460.0 },
            },
        );
        assert_eq!(s.regions[0].x, 130.0);
        assert_eq!(s.regions[0].y, 60.0);
        // Release is idempotent.
        s = dispatch(s, MapAction::PointerReleased);
        s = dispatch(s, MapAction::PointerReleased);
        assert!(!s.has_active_drag());
    }

    #[test]
    fn add_image_requires_known_asset() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Layers));
        s = dispatch(
            s,
            MapAction::AddImage {
                asset_id: "nope".to_string(),
                stamp_ms: 1,
            },
        );
        assert!(s.images.is_empty());
        s = dispatch(
            s,
            MapAction::AddImage {
                asset_id: "ext".to_string(),
                stamp_ms: 1,
            },
        );
        assert_eq!(s.images.len(), 1);
        assert_eq!(s.images[0].id, "img-1");
        // Same stamp gets a bumped id instead of a collision.
        s = dispatch(
            s,
            MapAction::AddImage {
                asset_id: "ext".to_string(),
                stamp_ms: 1,
            },
        );
        assert_eq!(s.images[1].id, "img-2");
    }

    #[test]
    fn add_text_ignores_blank_content() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Layers));
        s = dispatch(
            s,
            MapAction::AddText {
                content: "   ".to_string(),
                stamp_ms: 7,
            },
        );
        assert!(s.texts.is_empty());
        s = dispatch(
            s,
            MapAction::AddText {
                content: " 新站名 ".to_string(),
                stamp_ms: 7,
            },
        );
        assert_eq!(s.texts[0].content, "新站名");
        assert_eq!(s.texts[0].font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn overlay_resize_floors_each_dimension() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Layers));
        s = dispatch(
            s,
            MapAction::AddImage {
                asset_id: "ext".to_string(),
                stamp_ms: 1,
            },
        );
        let id = s.images[0].id.clone();
        s = dispatch(
            s,
            MapAction::BeginLayerResize {
                id: id.clone(),
                at: Point { x: 0.0, y: 0.0 },
            },
        );
        s = dispatch(
            s,
            MapAction::PointerMoved {
                at: Point {
                    x: -10_000.0,
                    y: 50.0,
                },
            },
        );
        assert_eq!(s.images[0].width, MIN_LAYER_SIZE);
        assert_eq!(s.images[0].height, DEFAULT_IMAGE_H + 50.0);
        s = dispatch(
            s,
            MapAction::SetImageSize {
                id,
                width: 5.0,
                height: 3.0,
            },
        );
        assert_eq!(s.images[0].width, MIN_LAYER_SIZE);
        assert_eq!(s.images[0].height, MIN_LAYER_SIZE);
    }

    #[test]
    fn font_size_clamped() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Layers));
        s = dispatch(
            s,
            MapAction::AddText {
                content: "x".to_string(),
                stamp_ms: 1,
            },
        );
        let id = s.texts[0].id.clone();
        s = dispatch(
            s,
            MapAction::SetTextFontSize {
                id: id.clone(),
                size: 1000.0,
            },
        );
        assert_eq!(s.texts[0].font_size, MAX_FONT_SIZE);
        s = dispatch(s, MapAction::SetTextFontSize { id, size: 1.0 });
        assert_eq!(s.texts[0].font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Layers));
        s = dispatch(
            s,
            MapAction::AddImage {
                asset_id: "ext".to_string(),
                stamp_ms: 1,
            },
        );
        let id = s.images[0].id.clone();
        s = dispatch(s, MapAction::RemoveImage { id: id.clone() });
        s = dispatch(s, MapAction::RemoveImage { id });
        assert!(s.images.is_empty());
    }

    #[test]
    fn switching_mode_clears_drags() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Stations));
        s = dispatch(s, MapAction::BeginStationDrag { id: "A".to_string() });
        s = dispatch(s, MapAction::SetMode(EditMode::Regions));
        assert!(!s.has_active_drag());
    }

    #[test]
    fn station_export_round_trips() {
        let s = test_state();
        let exported = s.export_stations();
        assert_eq!(exported[0].x, 1000.0);
        assert_eq!(exported[0].y, 2000.0);
        let reloaded: Vec<StationPosition> =
            exported.iter().map(StationPosition::from_binding).collect();
        assert_eq!(reloaded, s.stations);
        assert_eq!(
            reloaded
                .iter()
                .map(StationPosition::to_binding)
                .collect::<Vec<_>>(),
            exported
        );
    }

    #[test]
    fn region_export_round_trips_through_json() {
        let s = test_state();
        let json = serde_json::to_string(&s.export_regions()).unwrap();
        let back: RegionFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.areas, s.regions);
    }

    #[test]
    fn layer_export_round_trips_through_json() {
        let mut s = test_state();
        s = dispatch(s, MapAction::SetMode(EditMode::Layers));
        s = dispatch(
            s,
            MapAction::AddImage {
                asset_id: "ext".to_string(),
                stamp_ms: 3,
            },
        );
        s = dispatch(
            s,
            MapAction::AddText {
                content: "備註".to_string(),
                stamp_ms: 4,
            },
        );
        let json = serde_json::to_string(&s.export_layers()).unwrap();
        let back: LayerFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.images, s.images);
        assert_eq!(back.texts, s.texts);
    }

    #[test]
    fn default_regions_stack_below_station() {
        let bindings = vec![binding("A", 1000.0, 2000.0)];
        let mut gyms = GymsByStation::new();
        gyms.insert("A".to_string(), vec![gym("G1"), gym("G2")]);
        let areas = default_label_regions(&bindings, &gyms);
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].x, 720.0);
        assert_eq!(areas[0].y, 2075.0);
        assert_eq!(areas[1].y, 2123.0);
        assert_eq!(areas[0].w, 560.0);
        assert_eq!(areas[0].h, 40.0);
    }

    #[test]
    fn orphaned_region_resolves_to_none() {
        let s = test_state();
        let mut gyms = GymsByStation::new();
        gyms.insert("A".to_string(), vec![gym("Other")]);
        assert!(resolve_region(&gyms, &s.regions[0]).is_none());
        let mut gyms = GymsByStation::new();
        gyms.insert("A".to_string(), vec![gym("G")]);
        assert!(resolve_region(&gyms, &s.regions[0]).is_some());
    }
}
