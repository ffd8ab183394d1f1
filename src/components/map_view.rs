use std::rc::Rc;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::app::SelectedGym;
use super::layer_panel::LayerPanel;
use super::zoom_controls::ZoomControls;
use crate::model::{
    EditMode, GymsByStation, LayerKind, MapAction, MapState, Point, VIEWBOX_H, VIEWBOX_W,
    resolve_region,
};
use crate::state::viewport::{ZOOM_WHEEL_STEP, Zoom};
use crate::state::{SurfaceTransform, surface};
use crate::util;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub map: UseReducerHandle<MapState>,
    pub gyms: Rc<GymsByStation>,
    pub is_admin: bool,
    pub zoom: UseStateHandle<Zoom>,
    pub on_select_station: Callback<String>,
    pub on_open_gym: Callback<SelectedGym>,
}

fn svg_point(node: &NodeRef, e: &MouseEvent) -> Point {
    let t: SurfaceTransform = surface::capture(node);
    t.to_viewbox(e.client_x() as f64, e.client_y() as f64)
}

fn mode_button(
    map: &UseReducerHandle<MapState>,
    mode: EditMode,
    label_off: &str,
    label_on: &str,
    color: &str,
) -> Html {
    let active = map.mode == mode;
    let onclick = {
        let map = map.clone();
        Callback::from(move |_: MouseEvent| {
            let next = if map.mode == mode { EditMode::Viewing } else { mode };
            map.dispatch(MapAction::SetMode(next));
        })
    };
    let style = if active {
        format!("padding:6px 12px; border-radius:8px; border:1px solid {color}; background:{color}22; color:{color}; font-weight:600;")
    } else {
        "padding:6px 12px; border-radius:8px; border:1px solid #ced4da; background:#f8f9fa; color:#495057;".to_string()
    };
    html! {
        <button {onclick} {style}>{ if active { label_on.to_string() } else { label_off.to_string() } }</button>
    }
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let svg_ref = use_node_ref();
    let map = props.map.clone();
    let mode = map.mode;

    let onmousemove = {
        let map = map.clone();
        let svg_ref = svg_ref.clone();
        Callback::from(move |e: MouseEvent| {
            if map.has_active_drag() {
                e.prevent_default();
                let at = svg_point(&svg_ref, &e);
                map.dispatch(MapAction::PointerMoved { at });
            }
        })
    };
    let end_drag = {
        let map = map.clone();
        Callback::from(move |_: MouseEvent| {
            if map.has_active_drag() {
                map.dispatch(MapAction::PointerReleased);
            }
        })
    };

    let onwheel = {
        let zoom = props.zoom.clone();
        Callback::from(move |e: WheelEvent| {
            if e.ctrl_key() || e.meta_key() {
                e.prevent_default();
                let delta = if e.delta_y() > 0.0 { -ZOOM_WHEEL_STEP } else { ZOOM_WHEEL_STEP };
                zoom.set(zoom.with_level(zoom.level + delta));
            }
        })
    };

    let stations: Html = map
        .stations
        .iter()
        .map(|p| {
            let x = p.x();
            let y = p.y();
            let dragging = map.station_drag.as_deref() == Some(p.id.as_str());
            let onmousedown = {
                let map = map.clone();
                let id = p.id.clone();
                Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    map.dispatch(MapAction::BeginStationDrag { id: id.clone() });
                })
            };
            let onclick = {
                let on_select = props.on_select_station.clone();
                let id = p.id.clone();
                let mode = mode;
                Callback::from(move |e: MouseEvent| {
                    e.stop_propagation();
                    if mode == EditMode::Viewing {
                        on_select.emit(id.clone());
                    }
                })
            };
            let (fill, stroke) = if mode == EditMode::Stations {
                if dragging {
                    ("rgba(251, 191, 36, 0.5)", "rgb(59, 130, 246)")
                } else {
                    ("rgba(59, 130, 246, 0.2)", "rgb(59, 130, 246)")
                }
            } else {
                ("transparent", "transparent")
            };
            html! {
                <g key={p.id.clone()} {onmousedown} {onclick}
                    style={if mode == EditMode::Stations { "cursor:grab;" } else { "cursor:pointer;" }}>
                    <circle cx={x.to_string()} cy={y.to_string()} r={crate::model::STATION_RADIUS.to_string()}
                        fill={fill} stroke={stroke} stroke-width="8" />
                    if mode == EditMode::Stations {
                        <text x={x.to_string()} y={y.to_string()} text-anchor="middle"
                            dominant-baseline="middle" fill="#1f2937" font-size="80"
                            style="pointer-events:none; user-select:none;">
                            { p.name.trim_end_matches('站') }
                        </text>
                    }
                </g>
            }
        })
        .collect();

    let images: Html = map
        .images
        .iter()
        .map(|img| {
            let src = map.asset(&img.asset_id).map(|a| a.src.clone()).unwrap_or_default();
            let start_move = {
                let map = map.clone();
                let svg_ref = svg_ref.clone();
                let id = img.id.clone();
                Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    let at = svg_point(&svg_ref, &e);
                    map.dispatch(MapAction::BeginLayerMove {
                        kind: LayerKind::Image,
                        id: id.clone(),
                        at,
                    });
                })
            };
            let start_resize = {
                let map = map.clone();
                let svg_ref = svg_ref.clone();
                let id = img.id.clone();
                Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    let at = svg_point(&svg_ref, &e);
                    map.dispatch(MapAction::BeginLayerResize { id: id.clone(), at });
                })
            };
            let editing = mode == EditMode::Layers;
            html! {
                <g key={img.id.clone()} style={if editing { "pointer-events:auto;" } else { "pointer-events:none;" }}>
                    <image href={src} x={img.x.to_string()} y={img.y.to_string()}
                        width={img.width.to_string()} height={img.height.to_string()}
                        style={if editing { "cursor:move;" } else { "" }}
                        onmousedown={start_move} />
                    if editing {
                        <circle cx={(img.x + img.width).to_string()} cy={(img.y + img.height).to_string()}
                            r="12" fill="rgba(147, 51, 234, 0.9)" stroke="white" stroke-width="2"
                            style="cursor:nwse-resize;" onmousedown={start_resize} />
                    }
                </g>
            }
        })
        .collect();

    let texts: Html = map
        .texts
        .iter()
        .map(|t| {
            let start_move = {
                let map = map.clone();
                let svg_ref = svg_ref.clone();
                let id = t.id.clone();
                Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    let at = svg_point(&svg_ref, &e);
                    map.dispatch(MapAction::BeginLayerMove {
                        kind: LayerKind::Text,
                        id: id.clone(),
                        at,
                    });
                })
            };
            let editing = mode == EditMode::Layers;
            html! {
                <g key={t.id.clone()} style={if editing { "pointer-events:auto;" } else { "pointer-events:none;" }}>
                    <text x={t.x.to_string()} y={t.y.to_string()} font-size={t.font_size.to_string()}
                        fill="#000" stroke="#fff" stroke-width={(t.font_size / 24.0).max(2.0).to_string()}
                        paint-order="stroke" text-anchor="middle" dominant-baseline="middle"
                        style={if editing { "cursor:move; user-select:none;" } else { "user-select:none;" }}
                        onmousedown={start_move}>
                        { &t.content }
                    </text>
                </g>
            }
        })
        .collect();

    let regions: Html = map
        .regions
        .iter()
        .filter_map(|area| {
            // Orphaned regions are inert.
            let gym = resolve_region(&props.gyms, area)?;
            let key = area.key();
            if mode == EditMode::Regions {
                let start_move = {
                    let map = map.clone();
                    let svg_ref = svg_ref.clone();
                    let key = key.clone();
                    Callback::from(move |e: MouseEvent| {
                        e.prevent_default();
                        e.stop_propagation();
                        let at = svg_point(&svg_ref, &e);
                        map.dispatch(MapAction::BeginRegionMove { key: key.clone(), at });
                    })
                };
                let start_resize = {
                    let map = map.clone();
                    let svg_ref = svg_ref.clone();
                    let key = key.clone();
                    Callback::from(move |e: MouseEvent| {
                        e.prevent_default();
                        e.stop_propagation();
                        let at = svg_point(&svg_ref, &e);
                        map.dispatch(MapAction::BeginRegionResize { key: key.clone(), at });
                    })
                };
                Some(html! {
                    <g key={key}>
                        <rect x={area.x.to_string()} y={area.y.to_string()}
                            width={area.w.to_string()} height={area.h.to_string()}
                            fill="rgba(34, 197, 94, 0.15)" stroke="rgb(34, 197, 94)" stroke-width="3"
                            style="cursor:move;" onmousedown={start_move} />
                        <rect x={(area.x + area.w - 14.0).to_string()} y={(area.y + area.h - 14.0).to_string()}
                            width="14" height="14" fill="rgb(34, 197, 94)"
                            style="cursor:nwse-resize;" onmousedown={start_resize} />
                    </g>
                })
            } else {
                let onclick = {
                    let on_open = props.on_open_gym.clone();
                    let sel = SelectedGym {
                        station_id: area.station_id.clone(),
                        gym: gym.clone(),
                    };
                    Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        on_open.emit(sel.clone());
                    })
                };
                Some(html! {
                    <g key={key} {onclick} style="cursor:pointer;">
                        <title>{ &area.gym_name }</title>
                        <rect x={area.x.to_string()} y={area.y.to_string()}
                            width={area.w.to_string()} height={area.h.to_string()}
                            fill="transparent" />
                    </g>
                })
            }
        })
        .collect();

    let toolbar = if props.is_admin {
        let copy_stations = {
            let map = map.clone();
            Callback::from(move |_: MouseEvent| {
                if let Ok(json) = serde_json::to_string_pretty(&map.export_stations()) {
                    util::copy_to_clipboard(&json);
                    util::clog("已複製車站座標，可貼到 data 目錄");
                }
            })
        };
        let copy_regions = {
            let map = map.clone();
            Callback::from(move |_: MouseEvent| {
                if let Ok(json) = serde_json::to_string_pretty(&map.export_regions()) {
                    util::copy_to_clipboard(&json);
                    util::clog("已複製店名點擊區，可貼到 data/gym_label_areas.json");
                }
            })
        };
        let copy_layers = {
            let map = map.clone();
            Callback::from(move |_: MouseEvent| {
                if let Ok(json) = serde_json::to_string_pretty(&map.export_layers()) {
                    util::copy_to_clipboard(&json);
                    util::clog("已複製圖層，可貼到 data/map_layers.json");
                }
            })
        };
        let add_image = {
            let map = map.clone();
            Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let asset_id = select.value();
                if !asset_id.is_empty() {
                    map.dispatch(MapAction::AddImage {
                        asset_id,
                        stamp_ms: js_sys::Date::now() as u64,
                    });
                    select.set_value("");
                }
            })
        };
        let add_text = {
            let map = map.clone();
            Callback::from(move |_: MouseEvent| {
                let Some(win) = web_sys::window() else { return };
                if let Ok(Some(content)) = win.prompt_with_message_and_default("輸入文字", "新站名")
                {
                    map.dispatch(MapAction::AddText {
                        content,
                        stamp_ms: js_sys::Date::now() as u64,
                    });
                }
            })
        };
        html! {
            <>
                { mode_button(&map, EditMode::Stations, "調整車站", "結束編輯", "#b45309") }
                { mode_button(&map, EditMode::Regions, "調整店名點擊區", "結束調整", "#15803d") }
                { mode_button(&map, EditMode::Layers, "圖層管理", "結束圖層", "#7e22ce") }
                if mode == EditMode::Stations {
                    <button onclick={copy_stations} style="padding:6px 12px; border-radius:8px; border:1px solid #93c5fd; background:#eff6ff; color:#1d4ed8;">{"複製座標"}</button>
                }
                if mode == EditMode::Regions {
                    <button onclick={copy_regions} style="padding:6px 12px; border-radius:8px; border:1px solid #86efac; background:#f0fdf4; color:#15803d;">{"複製店名點擊區"}</button>
                }
                if mode == EditMode::Layers {
                    <select onchange={add_image} style="padding:6px 8px; border-radius:8px; border:1px solid #ced4da;">
                        <option value="" selected={true}>{"新增圖片…"}</option>
                        { for map.assets.iter().map(|a| html! {
                            <option value={a.id.clone()}>{ &a.label }</option>
                        }) }
                    </select>
                    <button onclick={add_text} style="padding:6px 12px; border-radius:8px; border:1px solid #d8b4fe; background:#faf5ff; color:#7e22ce;">{"新增文字"}</button>
                    <button onclick={copy_layers} style="padding:6px 12px; border-radius:8px; border:1px solid #d8b4fe; background:#faf5ff; color:#7e22ce;">{"複製圖層"}</button>
                }
            </>
        }
    } else {
        html! {}
    };

    let hint = match mode {
        EditMode::Stations => "拖曳車站圓點調整位置，完成後按「複製座標」貼回站點資料",
        EditMode::Regions => "拖曳綠色方框移動、拖曳右下角調整大小以覆蓋圖上店名，完成後按「複製店名點擊區」",
        EditMode::Layers => "拖曳圖層移動；圖片可拖曳右下角紫點或於列表輸入寬高；文字可調字級。完成後按「複製圖層」",
        EditMode::Viewing => "點擊地圖上的車站或店名，或從右側列表選擇。Ctrl + 滾輪可縮放地圖。",
    };

    let view_box = format!("0 0 {VIEWBOX_W} {VIEWBOX_H}");
    let zoom_level = props.zoom.level;

    html! {
        <div style="flex:1; min-width:420px; background:#fff; border-radius:12px; box-shadow:0 1px 4px rgba(0,0,0,0.1); padding:16px;">
            <div style="display:flex; gap:8px; flex-wrap:wrap; align-items:center; margin-bottom:12px;">
                <ZoomControls zoom={props.zoom.clone()} />
                { toolbar }
            </div>
            <div style="overflow:auto; border:2px solid #e9ecef; border-radius:8px; max-height:70vh;" {onwheel}>
                <div style={format!("position:relative; display:inline-block; transform:scale({zoom_level}); transform-origin:center top;")}>
                    <img src="assets/metro-map.svg" alt="台北捷運路線圖"
                        style="display:block; width:100%; height:auto; max-height:65vh; object-fit:contain;" />
                    <svg ref={svg_ref}
                        viewBox={view_box}
                        preserveAspectRatio="xMidYMid meet"
                        style="position:absolute; top:0; left:0; width:100%; height:100%;"
                        onmousemove={onmousemove}
                        onmouseup={end_drag.clone()}
                        onmouseleave={end_drag}>
                        { stations }
                        { images }
                        { texts }
                        { regions }
                    </svg>
                </div>
            </div>
            <p style="margin:12px 0 0; font-size:13px; color:#6c757d;">{ hint }</p>
            if props.is_admin && mode == EditMode::Layers {
                <LayerPanel map={map.clone()} />
            }
        </div>
    }
}
