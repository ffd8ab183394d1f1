use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::model::{MapAction, MapState, MIN_LAYER_SIZE};

#[derive(Properties, PartialEq, Clone)]
pub struct LayerPanelProps {
    pub map: UseReducerHandle<MapState>,
}

fn input_value(e: &InputEvent, fallback: f64) -> f64 {
    e.target_unchecked_into::<HtmlInputElement>()
        .value()
        .parse()
        .unwrap_or(fallback)
}

/// Manual size/font entry plus removal for placed overlay layers.
#[function_component(LayerPanel)]
pub fn layer_panel(props: &LayerPanelProps) -> Html {
    let map = props.map.clone();
    if map.images.is_empty() && map.texts.is_empty() {
        return html! {};
    }

    let images: Html = map
        .images
        .iter()
        .map(|img| {
            let set_width = {
                let map = map.clone();
                let id = img.id.clone();
                let height = img.height;
                Callback::from(move |e: InputEvent| {
                    map.dispatch(MapAction::SetImageSize {
                        id: id.clone(),
                        width: input_value(&e, MIN_LAYER_SIZE),
                        height,
                    });
                })
            };
            let set_height = {
                let map = map.clone();
                let id = img.id.clone();
                let width = img.width;
                Callback::from(move |e: InputEvent| {
                    map.dispatch(MapAction::SetImageSize {
                        id: id.clone(),
                        width,
                        height: input_value(&e, MIN_LAYER_SIZE),
                    });
                })
            };
            let remove = {
                let map = map.clone();
                let id = img.id.clone();
                Callback::from(move |_: MouseEvent| {
                    map.dispatch(MapAction::RemoveImage { id: id.clone() });
                })
            };
            html! {
                <li key={img.id.clone()} style="display:flex; gap:8px; align-items:center; flex-wrap:wrap; font-size:13px;">
                    <span style="color:#495057;">{ &img.asset_id }</span>
                    <label style="display:flex; gap:4px; align-items:center;">
                        {"寬"}
                        <input type="number" min="20" value={(img.width.round() as i64).to_string()}
                            oninput={set_width}
                            style="width:64px; padding:2px 4px; border:1px solid #ced4da; border-radius:4px;" />
                    </label>
                    <label style="display:flex; gap:4px; align-items:center;">
                        {"高"}
                        <input type="number" min="20" value={(img.height.round() as i64).to_string()}
                            oninput={set_height}
                            style="width:64px; padding:2px 4px; border:1px solid #ced4da; border-radius:4px;" />
                    </label>
                    <button onclick={remove} style="color:#dc3545; border:none; background:transparent; cursor:pointer; font-size:12px;">{"刪除"}</button>
                </li>
            }
        })
        .collect();

    let texts: Html = map
        .texts
        .iter()
        .map(|t| {
            let set_font = {
                let map = map.clone();
                let id = t.id.clone();
                Callback::from(move |e: InputEvent| {
                    map.dispatch(MapAction::SetTextFontSize {
                        id: id.clone(),
                        size: input_value(&e, 48.0),
                    });
                })
            };
            let remove = {
                let map = map.clone();
                let id = t.id.clone();
                Callback::from(move |_: MouseEvent| {
                    map.dispatch(MapAction::RemoveText { id: id.clone() });
                })
            };
            html! {
                <li key={t.id.clone()} style="display:flex; gap:8px; align-items:center; flex-wrap:wrap; font-size:13px;">
                    <span style="color:#495057; max-width:8rem; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;" title={t.content.clone()}>
                        { &t.content }
                    </span>
                    <label style="display:flex; gap:4px; align-items:center;">
                        {"字級"}
                        <input type="number" min="8" max="200" value={(t.font_size.round() as i64).to_string()}
                            oninput={set_font}
                            style="width:64px; padding:2px 4px; border:1px solid #ced4da; border-radius:4px;" />
                    </label>
                    <button onclick={remove} style="color:#dc3545; border:none; background:transparent; cursor:pointer; font-size:12px;">{"刪除"}</button>
                </li>
            }
        })
        .collect();

    html! {
        <div style="margin-top:12px; padding:12px; border:1px solid #e9d5ff; background:#faf5ff; border-radius:8px;">
            <h4 style="margin:0 0 8px; font-size:14px; color:#6b21a8;">{"圖層列表"}</h4>
            if !map.images.is_empty() {
                <div style="margin-bottom:8px;">
                    <span style="color:#7e22ce; font-weight:600; font-size:13px;">{"圖片"}</span>
                    <ul style="margin:4px 0 0; padding-left:16px; display:flex; flex-direction:column; gap:4px;">{ images }</ul>
                </div>
            }
            if !map.texts.is_empty() {
                <div>
                    <span style="color:#7e22ce; font-weight:600; font-size:13px;">{"文字"}</span>
                    <ul style="margin:4px 0 0; padding-left:16px; display:flex; flex-direction:column; gap:4px;">{ texts }</ul>
                </div>
            }
        </div>
    }
}
