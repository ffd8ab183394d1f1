use yew::prelude::*;

use crate::state::Zoom;
use crate::state::viewport::{ZOOM_MAX, ZOOM_MIN};

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomControlsProps {
    pub zoom: UseStateHandle<Zoom>,
}

#[function_component(ZoomControls)]
pub fn zoom_controls(props: &ZoomControlsProps) -> Html {
    let zoom = props.zoom.clone();
    let zoom_in = {
        let zoom = zoom.clone();
        Callback::from(move |_: MouseEvent| zoom.set(zoom.zoomed_in()))
    };
    let zoom_out = {
        let zoom = zoom.clone();
        Callback::from(move |_: MouseEvent| zoom.set(zoom.zoomed_out()))
    };
    let reset = {
        let zoom = zoom.clone();
        Callback::from(move |_: MouseEvent| zoom.set(Zoom::default()))
    };

    html! {
        <div style="display:inline-flex; gap:4px; align-items:center; border:1px solid #ced4da; background:#f8f9fa; border-radius:8px; padding:4px;">
            <button onclick={zoom_out} disabled={zoom.level <= ZOOM_MIN}
                style="width:28px; height:28px; border:none; background:transparent; cursor:pointer;">{"−"}</button>
            <span style="min-width:48px; text-align:center; font-size:13px; color:#495057;">
                { format!("{}%", zoom.percent()) }
            </span>
            <button onclick={zoom_in} disabled={zoom.level >= ZOOM_MAX}
                style="width:28px; height:28px; border:none; background:transparent; cursor:pointer;">{"+"}</button>
            <button onclick={reset}
                style="height:28px; padding:0 8px; border:none; background:transparent; color:#6c757d; cursor:pointer;">{"重置"}</button>
        </div>
    }
}
