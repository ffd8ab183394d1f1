use js_sys::Date;
use yew::prelude::*;

use super::app::SelectedGym;
use super::sidebar::TagEditor;
use crate::util;

#[derive(Properties, PartialEq, Clone)]
pub struct GymModalProps {
    pub selected: SelectedGym,
    pub is_favorite: bool,
    pub tags: Vec<String>,
    pub on_close: Callback<()>,
    pub on_toggle_favorite: Callback<()>,
    pub on_add_tag: Callback<String>,
    pub on_remove_tag: Callback<usize>,
}

fn detail_row(icon: &str, body: Html) -> Html {
    html! {
        <div style="display:flex; gap:8px; align-items:baseline; font-size:14px; color:#495057;">
            <span>{ icon }</span>
            <span style="min-width:0;">{ body }</span>
        </div>
    }
}

/// Weekly hours list with today's line highlighted.
fn hours_block(hours: &str) -> Html {
    let today = Date::new_0().get_day() as usize;
    let rows: Html = (0..7)
        .map(|day| {
            let name = util::DAY_NAMES[day];
            let line = util::business_hours_for_day(hours, day)
                .unwrap_or_else(|| "休息".to_string());
            let style = if day == today {
                "display:flex; justify-content:space-between; gap:16px; font-weight:600; color:#b45309;"
            } else {
                "display:flex; justify-content:space-between; gap:16px; color:#495057;"
            };
            html! {
                <li {style}>
                    <span>{ name }</span>
                    <span>{ line }</span>
                </li>
            }
        })
        .collect();
    html! {
        <div style="margin-top:12px;">
            <h4 style="margin:0 0 6px; font-size:14px; color:#212529;">{"營業時間"}</h4>
            <ul style="list-style:none; margin:0; padding:8px 12px; background:#f8f9fa; border-radius:8px; font-size:13px; display:flex; flex-direction:column; gap:2px;">
                { rows }
            </ul>
        </div>
    }
}

#[function_component(GymModal)]
pub fn gym_modal(props: &GymModalProps) -> Html {
    let gym = &props.selected.gym;

    let close_backdrop = props.on_close.reform(|_: MouseEvent| ());
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());
    let toggle = props.on_toggle_favorite.reform(|_: MouseEvent| ());

    let heart = if props.is_favorite {
        html! { <span style="color:#dc3545; font-size:22px;">{"♥"}</span> }
    } else {
        html! { <span style="color:#adb5bd; font-size:22px;">{"♡"}</span> }
    };

    html! {
        <div onclick={close_backdrop}
            style="position:fixed; inset:0; background:rgba(0,0,0,0.4); display:flex; align-items:center; justify-content:center; z-index:50; padding:16px;">
            <div onclick={stop}
                style="background:#fff; border-radius:12px; box-shadow:0 10px 30px rgba(0,0,0,0.2); width:100%; max-width:420px; max-height:85vh; overflow-y:auto; padding:20px;">
                <div style="display:flex; justify-content:space-between; align-items:flex-start; gap:8px;">
                    <div>
                        <h2 style="margin:0; font-size:20px; color:#212529;">{ &gym.name }</h2>
                        <p style="margin:4px 0 0; font-size:13px; color:#868e96;">{ &props.selected.station_id }</p>
                    </div>
                    <div style="display:flex; gap:4px; align-items:center;">
                        <button onclick={toggle} title="收藏"
                            style="border:none; background:transparent; cursor:pointer;">
                            { heart }
                        </button>
                        <button onclick={props.on_close.reform(|_: MouseEvent| ())}
                            style="border:none; background:transparent; cursor:pointer; font-size:20px; color:#868e96;">
                            {"×"}
                        </button>
                    </div>
                </div>

                <div style="display:flex; flex-direction:column; gap:6px; margin-top:12px;">
                    { detail_row("📍", html! { { &gym.address } }) }
                    { detail_row("🚪", html! { { format!("最近出口：{}", gym.best_exit) } }) }
                    { detail_row("🚶", html! { { &gym.walking_time } }) }
                    if let Some(phone) = &gym.phone {
                        { detail_row("📞", html! {
                            <a href={format!("tel:{phone}")} style="color:#1d4ed8; text-decoration:none;">{ phone }</a>
                        }) }
                    }
                    { detail_row("🔗", html! {
                        <a href={gym.website.clone()} target="_blank" rel="noopener noreferrer"
                            style="color:#1d4ed8; text-decoration:none; word-break:break-all;">
                            {"官方網站"}
                        </a>
                    }) }
                    { detail_row("🗺️", html! {
                        <a href={gym.google_map_link.clone()} target="_blank" rel="noopener noreferrer"
                            style="color:#1d4ed8; text-decoration:none;">
                            {"在 Google 地圖開啟"}
                        </a>
                    }) }
                </div>

                if let Some(hours) = &gym.business_hours {
                    { hours_block(hours) }
                }

                <div style="margin-top:12px; padding-top:12px; border-top:1px solid #e9ecef;">
                    <h4 style="margin:0 0 6px; font-size:14px; color:#212529;">{"大家的標籤"}</h4>
                    <TagEditor
                        tags={props.tags.clone()}
                        on_add={props.on_add_tag.clone()}
                        on_remove={props.on_remove_tag.clone()}
                    />
                </div>
            </div>
        </div>
    }
}
