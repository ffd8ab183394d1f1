use std::collections::HashSet;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::app::SelectedGym;
use crate::data;
use crate::model::{Gym, GymsByStation, gym_key};
use crate::tags::TagCache;
use crate::util;

#[derive(Properties, PartialEq, Clone)]
pub struct SidebarProps {
    pub gyms: Rc<GymsByStation>,
    pub tags: UseReducerHandle<TagCache>,
    pub favorites: HashSet<String>,
    pub selected_station: Option<String>,
    pub on_toggle_favorite: Callback<String>,
    pub on_add_tag: Callback<(String, String)>,
    pub on_remove_tag: Callback<(String, usize)>,
    pub on_open_gym: Callback<SelectedGym>,
}

#[derive(Properties, PartialEq, Clone)]
pub struct TagEditorProps {
    pub tags: Vec<String>,
    pub on_add: Callback<String>,
    pub on_remove: Callback<usize>,
}

/// Tag chips plus an input for adding a new tag to one gym.
#[function_component(TagEditor)]
pub fn tag_editor(props: &TagEditorProps) -> Html {
    let draft = use_state(String::new);

    let submit = {
        let draft = draft.clone();
        let on_add = props.on_add.clone();
        Callback::from(move |_: ()| {
            let t = draft.trim().to_string();
            if !t.is_empty() {
                on_add.emit(t);
                draft.set(String::new());
            }
        })
    };
    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            draft.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let onkeydown = {
        let submit = submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                submit.emit(());
            }
        })
    };

    html! {
        <div onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
            <div style="display:flex; flex-wrap:wrap; gap:4px; margin-bottom:6px;">
                { for props.tags.iter().enumerate().map(|(idx, tag)| {
                    let on_remove = props.on_remove.reform(move |_: MouseEvent| idx);
                    html! {
                        <span style="display:inline-flex; align-items:center; gap:2px; padding:2px 8px; border-radius:999px; background:#e9ecef; color:#495057; font-size:12px;">
                            { tag }
                            <button onclick={on_remove}
                                style="border:none; background:transparent; color:#868e96; cursor:pointer; padding:0 2px;">
                                {"×"}
                            </button>
                        </span>
                    }
                }) }
            </div>
            <div style="display:flex; gap:4px;">
                <input type="text" value={(*draft).clone()} placeholder="新增標籤…"
                    {oninput} {onkeydown}
                    style="flex:1; min-width:0; padding:4px 8px; border:1px solid #ced4da; border-radius:6px; font-size:12px;" />
                <button onclick={submit.reform(|_: MouseEvent| ())}
                    style="padding:4px 10px; border-radius:6px; border:none; background:#e9ecef; color:#495057; font-size:12px; cursor:pointer;">
                    {"新增"}
                </button>
            </div>
        </div>
    }
}

fn heart(filled: bool) -> Html {
    let color = if filled { "#dc3545" } else { "#adb5bd" };
    html! {
        <span style={format!("color:{color}; font-size:18px;")}>
            { if filled { "♥" } else { "♡" } }
        </span>
    }
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let bindings = use_memo((), |_| data::station_bindings());
    let query = use_state(String::new);
    let focused = use_state(|| false);

    let oninput = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            query.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let onfocus = {
        let focused = focused.clone();
        Callback::from(move |_: FocusEvent| focused.set(true))
    };
    let onblur = {
        let focused = focused.clone();
        Callback::from(move |_: FocusEvent| focused.set(false))
    };

    let results = data::search_gyms(&props.gyms, &bindings, &query);
    let dropdown = if *focused && !query.trim().is_empty() {
        let items: Html = if results.is_empty() {
            html! { <div style="padding:10px 12px; color:#868e96; font-size:13px;">{"無符合的結果"}</div> }
        } else {
            results
                .iter()
                .take(20)
                .map(|(binding, gym)| {
                    let sel = SelectedGym {
                        station_id: binding.id.clone(),
                        gym: (*gym).clone(),
                    };
                    let query = query.clone();
                    let on_open = props.on_open_gym.clone();
                    // mousedown so the pick lands before the input blurs.
                    let onmousedown = Callback::from(move |e: MouseEvent| {
                        e.prevent_default();
                        query.set(String::new());
                        on_open.emit(sel.clone());
                    });
                    html! {
                        <button {onmousedown}
                            style="display:block; width:100%; text-align:left; padding:8px 12px; border:none; background:transparent; cursor:pointer;">
                            <span style="display:block; font-weight:600; color:#212529;">{ &gym.name }</span>
                            <span style="display:block; font-size:12px; color:#868e96;">{ &binding.name }</span>
                        </button>
                    }
                })
                .collect()
        };
        html! {
            <div style="position:absolute; left:0; right:0; top:100%; margin-top:4px; background:#fff; border:1px solid #dee2e6; border-radius:8px; box-shadow:0 4px 10px rgba(0,0,0,0.1); max-height:256px; overflow-y:auto; z-index:10;">
                { items }
            </div>
        }
    } else {
        html! {}
    };

    let favorite_items: Vec<Html> = bindings
        .iter()
        .flat_map(|b| {
            let gyms = props.gyms.get(&b.id).map(Vec::as_slice).unwrap_or(&[]);
            gyms.iter()
                .filter(|g| props.favorites.contains(&gym_key(&b.id, &g.name)))
                .map(|g| {
                    let sel = SelectedGym {
                        station_id: b.id.clone(),
                        gym: g.clone(),
                    };
                    let on_open = props.on_open_gym.clone();
                    let today = util::today_business_hours(g.business_hours.as_deref());
                    html! {
                        <li key={gym_key(&b.id, &g.name)}>
                            <button onclick={Callback::from(move |_: MouseEvent| on_open.emit(sel.clone()))}
                                style="display:flex; gap:8px; align-items:center; width:100%; text-align:left; padding:8px 12px; border:1px solid #e9ecef; border-radius:8px; background:#fff; cursor:pointer;">
                                { heart(true) }
                                <span style="min-width:0;">
                                    <span style="display:block; font-weight:600; color:#212529;">{ &g.name }</span>
                                    <span style="display:block; font-size:12px; color:#868e96;">{ &b.name }</span>
                                    if let Some(h) = today {
                                        <span style="display:block; font-size:12px; color:#b45309;">{ format!("今日 {h}") }</span>
                                    }
                                </span>
                            </button>
                        </li>
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let station_section = if let Some(station_id) = props.selected_station.clone() {
        let station_gyms = props
            .gyms
            .get(&station_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if station_gyms.is_empty() {
            html! { <p style="text-align:center; color:#868e96; padding:24px 0;">{"此車站附近暫無攀岩場資料"}</p> }
        } else {
            station_gyms
                .iter()
                .map(|gym: &Gym| {
                    let key = gym_key(&station_id, &gym.name);
                    let is_fav = props.favorites.contains(&key);
                    let today = util::today_business_hours(gym.business_hours.as_deref());
                    let open = {
                        let on_open = props.on_open_gym.clone();
                        let sel = SelectedGym {
                            station_id: station_id.clone(),
                            gym: gym.clone(),
                        };
                        Callback::from(move |_: MouseEvent| on_open.emit(sel.clone()))
                    };
                    let toggle = {
                        let on_toggle = props.on_toggle_favorite.clone();
                        let key = key.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.stop_propagation();
                            on_toggle.emit(key.clone());
                        })
                    };
                    let on_add = {
                        let on_add_tag = props.on_add_tag.clone();
                        let key = key.clone();
                        Callback::from(move |tag: String| on_add_tag.emit((key.clone(), tag)))
                    };
                    let on_remove = {
                        let on_remove_tag = props.on_remove_tag.clone();
                        let key = key.clone();
                        Callback::from(move |idx: usize| on_remove_tag.emit((key.clone(), idx)))
                    };
                    html! {
                        <div key={key.clone()} onclick={open}
                            style="position:relative; border:1px solid #e9ecef; border-radius:8px; padding:12px; margin-bottom:12px; cursor:pointer; background:#fff;">
                            <button onclick={toggle}
                                style="position:absolute; top:8px; right:8px; border:none; background:transparent; cursor:pointer;">
                                { heart(is_fav) }
                            </button>
                            <h4 style="margin:0 0 6px; padding-right:28px; color:#212529;">{ &gym.name }</h4>
                            <p style="margin:0 0 2px; font-size:13px; color:#495057;">{ format!("📍 {}", gym.address) }</p>
                            <p style="margin:0; font-size:13px; color:#1d4ed8;">{ format!("🚶 {}", gym.walking_time) }</p>
                            if let Some(h) = today {
                                <p style="margin:4px 0 0; font-size:13px; color:#b45309;">{ format!("今日 {h}") }</p>
                            }
                            <div style="margin-top:8px; padding-top:8px; border-top:1px solid #f1f3f5;">
                                <TagEditor tags={props.tags.tags(&key).to_vec()} {on_add} {on_remove} />
                            </div>
                        </div>
                    }
                })
                .collect()
        }
    } else {
        html! { <p style="text-align:center; color:#868e96; padding:24px 0;">{"請點擊地圖上的車站或店名，或使用上方搜尋"}</p> }
    };

    html! {
        <div style="width:360px; background:#fff; border-radius:12px; box-shadow:0 1px 4px rgba(0,0,0,0.1); padding:16px;">
            <div style="position:relative; margin-bottom:16px;">
                <label style="display:block; font-size:13px; color:#6c757d; margin-bottom:4px;">{"搜尋店名或捷運站"}</label>
                <input type="text" value={(*query).clone()} placeholder="輸入攀岩館名稱或站名..."
                    {oninput} {onfocus} {onblur}
                    style="width:100%; box-sizing:border-box; padding:8px 12px; border:1px solid #ced4da; border-radius:8px;" />
                { dropdown }
            </div>
            if !favorite_items.is_empty() {
                <div style="margin-bottom:16px; border-top:1px solid #e9ecef; padding-top:16px;">
                    <h3 style="margin:0 0 8px; font-size:16px; color:#212529;">{"收藏"}</h3>
                    <ul style="list-style:none; margin:0; padding:0; display:flex; flex-direction:column; gap:8px;">
                        { for favorite_items }
                    </ul>
                </div>
            }
            <div style="border-top:1px solid #e9ecef; padding-top:16px;">
                <h3 style="margin:0 0 12px; font-size:16px; color:#212529;">
                    { props.selected_station.as_deref().map(|s| format!("{s}附近的攀岩場")).unwrap_or_else(|| "攀岩場".to_string()) }
                </h3>
                { station_section }
            </div>
        </div>
    }
}
