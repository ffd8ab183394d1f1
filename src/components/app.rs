use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::{gym_modal::GymModal, map_view::MapView, sidebar::Sidebar};
use crate::data;
use crate::model::{EditMode, Gym, GymsByStation, MapAction, MapState, gym_key};
use crate::state::Zoom;
use crate::tags::{self, TagCache, TagCacheAction};
use crate::util;

// Shared admin password, injected at build time.
const ADMIN_PASSWORD: Option<&str> = option_env!("MAP_ADMIN_PASSWORD");

/// A gym opened in the detail modal, with the station it was reached
/// through (the station id is half of the gym identity).
#[derive(Clone, PartialEq)]
pub struct SelectedGym {
    pub station_id: String,
    pub gym: Gym,
}

impl SelectedGym {
    pub fn key(&self) -> String {
        gym_key(&self.station_id, &self.gym.name)
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let gyms: Rc<GymsByStation> = use_memo((), |_| data::load_gyms());
    let map = use_reducer(|| {
        MapState::new(
            &data::station_bindings(),
            &data::load_gyms(),
            data::load_label_regions(),
            data::load_map_layers(),
            data::map_assets(),
        )
    });
    let zoom = use_state(Zoom::default);
    let is_admin = use_state(|| false);
    let admin_input = use_state(String::new);
    let login_open = use_state(|| false);
    let favorites = use_state(HashSet::<String>::new);
    let tag_cache = use_reducer(TagCache::default);
    let tag_seq = use_mut_ref(|| 0u64);
    let tag_status = use_state(|| Option::<String>::None);
    let selected_station = use_state(|| Option::<String>::None);
    let modal_gym = use_state(|| Option::<SelectedGym>::None);

    // Restore admin session and favorites, then fetch the shared tags.
    {
        let is_admin = is_admin.clone();
        let favorites = favorites.clone();
        let tag_cache = tag_cache.clone();
        use_effect_with((), move |_| {
            if util::admin_session_active() {
                is_admin.set(true);
            }
            favorites.set(util::load_favorites());
            spawn_local(async move {
                let snapshot = tags::fetch_all().await;
                tag_cache.dispatch(TagCacheAction::Loaded(snapshot));
            });
            || ()
        });
    }

    // Leaving admin always drops back to viewing mode.
    {
        let map = map.clone();
        let admin = *is_admin;
        use_effect_with(admin, move |_| {
            if !admin {
                map.dispatch(MapAction::SetMode(EditMode::Viewing));
            }
            || ()
        });
    }

    // Persist favorites on every change.
    {
        let favorites = favorites.clone();
        use_effect_with((*favorites).clone(), move |_| {
            util::save_favorites(&favorites);
            || ()
        });
    }

    let toggle_favorite = {
        let favorites = favorites.clone();
        Callback::from(move |key: String| {
            let mut next = (*favorites).clone();
            if !next.remove(&key) {
                next.insert(key);
            }
            favorites.set(next);
        })
    };

    let add_tag = {
        let tag_cache = tag_cache.clone();
        let tag_seq = tag_seq.clone();
        let tag_status = tag_status.clone();
        Callback::from(move |(key, tag): (String, String)| {
            let tag = tag.trim().to_string();
            if tag.is_empty() {
                return;
            }
            let seq = {
                let mut s = tag_seq.borrow_mut();
                *s += 1;
                *s
            };
            let tag_cache = tag_cache.clone();
            let tag_status = tag_status.clone();
            spawn_local(async move {
                match tags::push_add(&key, &tag).await {
                    Ok(list) => {
                        tag_status.set(None);
                        tag_cache.dispatch(TagCacheAction::Applied {
                            key,
                            seq,
                            tags: list,
                        });
                    }
                    Err(e) => tag_status.set(Some(e.to_string())),
                }
            });
        })
    };

    let remove_tag = {
        let tag_cache = tag_cache.clone();
        let tag_seq = tag_seq.clone();
        let tag_status = tag_status.clone();
        Callback::from(move |(key, index): (String, usize)| {
            let seq = {
                let mut s = tag_seq.borrow_mut();
                *s += 1;
                *s
            };
            let tag_cache = tag_cache.clone();
            let tag_status = tag_status.clone();
            spawn_local(async move {
                match tags::push_remove(&key, index).await {
                    Ok(list) => {
                        tag_status.set(None);
                        tag_cache.dispatch(TagCacheAction::Applied {
                            key,
                            seq,
                            tags: list,
                        });
                    }
                    Err(e) => tag_status.set(Some(e.to_string())),
                }
            });
        })
    };

    let on_select_station = {
        let selected_station = selected_station.clone();
        let modal_gym = modal_gym.clone();
        Callback::from(move |id: String| {
            selected_station.set(Some(id));
            modal_gym.set(None);
        })
    };

    let on_open_gym = {
        let selected_station = selected_station.clone();
        let modal_gym = modal_gym.clone();
        let zoom = zoom.clone();
        Callback::from(move |sel: SelectedGym| {
            zoom.set(Zoom::default());
            selected_station.set(Some(sel.station_id.clone()));
            modal_gym.set(Some(sel));
        })
    };

    let on_close_modal = {
        let modal_gym = modal_gym.clone();
        Callback::from(move |_| modal_gym.set(None))
    };

    let handle_login = {
        let is_admin = is_admin.clone();
        let admin_input = admin_input.clone();
        let login_open = login_open.clone();
        Callback::from(move |_| {
            let expected = ADMIN_PASSWORD.unwrap_or("");
            if !expected.is_empty() && *admin_input == expected {
                util::set_admin_session(true);
                is_admin.set(true);
                admin_input.set(String::new());
                login_open.set(false);
            } else if let Some(win) = web_sys::window() {
                let _ = win.alert_with_message("密碼錯誤");
            }
        })
    };

    let handle_logout = {
        let is_admin = is_admin.clone();
        Callback::from(move |_| {
            util::set_admin_session(false);
            is_admin.set(false);
        })
    };

    let admin_controls = if *is_admin {
        html! {
            <button onclick={handle_logout.reform(|_: MouseEvent| ())}
                style="padding:6px 12px; border:1px solid #f1aeb5; background:#fff0f1; color:#b02a37; border-radius:8px;">
                {"管理員登出"}
            </button>
        }
    } else if *login_open {
        let oninput = {
            let admin_input = admin_input.clone();
            Callback::from(move |e: InputEvent| {
                admin_input.set(e.target_unchecked_into::<HtmlInputElement>().value());
            })
        };
        let onkeydown = {
            let handle_login = handle_login.clone();
            Callback::from(move |e: KeyboardEvent| {
                if e.key() == "Enter" {
                    handle_login.emit(());
                }
            })
        };
        let cancel = {
            let login_open = login_open.clone();
            Callback::from(move |_: MouseEvent| login_open.set(false))
        };
        html! {
            <span style="display:inline-flex; gap:6px; align-items:center;">
                <input type="password" placeholder="管理員密碼" value={(*admin_input).clone()}
                    {oninput} {onkeydown}
                    style="padding:6px 8px; border:1px solid #ced4da; border-radius:6px;" />
                <button onclick={handle_login.reform(|_: MouseEvent| ())}
                    style="padding:6px 12px; border-radius:8px; background:#0d6efd; color:#fff; border:none;">
                    {"登入"}
                </button>
                <button onclick={cancel} style="padding:6px 10px; border-radius:8px;">{"取消"}</button>
            </span>
        }
    } else {
        let open = {
            let login_open = login_open.clone();
            Callback::from(move |_: MouseEvent| login_open.set(true))
        };
        html! {
            <button onclick={open}
                style="padding:6px 12px; border:1px solid #ced4da; background:#f8f9fa; color:#6c757d; border-radius:8px;">
                {"管理員登入"}
            </button>
        }
    };

    let modal = (*modal_gym).clone().map(|sel| {
        let key = sel.key();
        let tag_list = tag_cache.tags(&key).to_vec();
        let on_toggle = {
            let toggle_favorite = toggle_favorite.clone();
            let key = key.clone();
            Callback::from(move |_: ()| toggle_favorite.emit(key.clone()))
        };
        let on_add = {
            let add_tag = add_tag.clone();
            let key = key.clone();
            Callback::from(move |tag: String| add_tag.emit((key.clone(), tag)))
        };
        let on_remove = {
            let remove_tag = remove_tag.clone();
            let key = key.clone();
            Callback::from(move |idx: usize| remove_tag.emit((key.clone(), idx)))
        };
        html! {
            <GymModal
                selected={sel}
                is_favorite={favorites.contains(&key)}
                tags={tag_list}
                on_close={on_close_modal.clone()}
                on_toggle_favorite={on_toggle}
                on_add_tag={on_add}
                on_remove_tag={on_remove}
            />
        }
    });

    html! {
        <div style="min-height:100vh; background:#f8f9fa; font-family:system-ui, sans-serif;">
            <header style="background:#fff; border-bottom:1px solid #dee2e6; padding:16px 24px; display:flex; justify-content:space-between; align-items:center; flex-wrap:wrap; gap:8px;">
                <div>
                    <h1 style="margin:0; font-size:24px; color:#212529;">{"台北捷運攀岩場地圖"}</h1>
                    <p style="margin:4px 0 0; color:#6c757d; font-size:14px;">{"點擊捷運站查看附近的攀岩場資訊"}</p>
                </div>
                <div>{ admin_controls }</div>
            </header>
            if let Some(msg) = (*tag_status).clone() {
                <div style="margin:8px 24px 0; padding:8px 12px; border:1px solid #f1aeb5; background:#fff0f1; color:#b02a37; border-radius:8px; font-size:13px;">
                    { msg }
                </div>
            }
            <main style="display:flex; gap:16px; padding:16px 24px; align-items:flex-start; flex-wrap:wrap;">
                <MapView
                    map={map.clone()}
                    gyms={gyms.clone()}
                    is_admin={*is_admin}
                    zoom={zoom.clone()}
                    on_select_station={on_select_station.clone()}
                    on_open_gym={on_open_gym.clone()}
                />
                <Sidebar
                    gyms={gyms.clone()}
                    tags={tag_cache.clone()}
                    favorites={(*favorites).clone()}
                    selected_station={(*selected_station).clone()}
                    on_toggle_favorite={toggle_favorite.clone()}
                    on_add_tag={add_tag.clone()}
                    on_remove_tag={remove_tag.clone()}
                    on_open_gym={on_open_gym.clone()}
                />
            </main>
            { modal }
        </div>
    }
}
