// Utility helpers: console logging, business hours, local persistence.

use std::collections::HashSet;
use wasm_bindgen::JsValue;

pub const FAVORITES_KEY: &str = "cragMapFavorites";
pub const ADMIN_KEY: &str = "cragMapAdmin";

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub const DAY_NAMES: [&str; 7] = [
    "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
];

/// Picks the given weekday's line out of a multi-line hours string,
/// e.g. "星期一 10:00–22:00". Returns None when the day is missing or
/// listed with no hours.
pub fn business_hours_for_day(hours: &str, weekday: usize) -> Option<String> {
    let day = DAY_NAMES.get(weekday)?;
    for line in hours.trim().lines() {
        let t = line.trim();
        if let Some(rest) = t.strip_prefix(day) {
            let rest = rest.trim();
            if rest.is_empty() {
                return None;
            }
            return Some(rest.to_string());
        }
    }
    None
}

pub fn today_business_hours(hours: Option<&str>) -> Option<String> {
    let weekday = js_sys::Date::new_0().get_day() as usize;
    business_hours_for_day(hours?, weekday)
}

/// Corrupt favorites JSON falls back to an empty set; never surfaced.
pub fn parse_favorites(raw: &str) -> HashSet<String> {
    serde_json::from_str::<Vec<String>>(raw)
        .map(|v| v.into_iter().collect())
        .unwrap_or_default()
}

pub fn favorites_to_json(favorites: &HashSet<String>) -> String {
    let mut list: Vec<&String> = favorites.iter().collect();
    list.sort();
    serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string())
}

pub fn load_favorites() -> HashSet<String> {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            if let Ok(Some(raw)) = store.get_item(FAVORITES_KEY) {
                return parse_favorites(&raw);
            }
        }
    }
    HashSet::new()
}

pub fn save_favorites(favorites: &HashSet<String>) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            let _ = store.set_item(FAVORITES_KEY, &favorites_to_json(favorites));
        }
    }
}

pub fn admin_session_active() -> bool {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.session_storage() {
            if let Ok(Some(v)) = store.get_item(ADMIN_KEY) {
                return v == "1";
            }
        }
    }
    false
}

pub fn set_admin_session(active: bool) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.session_storage() {
            if active {
                let _ = store.set_item(ADMIN_KEY, "1");
            } else {
                let _ = store.remove_item(ADMIN_KEY);
            }
        }
    }
}

pub fn copy_to_clipboard(text: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.navigator().clipboard().write_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOURS: &str = "星期一 10:00–22:00\n星期二 10:00–22:00\n星期三 休息\n星期日";

    #[test]
    fn picks_matching_day_line() {
        assert_eq!(
            business_hours_for_day(HOURS, 1).as_deref(),
            Some("10:00–22:00")
        );
        assert_eq!(business_hours_for_day(HOURS, 3).as_deref(), Some("休息"));
    }

    #[test]
    fn missing_or_empty_day_yields_none() {
        assert!(business_hours_for_day(HOURS, 5).is_none());
        // Day listed with no hours after it.
        assert!(business_hours_for_day(HOURS, 0).is_none());
        assert!(business_hours_for_day(HOURS, 99).is_none());
    }

    #[test]
    fn corrupt_favorites_fall_back_to_empty() {
        assert!(parse_favorites("not json").is_empty());
        assert!(parse_favorites("{\"a\":1}").is_empty());
        let set = parse_favorites("[\"台北站|X攀岩\"]");
        assert!(set.contains("台北站|X攀岩"));
    }

    #[test]
    fn favorites_round_trip() {
        let mut set = HashSet::new();
        set.insert("a|b".to_string());
        set.insert("c|d".to_string());
        assert_eq!(parse_favorites(&favorites_to_json(&set)), set);
    }
}
