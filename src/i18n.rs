// src/i18n.rs
//
// Lightweight runtime i18n:
// - Strings live in either:
//   A) assets/i18n/<lang>.json
//   B) assets/i18n.json (single file, format: { "<lang>": { "key": "value" } })
// - Load order: selected lang -> on-disk English -> English table built into the binary
// - Lookup: tr("key") / tr_with("key", &[("name", ...)]) with {name} placeholders
//
// Language selection happens in main (--lang / PANORAMA_LANG / config file).

use once_cell::sync::{Lazy, OnceCell};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const FALLBACK_LANG: &str = "en";

static BUILTIN_EN: Lazy<HashMap<String, String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/i18n/en.json")).unwrap_or_default()
});

#[derive(Debug, Clone)]
pub struct I18n {
    lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn load_multi_lang_json(path: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    let mut all: HashMap<String, HashMap<String, String>> = serde_json::from_str(&text).ok()?;
    all.remove(lang)
}

/// Candidate locations for `relative`:
/// 1) <exe_dir>/assets/<relative>
/// 2) ./assets/<relative>  (dev working dir)
pub(crate) fn find_asset(relative: &Path) -> Option<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    exe_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::new()))
        .map(|dir| dir.join("assets").join(relative))
        .find(|p| p.exists())
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let per_lang = Path::new("i18n").join(format!("{lang}.json"));
    if let Some(m) = find_asset(&per_lang).and_then(|p| load_json_map(&p)) {
        return m;
    }

    if let Some(m) =
        find_asset(Path::new("i18n.json")).and_then(|p| load_multi_lang_json(&p, lang))
    {
        return m;
    }

    if lang != FALLBACK_LANG {
        log::warn!("no translations found for '{lang}', using English");
    }
    HashMap::new()
}

/// Initialize global i18n. Safe to call multiple times; later calls overwrite current lang maps.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();

    let map = load_lang(&lang);
    let fallback_map = if lang == FALLBACK_LANG {
        map.clone()
    } else {
        load_lang(FALLBACK_LANG)
    };

    let i = I18n {
        lang,
        map,
        fallback_map,
    };

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

fn get_locked() -> Option<std::sync::RwLockReadGuard<'static, I18n>> {
    I18N.get().and_then(|l| l.read().ok())
}

pub fn current_lang() -> String {
    get_locked()
        .map(|i| i.lang.clone())
        .unwrap_or_else(|| FALLBACK_LANG.to_string())
}

/// Get localized text by key. If key missing everywhere, returns key itself.
pub fn tr(key: &str) -> String {
    if let Some(i) = get_locked() {
        if let Some(v) = i.map.get(key).or_else(|| i.fallback_map.get(key)) {
            return v.clone();
        }
    }
    BUILTIN_EN
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Get localized text and substitute `{name}` placeholders.
/// Any placeholder not provided is kept as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    let mut s = tr(key);
    for (k, v) in args {
        let placeholder = format!("{{{}}}", k);
        s = s.replace(&placeholder, v);
    }
    s
}
