// fonts.rs — 为 egui 加载一款能显示中文的字体（系统目录或 assets/fonts）

use std::path::{Path, PathBuf};

#[cfg(windows)]
const SYSTEM_FONTS: &[&str] = &[
    r"C:\Windows\Fonts\msyh.ttf",
    r"C:\Windows\Fonts\simhei.ttf",
    r"C:\Windows\Fonts\Deng.ttf",
    r"C:\Windows\Fonts\simsun.ttc",
];

#[cfg(target_os = "macos")]
const SYSTEM_FONTS: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/Library/Fonts/NotoSansSC-Regular.otf",
];

#[cfg(all(unix, not(target_os = "macos")))]
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansSC-Regular.otf",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
];

#[cfg(not(any(windows, unix)))]
const SYSTEM_FONTS: &[&str] = &[];

// 放在 assets/fonts/ 下随程序分发
const BUNDLED_FONTS: &[&str] = &["NotoSansSC-Regular.otf", "NotoSansSC-Regular.ttf"];

/// English renders with egui's built-in fonts.
pub fn needs_cjk(lang: &str) -> bool {
    ["zh", "ja", "ko"]
        .iter()
        .any(|prefix| lang.starts_with(prefix))
}

fn candidates() -> Vec<PathBuf> {
    let bundled = BUNDLED_FONTS
        .iter()
        .filter_map(|name| crate::i18n::find_asset(&Path::new("fonts").join(name)));

    SYSTEM_FONTS.iter().map(PathBuf::from).chain(bundled).collect()
}

/// ab_glyph 解析不了的文件（部分 .ttc）直接跳过
fn load_font(path: &Path) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).ok()?;
    ab_glyph::FontRef::try_from_slice(&bytes).ok()?;
    Some(bytes)
}

/// Put the first usable CJK font in front of egui's default families.
pub fn install_cjk_font(ctx: &egui::Context) {
    let Some((path, bytes)) = candidates()
        .into_iter()
        .find_map(|p| load_font(&p).map(|bytes| (p, bytes)))
    else {
        log::warn!("no CJK font found, Chinese text may not render");
        return;
    };
    log::info!("using UI font {}", path.display());

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            // 放在默认字体之后，拉丁字符仍用 egui 自带字体
            list.push("cjk".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_cjk() {
        assert!(needs_cjk("zh-Hans"));
        assert!(needs_cjk("ja"));
        assert!(!needs_cjk("en"));
        assert!(!needs_cjk("fr"));
    }

    #[test]
    fn test_rejects_non_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        assert!(load_font(&path).is_none());
        assert!(load_font(&dir.path().join("missing.ttf")).is_none());
    }
}
