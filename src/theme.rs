use leptos::prelude::*;

pub const THEME_PREFERENCE: &str = "theme";
pub const THEMES: &[(&str, &str)] = &[("system", "System"), ("light", "Light"), ("dark", "Dark")];

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: ReadSignal<String>,
    pub set_theme: WriteSignal<String>,
}

/// Set `data-theme` on `<html>` for "light" and "dark"; remove it otherwise
/// so the stylesheet's `prefers-color-scheme` rules apply.
pub fn apply_theme(theme: &str) {
    let Some(html) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };

    let _ = match theme {
        "light" | "dark" => html.set_attribute("data-theme", theme),
        _ => html.remove_attribute("data-theme"),
    };
}
