//! Browser overlay
//!
//! Applies a [`Hud`] to the page's overlay elements. Every element is looked
//! up by id and may be missing; a missing element is skipped with a single
//! warning.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::ui::Hud;

const TITLE_SCREEN: &str = "title-screen";
const LEVEL_TITLE: &str = "level-title";
const GAME_OVER: &str = "game-over-overlay";
const GAME_CLEARED: &str = "game-cleared-overlay";
const COOLDOWN_BAR: &str = "cooldown-bar";
const COOLDOWN_TEXT: &str = "cooldown-text";

/// Fade used when an overlay appears
const FADE: &str = "opacity 0.3s ease-in-out";

pub struct DomOverlay {
    document: Document,
    last: Option<Hud>,
    warned: Vec<&'static str>,
}

impl DomOverlay {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            last: None,
            warned: Vec::new(),
        }
    }

    fn element(&mut self, id: &'static str) -> Option<HtmlElement> {
        let el = self
            .document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if el.is_none() && !self.warned.contains(&id) {
            log::warn!("Overlay element #{id} not found");
            self.warned.push(id);
        }
        el
    }

    fn set_visible(&mut self, id: &'static str, visible: bool) {
        if let Some(el) = self.element(id) {
            let style = el.style();
            let _ = style.set_property("transition", FADE);
            let _ = style.set_property("opacity", if visible { "1" } else { "0" });
        }
    }

    /// Write the parts of `hud` that changed since the last call
    pub fn apply(&mut self, hud: &Hud) {
        let last = self.last.take();
        let changed = |f: fn(&Hud) -> bool| last.as_ref().is_none_or(|l| f(l) != f(hud));

        if changed(|h| h.title_screen) {
            self.set_visible(TITLE_SCREEN, hud.title_screen);
        }
        if changed(|h| h.game_over_overlay) {
            self.set_visible(GAME_OVER, hud.game_over_overlay);
        }
        if changed(|h| h.cleared_overlay) {
            self.set_visible(GAME_CLEARED, hud.cleared_overlay);
        }

        if last.as_ref().is_none_or(|l| l.banner != hud.banner) {
            if let Some(el) = self.element(LEVEL_TITLE) {
                el.set_inner_text(hud.banner.unwrap_or_default());
                let _ = el
                    .style()
                    .set_property("opacity", if hud.banner.is_some() { "1" } else { "0" });
            }
        }

        if last.as_ref().is_none_or(|l| l.cooldown != hud.cooldown) {
            if let Some(bar) = self.element(COOLDOWN_BAR) {
                let style = bar.style();
                let _ = style.set_property("width", &hud.cooldown.width_percent());
                let _ = style.set_property("background-color", hud.cooldown.color.css());
            }
            if let Some(text) = self.element(COOLDOWN_TEXT) {
                text.set_text_content(Some(&hud.cooldown.label));
            }
        }

        self.last = Some(hud.clone());
    }
}
