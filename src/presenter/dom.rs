//! DOM side of the result modal

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{ConfettiPiece, ResultPresenter};

/// Mirrors `ResultPresenter` onto the modal and confetti elements
pub struct DomPresenter {
    document: Document,
    modal: Option<Element>,
    winner_name: Option<Element>,
    confetti_layer: Option<Element>,
    shown_burst: u32,
}

impl DomPresenter {
    pub fn new(document: &Document) -> Self {
        let modal = document.get_element_by_id("result-modal");
        if modal.is_none() {
            log::warn!("#result-modal not found - winners will only be logged");
        }
        Self {
            document: document.clone(),
            modal,
            winner_name: document.get_element_by_id("winner-name"),
            confetti_layer: document.get_element_by_id("confetti"),
            shown_burst: 0,
        }
    }

    /// Bring the DOM in line with the presenter state
    pub fn sync(&mut self, presenter: &ResultPresenter) {
        if let Some(modal) = &self.modal {
            let _ = if presenter.is_visible() {
                modal.class_list().remove_1("hidden")
            } else {
                modal.class_list().add_1("hidden")
            };
        }

        if let (Some(el), Some(name)) = (&self.winner_name, presenter.winner()) {
            el.set_text_content(Some(name));
        }

        if presenter.burst_id() != self.shown_burst {
            self.shown_burst = presenter.burst_id();
            self.spawn_confetti(presenter.confetti());
        }
    }

    /// Replace the previous burst's elements with a new set
    fn spawn_confetti(&self, pieces: &[ConfettiPiece]) {
        let Some(layer) = &self.confetti_layer else {
            return;
        };
        layer.set_inner_html("");

        for piece in pieces {
            let Some(el) = self
                .document
                .create_element("div")
                .ok()
                .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            el.set_class_name("confetti-piece");
            let style = el.style();
            let _ = style.set_property("left", &format!("{:.2}%", piece.left));
            let _ = style.set_property("background-color", piece.color);
            let _ = style.set_property("width", &format!("{:.1}px", piece.size));
            let _ = style.set_property("height", &format!("{:.1}px", piece.size));
            let _ = style.set_property("transform", &format!("rotate({:.0}deg)", piece.rotation));
            let _ = style.set_property("animation-duration", &format!("{:.2}s", piece.duration));
            let _ = style.set_property("animation-delay", &format!("{:.2}s", piece.delay));
            let _ = layer.append_child(&el);
        }
        log::debug!("Spawned {} confetti pieces", pieces.len());
    }
}
