//! The page around the canvas.
//!
//! On the web this reads the media queries that gate the logo and flips CSS
//! classes on the container and the document. Natively there is no page: the
//! queries report a wide, motion-friendly display and class changes are logged.

/// Id of the element wrapping the canvas.
pub const CONTAINER_ID: &str = "canvas-container";
/// Id of the canvas the surface is created on.
pub const CANVAS_ID: &str = "canvas";

/// Added to the container once every asset finished loading.
pub const LOADED_CLASS: &str = "loaded";
/// Added to the container when no rendering context could be created.
pub const FALLBACK_CLASS: &str = "fallback";
/// Toggled on the document element by the light mode switch.
pub const LIGHT_CLASS: &str = "light";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub reduced_motion: bool,
    pub narrow_viewport: bool,
}

impl Environment {
    #[cfg(target_arch = "wasm32")]
    pub fn detect(min_page_width: f32) -> Self {
        Self {
            reduced_motion: media_matches("(prefers-reduced-motion: reduce)"),
            narrow_viewport: media_matches(&format!("(max-width: {}px)", min_page_width)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect(_min_page_width: f32) -> Self {
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn media_matches(query: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.match_media(query).ok().flatten())
        .map(|list| list.matches())
        .unwrap_or(false)
}

/// Add `class` to the canvas container.
#[cfg(target_arch = "wasm32")]
pub fn mark_container(class: &str) {
    let container = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONTAINER_ID));
    match container {
        Some(element) => {
            if let Err(e) = element.class_list().add_1(class) {
                log::warn!("Could not add class {}: {:?}", class, e);
            }
        }
        None => log::warn!("No #{} element to mark as {}", CONTAINER_ID, class),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mark_container(class: &str) {
    log::info!("Container is now {}", class);
}

/// Add or remove `class` on the document element.
#[cfg(target_arch = "wasm32")]
pub fn set_root_class(class: &str, present: bool) {
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element());
    match root.map(|element| element.class_list().toggle_with_force(class, present)) {
        Some(Ok(_)) => (),
        _ => log::warn!("Could not set class {} on the document", class),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_root_class(class: &str, present: bool) {
    log::info!("Document class {} {}", class, if present { "on" } else { "off" });
}
