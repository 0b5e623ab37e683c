// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use htmlview_app::host::{Localization, keys};

use crate::dom::Element;

pub const DISPLAY_NAME: &str = "HTML Content";
pub const HELP_BUTTON_ID: &str = "landingPageHelp";
const CLASS_PREFIX: &str = "html-display";

/// Informational page shown while the visual has no usable data view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LandingPage {
    enabled: bool,
    removed: bool,
}

impl LandingPage {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True once the page has been shown and then taken down.
    pub fn was_removed(&self) -> bool {
        self.removed
    }

    /// Show the page when the view model is invalid (rendering it only on the
    /// first such update) and clear it when it becomes valid.
    pub fn handle(
        &mut self,
        element: &mut Element,
        view_model_is_valid: bool,
        strings: &dyn Localization,
    ) {
        if view_model_is_valid {
            self.clear(element);
        } else if !self.enabled {
            self.enabled = true;
            element.children = vec![render(strings).into()];
        }
    }

    fn clear(&mut self, element: &mut Element) {
        element.clear_children();
        if self.enabled {
            self.removed = true;
        }
        self.enabled = false;
    }
}

fn render(strings: &dyn Localization) -> Element {
    let heading = Element::new("div")
        .with_class("w3-container")
        .with_class("w3-theme")
        .with_child(Element::new("h5").with_text(DISPLAY_NAME));

    let version = Element::new("div")
        .with_class("w3-container")
        .with_class("w3-theme-l3")
        .with_class("w3-small")
        .with_text(env!("CARGO_PKG_VERSION"));

    let mut help = Element::new("div")
        .with_class("w3-container")
        .with_class("w3-theme-l5")
        .with_class(&format!("{CLASS_PREFIX}-watermark"))
        .with_class(&format!("{CLASS_PREFIX}-help"))
        .with_child(
            Element::new("button")
                .with_id(HELP_BUTTON_ID)
                .with_class("w3-button")
                .with_class("w3-theme-action")
                .with_class("w3-circle")
                .with_style("position", "fixed")
                .with_style("top", "24px")
                .with_style("right", "12px")
                .with_text("?"),
        );
    for key in keys::LANDING_PAGE_OVERVIEW {
        help.append(
            Element::new("p")
                .with_class("w3-small")
                .with_text(strings.display_name(key)),
        );
    }

    Element::new("div")
        .with_class(&format!("{CLASS_PREFIX}-landing-page"))
        .with_class("w3-card-4")
        .with_child(heading)
        .with_child(version)
        .with_child(help)
}

#[cfg(test)]
mod tests {
    use super::{DISPLAY_NAME, HELP_BUTTON_ID, LandingPage};
    use crate::dom::Element;
    use htmlview_app::host::EnglishLocalization;

    #[test]
    fn shown_once_while_invalid_then_removed() {
        let mut page = LandingPage::default();
        let mut element = Element::new("div");

        page.handle(&mut element, false, &EnglishLocalization);
        assert!(page.is_enabled());
        assert!(!page.was_removed());
        assert!(element.text_content().contains(DISPLAY_NAME));
        assert!(element.find_by_id(HELP_BUTTON_ID).is_some());
        assert_eq!(element.descendants_with_tag("p").len(), 4);

        // a second invalid update leaves the rendered page alone
        element.children[0]
            .as_element_mut()
            .expect("landing page")
            .set_attr("data-marker", "first");
        page.handle(&mut element, false, &EnglishLocalization);
        assert_eq!(element.descendants().first().and_then(|e| e.attr("data-marker")), Some("first"));

        page.handle(&mut element, true, &EnglishLocalization);
        assert!(!page.is_enabled());
        assert!(page.was_removed());
        assert!(element.children.is_empty());
    }

    #[test]
    fn valid_from_the_start_never_counts_as_removed() {
        let mut page = LandingPage::default();
        let mut element = Element::new("div");
        page.handle(&mut element, true, &EnglishLocalization);
        assert!(!page.is_enabled());
        assert!(!page.was_removed());
    }
}
