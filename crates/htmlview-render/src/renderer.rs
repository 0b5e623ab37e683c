// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use htmlview_app::{Entry, Settings, ViewModel};
use std::collections::HashMap;

use crate::dom::{Element, Node};
use crate::reconcile::{ReconcileStats, reconcile};
use crate::sanitize::Sanitizer;

pub const VIEWER_ID: &str = "htmlViewer";
pub const STATUS_ID: &str = "statusMessage";
pub const CONTENT_ID: &str = "htmlContent";
pub const LANDING_ID: &str = "landingPage";
pub const STYLESHEET_ID: &str = "visualUserStylesheet";
pub const RAW_OUTPUT_ID: &str = "rawHtmlOutput";
pub const ENTRY_CLASS: &str = "htmlViewerEntry";
pub const UNSELECTED_CLASS: &str = "unselected";
pub const HOVER_CLASS: &str = "hover";
pub const MANUAL_TOOLTIP_CLASS: &str = "tooltipEnabled";
pub const TOOLTIP_TITLE_PREFIX: &str = "data-tooltip-title";
pub const TOOLTIP_VALUE_PREFIX: &str = "data-tooltip-value";

const USER_SELECT_PROPERTIES: [&str; 4] = [
    "user-select",
    "-moz-user-select",
    "-webkit-user-select",
    "-ms-user-select",
];

/// The empty container tree the visual renders into.
pub fn viewer() -> Element {
    Element::new("div")
        .with_id(VIEWER_ID)
        .with_child(Element::new("style").with_id(STYLESHEET_ID))
        .with_child(Element::new("div").with_id(STATUS_ID))
        .with_child(Element::new("div").with_id(CONTENT_ID))
        .with_child(Element::new("div").with_id(LANDING_ID))
}

/// Bind one `div.htmlViewerEntry` per entry, keyed by identity. Elements
/// whose identity is still present are kept; their content is rebuilt from
/// a freshly sanitized fragment.
pub fn bind(
    container: &mut Element,
    entries: &[Entry],
    has_selection: bool,
    sanitizer: &Sanitizer,
) -> ReconcileStats {
    let existing: Vec<Element> = std::mem::take(&mut container.children)
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(element) if element.has_class(ENTRY_CLASS) => Some(element),
            _ => None,
        })
        .collect();
    let keys: Vec<String> = entries
        .iter()
        .map(|entry| entry.identity.as_str().to_owned())
        .collect();

    let (mut elements, stats) = reconcile(
        existing,
        |element| element.key.clone().unwrap_or_default(),
        &keys,
        |key| Element::new("div").with_class(ENTRY_CLASS).with_key(key.clone()),
    );

    for (element, entry) in elements.iter_mut().zip(entries) {
        let mut body = Element::new("div");
        body.children = sanitizer.sanitize_and_parse(&entry.content);
        element.children = vec![body.into()];
        element.set_class(UNSELECTED_CLASS, has_selection && !entry.selected);
    }

    container.children = elements.into_iter().map(Into::into).collect();
    stats
}

/// Re-apply dimming to bound entries without touching their content.
pub fn render_selection(container: &mut Element, view_model: &ViewModel) {
    let entries: HashMap<&str, &Entry> = view_model
        .entries
        .iter()
        .map(|entry| (entry.identity.as_str(), entry))
        .collect();

    for element in container
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .filter(|element| element.has_class(ENTRY_CLASS))
    {
        let dim = element
            .key
            .as_deref()
            .and_then(|key| entries.get(key))
            .is_some_and(|entry| view_model.should_dim(entry));
        element.set_class(UNSELECTED_CLASS, dim);
    }
}

/// Opacity rule for unselected entries, when cross-filter dimming applies.
pub fn cross_filter_rule(settings: &Settings) -> Option<String> {
    settings
        .cross_filter
        .unselected_opacity()
        .map(|opacity| format!(".{ENTRY_CLASS}.{UNSELECTED_CLASS} {{ opacity: {opacity}; }}"))
}

/// Write the stylesheet element and the viewer's inline styles. Font and
/// alignment come from the content formatting settings only when there is no
/// custom stylesheet; otherwise they are removed.
pub fn resolve_styling(viewer: &mut Element, settings: &Settings) {
    let stylesheet_text = [
        cross_filter_rule(settings),
        settings.stylesheet.custom().map(str::to_owned),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    if let Some(stylesheet) = viewer.find_by_id_mut(STYLESHEET_ID) {
        if stylesheet_text.is_empty() {
            stylesheet.clear_children();
        } else {
            stylesheet.set_text(stylesheet_text);
        }
    }

    let content = &settings.content_formatting;
    let user_select = if content.user_select { "text" } else { "none" };
    for property in USER_SELECT_PROPERTIES {
        viewer.set_style(property, user_select);
    }

    if settings.uses_stylesheet() {
        for property in ["font-family", "font-size", "color", "text-align"] {
            viewer.remove_style(property);
        }
    } else {
        viewer.set_style("font-family", &content.font_family);
        viewer.set_style("font-size", &format!("{}pt", content.font_size));
        viewer.set_style("color", &content.font_colour);
        viewer.set_style("text-align", content.align.as_str());
    }
}

/// Set the status element's content, or clear it when `message` is `None`.
/// Messages may carry markup, so they go through the sanitizer.
pub fn update_status(viewer: &mut Element, message: Option<&str>, sanitizer: &Sanitizer) {
    let Some(status) = viewer.find_by_id_mut(STATUS_ID) else {
        return;
    };
    status.children = match message {
        Some(message) => sanitizer.sanitize_and_parse(message),
        None => Vec::new(),
    };
}

/// Empty data: clear the content and show the configured no-data message.
pub fn resolve_no_data(viewer: &mut Element, settings: &Settings, sanitizer: &Sanitizer) {
    if let Some(content) = viewer.find_by_id_mut(CONTENT_ID) {
        content.clear_children();
    }
    update_status(
        viewer,
        Some(&settings.content_formatting.no_data_message),
        sanitizer,
    );
    resolve_raw_html(viewer, STATUS_ID, settings);
}

/// In raw-HTML mode, replace the children of the element with id `target`
/// by a read-only textarea holding the markup that would have been shown,
/// preceded by the stylesheet when one is in use.
pub fn resolve_raw_html(viewer: &mut Element, target: &str, settings: &Settings) {
    if !settings.content_formatting.show_raw_html {
        return;
    }
    let stylesheet = settings
        .uses_stylesheet()
        .then(|| viewer.find_by_id(STYLESHEET_ID).map(Element::to_html))
        .flatten();
    let Some(container) = viewer.find_by_id_mut(target) else {
        return;
    };

    let output = match stylesheet {
        Some(stylesheet) => format!("{stylesheet}\n{}", container.to_html()),
        None => container.to_html(),
    };
    container.children = vec![
        Element::new("textarea")
            .with_id(RAW_OUTPUT_ID)
            .with_attr("readonly", "true")
            .with_text(output)
            .into(),
    ];
}
