// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Pointer handling for rendered entries. Handlers are rebuilt from the
//! bound content after every successful render and delegate the real work
//! (navigation, selection, context menus, tooltips) to host services.

use htmlview_app::host::{HostServices, Position, TooltipShowOptions};
use htmlview_app::{RowIdentity, Settings, TooltipItem, ViewModel};
use tracing::debug;

use crate::dom::{Element, Node};
use crate::renderer::{
    ENTRY_CLASS, HOVER_CLASS, MANUAL_TOOLTIP_CLASS, TOOLTIP_TITLE_PREFIX, TOOLTIP_VALUE_PREFIX,
    render_selection,
};

/// What the pointer is over. Indices refer to entries in bound order, and
/// within an entry to anchors or manual-tooltip elements in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Entry(usize),
    Anchor { entry: usize, anchor: usize },
    ManualTooltip { entry: usize, element: usize },
    Background,
    LandingHelp,
}

impl PointerTarget {
    fn entry(self) -> Option<usize> {
        match self {
            Self::Entry(entry)
            | Self::Anchor { entry, .. }
            | Self::ManualTooltip { entry, .. } => Some(entry),
            Self::Background | Self::LandingHelp => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Click,
    ContextMenu,
    PointerOver,
    PointerMove,
    PointerOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: PointerTarget,
    pub position: Position,
    pub ctrl_key: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, target: PointerTarget) -> Self {
        Self {
            kind,
            target,
            position: Position::default(),
            ctrl_key: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventOutcome {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn stop(&mut self) {
        self.default_prevented = true;
        self.propagation_stopped = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBinding {
    pub identity: RowIdentity,
    pub tooltips: Vec<TooltipItem>,
    /// `href` of each anchor, empty when the anchor has none.
    pub anchors: Vec<String>,
    pub manual_tooltips: Vec<Vec<TooltipItem>>,
}

/// Everything the handlers need from one render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings {
    pub entries: Vec<EntryBinding>,
    pub hyperlinks_allowed: bool,
    pub has_granularity: bool,
    pub has_cross_filtering: bool,
}

/// Mutable state an event may touch.
pub struct InteractionContext<'a> {
    pub host: &'a HostServices,
    pub view_model: &'a mut ViewModel,
    pub content: Option<&'a mut Element>,
    pub support_url: &'a str,
}

impl Bindings {
    /// Collect per-entry handler data from the bound content container. The
    /// container's entry elements line up with the view model's entries.
    pub fn build(content: &Element, view_model: &ViewModel, settings: &Settings) -> Self {
        let elements = content
            .child_elements()
            .filter(|element| element.has_class(ENTRY_CLASS));
        let entries = elements
            .zip(&view_model.entries)
            .map(|(element, entry)| EntryBinding {
                identity: entry.identity.clone(),
                tooltips: entry.tooltips.clone(),
                anchors: element
                    .descendants_with_tag("a")
                    .into_iter()
                    .map(|anchor| anchor.attr("href").unwrap_or_default().to_owned())
                    .collect(),
                manual_tooltips: element
                    .descendants_with_class(MANUAL_TOOLTIP_CLASS)
                    .into_iter()
                    .map(manual_tooltip_items)
                    .collect(),
            })
            .collect();

        Self {
            entries,
            hyperlinks_allowed: settings.content_formatting.hyperlinks,
            has_granularity: view_model.has_granularity,
            has_cross_filtering: view_model.has_cross_filtering,
        }
    }

    pub fn handle(&self, event: &PointerEvent, mut cx: InteractionContext<'_>) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        if let Some(index) = event.target.entry()
            && index >= self.entries.len()
        {
            debug!(index, entries = self.entries.len(), "pointer event on unbound entry");
            return outcome;
        }

        match event.kind {
            PointerEventKind::Click => self.click(event, &mut cx, &mut outcome),
            PointerEventKind::ContextMenu => self.context_menu(event, &cx, &mut outcome),
            PointerEventKind::PointerOver | PointerEventKind::PointerMove => {
                self.hover(event, &mut cx);
            }
            PointerEventKind::PointerOut => self.leave(event, &mut cx),
        }
        outcome
    }

    fn click(&self, event: &PointerEvent, cx: &mut InteractionContext<'_>, outcome: &mut EventOutcome) {
        if let PointerTarget::Anchor { entry, anchor } = event.target {
            outcome.prevent_default();
            if self.hyperlinks_allowed {
                let href = self.entries[entry]
                    .anchors
                    .get(anchor)
                    .map(String::as_str)
                    .unwrap_or_default();
                cx.host.urls.launch_url(href);
            }
        }

        match event.target {
            PointerTarget::LandingHelp => {
                cx.host.urls.launch_url(cx.support_url);
            }
            PointerTarget::Background => self.clear_selection(cx),
            target => {
                if let Some(entry) = target.entry()
                    && self.has_cross_filtering
                {
                    outcome.stop();
                    let identity = &self.entries[entry].identity;
                    let selection = cx.host.selection.select(identity, event.ctrl_key);
                    debug!(%identity, selected = selection.len(), "entry selection changed");
                    self.apply_selection(cx, &selection);
                }
            }
        }
    }

    fn clear_selection(&self, cx: &mut InteractionContext<'_>) {
        if !self.has_cross_filtering {
            return;
        }
        cx.host.selection.clear();
        self.apply_selection(cx, &[]);
    }

    fn apply_selection(&self, cx: &mut InteractionContext<'_>, selection: &[RowIdentity]) {
        cx.view_model.apply_selection(selection);
        if let Some(content) = cx.content.as_deref_mut() {
            render_selection(content, cx.view_model);
        }
    }

    fn context_menu(&self, event: &PointerEvent, cx: &InteractionContext<'_>, outcome: &mut EventOutcome) {
        outcome.stop();
        let identity = event
            .target
            .entry()
            .map(|entry| &self.entries[entry].identity);
        cx.host
            .selection
            .show_context_menu(identity, event.position);
    }

    fn hover(&self, event: &PointerEvent, cx: &mut InteractionContext<'_>) {
        let Some(index) = event.target.entry() else {
            return;
        };
        set_hover(cx.content.as_deref_mut(), index, true);

        let binding = &self.entries[index];
        let (data_items, identities) = if self.has_granularity || !binding.tooltips.is_empty() {
            (binding.tooltips.clone(), vec![binding.identity.clone()])
        } else {
            let manual = match event.target {
                PointerTarget::ManualTooltip { element, .. } => binding.manual_tooltips.get(element),
                _ => None,
            };
            match manual {
                Some(items) if !items.is_empty() => (items.clone(), Vec::new()),
                _ => return,
            }
        };

        cx.host.tooltips.show(&TooltipShowOptions {
            coordinates: event.position,
            is_touch_event: true,
            data_items,
            identities,
        });
    }

    fn leave(&self, event: &PointerEvent, cx: &mut InteractionContext<'_>) {
        let Some(index) = event.target.entry() else {
            return;
        };
        set_hover(cx.content.as_deref_mut(), index, false);
        cx.host.tooltips.hide(true);
    }
}

fn set_hover(content: Option<&mut Element>, index: usize, hovered: bool) {
    let Some(element) = content.and_then(|content| {
        content
            .children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .filter(|element| element.has_class(ENTRY_CLASS))
            .nth(index)
    }) else {
        return;
    };
    element.set_class(HOVER_CLASS, hovered);
}

/// Tooltip items authored on an element as `data-tooltip-title<key>` and
/// `data-tooltip-value<key>` pairs, ordered by attribute name.
pub fn manual_tooltip_items(element: &Element) -> Vec<TooltipItem> {
    let mut keys: Vec<&str> = Vec::new();
    for (name, _) in element.attributes() {
        let key = name
            .strip_prefix(TOOLTIP_TITLE_PREFIX)
            .or_else(|| name.strip_prefix(TOOLTIP_VALUE_PREFIX));
        if let Some(key) = key
            && !keys.contains(&key)
        {
            keys.push(key);
        }
    }

    keys.into_iter()
        .map(|key| {
            let title = element
                .attr(&format!("{TOOLTIP_TITLE_PREFIX}{key}"))
                .unwrap_or_default();
            let value = element
                .attr(&format!("{TOOLTIP_VALUE_PREFIX}{key}"))
                .unwrap_or_default();
            TooltipItem::new(title, value)
        })
        .collect()
}
