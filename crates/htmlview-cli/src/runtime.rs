// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! A host for running the visual outside a report canvas. Every capability
//! reports through `tracing`; selection is tracked so toggling behaves the
//! way it would in a real host.

use anyhow::{Context, Result, bail};
use htmlview_app::host::{
    EnglishLocalization, HostServices, Position, RenderEvents, SelectionService,
    TableIdentityFactory, TooltipService, TooltipShowOptions, UrlLauncher,
};
use htmlview_app::{RenderPhase, RowIdentity, UpdateOptions, ViewModel};
use htmlview_render::{Visual, VisualOptions};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

struct ConsoleUrlLauncher;

impl UrlLauncher for ConsoleUrlLauncher {
    fn launch_url(&self, url: &str) {
        info!(url, "launch url");
    }
}

struct ConsoleTooltips;

impl TooltipService for ConsoleTooltips {
    fn show(&self, options: &TooltipShowOptions) {
        let items: Vec<String> = options
            .data_items
            .iter()
            .map(|item| format!("{}: {}", item.label, item.value))
            .collect();
        info!(
            x = options.coordinates.x,
            y = options.coordinates.y,
            items = ?items,
            "show tooltip"
        );
    }

    fn hide(&self, immediately: bool) {
        debug!(immediately, "hide tooltip");
    }
}

#[derive(Default)]
struct ConsoleSelection {
    selected: RefCell<Vec<RowIdentity>>,
}

impl SelectionService for ConsoleSelection {
    fn select(&self, identity: &RowIdentity, multi_select: bool) -> Vec<RowIdentity> {
        let mut selected = self.selected.borrow_mut();
        let present = selected.iter().position(|existing| existing == identity);
        match (multi_select, present) {
            (true, Some(index)) => {
                selected.remove(index);
            }
            (true, None) => selected.push(identity.clone()),
            (false, Some(_)) if selected.len() == 1 => selected.clear(),
            (false, _) => *selected = vec![identity.clone()],
        }
        info!(%identity, multi_select, selected = selected.len(), "select");
        selected.clone()
    }

    fn clear(&self) {
        self.selected.borrow_mut().clear();
        info!("clear selection");
    }

    fn show_context_menu(&self, identity: Option<&RowIdentity>, position: Position) {
        info!(
            identity = identity.map(RowIdentity::as_str),
            x = position.x,
            y = position.y,
            "context menu"
        );
    }
}

struct ConsoleRenderEvents;

impl RenderEvents for ConsoleRenderEvents {
    fn rendering_started(&self) {
        debug!("rendering started");
    }

    fn rendering_finished(&self) {
        debug!("rendering finished");
    }

    fn rendering_failed(&self, reason: &str) {
        warn!(reason, "rendering failed");
    }
}

pub fn console_host(locale: &str) -> HostServices {
    HostServices {
        locale: locale.to_owned(),
        urls: Box::new(ConsoleUrlLauncher),
        tooltips: Box::new(ConsoleTooltips),
        selection: Box::new(ConsoleSelection::default()),
        localization: Box::new(EnglishLocalization),
        events: Box::new(ConsoleRenderEvents),
        identities: Box::new(TableIdentityFactory),
    }
}

/// Read an update payload: the host's `UpdateOptions` as JSON.
pub fn load_update(path: &Path) -> Result<UpdateOptions> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read data file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| {
        format!(
            "parse data file {}; expected an object with `dataViews` and `type`",
            path.display()
        )
    })
}

/// Fail unless the payload would map to a usable view model.
pub fn check_update(update: &UpdateOptions) -> Result<()> {
    let mut view_model = ViewModel::new();
    view_model.validate(&update.data_views);
    if !view_model.is_valid {
        bail!(
            "data view is not renderable: it needs a table and a column with the `content` role"
        );
    }
    Ok(())
}

/// Run one update through a fresh visual and return the viewer markup. The
/// markup is returned even when rendering failed, alongside the reason.
pub fn render_once(
    update: &UpdateOptions,
    options: VisualOptions,
    locale: &str,
) -> (String, Option<String>) {
    let mut visual = Visual::new(console_host(locale), options);
    visual.update(update);
    let failure = match visual.phase() {
        RenderPhase::Error => Some(
            visual
                .render_state()
                .last_error
                .clone()
                .unwrap_or_default(),
        ),
        _ => None,
    };
    (visual.to_html(), failure)
}

#[cfg(test)]
mod tests {
    use super::{ConsoleSelection, check_update, load_update, render_once};
    use anyhow::Result;
    use htmlview_app::host::SelectionService;
    use htmlview_app::{RowIdentity, UpdateKind};
    use htmlview_render::VisualOptions;

    #[test]
    fn selection_toggles_like_a_host() {
        let selection = ConsoleSelection::default();
        let a = RowIdentity::from("a");
        let b = RowIdentity::from("b");

        assert_eq!(selection.select(&a, false), vec![a.clone()]);
        assert_eq!(selection.select(&b, true), vec![a.clone(), b.clone()]);
        assert_eq!(selection.select(&a, true), vec![b.clone()]);
        assert!(selection.select(&b, false).is_empty());
    }

    #[test]
    fn load_update_reads_host_json() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("update.json");
        std::fs::write(
            &path,
            r#"{
                "type": "data",
                "dataViews": [{
                    "metadata": { "columns": [{ "displayName": "HTML", "roles": { "content": true } }] },
                    "table": { "rows": [["<p>hi</p>"], [null]] }
                }]
            }"#,
        )?;

        let update = load_update(&path)?;
        assert_eq!(update.kind, UpdateKind::Data);
        check_update(&update)?;
        let (html, failure) = render_once(&update, VisualOptions::default(), "en-US");
        assert_eq!(failure, None);
        assert!(html.contains("<p>hi</p>"));
        Ok(())
    }

    #[test]
    fn load_update_reports_bad_json() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("update.json");
        std::fs::write(&path, "{ not json")?;

        let error = load_update(&path).expect_err("bad json should fail");
        assert!(error.to_string().contains("parse data file"));
        Ok(())
    }

    #[test]
    fn unrenderable_update_fails_check_and_render() -> Result<()> {
        let update: htmlview_app::UpdateOptions =
            serde_json::from_str(r#"{ "type": "data", "dataViews": [] }"#)?;

        let error = check_update(&update).expect_err("empty update should fail check");
        assert!(error.to_string().contains("not renderable"));

        let (html, failure) = render_once(&update, VisualOptions::default(), "en-US");
        assert!(failure.is_some());
        assert!(html.contains("HTML Content"));
        Ok(())
    }
}
