// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Capabilities the host application hands to the visual at construction.
//! Each one is a narrow trait so tests can swap in a recording double.

use anyhow::{Result, bail};

use crate::model::{Column, DataViewTable, Role};
use crate::{RowIdentity, TooltipItem};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipShowOptions {
    pub coordinates: Position,
    pub is_touch_event: bool,
    pub data_items: Vec<TooltipItem>,
    pub identities: Vec<RowIdentity>,
}

pub trait UrlLauncher {
    fn launch_url(&self, url: &str);
}

pub trait TooltipService {
    fn show(&self, options: &TooltipShowOptions);
    fn hide(&self, immediately: bool);
}

/// Selection bookkeeping lives in the host. `select` toggles the identity
/// (adding to the current selection when `multi_select` is set) and returns
/// the selection as it stands afterwards.
pub trait SelectionService {
    fn select(&self, identity: &RowIdentity, multi_select: bool) -> Vec<RowIdentity>;
    fn clear(&self);
    fn show_context_menu(&self, identity: Option<&RowIdentity>, position: Position);
}

pub trait Localization {
    fn display_name(&self, key: &str) -> String;
}

pub trait RenderEvents {
    fn rendering_started(&self);
    fn rendering_finished(&self);
    fn rendering_failed(&self, reason: &str);
}

/// Builds the stable identity for one table row.
pub trait IdentityFactory {
    fn create_identity(
        &self,
        table: &DataViewTable,
        columns: &[Column],
        row_index: usize,
    ) -> Result<RowIdentity>;
}

pub mod keys {
    pub const STATUS_MAPPING_DATA_VIEW: &str = "Status_Mapping_DataView";
    pub const STATUS_NO_DATA: &str = "Status_No_Data";
    pub const STATUS_INVALID_VIEW_MODEL: &str = "Status_Invalid_View_Model";
    pub const LANDING_PAGE_OVERVIEW: [&str; 4] = [
        "Landing_Page_Overview_1",
        "Landing_Page_Overview_2",
        "Landing_Page_Overview_3",
        "Landing_Page_Overview_4",
    ];
}

/// Built-in English strings, used when the host has no localization of its
/// own. Unknown keys come back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLocalization;

impl Localization for EnglishLocalization {
    fn display_name(&self, key: &str) -> String {
        let text = match key {
            keys::STATUS_MAPPING_DATA_VIEW => "Mapping data view...",
            keys::STATUS_NO_DATA => "No data available to display",
            keys::STATUS_INVALID_VIEW_MODEL => {
                "Unable to display content: the data view could not be mapped. Check that a field is assigned to Values."
            }
            "Landing_Page_Overview_1" => {
                "This visual renders HTML supplied by your data model, one entry per row."
            }
            "Landing_Page_Overview_2" => {
                "Add a measure or column containing HTML to the Values field to get started."
            }
            "Landing_Page_Overview_3" => {
                "Add a field to Granularity to show one entry per value and enable cross-filtering."
            }
            "Landing_Page_Overview_4" => {
                "Use the Format pane to adjust fonts, hyperlink handling and a custom stylesheet."
            }
            other => other,
        };
        text.to_owned()
    }
}

/// Default identity scheme: host-supplied row keys when present, otherwise
/// the row's granularity values, otherwise its position.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableIdentityFactory;

impl IdentityFactory for TableIdentityFactory {
    fn create_identity(
        &self,
        table: &DataViewTable,
        columns: &[Column],
        row_index: usize,
    ) -> Result<RowIdentity> {
        if row_index >= table.rows.len() {
            bail!(
                "row {row_index} is out of range for a table of {} rows",
                table.rows.len()
            );
        }

        if let Some(identities) = &table.identity {
            let Some(key) = identities.get(row_index) else {
                bail!(
                    "row {row_index} has no host identity; table supplies {} identities for {} rows",
                    identities.len(),
                    table.rows.len()
                );
            };
            return Ok(RowIdentity::new(key.clone()));
        }

        let row = &table.rows[row_index];
        let sampling: Vec<String> = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.has_role(Role::Sampling))
            .map(|(index, _)| {
                row.get(index)
                    .map(|cell| cell.to_content_string())
                    .unwrap_or_default()
            })
            .collect();

        if sampling.is_empty() {
            Ok(RowIdentity::new(format!("row:{row_index}")))
        } else {
            Ok(RowIdentity::new(format!("sampling:{}", sampling.join("\u{1f}"))))
        }
    }
}

/// Everything the host provides, bundled for injection.
pub struct HostServices {
    pub locale: String,
    pub urls: Box<dyn UrlLauncher>,
    pub tooltips: Box<dyn TooltipService>,
    pub selection: Box<dyn SelectionService>,
    pub localization: Box<dyn Localization>,
    pub events: Box<dyn RenderEvents>,
    pub identities: Box<dyn IdentityFactory>,
}

impl HostServices {
    pub fn text(&self, key: &str) -> String {
        self.localization.display_name(key)
    }
}
