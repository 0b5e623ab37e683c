// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::format::ValueFormatter;
use crate::host::IdentityFactory;
use crate::model::{Column, DataView, Role};
use crate::{RowIdentity, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipItem {
    pub label: String,
    pub value: String,
}

impl TooltipItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One render unit, corresponding to one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub content: String,
    pub identity: RowIdentity,
    pub selected: bool,
    pub tooltips: Vec<TooltipItem>,
}

/// Render-ready state for the visual. Created once and mutated in place on
/// every update so selection carries across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub is_valid: bool,
    pub is_empty: bool,
    pub content_index: Option<usize>,
    pub has_granularity: bool,
    pub has_cross_filtering: bool,
    pub has_selection: bool,
    pub entries: Vec<Entry>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            is_valid: false,
            is_empty: true,
            content_index: None,
            has_granularity: false,
            has_cross_filtering: false,
            has_selection: false,
            entries: Vec::new(),
        }
    }
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resolve the content column and the validity flag. Touches nothing else.
    pub fn validate(&mut self, data_views: &[DataView]) {
        let metadata_columns = data_views.first().and_then(|view| {
            view.table.as_ref()?;
            view.metadata.as_ref()?.columns.as_deref()
        });

        self.content_index = metadata_columns.and_then(content_column_index);
        self.is_valid = self.content_index.is_some();
    }

    /// Map the rows of the first data view into entries. A no-op unless the
    /// model is valid. On error the previous entries are left untouched.
    pub fn map(
        &mut self,
        data_views: &[DataView],
        settings: &Settings,
        identities: &dyn IdentityFactory,
        locale: &str,
    ) -> Result<()> {
        let Some(content_index) = self.content_index.filter(|_| self.is_valid) else {
            return Ok(());
        };
        let Some(view) = data_views.first() else {
            bail!("cannot map an empty data view list");
        };
        let Some(table) = view.table.as_ref() else {
            bail!("data view has no table to map");
        };

        let columns = view.role_columns();
        let has_granularity = columns.iter().any(|column| column.has_role(Role::Sampling));
        let has_cross_filtering = has_granularity && settings.cross_filter.enabled;
        let tooltip_columns = tooltip_columns(columns, locale);

        let previous: HashMap<&RowIdentity, bool> = self
            .entries
            .iter()
            .map(|entry| (&entry.identity, entry.selected))
            .collect();

        let mut entries = Vec::with_capacity(table.rows.len());
        for (row_index, row) in table.rows.iter().enumerate() {
            let identity = identities.create_identity(table, columns, row_index)?;
            let selected = previous.get(&identity).copied().unwrap_or(false);
            let content = row
                .get(content_index)
                .map(|cell| cell.to_content_string())
                .unwrap_or_default();
            let tooltips = tooltip_columns
                .iter()
                .map(|(index, label, formatter)| {
                    let value = row
                        .get(*index)
                        .map(|cell| formatter.format(cell))
                        .unwrap_or_default();
                    TooltipItem::new(label.clone(), value)
                })
                .collect();

            entries.push(Entry {
                content,
                identity,
                selected,
                tooltips,
            });
        }

        self.has_granularity = has_granularity;
        self.has_cross_filtering = has_cross_filtering;
        self.has_selection = has_cross_filtering && entries.iter().any(|entry| entry.selected);
        self.is_empty = entries.is_empty();
        self.entries = entries;

        debug!(
            entries = self.entries.len(),
            has_granularity = self.has_granularity,
            has_cross_filtering = self.has_cross_filtering,
            has_selection = self.has_selection,
            "mapped data view"
        );
        Ok(())
    }

    /// Mirror the host's current selection onto the entries.
    pub fn apply_selection(&mut self, selected: &[RowIdentity]) {
        let selected: HashSet<&RowIdentity> = selected.iter().collect();
        for entry in &mut self.entries {
            entry.selected = selected.contains(&entry.identity);
        }
        self.has_selection =
            self.has_cross_filtering && self.entries.iter().any(|entry| entry.selected);
    }

    /// Drop all entries and selection state, keeping the validation fields.
    pub fn clear_entries(&mut self) {
        self.entries.clear();
        self.is_empty = true;
        self.has_granularity = false;
        self.has_cross_filtering = false;
        self.has_selection = false;
    }

    pub fn should_dim(&self, entry: &Entry) -> bool {
        self.has_selection && !entry.selected
    }
}

fn content_column_index(columns: &[Column]) -> Option<usize> {
    columns
        .iter()
        .position(|column| column.has_role(Role::Content))
}

/// Sampling columns first, then tooltip columns; a column is listed once.
fn tooltip_columns(columns: &[Column], locale: &str) -> Vec<(usize, String, ValueFormatter)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for role in [Role::Sampling, Role::Tooltips] {
        for (index, column) in columns.iter().enumerate() {
            if column.has_role(role) && seen.insert(index) {
                out.push((
                    index,
                    column.display_name.clone(),
                    ValueFormatter::for_column(column, locale),
                ));
            }
        }
    }
    out
}
