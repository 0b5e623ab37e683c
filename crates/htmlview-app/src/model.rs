// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic tag the host places on a column to say how its values are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Content,
    Tooltips,
    Sampling,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Content, Self::Tooltips, Self::Sampling];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Tooltips => "tooltips",
            Self::Sampling => "sampling",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "content" => Some(Self::Content),
            "tooltips" => Some(Self::Tooltips),
            "sampling" => Some(Self::Sampling),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Text,
    Integer,
    Number,
    Boolean,
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub roles: BTreeMap<String, bool>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, rename = "type")]
    pub value_type: Option<ValueType>,
}

impl Column {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role.as_str().to_owned(), true);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.get(role.as_str()).copied().unwrap_or(false)
    }
}

/// One raw cell as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// String form used for entry content. Null becomes the empty string.
    pub fn to_content_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataViewTable {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
    /// Host-supplied identity keys, one per row, when the host provides them.
    #[serde(default)]
    pub identity: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataViewMetadata {
    #[serde(default)]
    pub columns: Option<Vec<Column>>,
    /// Persisted property values, keyed by object name then property name.
    #[serde(default)]
    pub objects: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataView {
    #[serde(default)]
    pub metadata: Option<DataViewMetadata>,
    #[serde(default)]
    pub table: Option<DataViewTable>,
}

impl DataView {
    /// Columns to inspect for sampling/tooltip roles: the table's own list,
    /// or the metadata list when the table carries none.
    pub fn role_columns(&self) -> &[Column] {
        if let Some(table) = &self.table
            && !table.columns.is_empty()
        {
            return &table.columns;
        }
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.columns.as_deref())
            .unwrap_or(&[])
    }

    pub fn objects(&self) -> Option<&serde_json::Value> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.objects.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateKind {
    Data,
    Resize,
    ViewMode,
    Style,
    #[default]
    All,
}

impl UpdateKind {
    pub const fn is_data_change(self) -> bool {
        matches!(self, Self::Data | Self::All)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    #[serde(default)]
    pub data_views: Vec<DataView>,
    #[serde(default, rename = "type")]
    pub kind: UpdateKind,
}

impl UpdateOptions {
    pub fn data(data_views: Vec<DataView>) -> Self {
        Self {
            data_views,
            kind: UpdateKind::Data,
        }
    }

    pub fn first_data_view(&self) -> Option<&DataView> {
        self.data_views.first()
    }
}
