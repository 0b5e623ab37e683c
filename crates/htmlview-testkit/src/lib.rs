// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod host;

use htmlview_app::{
    CellValue, Column, DataView, DataViewMetadata, DataViewTable, Role, UpdateKind, UpdateOptions,
};
use serde_json::{Value, json};

pub use host::{HostCall, HostRecorder, recording_host};

const REGIONS: [&str; 8] = [
    "North", "South", "East", "West", "Central", "Coastal", "Highland", "Valley",
];

const PRODUCTS: [&str; 10] = [
    "Anvil", "Bracket", "Cog", "Dowel", "Flange", "Gasket", "Hinge", "Lever", "Rivet", "Sprocket",
];

const WRAPPERS: [(&str, &str); 6] = [
    ("<p>", "</p>"),
    ("<div class=\"card\">", "</div>"),
    ("<h3>", "</h3>"),
    ("<span style=\"color: #336699\">", "</span>"),
    ("<blockquote>", "</blockquote>"),
    ("<p><b>", "</b></p>"),
];

/// Builds a single data view the way the host shapes one: metadata columns,
/// a table with rows, and optional persisted property objects.
#[derive(Debug, Clone)]
pub struct DataViewBuilder {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
    identity: Option<Vec<String>>,
    objects: Option<Value>,
    table_columns: bool,
    with_table: bool,
    with_metadata: bool,
}

impl Default for DataViewBuilder {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            identity: None,
            objects: None,
            table_columns: false,
            with_table: true,
            with_metadata: true,
        }
    }
}

impl DataViewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn content_column(self, name: &str) -> Self {
        self.column(Column::new(name).with_role(Role::Content))
    }

    pub fn sampling_column(self, name: &str) -> Self {
        self.column(Column::new(name).with_role(Role::Sampling))
    }

    pub fn tooltip_column(self, name: &str, format: Option<&str>) -> Self {
        let column = Column::new(name).with_role(Role::Tooltips);
        self.column(match format {
            Some(format) => column.with_format(format),
            None => column,
        })
    }

    pub fn row(mut self, cells: Vec<CellValue>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Vec<CellValue>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Host-supplied identity keys, one per row.
    pub fn identities<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identity = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn objects(mut self, objects: Value) -> Self {
        self.objects = Some(objects);
        self
    }

    /// Also list the columns on the table, not only in the metadata.
    pub fn with_table_columns(mut self) -> Self {
        self.table_columns = true;
        self
    }

    pub fn without_table(mut self) -> Self {
        self.with_table = false;
        self
    }

    pub fn without_metadata(mut self) -> Self {
        self.with_metadata = false;
        self
    }

    pub fn build(self) -> DataView {
        let table = self.with_table.then(|| DataViewTable {
            columns: if self.table_columns {
                self.columns.clone()
            } else {
                Vec::new()
            },
            rows: self.rows,
            identity: self.identity,
        });
        let metadata = self.with_metadata.then(|| DataViewMetadata {
            columns: Some(self.columns),
            objects: self.objects,
        });
        DataView { metadata, table }
    }

    /// Wrap the data view in a data-change update.
    pub fn update(self) -> UpdateOptions {
        UpdateOptions::data(vec![self.build()])
    }
}

pub fn update(kind: UpdateKind, data_views: Vec<DataView>) -> UpdateOptions {
    UpdateOptions { data_views, kind }
}

/// Property objects for a content-formatting override, in host JSON shape.
pub fn content_formatting(properties: Value) -> Value {
    json!({ "contentFormatting": properties })
}

pub mod fixtures {
    use super::DataViewBuilder;
    use htmlview_app::{CellValue, DataView};

    pub const SIMPLE_VALUES: [&str; 3] = [
        "<p>This is value <b>one</b></p>",
        "<p>This is value <b>two</b></p>",
        "<p>This is value <b>three</b></p>",
    ];

    pub fn empty() -> Vec<DataView> {
        Vec::new()
    }

    /// Content column present, no rows.
    pub fn no_values() -> Vec<DataView> {
        vec![DataViewBuilder::new().content_column("HTML").build()]
    }

    /// Only a granularity column; nothing to render.
    pub fn no_values_sampling_only() -> Vec<DataView> {
        vec![DataViewBuilder::new().sampling_column("HTML").build()]
    }

    pub fn simple_values() -> Vec<DataView> {
        vec![
            DataViewBuilder::new()
                .content_column("HTML")
                .rows(SIMPLE_VALUES.map(|html| vec![CellValue::from(html)]))
                .build(),
        ]
    }

    pub fn simple_values_with_sampling() -> Vec<DataView> {
        vec![
            DataViewBuilder::new()
                .sampling_column("HTML")
                .content_column("HTML")
                .rows(
                    SIMPLE_VALUES
                        .iter()
                        .zip(["1", "2", "3"])
                        .map(|(html, key)| vec![CellValue::from(key), CellValue::from(*html)]),
                )
                .build(),
        ]
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for realistic keyed HTML rows.
#[derive(Debug, Clone)]
pub struct ContentFaker {
    rng: DeterministicRng,
}

impl ContentFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }

    pub fn html(&mut self) -> String {
        let (open, close) = WRAPPERS[self.rng.int_n(WRAPPERS.len())];
        let product = self.pick(&PRODUCTS);
        let units = self.rng.int_n(900) + 100;
        format!("{open}{product}: {units} units{close}")
    }

    /// A data view of `rows` distinct regions with HTML content and a
    /// formatted tooltip column.
    pub fn keyed_data_view(&mut self, rows: usize) -> DataView {
        let mut builder = DataViewBuilder::new()
            .sampling_column("Region")
            .content_column("HTML")
            .tooltip_column("Sales", Some("#,0.00"));
        for index in 0..rows {
            let region = match REGIONS.get(index) {
                Some(region) => (*region).to_owned(),
                None => format!("Region {index}"),
            };
            let sales = self.rng.int_n(1_000_000) as f64 / 100.0;
            builder = builder.row(vec![region.into(), self.html().into(), sales.into()]);
        }
        builder.build()
    }
}
