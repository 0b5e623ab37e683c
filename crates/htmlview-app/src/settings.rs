// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Map, Value, json};
use tracing::warn;

/// Schema version of the settings record. Bumped whenever a property is
/// renamed or its meaning changes.
pub const SETTINGS_VERSION: u32 = 1;

pub mod defaults {
    pub const SHOW_RAW_HTML: bool = false;
    pub const HYPERLINKS: bool = false;
    pub const USER_SELECT: bool = false;
    pub const NO_DATA_MESSAGE: &str = "No data available to display";
    pub const FONT_FAMILY: &str = "\"Segoe UI\", wf_segoe-ui_normal, helvetica, arial, sans-serif";
    pub const FONT_SIZE: f64 = 11.0;
    pub const FONT_COLOUR: &str = "#000000";
    pub const STYLESHEET: &str = "";
    pub const CROSS_FILTER_ENABLED: bool = false;
    pub const USE_TRANSPARENCY: bool = true;
    pub const TRANSPARENCY_PERCENT: u8 = 70;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Property-pane groups persisted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsObject {
    ContentFormatting,
    Stylesheet,
    CrossFilter,
}

impl SettingsObject {
    pub const ALL: [Self; 3] = [Self::ContentFormatting, Self::Stylesheet, Self::CrossFilter];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentFormatting => "contentFormatting",
            Self::Stylesheet => "stylesheet",
            Self::CrossFilter => "crossFilter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "contentFormatting" => Some(Self::ContentFormatting),
            "stylesheet" => Some(Self::Stylesheet),
            "crossFilter" => Some(Self::CrossFilter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentFormatting {
    pub show_raw_html: bool,
    pub hyperlinks: bool,
    pub user_select: bool,
    pub no_data_message: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_colour: String,
    pub align: Align,
}

impl Default for ContentFormatting {
    fn default() -> Self {
        Self {
            show_raw_html: defaults::SHOW_RAW_HTML,
            hyperlinks: defaults::HYPERLINKS,
            user_select: defaults::USER_SELECT,
            no_data_message: defaults::NO_DATA_MESSAGE.to_owned(),
            font_family: defaults::FONT_FAMILY.to_owned(),
            font_size: defaults::FONT_SIZE,
            font_colour: defaults::FONT_COLOUR.to_owned(),
            align: Align::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetSettings {
    pub stylesheet: String,
}

impl Default for StylesheetSettings {
    fn default() -> Self {
        Self {
            stylesheet: defaults::STYLESHEET.to_owned(),
        }
    }
}

impl StylesheetSettings {
    /// The custom stylesheet, when one has been supplied.
    pub fn custom(&self) -> Option<&str> {
        if self.stylesheet.trim().is_empty() {
            None
        } else {
            Some(&self.stylesheet)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossFilterSettings {
    pub enabled: bool,
    pub use_transparency: bool,
    pub transparency_percent: u8,
}

impl Default for CrossFilterSettings {
    fn default() -> Self {
        Self {
            enabled: defaults::CROSS_FILTER_ENABLED,
            use_transparency: defaults::USE_TRANSPARENCY,
            transparency_percent: defaults::TRANSPARENCY_PERCENT,
        }
    }
}

impl CrossFilterSettings {
    /// Opacity for unselected entries, when dimming by transparency applies.
    pub fn unselected_opacity(&self) -> Option<f64> {
        (self.enabled && self.use_transparency)
            .then(|| f64::from(100 - self.transparency_percent.min(100)) / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub version: u32,
    pub content_formatting: ContentFormatting,
    pub stylesheet: StylesheetSettings,
    pub cross_filter: CrossFilterSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            content_formatting: ContentFormatting::default(),
            stylesheet: StylesheetSettings::default(),
            cross_filter: CrossFilterSettings::default(),
        }
    }
}

/// One property-pane object as handed back to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    pub object_name: String,
    pub properties: Map<String, Value>,
}

impl Settings {
    /// Parse host property values. Anything missing or unusable falls back to
    /// the default for that property.
    pub fn parse(objects: Option<&Value>) -> Self {
        let object = |which: SettingsObject| {
            objects
                .and_then(|value| value.get(which.as_str()))
                .and_then(Value::as_object)
        };
        let reader = |which: SettingsObject| PropertyReader::new(which, object(which));
        let content = reader(SettingsObject::ContentFormatting);
        let stylesheet = reader(SettingsObject::Stylesheet);
        let cross_filter = reader(SettingsObject::CrossFilter);

        let content_formatting = ContentFormatting {
            show_raw_html: content.bool("showRawHtml", defaults::SHOW_RAW_HTML),
            hyperlinks: content.bool("hyperlinks", defaults::HYPERLINKS),
            user_select: content.bool("userSelect", defaults::USER_SELECT),
            no_data_message: content.string("noDataMessage", defaults::NO_DATA_MESSAGE),
            font_family: content.string("fontFamily", defaults::FONT_FAMILY),
            font_size: content.font_size("fontSize", defaults::FONT_SIZE),
            font_colour: content.colour("fontColour", defaults::FONT_COLOUR),
            align: content.align("align"),
        };

        Self {
            version: SETTINGS_VERSION,
            content_formatting,
            stylesheet: StylesheetSettings {
                stylesheet: stylesheet.string("stylesheet", defaults::STYLESHEET),
            },
            cross_filter: CrossFilterSettings {
                enabled: cross_filter.bool("enabled", defaults::CROSS_FILTER_ENABLED),
                use_transparency: cross_filter.bool("useTransparency", defaults::USE_TRANSPARENCY),
                transparency_percent: cross_filter
                    .percent("transparencyPercent", defaults::TRANSPARENCY_PERCENT),
            },
        }
    }

    pub fn uses_stylesheet(&self) -> bool {
        self.stylesheet.custom().is_some()
    }

    /// Property instances for one object, hiding properties that have no
    /// effect under the current values.
    pub fn enumerate(&self, object_name: &str) -> Vec<ObjectInstance> {
        let Some(object) = SettingsObject::parse(object_name) else {
            return Vec::new();
        };

        let mut properties = Map::new();
        match object {
            SettingsObject::ContentFormatting => {
                let content = &self.content_formatting;
                properties.insert("showRawHtml".to_owned(), json!(content.show_raw_html));
                properties.insert("hyperlinks".to_owned(), json!(content.hyperlinks));
                properties.insert("userSelect".to_owned(), json!(content.user_select));
                properties.insert("noDataMessage".to_owned(), json!(content.no_data_message));
                if !content.show_raw_html {
                    properties.insert("fontFamily".to_owned(), json!(content.font_family));
                    properties.insert("fontSize".to_owned(), json!(content.font_size));
                    properties.insert(
                        "fontColour".to_owned(),
                        json!({ "solid": { "color": content.font_colour } }),
                    );
                    properties.insert("align".to_owned(), json!(content.align.as_str()));
                }
            }
            SettingsObject::Stylesheet => {
                properties.insert("stylesheet".to_owned(), json!(self.stylesheet.stylesheet));
            }
            SettingsObject::CrossFilter => {
                let cross_filter = &self.cross_filter;
                properties.insert("enabled".to_owned(), json!(cross_filter.enabled));
                if cross_filter.enabled {
                    properties.insert(
                        "useTransparency".to_owned(),
                        json!(cross_filter.use_transparency),
                    );
                    if cross_filter.use_transparency {
                        properties.insert(
                            "transparencyPercent".to_owned(),
                            json!(cross_filter.transparency_percent),
                        );
                    }
                }
            }
        }

        vec![ObjectInstance {
            object_name: object.as_str().to_owned(),
            properties,
        }]
    }
}

struct PropertyReader<'a> {
    object: SettingsObject,
    values: Option<&'a Map<String, Value>>,
}

impl<'a> PropertyReader<'a> {
    fn new(object: SettingsObject, values: Option<&'a Map<String, Value>>) -> Self {
        Self { object, values }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.values
            .and_then(|values| values.get(key))
            .filter(|value| !value.is_null())
    }

    fn rejected(&self, key: &str, value: &Value, expected: &str) {
        warn!(
            object = self.object.as_str(),
            property = key,
            %value,
            "ignoring property value; expected {expected}"
        );
    }

    fn bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(value)) => *value,
            Some(other) => {
                self.rejected(key, other, "a boolean");
                default
            }
        }
    }

    fn string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            None => default.to_owned(),
            Some(Value::String(value)) => value.clone(),
            Some(other) => {
                self.rejected(key, other, "a string");
                default.to_owned()
            }
        }
    }

    fn font_size(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            None => default,
            Some(value) => match value.as_f64() {
                Some(size) if size.is_finite() && size > 0.0 => size,
                _ => {
                    self.rejected(key, value, "a positive number");
                    default
                }
            },
        }
    }

    fn percent(&self, key: &str, default: u8) -> u8 {
        match self.get(key) {
            None => default,
            Some(value) => match value.as_f64() {
                Some(percent) if percent.is_finite() => percent.round().clamp(0.0, 100.0) as u8,
                _ => {
                    self.rejected(key, value, "a number between 0 and 100");
                    default
                }
            },
        }
    }

    fn colour(&self, key: &str, default: &str) -> String {
        let Some(value) = self.get(key) else {
            return default.to_owned();
        };
        let raw = value
            .as_str()
            .or_else(|| value.pointer("/solid/color").and_then(Value::as_str));
        match raw {
            Some(colour) if is_hex_colour(colour) => colour.to_owned(),
            _ => {
                self.rejected(key, value, "a hex colour");
                default.to_owned()
            }
        }
    }

    fn align(&self, key: &str) -> Align {
        match self.get(key) {
            None => Align::default(),
            Some(value) => match value.as_str().and_then(Align::parse) {
                Some(align) => align,
                None => {
                    self.rejected(key, value, "one of left, center, right");
                    Align::default()
                }
            },
        }
    }
}

fn is_hex_colour(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}
