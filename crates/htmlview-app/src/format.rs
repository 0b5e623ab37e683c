// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Display formatting for cell values, driven by a column's format string
//! and the host locale.

use crate::model::{CellValue, Column, ValueType};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Decimal and grouping separators for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal: char,
    pub group: char,
}

impl NumberSymbols {
    pub fn for_locale(locale: &str) -> Self {
        let mut parts = locale.split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts.next().unwrap_or_default().to_ascii_uppercase();

        match (language.as_str(), region.as_str()) {
            ("de" | "it" | "fr", "CH") | ("de", "LI") => Self {
                decimal: '.',
                group: '\'',
            },
            (
                "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el" | "ro" | "hr" | "sl"
                | "sr" | "vi",
                _,
            ) => Self {
                decimal: ',',
                group: '.',
            },
            (
                "fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "uk" | "hu" | "bg"
                | "lt" | "lv" | "et",
                _,
            ) => Self {
                decimal: ',',
                group: '\u{a0}',
            },
            _ => Self {
                decimal: '.',
                group: ',',
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NumberPattern {
    prefix: String,
    suffix: String,
    min_decimals: usize,
    max_decimals: usize,
    grouping: bool,
    percent: bool,
}

impl NumberPattern {
    fn parse(format: &str) -> Option<Self> {
        let section = format.split(';').next().unwrap_or_default();
        let is_digit = |c: char| c == '0' || c == '#';
        let start = section.find(is_digit)?;
        let end = section.rfind(is_digit)?;
        let body = &section[start..=end];
        let prefix = strip_literal_marks(&section[..start]);
        let suffix = strip_literal_marks(&section[end + 1..]);

        let (min_decimals, max_decimals) = match body.split_once('.') {
            Some((_, fraction)) => {
                let zeros = fraction.chars().filter(|c| *c == '0').count();
                let hashes = fraction.chars().filter(|c| *c == '#').count();
                (zeros, zeros + hashes)
            }
            None => (0, 0),
        };

        Some(Self {
            percent: prefix.contains('%') || suffix.contains('%'),
            grouping: body.contains(','),
            prefix,
            suffix,
            min_decimals,
            max_decimals,
        })
    }

    fn apply(&self, value: f64, symbols: NumberSymbols) -> String {
        let scaled = if self.percent { value * 100.0 } else { value };
        let rendered = format!("{:.*}", self.max_decimals, scaled.abs());
        let (integer, fraction) = rendered.split_once('.').unwrap_or((&rendered, ""));

        let mut fraction = fraction.to_owned();
        while fraction.len() > self.min_decimals && fraction.ends_with('0') {
            fraction.pop();
        }

        let integer = if self.grouping {
            group_digits(integer, symbols.group)
        } else {
            integer.to_owned()
        };
        let is_zero = integer.chars().all(|c| !c.is_ascii_digit() || c == '0')
            && fraction.chars().all(|c| c == '0');

        let mut out = String::new();
        if scaled < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&self.prefix);
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push(symbols.decimal);
            out.push_str(&fraction);
        }
        out.push_str(&self.suffix);
        out
    }
}

fn strip_literal_marks(raw: &str) -> String {
    raw.chars().filter(|c| *c != '"' && *c != '\\').collect()
}

fn group_digits(digits: &str, separator: char) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + count / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (count - index) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

/// Formatter for one column, the way the host's value formatter is created
/// from a culture selector and a format string.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormatter {
    format: Option<String>,
    value_type: Option<ValueType>,
    symbols: NumberSymbols,
}

impl ValueFormatter {
    pub fn new(format: Option<&str>, value_type: Option<ValueType>, locale: &str) -> Self {
        Self {
            format: format
                .map(str::trim)
                .filter(|format| !format.is_empty())
                .map(str::to_owned),
            value_type,
            symbols: NumberSymbols::for_locale(locale),
        }
    }

    pub fn for_column(column: &Column, locale: &str) -> Self {
        Self::new(column.format.as_deref(), column.value_type, locale)
    }

    pub fn format(&self, value: &CellValue) -> String {
        match value {
            CellValue::Null => String::new(),
            CellValue::Bool(true) => "True".to_owned(),
            CellValue::Bool(false) => "False".to_owned(),
            CellValue::Integer(value) => match self.number_pattern() {
                Some(pattern) => pattern.apply(*value as f64, self.symbols),
                None => value.to_string(),
            },
            CellValue::Number(value) => match self.number_pattern() {
                Some(pattern) => pattern.apply(*value, self.symbols),
                None => self.plain_number(*value),
            },
            CellValue::Text(text) => self.format_text(text),
        }
    }

    fn number_pattern(&self) -> Option<NumberPattern> {
        self.format.as_deref().and_then(NumberPattern::parse)
    }

    fn plain_number(&self, value: f64) -> String {
        let rendered = value.to_string();
        if self.symbols.decimal == '.' {
            rendered
        } else {
            rendered.replace('.', &self.symbols.decimal.to_string())
        }
    }

    fn format_text(&self, text: &str) -> String {
        let wants_date = self.value_type == Some(ValueType::DateTime)
            || self.format.as_deref().is_some_and(has_date_tokens);
        if !wants_date {
            return text.to_owned();
        }
        match parse_date_time(text) {
            Some(moment) => format_date_time(moment, self.format.as_deref()),
            None => text.to_owned(),
        }
    }
}

fn has_date_tokens(format: &str) -> bool {
    ["yy", "MM", "dd", "HH", "mm", "ss"]
        .iter()
        .any(|token| format.contains(token))
}

fn parse_date_time(text: &str) -> Option<PrimitiveDateTime> {
    let text = text.trim();
    if let Ok(moment) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(PrimitiveDateTime::new(moment.date(), moment.time()));
    }
    if let Ok(moment) =
        PrimitiveDateTime::parse(text, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
    {
        return Some(moment);
    }
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

fn format_date_time(moment: PrimitiveDateTime, format: Option<&str>) -> String {
    let default_format = if moment.time() == Time::MIDNIGHT {
        "yyyy-MM-dd"
    } else {
        "yyyy-MM-dd HH:mm:ss"
    };
    let format = format.unwrap_or(default_format);

    let chars: Vec<char> = format.chars().collect();
    let mut out = String::new();
    let mut index = 0;
    while index < chars.len() {
        let current = chars[index];
        let run = chars[index..].iter().take_while(|c| **c == current).count();
        match (current, run) {
            ('y', 4..) => out.push_str(&format!("{:04}", moment.year())),
            ('y', _) => out.push_str(&format!("{:02}", moment.year().rem_euclid(100))),
            ('M', 1) => out.push_str(&u8::from(moment.month()).to_string()),
            ('M', _) => out.push_str(&format!("{:02}", u8::from(moment.month()))),
            ('d', 1) => out.push_str(&moment.day().to_string()),
            ('d', _) => out.push_str(&format!("{:02}", moment.day())),
            ('H', 1) => out.push_str(&moment.hour().to_string()),
            ('H', _) => out.push_str(&format!("{:02}", moment.hour())),
            ('m', _) => out.push_str(&format!("{:02}", moment.minute())),
            ('s', _) => out.push_str(&format!("{:02}", moment.second())),
            _ => out.extend(std::iter::repeat_n(current, run)),
        }
        index += run;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{NumberSymbols, ValueFormatter};
    use crate::model::{CellValue, Column, ValueType};

    fn format(format: Option<&str>, locale: &str, value: impl Into<CellValue>) -> String {
        ValueFormatter::new(format, None, locale).format(&value.into())
    }

    #[test]
    fn locale_symbols() {
        assert_eq!(NumberSymbols::for_locale("en-US").decimal, '.');
        assert_eq!(NumberSymbols::for_locale("de-DE").group, '.');
        assert_eq!(NumberSymbols::for_locale("de-CH").group, '\'');
        assert_eq!(NumberSymbols::for_locale("fr_FR").group, '\u{a0}');
        assert_eq!(NumberSymbols::for_locale("").group, ',');
    }

    #[test]
    fn numbers_follow_pattern_and_locale() {
        assert_eq!(format(Some("#,0.00"), "en-US", 1234.5), "1,234.50");
        assert_eq!(format(Some("#,0.00"), "de-DE", 1234.5), "1.234,50");
        assert_eq!(format(Some("#,0"), "en-US", 1_234_567_i64), "1,234,567");
        assert_eq!(format(Some("0"), "en-US", 12.25), "12");
        assert_eq!(format(Some("$#,0.00"), "en-US", -1234.0), "-$1,234.00");
        assert_eq!(format(Some("0.##"), "en-US", 2.5), "2.5");
        assert_eq!(format(Some("0.##"), "en-US", 2.0), "2");
    }

    #[test]
    fn percent_scales_value() {
        assert_eq!(format(Some("0%"), "en-US", 0.256), "26%");
        assert_eq!(format(Some("0.0%"), "fr-FR", 0.125), "12,5%");
    }

    #[test]
    fn unformatted_values() {
        assert_eq!(format(None, "en-US", CellValue::Null), "");
        assert_eq!(format(None, "en-US", true), "True");
        assert_eq!(format(None, "en-US", 12_000_i64), "12000");
        assert_eq!(format(None, "de-DE", 1.5), "1,5");
        assert_eq!(format(None, "en-US", "plain text"), "plain text");
        assert_eq!(format(Some("General"), "en-US", 3.25), "3.25");
    }

    #[test]
    fn dates_use_format_tokens() {
        let column = Column::new("When")
            .with_type(ValueType::DateTime)
            .with_format("dd/MM/yyyy HH:mm");
        let formatter = ValueFormatter::for_column(&column, "en-GB");
        assert_eq!(
            formatter.format(&"2024-03-05T14:07:09Z".into()),
            "05/03/2024 14:07"
        );

        let untyped = ValueFormatter::new(None, Some(ValueType::DateTime), "en-US");
        assert_eq!(untyped.format(&"2024-03-05".into()), "2024-03-05");
        assert_eq!(
            untyped.format(&"2024-03-05T08:30:00".into()),
            "2024-03-05 08:30:00"
        );
        assert_eq!(untyped.format(&"not a date".into()), "not a date");
    }
}
