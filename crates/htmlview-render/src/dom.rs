// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! A small owned element tree standing in for the host document. Enough of
//! the DOM to bind entries, toggle classes and styles, and serialize the
//! result back to markup.

use std::collections::BTreeMap;

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: [&str; 6] = ["style", "script", "xmp", "iframe", "noembed", "noframes"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    fn write_html(&self, parent: Option<&str>, out: &mut String) {
        match self {
            Self::Element(element) => element.write_html(out),
            Self::Text(text) if parent.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag)) => {
                out.push_str(text);
            }
            Self::Text(text) => escape_into(text, false, out),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    /// Reconciliation key. Never serialized.
    pub key: Option<String>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.set_attr("id", id);
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.set_class(class, true);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_style(mut self, name: &str, value: &str) -> Self {
        self.set_style(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// `class` is split into the class list rather than kept as an attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes.clear();
            for class in value.split_whitespace() {
                self.set_class(class, true);
            }
            return;
        }
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn set_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            if !self.has_class(class) {
                self.classes.push(class.to_owned());
            }
        } else {
            self.classes.retain(|existing| existing != class);
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    /// Set an inline style property, keeping its original position when it
    /// is already present.
    pub fn set_style(&mut self, name: &str, value: &str) {
        match self.styles.iter_mut().find(|(property, _)| property == name) {
            Some((_, existing)) => *existing = value.to_owned(),
            None => self.styles.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove_style(&mut self, name: &str) {
        self.styles.retain(|(property, _)| property != name);
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn append(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Every element below this one, in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for element in self.child_elements() {
            out.push(element);
            element.collect_descendants(out);
        }
    }

    pub fn descendants_with_tag(&self, tag: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|element| element.tag == tag)
            .collect()
    }

    pub fn descendants_with_class(&self, class: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|element| element.has_class(class))
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|element| element.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find_map(|element| element.find_by_id_mut(id))
    }

    /// Outer markup of this element. Attributes are written in name order,
    /// followed by `class` and `style`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(Some(&self.tag), &mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            if name != "style" {
                write_attribute(name, value, out);
            }
        }
        if !self.classes.is_empty() {
            write_attribute("class", &self.classes.join(" "), out);
        }
        if let Some(style) = self.style_attribute() {
            write_attribute("style", &style, out);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(Some(&self.tag), out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn style_attribute(&self) -> Option<String> {
        let inline = self
            .styles
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        match (self.attributes.get("style"), inline.is_empty()) {
            (None, true) => None,
            (None, false) => Some(inline),
            (Some(raw), true) => Some(raw.clone()),
            (Some(raw), false) => {
                let raw = raw.trim_end();
                let separator = if raw.ends_with(';') { " " } else { "; " };
                Some(format!("{raw}{separator}{inline}"))
            }
        }
    }
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(value: &str, attribute: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}
