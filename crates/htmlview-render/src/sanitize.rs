// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Turns untrusted entry HTML into DOM nodes. Cleaning is done by `ammonia`
//! against an allow-list; the cleaned markup is then parsed by `scraper` and
//! copied into our own tree, so callers only ever receive nodes.

use ammonia::{Builder, UrlRelative};
use scraper::{ElementRef, Html};
use std::borrow::Cow;
use std::collections::HashSet;
use url::Url;

use crate::dom::{Element, Node};

/// Image and vector-graphics tags allowed on top of the default list. SVG
/// elements are listed in both spellings because the parser restores the
/// camel case inside `<svg>`.
const EXTRA_TAGS: &[&str] = &[
    "img",
    "style",
    "svg",
    "animate",
    "animatemotion",
    "animateMotion",
    "animatetransform",
    "animateTransform",
    "circle",
    "clippath",
    "clipPath",
    "defs",
    "desc",
    "ellipse",
    "feblend",
    "feBlend",
    "fecolormatrix",
    "feColorMatrix",
    "fecomponenttransfer",
    "feComponentTransfer",
    "fecomposite",
    "feComposite",
    "feconvolvematrix",
    "feConvolveMatrix",
    "fediffuselighting",
    "feDiffuseLighting",
    "fedisplacementmap",
    "feDisplacementMap",
    "fedistantlight",
    "feDistantLight",
    "fedropshadow",
    "feDropShadow",
    "feflood",
    "feFlood",
    "fefunca",
    "feFuncA",
    "fefuncb",
    "feFuncB",
    "fefuncg",
    "feFuncG",
    "fefuncr",
    "feFuncR",
    "fegaussianblur",
    "feGaussianBlur",
    "feimage",
    "feImage",
    "femerge",
    "feMerge",
    "femergenode",
    "feMergeNode",
    "femorphology",
    "feMorphology",
    "feoffset",
    "feOffset",
    "fepointlight",
    "fePointLight",
    "fespecularlighting",
    "feSpecularLighting",
    "fespotlight",
    "feSpotLight",
    "fetile",
    "feTile",
    "feturbulence",
    "feTurbulence",
    "filter",
    "g",
    "image",
    "line",
    "lineargradient",
    "linearGradient",
    "marker",
    "mask",
    "metadata",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialgradient",
    "radialGradient",
    "rect",
    "set",
    "stop",
    "symbol",
    "text",
    "textpath",
    "textPath",
    "title",
    "tspan",
    "view",
];

/// Tags removed together with everything inside them.
const DROPPED_CONTENT_TAGS: [&str; 4] = ["script", "noscript", "textarea", "option"];

const GENERIC_ATTRIBUTES: &[&str] = &[
    "align",
    "alt",
    "bgcolor",
    "border",
    "class",
    "colspan",
    "dir",
    "height",
    "id",
    "name",
    "rowspan",
    "style",
    "tabindex",
    "target",
    "valign",
    "width",
    // presentation attributes for SVG content
    "clip-path",
    "clip-rule",
    "cx",
    "cy",
    "d",
    "dx",
    "dy",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "font-family",
    "font-size",
    "font-weight",
    "fr",
    "fx",
    "fy",
    "gradientTransform",
    "gradientUnits",
    "in",
    "in2",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "offset",
    "opacity",
    "points",
    "preserveAspectRatio",
    "r",
    "result",
    "rx",
    "ry",
    "stdDeviation",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "transform",
    "viewBox",
    "x",
    "x1",
    "x2",
    "xmlns",
    "y",
    "y1",
    "y2",
];

const URL_ATTRIBUTES: [&str; 8] = [
    "action",
    "background",
    "cite",
    "formaction",
    "href",
    "longdesc",
    "poster",
    "src",
];

/// Literal signatures checked against the raw attribute value.
const SCRIPTING_PATTERNS: [&str; 6] = [
    "javascript",
    "javas\u{0}script",
    "javas\u{7}cript",
    "javas\rcript",
    "javas\ncript",
    "javas\u{8}cript",
];

pub struct Sanitizer {
    cleaner: Option<Builder<'static>>,
}

impl Sanitizer {
    /// A sanitizer that cleans when `enabled`, and otherwise only parses.
    pub fn new(enabled: bool) -> Self {
        Self {
            cleaner: enabled.then(cleaner),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cleaner.is_some()
    }

    /// Clean `html` and parse it into detached nodes ready to append.
    pub fn sanitize_and_parse(&self, html: &str) -> Vec<Node> {
        let cleaned = match &self.cleaner {
            Some(cleaner) => Cow::Owned(cleaner.clean(html).to_string()),
            None => Cow::Borrowed(html),
        };
        let fragment = Html::parse_fragment(&cleaned);
        convert_children(fragment.root_element())
    }
}

fn cleaner() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .add_tags(EXTRA_TAGS.iter().copied())
        .rm_clean_content_tags(["style"])
        .add_clean_content_tags(DROPPED_CONTENT_TAGS)
        .add_generic_attributes(GENERIC_ATTRIBUTES.iter().copied())
        .add_generic_attribute_prefixes(["data-", "aria-"])
        .url_schemes(HashSet::from(["http", "https", "data"]))
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None)
        .strip_comments(true)
        .attribute_filter(filter_attribute);
    builder
}

fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if has_scripting_signature(value) {
        return None;
    }
    if URL_ATTRIBUTES.contains(&attribute) && !scheme_allowed(element, value) {
        return None;
    }
    Some(Cow::Borrowed(value))
}

/// True when `value` spells out `javascript`, including spellings broken up
/// by control characters, whitespace or replacement characters, in any case.
pub fn has_scripting_signature(value: &str) -> bool {
    if SCRIPTING_PATTERNS
        .iter()
        .any(|pattern| value.contains(pattern))
    {
        return true;
    }
    let squashed: String = value
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace() && *c != '\u{fffd}')
        .flat_map(char::to_lowercase)
        .collect();
    squashed.contains("javascript")
}

/// `a` may link over http(s), `img` may embed data URLs, and every other
/// URL attribute is limited to relative references.
fn scheme_allowed(element: &str, value: &str) -> bool {
    let allowed: &[&str] = match element {
        "a" => &["http", "https"],
        "img" => &["data"],
        _ => &[],
    };
    match Url::parse(value.trim()) {
        Ok(url) => allowed.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let text: &str = &text.text;
                nodes.push(Node::text(text));
            }
            scraper::Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    nodes.push(Node::Element(convert_element(element)));
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(source: ElementRef<'_>) -> Element {
    let mut element = Element::new(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attr(name, value);
    }
    element.children = convert_children(source);
    element
}
