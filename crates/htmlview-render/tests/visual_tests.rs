// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use htmlview_app::host::{EnglishLocalization, Localization, Position, keys};
use htmlview_app::{CellValue, RenderPhase, RowIdentity, TooltipItem, UpdateKind};
use htmlview_render::renderer::{
    CONTENT_ID, ENTRY_CLASS, HOVER_CLASS, LANDING_ID, RAW_OUTPUT_ID, STATUS_ID, UNSELECTED_CLASS,
};
use htmlview_render::visual::SUPPORT_URL;
use htmlview_render::{
    Element, EventOutcome, PointerEvent, PointerEventKind, PointerTarget, Visual, VisualOptions,
};
use htmlview_testkit::{
    ContentFaker, DataViewBuilder, HostCall, HostRecorder, fixtures, recording_host, update,
};
use serde_json::json;

fn visual() -> (Visual, HostRecorder) {
    visual_with(VisualOptions::default())
}

fn visual_with(options: VisualOptions) -> (Visual, HostRecorder) {
    let (host, recorder) = recording_host("en-US");
    (Visual::new(host, options), recorder)
}

fn content(visual: &Visual) -> &Element {
    visual.root().find_by_id(CONTENT_ID).expect("content container")
}

fn entries(visual: &Visual) -> Vec<&Element> {
    content(visual)
        .child_elements()
        .filter(|element| element.has_class(ENTRY_CLASS))
        .collect()
}

fn status_text(visual: &Visual) -> String {
    visual
        .root()
        .find_by_id(STATUS_ID)
        .expect("status element")
        .text_content()
}

fn dimmed(visual: &Visual) -> Vec<bool> {
    entries(visual)
        .iter()
        .map(|element| element.has_class(UNSELECTED_CLASS))
        .collect()
}

fn keyed(keys: &[&str], objects: serde_json::Value) -> htmlview_app::UpdateOptions {
    DataViewBuilder::new()
        .sampling_column("Key")
        .content_column("HTML")
        .rows(
            keys.iter()
                .map(|key| vec![CellValue::from(*key), CellValue::from(format!("<p>{key}</p>"))]),
        )
        .objects(objects)
        .update()
}

fn cross_filtering() -> serde_json::Value {
    json!({ "crossFilter": { "enabled": true } })
}

fn click(target: PointerTarget) -> PointerEvent {
    PointerEvent::new(PointerEventKind::Click, target)
}

#[test]
fn simple_values_render_one_entry_per_row() {
    let (mut visual, recorder) = visual();

    visual.update(&update(UpdateKind::Data, fixtures::simple_values()));

    assert_eq!(visual.phase(), RenderPhase::Rendered);
    assert_eq!(
        recorder.calls(),
        vec![HostCall::RenderingStarted, HostCall::RenderingFinished]
    );
    let texts: Vec<String> = entries(&visual).iter().map(|e| e.text_content()).collect();
    assert_eq!(
        texts,
        vec![
            "This is value one",
            "This is value two",
            "This is value three"
        ]
    );
    assert_eq!(
        entries(&visual)[0].inner_html(),
        "<div><p>This is value <b>one</b></p></div>"
    );
    assert_eq!(status_text(&visual), "");
    assert!(!visual.landing_page().is_enabled());
}

#[test]
fn zero_rows_show_the_no_data_message() {
    let (mut visual, _recorder) = visual();

    visual.update(&update(UpdateKind::Data, fixtures::no_values()));

    assert!(visual.view_model().is_valid);
    assert!(visual.view_model().is_empty);
    assert_eq!(visual.phase(), RenderPhase::Rendered);
    assert!(entries(&visual).is_empty());
    assert_eq!(status_text(&visual), "No data available to display");
}

#[test]
fn configured_no_data_message_is_sanitized() {
    let (mut visual, _recorder) = visual();
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .objects(json!({
            "contentFormatting": {
                "noDataMessage": "<em>Nothing yet</em><script>alert(1)</script>"
            }
        }))
        .update();

    visual.update(&options);

    let status = visual.root().find_by_id(STATUS_ID).expect("status");
    assert_eq!(status.inner_html(), "<em>Nothing yet</em>");
}

#[test]
fn invalid_data_view_fails_and_shows_landing_page() {
    let (mut visual, recorder) = visual();

    visual.update(&update(UpdateKind::Data, fixtures::no_values_sampling_only()));

    assert_eq!(visual.phase(), RenderPhase::Error);
    assert!(!visual.view_model().is_valid);
    assert_eq!(recorder.failures().len(), 1);
    assert_eq!(
        status_text(&visual),
        EnglishLocalization.display_name(keys::STATUS_INVALID_VIEW_MODEL)
    );
    assert!(visual.landing_page().is_enabled());
    let landing = visual.root().find_by_id(LANDING_ID).expect("landing");
    assert!(landing.text_content().contains("HTML Content"));
}

#[test]
fn next_valid_update_recovers_from_error() {
    let (mut visual, recorder) = visual();
    visual.update(&update(UpdateKind::Data, fixtures::empty()));
    assert_eq!(visual.phase(), RenderPhase::Error);

    visual.update(&update(UpdateKind::Data, fixtures::simple_values()));

    assert_eq!(visual.phase(), RenderPhase::Rendered);
    assert_eq!(visual.render_state().last_error, None);
    assert_eq!(status_text(&visual), "");
    assert!(visual.landing_page().was_removed());
    let landing = visual.root().find_by_id(LANDING_ID).expect("landing");
    assert!(landing.children.is_empty());
    assert_eq!(recorder.count(|call| *call == HostCall::RenderingFinished), 1);
}

#[test]
fn mapping_failure_clears_content_and_reports() {
    let (mut visual, recorder) = visual();
    visual.update(&update(UpdateKind::Data, fixtures::simple_values()));
    assert_eq!(entries(&visual).len(), 3);

    let broken = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec!["<p>a</p>".into()])
        .row(vec!["<p>b</p>".into()])
        .identities(["only-one"])
        .update();
    visual.update(&broken);

    assert_eq!(visual.phase(), RenderPhase::Error);
    assert!(content(&visual).children.is_empty());
    let failures = recorder.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("failed to map data view"), "{failures:?}");
    assert!(failures[0].contains("row 1 has no host identity"), "{failures:?}");
    assert_eq!(
        status_text(&visual),
        EnglishLocalization.display_name(keys::STATUS_INVALID_VIEW_MODEL)
    );
}

#[test]
fn custom_stylesheet_suppresses_inline_font_styles() {
    let (mut visual, _recorder) = visual();
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec!["<p>styled</p>".into()])
        .objects(json!({
            "contentFormatting": { "fontSize": 20, "fontColour": "#ff0000", "align": "center" },
            "stylesheet": { "stylesheet": "p { color: red; }" }
        }))
        .update();

    visual.update(&options);

    let root = visual.root();
    for property in ["font-family", "font-size", "color", "text-align"] {
        assert_eq!(root.style(property), None, "{property} should not be inline");
    }
    assert_eq!(root.style("user-select"), Some("none"));
    assert!(visual.to_html().contains("p { color: red; }"));
}

#[test]
fn content_formatting_applies_inline_without_stylesheet() {
    let (mut visual, _recorder) = visual();
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec!["<p>plain</p>".into()])
        .objects(json!({
            "contentFormatting": {
                "fontSize": 20,
                "fontColour": { "solid": { "color": "#ff0000" } },
                "align": "right",
                "userSelect": true
            }
        }))
        .update();

    visual.update(&options);

    let root = visual.root();
    assert_eq!(root.style("font-size"), Some("20pt"));
    assert_eq!(root.style("color"), Some("#ff0000"));
    assert_eq!(root.style("text-align"), Some("right"));
    assert_eq!(root.style("-moz-user-select"), Some("text"));
}

#[test]
fn entry_content_is_sanitized() {
    let (mut visual, _recorder) = visual();
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec!["<script>alert(1)</script><p>ok</p>".into()])
        .row(vec![r#"<img src="x.png" onerror="alert(1)" alt="javas&#0;cript:x">"#.into()])
        .update();

    visual.update(&options);

    let bound = entries(&visual);
    assert_eq!(bound[0].inner_html(), "<div><p>ok</p></div>");
    assert_eq!(bound[1].inner_html(), r#"<div><img src="x.png"></div>"#);
}

#[test]
fn disabled_sanitizer_keeps_markup() {
    let (mut visual, _recorder) = visual_with(VisualOptions {
        sanitize: false,
        ..VisualOptions::default()
    });
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec!["<script>run()</script><p>ok</p>".into()])
        .update();

    visual.update(&options);

    assert_eq!(
        entries(&visual)[0].inner_html(),
        "<div><script>run()</script><p>ok</p></div>"
    );
}

#[test]
fn raw_html_mode_shows_read_only_markup() {
    let (mut visual, _recorder) = visual();
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec!["<p>raw</p>".into()])
        .objects(json!({ "contentFormatting": { "showRawHtml": true } }))
        .update();

    visual.update(&options);

    let content = content(&visual);
    let textarea = content.find_by_id(RAW_OUTPUT_ID).expect("raw output");
    assert_eq!(textarea.attr("readonly"), Some("true"));
    assert!(textarea.text_content().contains("<p>raw</p>"));
    assert!(entries(&visual).is_empty());
    assert!(visual.bindings().entries.is_empty());
}

#[test]
fn resize_update_keeps_mapped_entries() {
    let (mut visual, _recorder) = visual();
    let data = fixtures::simple_values();
    visual.update(&update(UpdateKind::Data, data.clone()));

    visual.update(&update(UpdateKind::Resize, data));

    assert_eq!(visual.phase(), RenderPhase::Rendered);
    assert_eq!(entries(&visual).len(), 3);
    assert_eq!(visual.render_state().updates, 2);
}

#[test]
fn click_selects_and_dims_other_entries() {
    let (mut visual, recorder) = visual();
    visual.update(&keyed(&["A", "B", "C"], cross_filtering()));
    assert!(visual.view_model().has_cross_filtering);

    let outcome = visual.handle_event(&click(PointerTarget::Entry(1)));

    assert_eq!(
        outcome,
        EventOutcome {
            default_prevented: true,
            propagation_stopped: true,
        }
    );
    assert_eq!(recorder.selection(), vec![RowIdentity::from("sampling:B")]);
    assert!(visual.view_model().has_selection);
    assert_eq!(dimmed(&visual), vec![true, false, true]);

    visual.handle_event(&click(PointerTarget::Entry(0)).with_ctrl());
    assert_eq!(dimmed(&visual), vec![false, false, true]);
    assert!(recorder.calls().contains(&HostCall::Select {
        identity: RowIdentity::from("sampling:A"),
        multi_select: true,
    }));

    visual.handle_event(&click(PointerTarget::Background));
    assert!(recorder.selection().is_empty());
    assert!(!visual.view_model().has_selection);
    assert_eq!(dimmed(&visual), vec![false, false, false]);
}

#[test]
fn selection_survives_reordered_update() {
    let (mut visual, _recorder) = visual();
    visual.update(&keyed(&["A", "B"], cross_filtering()));
    visual.handle_event(&click(PointerTarget::Entry(1)));

    visual.update(&keyed(&["C", "B", "A"], cross_filtering()));

    let selected: Vec<bool> = visual
        .view_model()
        .entries
        .iter()
        .map(|entry| entry.selected)
        .collect();
    assert_eq!(selected, vec![false, true, false]);
    assert_eq!(dimmed(&visual), vec![true, false, true]);
    assert!(visual.to_html().contains(".htmlViewerEntry.unselected { opacity: 0.3; }"));
}

#[test]
fn invalid_update_clears_previous_selection() {
    let (mut visual, _recorder) = visual();
    visual.update(&keyed(&["A", "B"], cross_filtering()));
    visual.handle_event(&click(PointerTarget::Entry(0)));
    assert!(visual.view_model().has_selection);

    visual.update(&update(UpdateKind::Data, fixtures::no_values_sampling_only()));

    assert_eq!(visual.phase(), RenderPhase::Error);
    assert!(visual.view_model().entries.is_empty());
    assert!(!visual.view_model().has_selection);
    assert!(entries(&visual).is_empty());
}

#[test]
fn clicks_do_nothing_without_cross_filtering() {
    let (mut visual, recorder) = visual();
    visual.update(&keyed(&["A", "B"], json!({})));
    recorder.take_calls();

    let outcome = visual.handle_event(&click(PointerTarget::Entry(0)));
    visual.handle_event(&click(PointerTarget::Background));

    assert_eq!(outcome, EventOutcome::default());
    assert!(recorder.calls().is_empty());
    assert_eq!(dimmed(&visual), vec![false, false]);
}

#[test]
fn hyperlinks_are_inert_unless_allowed() {
    let html = r#"<p><a href="https://example.com/a">first</a> <a>second</a></p>"#;
    let build = |allowed: bool| {
        DataViewBuilder::new()
            .content_column("HTML")
            .row(vec![html.into()])
            .objects(json!({ "contentFormatting": { "hyperlinks": allowed } }))
            .update()
    };

    let (mut visual, recorder) = visual();
    visual.update(&build(false));
    let outcome = visual.handle_event(&click(PointerTarget::Anchor { entry: 0, anchor: 0 }));
    assert!(outcome.default_prevented);
    assert!(recorder.launched_urls().is_empty());

    visual.update(&build(true));
    visual.handle_event(&click(PointerTarget::Anchor { entry: 0, anchor: 0 }));
    visual.handle_event(&click(PointerTarget::Anchor { entry: 0, anchor: 1 }));
    assert_eq!(
        recorder.launched_urls(),
        vec!["https://example.com/a".to_owned(), String::new()]
    );
}

#[test]
fn anchor_click_still_selects_the_entry() {
    let (mut visual, recorder) = visual();
    let options = DataViewBuilder::new()
        .sampling_column("Key")
        .content_column("HTML")
        .row(vec!["A".into(), r#"<a href="https://example.com">go</a>"#.into()])
        .row(vec!["B".into(), "<p>b</p>".into()])
        .objects(json!({
            "crossFilter": { "enabled": true },
            "contentFormatting": { "hyperlinks": true }
        }))
        .update();
    visual.update(&options);

    let outcome = visual.handle_event(&click(PointerTarget::Anchor { entry: 0, anchor: 0 }));

    assert!(outcome.propagation_stopped);
    assert_eq!(recorder.launched_urls(), vec!["https://example.com".to_owned()]);
    assert_eq!(recorder.selection(), vec![RowIdentity::from("sampling:A")]);
}

#[test]
fn context_menu_forwards_identity_and_position() {
    let (mut visual, recorder) = visual();
    visual.update(&keyed(&["A"], json!({})));

    let outcome = visual.handle_event(
        &PointerEvent::new(PointerEventKind::ContextMenu, PointerTarget::Entry(0)).at(5.0, 6.0),
    );
    visual.handle_event(
        &PointerEvent::new(PointerEventKind::ContextMenu, PointerTarget::Background).at(1.0, 2.0),
    );

    assert!(outcome.default_prevented && outcome.propagation_stopped);
    let menus: Vec<HostCall> = recorder
        .calls()
        .into_iter()
        .filter(|call| matches!(call, HostCall::ContextMenu { .. }))
        .collect();
    assert_eq!(
        menus,
        vec![
            HostCall::ContextMenu {
                identity: Some(RowIdentity::from("sampling:A")),
                position: Position::new(5.0, 6.0),
            },
            HostCall::ContextMenu {
                identity: None,
                position: Position::new(1.0, 2.0),
            },
        ]
    );
}

#[test]
fn hover_shows_row_tooltips_and_leave_hides_them() {
    let (mut visual, recorder) = visual();
    let data = ContentFaker::new(11).keyed_data_view(3);
    visual.update(&update(UpdateKind::Data, vec![data]));
    let expected_items = visual.view_model().entries[2].tooltips.clone();
    assert_eq!(expected_items.len(), 2);
    assert_eq!(expected_items[0].label, "Region");

    visual.handle_event(
        &PointerEvent::new(PointerEventKind::PointerOver, PointerTarget::Entry(2)).at(10.0, 20.0),
    );
    assert!(entries(&visual)[2].has_class(HOVER_CLASS));
    let shown = recorder.shown_tooltips();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].data_items, expected_items);
    assert_eq!(shown[0].identities, vec![visual.view_model().entries[2].identity.clone()]);
    assert_eq!(shown[0].coordinates, Position::new(10.0, 20.0));
    assert!(shown[0].is_touch_event);

    visual.handle_event(&PointerEvent::new(PointerEventKind::PointerOut, PointerTarget::Entry(2)));
    assert!(!entries(&visual)[2].has_class(HOVER_CLASS));
    assert_eq!(
        recorder.calls().last(),
        Some(&HostCall::HideTooltip { immediately: true })
    );
}

#[test]
fn manual_tooltips_are_used_without_granularity() {
    let (mut visual, recorder) = visual();
    let html = r#"<span class="tooltipEnabled" data-tooltip-title1="Name" data-tooltip-value1="Widget">w</span>"#;
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .row(vec![html.into()])
        .update();
    visual.update(&options);

    visual.handle_event(&PointerEvent::new(PointerEventKind::PointerMove, PointerTarget::Entry(0)));
    assert!(recorder.shown_tooltips().is_empty());

    visual.handle_event(&PointerEvent::new(
        PointerEventKind::PointerOver,
        PointerTarget::ManualTooltip {
            entry: 0,
            element: 0,
        },
    ));
    let shown = recorder.shown_tooltips();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].data_items, vec![TooltipItem::new("Name", "Widget")]);
    assert!(shown[0].identities.is_empty());
}

#[test]
fn events_on_unbound_entries_are_ignored() {
    let (mut visual, recorder) = visual();
    visual.update(&update(UpdateKind::Data, fixtures::simple_values()));
    recorder.take_calls();

    let outcome = visual.handle_event(&click(PointerTarget::Entry(9)));

    assert_eq!(outcome, EventOutcome::default());
    assert!(recorder.calls().is_empty());
}

#[test]
fn landing_page_help_opens_support_url() {
    let (mut visual, recorder) = visual();
    visual.update(&update(UpdateKind::Data, fixtures::empty()));

    visual.handle_event(&click(PointerTarget::LandingHelp));

    assert_eq!(recorder.launched_urls(), vec![SUPPORT_URL.to_owned()]);
}

#[test]
fn enumeration_reflects_last_parsed_settings() {
    let (mut visual, _recorder) = visual();
    let options = DataViewBuilder::new()
        .content_column("HTML")
        .objects(json!({ "crossFilter": { "enabled": true, "transparencyPercent": 40 } }))
        .update();
    visual.update(&options);

    let instances = visual.enumerate_object_instances("crossFilter");
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].properties["enabled"], json!(true));
    assert_eq!(instances[0].properties["transparencyPercent"], json!(40));
    assert!(visual.enumerate_object_instances("unknown").is_empty());
}
