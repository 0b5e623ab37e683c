// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use htmlview_app::host::{HostServices, keys};
use htmlview_app::{
    ObjectInstance, RenderCommand, RenderEvent, RenderPhase, RenderState, Settings, UpdateOptions,
    ViewModel,
};
use tracing::{debug, info, warn};

use crate::dom::Element;
use crate::interaction::{Bindings, EventOutcome, InteractionContext, PointerEvent};
use crate::landing::LandingPage;
use crate::renderer::{self, CONTENT_ID, LANDING_ID};
use crate::sanitize::Sanitizer;

pub const SUPPORT_URL: &str = "https://github.com/dm-p/powerbi-visuals-html-content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualOptions {
    pub sanitize: bool,
    pub support_url: String,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            support_url: SUPPORT_URL.to_owned(),
        }
    }
}

/// State carried from one update to the next.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualState {
    pub view_model: ViewModel,
    pub settings: Settings,
}

pub struct Visual {
    host: HostServices,
    options: VisualOptions,
    sanitizer: Sanitizer,
    root: Element,
    state: VisualState,
    render: RenderState,
    landing: LandingPage,
    bindings: Bindings,
}

impl Visual {
    pub fn new(host: HostServices, options: VisualOptions) -> Self {
        let mut state = VisualState::default();
        state.view_model.reset();
        Self {
            sanitizer: Sanitizer::new(options.sanitize),
            host,
            options,
            root: renderer::viewer(),
            state,
            render: RenderState::default(),
            landing: LandingPage::default(),
            bindings: Bindings::default(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    pub fn view_model(&self) -> &ViewModel {
        &self.state.view_model
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn phase(&self) -> RenderPhase {
        self.render.phase
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn landing_page(&self) -> LandingPage {
        self.landing
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Run one host update cycle. Failures never escape: they are shown in
    /// the status area and reported through `rendering_failed`.
    pub fn update(&mut self, options: &UpdateOptions) {
        self.dispatch(RenderCommand::Begin);
        match self.render_update(options) {
            Ok(()) => self.dispatch(RenderCommand::Finish),
            Err(error) => {
                let reason = format!("{error:#}");
                warn!(%reason, "update failed");
                if let Some(content) = self.root.find_by_id_mut(CONTENT_ID) {
                    content.clear_children();
                }
                self.bindings = Bindings::default();
                let message = self.host.text(keys::STATUS_INVALID_VIEW_MODEL);
                renderer::update_status(&mut self.root, Some(&message), &self.sanitizer);
                self.dispatch(RenderCommand::Fail(reason));
            }
        }
    }

    fn render_update(&mut self, options: &UpdateOptions) -> Result<()> {
        renderer::update_status(&mut self.root, None, &self.sanitizer);
        self.state.settings =
            Settings::parse(options.first_data_view().and_then(|view| view.objects()));
        let settings = &self.state.settings;
        let view_model = &mut self.state.view_model;

        if options.kind.is_data_change() {
            let mapping = self.host.text(keys::STATUS_MAPPING_DATA_VIEW);
            renderer::update_status(&mut self.root, Some(&mapping), &self.sanitizer);
            view_model.validate(&options.data_views);
            if view_model.is_valid {
                view_model
                    .map(
                        &options.data_views,
                        settings,
                        self.host.identities.as_ref(),
                        &self.host.locale,
                    )
                    .context("failed to map data view")?;
            } else {
                view_model.clear_entries();
            }
            renderer::update_status(&mut self.root, None, &self.sanitizer);
        }

        if let Some(landing) = self.root.find_by_id_mut(LANDING_ID) {
            self.landing
                .handle(landing, view_model.is_valid, self.host.localization.as_ref());
        }
        if !view_model.is_valid {
            bail!("data view has no column in the content role; assign a field to Values");
        }

        renderer::resolve_styling(&mut self.root, settings);
        if view_model.is_empty {
            renderer::resolve_no_data(&mut self.root, settings, &self.sanitizer);
            self.bindings = Bindings::default();
            return Ok(());
        }

        let Some(content) = self.root.find_by_id_mut(CONTENT_ID) else {
            bail!("viewer is missing its #{CONTENT_ID} container");
        };
        let stats = renderer::bind(
            content,
            &view_model.entries,
            view_model.has_selection,
            &self.sanitizer,
        );
        debug!(
            reused = stats.reused,
            created = stats.created,
            removed = stats.removed,
            "bound entries"
        );
        self.bindings = if settings.content_formatting.show_raw_html {
            Bindings::default()
        } else {
            Bindings::build(content, view_model, settings)
        };
        renderer::resolve_raw_html(&mut self.root, CONTENT_ID, settings);
        Ok(())
    }

    fn dispatch(&mut self, command: RenderCommand) {
        for event in self.render.dispatch(command) {
            match event {
                RenderEvent::PhaseChanged(phase) => {
                    info!(?phase, update = self.render.updates, "render phase changed");
                }
                RenderEvent::Started => self.host.events.rendering_started(),
                RenderEvent::Finished => self.host.events.rendering_finished(),
                RenderEvent::Failed(reason) => self.host.events.rendering_failed(&reason),
            }
        }
    }

    /// Route a pointer event through the handlers bound on the last render.
    pub fn handle_event(&mut self, event: &PointerEvent) -> EventOutcome {
        let cx = InteractionContext {
            host: &self.host,
            view_model: &mut self.state.view_model,
            content: self.root.find_by_id_mut(CONTENT_ID),
            support_url: &self.options.support_url,
        };
        self.bindings.handle(event, cx)
    }

    pub fn enumerate_object_instances(&self, object_name: &str) -> Vec<ObjectInstance> {
        self.state.settings.enumerate(object_name)
    }
}
