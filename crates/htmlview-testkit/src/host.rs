// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Recording doubles for the host capabilities. All doubles created by
//! `recording_host` share one log, so a test sees every call in order.

use htmlview_app::host::{
    EnglishLocalization, HostServices, Position, RenderEvents, SelectionService,
    TableIdentityFactory, TooltipService, TooltipShowOptions, UrlLauncher,
};
use htmlview_app::RowIdentity;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    LaunchUrl(String),
    ShowTooltip(TooltipShowOptions),
    HideTooltip { immediately: bool },
    Select {
        identity: RowIdentity,
        multi_select: bool,
    },
    ClearSelection,
    ContextMenu {
        identity: Option<RowIdentity>,
        position: Position,
    },
    RenderingStarted,
    RenderingFinished,
    RenderingFailed(String),
}

#[derive(Debug, Default)]
struct HostLog {
    calls: Vec<HostCall>,
    selection: Vec<RowIdentity>,
}

type SharedLog = Rc<RefCell<HostLog>>;

/// Read side of the shared log.
#[derive(Debug, Clone, Default)]
pub struct HostRecorder {
    log: SharedLog,
}

impl HostRecorder {
    pub fn calls(&self) -> Vec<HostCall> {
        self.log.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.log.borrow_mut().calls)
    }

    /// The selection as the host currently holds it.
    pub fn selection(&self) -> Vec<RowIdentity> {
        self.log.borrow().selection.clone()
    }

    pub fn launched_urls(&self) -> Vec<String> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::LaunchUrl(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn shown_tooltips(&self) -> Vec<TooltipShowOptions> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::ShowTooltip(options) => Some(options.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::RenderingFailed(reason) => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&HostCall) -> bool) -> usize {
        self.log.borrow().calls.iter().filter(|call| matches(call)).count()
    }

    fn push(&self, call: HostCall) {
        self.log.borrow_mut().calls.push(call);
    }
}

pub struct RecordingUrlLauncher(HostRecorder);

impl UrlLauncher for RecordingUrlLauncher {
    fn launch_url(&self, url: &str) {
        self.0.push(HostCall::LaunchUrl(url.to_owned()));
    }
}

pub struct RecordingTooltipService(HostRecorder);

impl TooltipService for RecordingTooltipService {
    fn show(&self, options: &TooltipShowOptions) {
        self.0.push(HostCall::ShowTooltip(options.clone()));
    }

    fn hide(&self, immediately: bool) {
        self.0.push(HostCall::HideTooltip { immediately });
    }
}

/// Selection manager that toggles like the host's: a plain select replaces
/// the selection (or clears it when the identity is already the only one
/// selected), a multi-select adds or removes the identity.
pub struct RecordingSelectionService(HostRecorder);

impl SelectionService for RecordingSelectionService {
    fn select(&self, identity: &RowIdentity, multi_select: bool) -> Vec<RowIdentity> {
        self.0.push(HostCall::Select {
            identity: identity.clone(),
            multi_select,
        });
        let mut log = self.0.log.borrow_mut();
        let selection = &mut log.selection;
        if multi_select {
            match selection.iter().position(|existing| existing == identity) {
                Some(index) => {
                    selection.remove(index);
                }
                None => selection.push(identity.clone()),
            }
        } else if selection.len() == 1 && selection[0] == *identity {
            selection.clear();
        } else {
            *selection = vec![identity.clone()];
        }
        selection.clone()
    }

    fn clear(&self) {
        self.0.push(HostCall::ClearSelection);
        self.0.log.borrow_mut().selection.clear();
    }

    fn show_context_menu(&self, identity: Option<&RowIdentity>, position: Position) {
        self.0.push(HostCall::ContextMenu {
            identity: identity.cloned(),
            position,
        });
    }
}

pub struct RecordingRenderEvents(HostRecorder);

impl RenderEvents for RecordingRenderEvents {
    fn rendering_started(&self) {
        self.0.push(HostCall::RenderingStarted);
    }

    fn rendering_finished(&self) {
        self.0.push(HostCall::RenderingFinished);
    }

    fn rendering_failed(&self, reason: &str) {
        self.0.push(HostCall::RenderingFailed(reason.to_owned()));
    }
}

/// Host services backed by recording doubles, English strings and the
/// default identity scheme.
pub fn recording_host(locale: &str) -> (HostServices, HostRecorder) {
    let recorder = HostRecorder::default();
    let host = HostServices {
        locale: locale.to_owned(),
        urls: Box::new(RecordingUrlLauncher(recorder.clone())),
        tooltips: Box::new(RecordingTooltipService(recorder.clone())),
        selection: Box::new(RecordingSelectionService(recorder.clone())),
        localization: Box::new(EnglishLocalization),
        events: Box::new(RecordingRenderEvents(recorder.clone())),
        identities: Box::new(TableIdentityFactory),
    };
    (host, recorder)
}
