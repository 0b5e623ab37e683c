// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Uninitialized,
    Rendering,
    Rendered,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderState {
    pub phase: RenderPhase,
    pub updates: u64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    Begin,
    Finish,
    Fail(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    PhaseChanged(RenderPhase),
    Started,
    Finished,
    Failed(String),
}

impl RenderState {
    /// Apply a lifecycle command. `Finish` and `Fail` only count while a
    /// render is in flight; outside of one they produce no events.
    pub fn dispatch(&mut self, command: RenderCommand) -> Vec<RenderEvent> {
        match command {
            RenderCommand::Begin => {
                self.updates += 1;
                self.last_error = None;
                vec![self.set_phase(RenderPhase::Rendering), RenderEvent::Started]
            }
            RenderCommand::Finish if self.phase == RenderPhase::Rendering => {
                vec![self.set_phase(RenderPhase::Rendered), RenderEvent::Finished]
            }
            RenderCommand::Fail(reason) if self.phase == RenderPhase::Rendering => {
                self.last_error = Some(reason.clone());
                vec![self.set_phase(RenderPhase::Error), RenderEvent::Failed(reason)]
            }
            RenderCommand::Finish | RenderCommand::Fail(_) => Vec::new(),
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.phase == RenderPhase::Rendering
    }

    fn set_phase(&mut self, phase: RenderPhase) -> RenderEvent {
        self.phase = phase;
        RenderEvent::PhaseChanged(phase)
    }
}
