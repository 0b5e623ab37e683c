// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dom;
pub mod interaction;
pub mod landing;
pub mod reconcile;
pub mod renderer;
pub mod sanitize;
pub mod visual;

pub use dom::{Element, Node};
pub use interaction::{EventOutcome, PointerEvent, PointerEventKind, PointerTarget};
pub use sanitize::Sanitizer;
pub use visual::{Visual, VisualOptions, VisualState};
