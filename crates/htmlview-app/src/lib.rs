// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod format;
pub mod host;
pub mod ids;
pub mod model;
pub mod settings;
pub mod state;
pub mod view_model;

pub use ids::*;
pub use model::*;
pub use settings::*;
pub use state::*;
pub use view_model::*;
