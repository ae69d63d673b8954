// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dataset;
pub mod filter;
pub mod paginate;
pub mod schema;
pub mod session;
pub mod sort;
pub mod state;

pub use dataset::*;
pub use filter::*;
pub use paginate::*;
pub use schema::*;
pub use session::*;
pub use sort::*;
pub use state::*;

#[cfg(test)]
mod fixtures;
