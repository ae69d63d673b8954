// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod link;
pub mod parser;
pub mod source;

pub use link::*;
pub use parser::*;
pub use source::*;

pub const APP_NAME: &str = "genetable";
