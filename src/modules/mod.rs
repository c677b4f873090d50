// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod actions;
pub mod attachment;
pub mod catalog;
pub mod client;
pub mod common;
pub mod context;
pub mod error;
pub mod list_entry;
pub mod logger;
pub mod normalize;
pub mod request;
pub mod rest;
pub mod settings;
pub mod utils;
pub mod vault;
