//! Per-domain input records and result contracts. Field names serialize in
//! camelCase, matching the JSON the provider is instructed to emit.

pub mod body_shape;
pub mod exercise;
pub mod personal_color;
pub mod progress;
pub mod skin;
pub mod workout;
