//! Battery model parameterisation as a sequential pipeline of stages.
//!
//! Each stage either enters values directly (literature sets, JSON files,
//! electrolyte tables) or calculates new parameters from the ones gathered so
//! far. The [`Pipeline`] checks that no stage redefines an existing key, and
//! can record what every stage contributed in a `parameters.json` cache.

pub mod calculations;
pub mod common;
pub mod direct_entries;
pub mod domain;
pub mod numerics;
pub mod parameters;
pub mod pipeline;
pub mod report;
pub mod sets;

pub use direct_entries::DirectEntry;
pub use domain::{
    ParamError, ParamErrorCategory, ParamResult, ParameterFunction, ParameterValue, Side,
    StageKind,
};
pub use parameters::{ParameterSet, ParameterView};
pub use pipeline::{Pipeline, PipelineState, RunReport, Stage, StageRecord, StageReport};
pub use sets::presets;
pub use sets::{Preset, PresetOptions};
