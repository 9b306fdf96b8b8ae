use super::schimpe2018::schimpe2018 as schimpe2018_entry;
use super::standard_sei_parameters;
use super::sturm2018::sturm2018;
use crate::calculations::{
    AreaToSquareWidthHeight, CellCapacity, ElectrodeSoh, InitialSeiThickness, InitialSoc,
    KnownValue, SurfaceArea, TargetSeiCalendarRate,
};
use crate::direct_entries::{standard_defaults, temperatures};
use crate::domain::{ParamError, ParamResult};
use crate::pipeline::{Pipeline, Stage};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_TEMPERATURE: f64 = 298.15;
pub const DEFAULT_SEI_GROWTH_PERCENT_PER_MONTH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PresetOptions {
    pub temperature: f64,
    pub target_sei_growth_percent_per_month: f64,
    pub cache_dir: Option<PathBuf>,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            target_sei_growth_percent_per_month: DEFAULT_SEI_GROWTH_PERCENT_PER_MONTH,
            cache_dir: None,
        }
    }
}

impl PresetOptions {
    pub fn with_cache(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    fn validate(&self) -> ParamResult<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ParamError::input_validation(
                "INPUT.PRESET_OPTIONS",
                format!("temperature must be positive kelvin, got {}", self.temperature),
            ));
        }
        if !self.target_sei_growth_percent_per_month.is_finite()
            || self.target_sei_growth_percent_per_month < 0.0
        {
            return Err(ParamError::input_validation(
                "INPUT.PRESET_OPTIONS",
                format!(
                    "SEI growth target must be a non-negative percentage, got {}",
                    self.target_sei_growth_percent_per_month
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Lgmj1,
    Schimpe2018,
}

impl Preset {
    pub const fn all() -> [Preset; 2] {
        [Self::Lgmj1, Self::Schimpe2018]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lgmj1 => "lgmj1",
            Self::Schimpe2018 => "schimpe2018",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Lgmj1 => "LG MJ1 cell (Sturm et al. 2018) with electrode SOH stoichiometries",
            Self::Schimpe2018 => {
                "Graphite/LFP cell (Schimpe et al. 2018) with SEI calendar-ageing fit"
            }
        }
    }

    pub fn from_name(name: &str) -> ParamResult<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|preset| preset.as_str() == normalized)
            .ok_or_else(|| {
                ParamError::input_validation(
                    "INPUT.PRESET",
                    format!(
                        "unknown preset '{}'; expected one of: {}",
                        name,
                        Self::all().map(Self::as_str).join(", ")
                    ),
                )
            })
    }

    pub fn pipeline(self, options: &PresetOptions) -> ParamResult<Pipeline> {
        match self {
            Self::Lgmj1 => lgmj1(options),
            Self::Schimpe2018 => schimpe2018(options),
        }
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

fn named(name: &'static str, stage: impl Stage + 'static) -> (&'static str, Box<dyn Stage>) {
    (name, Box::new(stage))
}

fn assemble(stages: Vec<(&'static str, Box<dyn Stage>)>, options: &PresetOptions) -> Pipeline {
    let pipeline = Pipeline::new(stages);
    match &options.cache_dir {
        Some(cache_dir) => pipeline.with_cache(cache_dir),
        None => pipeline,
    }
}

pub fn lgmj1(options: &PresetOptions) -> ParamResult<Pipeline> {
    options.validate()?;
    let stages = vec![
        named("defaults", standard_defaults()),
        named("temperatures", temperatures(options.temperature)),
        named("Sturm2018", sturm2018()),
        named(
            "electrode SOH calculations",
            ElectrodeSoh::new(KnownValue::CellCapacity),
        ),
    ];
    Ok(assemble(stages, options))
}

pub fn schimpe2018(options: &PresetOptions) -> ParamResult<Pipeline> {
    options.validate()?;
    let stages = vec![
        named("defaults", standard_defaults()),
        named("temperatures", temperatures(options.temperature)),
        named("Schimpe2018", schimpe2018_entry()),
        named("dimensions", AreaToSquareWidthHeight),
        named("initial soc", InitialSoc),
        named("surface area", SurfaceArea),
        named("capacity", CellCapacity),
        named("standard SEI", standard_sei_parameters()),
        named("initial SEI thickness", InitialSeiThickness),
        named(
            "sei rates",
            TargetSeiCalendarRate::reaction_limited(options.target_sei_growth_percent_per_month),
        ),
    ];
    Ok(assemble(stages, options))
}

#[cfg(test)]
mod tests {
    use super::{Preset, PresetOptions, lgmj1, schimpe2018};
    use crate::domain::ParamErrorCategory;
    use crate::pipeline::PipelineState;

    #[test]
    fn preset_names_round_trip() {
        for preset in Preset::all() {
            assert_eq!(Preset::from_name(preset.as_str()).expect("known name"), preset);
        }
        assert_eq!(Preset::from_name(" LGMJ1 ").expect("case-insensitive"), Preset::Lgmj1);

        let error = Preset::from_name("nmc").expect_err("unknown preset");
        assert_eq!(error.category(), ParamErrorCategory::InputValidation);
        assert!(error.message().contains("lgmj1, schimpe2018"));
    }

    #[test]
    fn preset_pipelines_declare_their_stages_in_order() {
        let options = PresetOptions::default();
        let pipeline = lgmj1(&options).expect("lgmj1 builds");
        assert_eq!(
            pipeline.stage_names().collect::<Vec<_>>(),
            vec![
                "defaults",
                "temperatures",
                "Sturm2018",
                "electrode SOH calculations"
            ]
        );
        assert_eq!(pipeline.state(), PipelineState::Created);
        assert!(pipeline.cache().is_none());

        let pipeline = schimpe2018(&options.with_cache("out")).expect("schimpe builds");
        assert_eq!(pipeline.len(), 10);
        assert_eq!(pipeline.stage_names().last(), Some("sei rates"));
        assert_eq!(pipeline.cache(), Some(std::path::Path::new("out")));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = PresetOptions {
            temperature: -5.0,
            ..PresetOptions::default()
        };
        let error = Preset::Lgmj1.pipeline(&options).expect_err("negative kelvin");
        assert_eq!(error.placeholder(), "INPUT.PRESET_OPTIONS");

        let options = PresetOptions {
            target_sei_growth_percent_per_month: f64::NAN,
            ..PresetOptions::default()
        };
        assert!(Preset::Schimpe2018.pipeline(&options).is_err());
    }
}
