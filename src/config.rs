//! TOML-based projection configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EngineError};
use crate::model::constants::TIME_PARAMS;
use crate::model::profile::{
    DEFAULT_DATA_CENTER, DEFAULT_UTILITY, DataCenterProfile, UtilityProfile,
};
use crate::model::tariff::{GENERIC_TARIFF, TariffStructure};
use crate::model::trajectory::{Trajectories, generate_all_trajectories, validate_inputs};
use crate::utilities::{UTILITY_PROFILES, UtilityReference, get_utility_by_id};

/// Top-level projection configuration parsed from TOML.
///
/// Every table is optional and falls back to the engine defaults. Load from
/// TOML with [`ProjectionConfig::from_toml_file`] or start from a preset with
/// [`ProjectionConfig::from_preset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Projection horizon.
    #[serde(default)]
    pub projection: ProjectionSection,
    /// Host utility profile.
    #[serde(default)]
    pub utility: UtilityProfile,
    /// Data center profile.
    #[serde(default)]
    pub datacenter: DataCenterProfile,
    /// Large-load tariff; `None` bills the data center on the generic rate structure.
    #[serde(default, deserialize_with = "deserialize_tariff")]
    pub tariff: Option<TariffStructure>,
}

/// Projection horizon parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionSection {
    /// Years projected after the base year.
    pub years: u32,
    /// Calendar year of the current bill. Fixed; accepted for documentation.
    pub base_year: u32,
}

impl Default for ProjectionSection {
    fn default() -> Self {
        Self {
            years: TIME_PARAMS.projection_years,
            base_year: TIME_PARAMS.base_year,
        }
    }
}

/// `[tariff]` table: a preset name or a full inline tariff.
#[derive(Deserialize)]
#[serde(untagged)]
enum TariffSection {
    Preset { preset: String },
    Inline(TariffStructure),
}

fn deserialize_tariff<'de, D>(deserializer: D) -> Result<Option<TariffStructure>, D::Error>
where
    D: Deserializer<'de>,
{
    match TariffSection::deserialize(deserializer)? {
        TariffSection::Preset { preset } => TariffStructure::preset(&preset)
            .map(Some)
            .map_err(de::Error::custom),
        TariffSection::Inline(tariff) => Ok(Some(tariff)),
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::default_preset()
    }
}

impl ProjectionConfig {
    /// Default utility and data center billed on the generic tariff.
    pub fn default_preset() -> Self {
        Self {
            projection: ProjectionSection::default(),
            utility: DEFAULT_UTILITY,
            datacenter: DEFAULT_DATA_CENTER,
            tariff: Some(GENERIC_TARIFF),
        }
    }

    /// Projection seeded from a reference utility and its large-load tariff.
    pub fn for_utility(reference: &UtilityReference) -> Result<Self, ConfigError> {
        Ok(Self {
            projection: ProjectionSection::default(),
            utility: reference.to_profile(),
            datacenter: reference.default_datacenter(),
            tariff: Some(TariffStructure::preset(reference.tariff_preset)?),
        })
    }

    /// Available preset names: `default` followed by every reference utility id.
    pub fn preset_names() -> Vec<&'static str> {
        std::iter::once("default")
            .chain(UTILITY_PROFILES.iter().map(|u| u.id))
            .collect()
    }

    /// Loads a projection from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        if name == "default" {
            return Ok(Self::default_preset());
        }
        match get_utility_by_id(name) {
            Some(reference) => Self::for_utility(reference),
            None => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::preset_names().join(", ")
                ),
            )),
        }
    }

    /// Parses a projection from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a projection from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown fields,
    /// or names an unknown tariff preset or demand charge type.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns every violation.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = validate_inputs(
            &self.utility,
            &self.datacenter,
            self.projection.years,
            self.tariff.as_ref(),
        );
        if self.projection.base_year != TIME_PARAMS.base_year {
            errors.push(ConfigError::new(
                "projection.base_year",
                format!("must be {}", TIME_PARAMS.base_year),
            ));
        }
        errors
    }

    /// Validates the configuration and projects all four scenarios.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if validation fails.
    pub fn project(&self) -> Result<Trajectories, EngineError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(EngineError::InvalidConfig(errors));
        }
        generate_all_trajectories(
            &self.utility,
            &self.datacenter,
            self.projection.years,
            self.tariff.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::MarketType;
    use crate::model::tariff::{DemandChargeType, ERCOT_TARIFF, PSO_TARIFF};

    #[test]
    fn default_preset_valid() {
        let cfg = ProjectionConfig::default_preset();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.projection.years, 10);
        assert_eq!(cfg.tariff, Some(GENERIC_TARIFF));
    }

    #[test]
    fn from_preset_unknown() {
        let err = ProjectionConfig::from_preset("nonexistent").unwrap_err();
        assert_eq!(err.field, "preset");
        assert!(err.message.contains("unknown preset"));
        assert!(err.message.contains("ercot-texas"));
    }

    #[test]
    fn utility_presets_pair_matching_tariff() {
        let pso = ProjectionConfig::from_preset("pso-oklahoma").unwrap();
        assert_eq!(pso.tariff, Some(PSO_TARIFF));
        assert_eq!(pso.datacenter.capacity_mw, 2000.0);

        let ercot = ProjectionConfig::from_preset("ercot-texas").unwrap();
        assert_eq!(ercot.tariff, Some(ERCOT_TARIFF));
        assert_eq!(ercot.utility.market_type, MarketType::Ercot);

        let aps = ProjectionConfig::from_preset("aps-arizona").unwrap();
        assert_eq!(aps.tariff, Some(GENERIC_TARIFF));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ProjectionConfig::preset_names() {
            let cfg = ProjectionConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[projection]
years = 15

[utility]
residential_customers = 460000
commercial_customers = 100000
industrial_customers = 15000
avg_monthly_bill = 130.0
system_peak_mw = 4400.0
market_type = "spp"

[datacenter]
capacity_mw = 2000.0
onsite_generation_mw = 400.0

[tariff]
preset = "pso"
"#;
        let cfg = ProjectionConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.projection.years), Some(15));
        assert_eq!(
            cfg.as_ref().map(|c| c.utility.market_type),
            Some(MarketType::Spp)
        );
        // unset fields keep defaults
        assert_eq!(
            cfg.as_ref().map(|c| c.datacenter.flex_peak_coincidence),
            Some(0.75)
        );
        assert_eq!(cfg.and_then(|c| c.tariff), Some(PSO_TARIFF));
    }

    #[test]
    fn inline_tariff_parses() {
        let toml = r#"
[tariff]
demand_charge_type = "CP_4"
peak_demand_charge = 5500.0
max_demand_charge = 1500.0
energy_charge = 50.0
flexibility_benefit_multiplier = 1.8
"#;
        let cfg = ProjectionConfig::from_toml_str(toml);
        let tariff = cfg.ok().and_then(|c| c.tariff);
        assert_eq!(
            tariff.as_ref().map(|t| t.demand_charge_type),
            Some(DemandChargeType::Cp4)
        );
        assert_eq!(tariff.and_then(|t| t.ratchet_percent), None);
    }

    #[test]
    fn missing_tariff_means_generic_rate_structure() {
        let cfg = ProjectionConfig::from_toml_str("[projection]\nyears = 5\n");
        assert_eq!(cfg.ok().map(|c| c.tariff), Some(None));
    }

    #[test]
    fn unknown_tariff_preset_rejected() {
        let err = ProjectionConfig::from_toml_str("[tariff]\npreset = \"pge\"\n").unwrap_err();
        assert_eq!(err.field, "toml");
        assert!(err.message.contains("pge"), "{}", err.message);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[utility]
residential_customers = 100
bogus_field = true
"#;
        assert!(ProjectionConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_long_horizon() {
        let mut cfg = ProjectionConfig::default_preset();
        cfg.projection.years = 51;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "projection.years"));
        cfg.projection.years = 50;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_moved_base_year() {
        let mut cfg = ProjectionConfig::default_preset();
        cfg.projection.base_year = 2030;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "projection.base_year"));
    }

    #[test]
    fn project_refuses_invalid_config() {
        let mut cfg = ProjectionConfig::default_preset();
        cfg.datacenter.capacity_mw = 0.0;
        let err = cfg.project().unwrap_err();
        let p = err.problems();
        assert!(p.iter().any(|e| e.field == "datacenter.capacity_mw"));
    }

    #[test]
    fn project_runs_default() {
        let t = ProjectionConfig::default_preset().project().unwrap();
        assert_eq!(t.baseline.points.len(), 11);
    }
}
