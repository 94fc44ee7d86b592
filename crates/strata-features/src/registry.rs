//! Named configured features loaded from TOML, validated before use.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use strata_blocks::MAX_PLANT_AGE;
use thiserror::Error;

use crate::feature::ConfiguredFeature;
use crate::providers::{FloatProvider, IntProvider};
use crate::rule_test::RuleTest;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading feature config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing feature config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("feature `{feature}`: {reason}")]
    Invalid { feature: String, reason: String },
}

#[derive(Deserialize)]
struct FeatureFile {
    #[serde(default)]
    features: BTreeMap<String, ConfiguredFeature>,
}

/// Every configured feature of one document, in name order.
#[derive(Clone, Debug, Default)]
pub struct FeatureRegistry {
    features: Vec<(String, ConfiguredFeature)>,
    by_name: HashMap<String, usize>,
}

impl FeatureRegistry {
    /// Parses `[features.<name>]` tables and validates each one.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: FeatureFile = toml::from_str(s)?;
        let mut reg = FeatureRegistry::default();
        for (name, feature) in file.features {
            validate(&name, &feature)?;
            reg.by_name.insert(name.clone(), reg.features.len());
            reg.features.push((name, feature));
        }
        Ok(reg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)?;
        let reg = Self::from_toml_str(&s)?;
        log::info!(target: "features", "loaded {} features from {}", reg.len(), path.display());
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ConfiguredFeature> {
        self.by_name.get(name).map(|&i| &self.features[i].1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfiguredFeature)> {
        self.features.iter().map(|(n, f)| (n.as_str(), f))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        feature: path.to_string(),
        reason: reason.into(),
    }
}

fn ensure(path: &str, ok: bool, reason: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if ok { Ok(()) } else { Err(invalid(path, reason())) }
}

fn chance(path: &str, field: &str, v: f32) -> Result<(), ConfigError> {
    ensure(path, (0.0..=1.0).contains(&v), || format!("{field} = {v} is outside [0, 1]"))
}

fn positive(path: &str, field: &str, v: i32) -> Result<(), ConfigError> {
    ensure(path, v > 0, || format!("{field} = {v} must be positive"))
}

fn non_negative(path: &str, field: &str, v: i32) -> Result<(), ConfigError> {
    ensure(path, v >= 0, || format!("{field} = {v} must not be negative"))
}

fn int_provider(path: &str, field: &str, p: &IntProvider, floor: i32) -> Result<(), ConfigError> {
    p.check().map_err(|e| invalid(path, format!("{field}: {e}")))?;
    ensure(path, p.min_value() >= floor, || {
        format!("{field} may sample {} but must stay at or above {floor}", p.min_value())
    })
}

fn float_provider(path: &str, field: &str, p: &FloatProvider) -> Result<(), ConfigError> {
    p.check().map_err(|e| invalid(path, format!("{field}: {e}")))
}

fn checked(path: &str, field: &str, r: Result<(), String>) -> Result<(), ConfigError> {
    r.map_err(|e| invalid(path, format!("{field}: {e}")))
}

/// Rejects configurations that would panic or divide by zero during placement.
/// Nested features are checked under `<parent>.<field>` paths.
pub fn validate(path: &str, feature: &ConfiguredFeature) -> Result<(), ConfigError> {
    match feature {
        ConfiguredFeature::NoOp
        | ConfiguredFeature::BlueIce
        | ConfiguredFeature::EndIsland
        | ConfiguredFeature::Vines
        | ConfiguredFeature::BlockBlob(_) => Ok(()),
        ConfiguredFeature::DripstoneCluster(c) => {
            positive(path, "floor_to_ceiling_search_range", c.floor_to_ceiling_search_range)?;
            int_provider(path, "height", &c.height, 0)?;
            int_provider(path, "radius", &c.radius, 0)?;
            int_provider(path, "dripstone_block_layer_thickness", &c.dripstone_block_layer_thickness, 0)?;
            non_negative(path, "height_deviation", c.height_deviation)?;
            non_negative(path, "max_stalagmite_stalactite_height_diff", c.max_stalagmite_stalactite_height_diff)?;
            float_provider(path, "density", &c.density)?;
            float_provider(path, "wetness", &c.wetness)?;
            chance(
                path,
                "chance_of_dripstone_column_at_max_distance_from_center",
                c.chance_of_dripstone_column_at_max_distance_from_center,
            )?;
            positive(
                path,
                "max_distance_from_edge_affecting_chance_of_dripstone_column",
                c.max_distance_from_edge_affecting_chance_of_dripstone_column,
            )?;
            positive(
                path,
                "max_distance_from_center_affecting_height_bias",
                c.max_distance_from_center_affecting_height_bias,
            )
        }
        ConfiguredFeature::LargeDripstone(c) => {
            positive(path, "floor_to_ceiling_search_range", c.floor_to_ceiling_search_range)?;
            int_provider(path, "column_radius", &c.column_radius, 1)?;
            float_provider(path, "height_scale", &c.height_scale)?;
            float_provider(path, "stalactite_bluntness", &c.stalactite_bluntness)?;
            float_provider(path, "stalagmite_bluntness", &c.stalagmite_bluntness)?;
            float_provider(path, "wind_speed", &c.wind_speed)?;
            ensure(path, c.max_column_radius_to_cave_height_ratio > 0.0, || {
                "max_column_radius_to_cave_height_ratio must be positive".into()
            })
        }
        ConfiguredFeature::PointedDripstone(c) => {
            chance(path, "chance_of_taller_dripstone", c.chance_of_taller_dripstone)?;
            chance(path, "chance_of_directional_spread", c.chance_of_directional_spread)?;
            chance(path, "chance_of_spread_radius2", c.chance_of_spread_radius2)?;
            chance(path, "chance_of_spread_radius3", c.chance_of_spread_radius3)
        }
        ConfiguredFeature::BlockPile(c) => checked(path, "state_provider", c.state_provider.check()),
        ConfiguredFeature::RootSystem(c) => {
            validate(&format!("{path}.feature"), &c.feature)?;
            non_negative(path, "required_vertical_space_for_tree", c.required_vertical_space_for_tree)?;
            positive(path, "root_radius", c.root_radius)?;
            positive(path, "hanging_root_radius", c.hanging_root_radius)?;
            positive(path, "hanging_roots_vertical_span", c.hanging_roots_vertical_span)?;
            non_negative(path, "root_placement_attempts", c.root_placement_attempts)?;
            non_negative(path, "hanging_root_placement_attempts", c.hanging_root_placement_attempts)?;
            non_negative(path, "root_column_max_height", c.root_column_max_height)?;
            checked(path, "root_state_provider", c.root_state_provider.check())?;
            checked(path, "hanging_root_state_provider", c.hanging_root_state_provider.check())
        }
        ConfiguredFeature::Tree(c) => {
            int_provider(path, "trunk_height", &c.trunk_height, 1)?;
            int_provider(path, "foliage_radius", &c.foliage_radius, 0)?;
            checked(path, "trunk_provider", c.trunk_provider.check())?;
            checked(path, "foliage_provider", c.foliage_provider.check())?;
            checked(path, "dirt_provider", c.dirt_provider.check())
        }
        ConfiguredFeature::SimpleBlock(c) => checked(path, "to_place", c.to_place.check()),
        ConfiguredFeature::TwistingVines(c) => {
            non_negative(path, "spread_width", c.spread_width)?;
            non_negative(path, "spread_height", c.spread_height)?;
            positive(path, "max_height", c.max_height)?;
            ensure(path, c.min_age <= c.max_age, || {
                format!("min_age {} exceeds max_age {}", c.min_age, c.max_age)
            })?;
            ensure(
                path,
                c.min_age >= 0 && c.max_age <= i32::from(MAX_PLANT_AGE),
                || format!("ages must lie in 0..={MAX_PLANT_AGE}"),
            )
        }
        ConfiguredFeature::VegetationPatch(c) | ConfiguredFeature::WaterloggedVegetationPatch(c) => {
            validate(&format!("{path}.vegetation_feature"), &c.vegetation_feature)?;
            checked(path, "ground_state", c.ground_state.check())?;
            int_provider(path, "depth", &c.depth, 0)?;
            int_provider(path, "xz_radius", &c.xz_radius, 0)?;
            non_negative(path, "vertical_range", c.vertical_range)?;
            chance(path, "extra_bottom_block_chance", c.extra_bottom_block_chance)?;
            chance(path, "vegetation_chance", c.vegetation_chance)?;
            chance(path, "extra_edge_column_chance", c.extra_edge_column_chance)
        }
        ConfiguredFeature::ReplaceBlobs(c) => int_provider(path, "radius", &c.radius, 0),
        ConfiguredFeature::ReplaceBlock(c) => {
            for t in &c.targets {
                if let RuleTest::RandomBlockMatch { probability, .. } = t.target {
                    chance(path, "targets.probability", probability)?;
                }
            }
            Ok(())
        }
        ConfiguredFeature::Fossil(c) => {
            ensure(path, !c.fossil_structures.is_empty(), || "fossil_structures is empty".into())?;
            ensure(path, c.fossil_structures.len() == c.overlay_structures.len(), || {
                format!(
                    "{} fossil structures but {} overlay structures",
                    c.fossil_structures.len(),
                    c.overlay_structures.len()
                )
            })?;
            for p in c.fossil_processors.iter().chain(&c.overlay_processors) {
                checked(path, "processors", p.check())?;
            }
            non_negative(path, "max_empty_corners_allowed", c.max_empty_corners_allowed)
        }
        ConfiguredFeature::RandomBooleanSelector(c) => {
            validate(&format!("{path}.feature_true"), &c.feature_true)?;
            validate(&format!("{path}.feature_false"), &c.feature_false)
        }
        ConfiguredFeature::RandomSelector(c) => {
            ensure(path, !c.features.is_empty(), || "features is empty".into())?;
            for (i, w) in c.features.iter().enumerate() {
                chance(path, &format!("features[{i}].chance"), w.chance)?;
                validate(&format!("{path}.features[{i}]"), &w.feature)?;
            }
            validate(&format!("{path}.default"), &c.default)
        }
        ConfiguredFeature::SimpleRandomSelector(c) => {
            ensure(path, !c.features.is_empty(), || "features is empty".into())?;
            for (i, f) in c.features.iter().enumerate() {
                validate(&format!("{path}.features[{i}]"), f)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_named_features_in_order() {
        let reg = FeatureRegistry::from_toml_str(
            r#"
[features.pile]
type = "block_pile"
state_provider = "hay_block"

[features.cluster]
type = "dripstone_cluster"

[features.nothing]
type = "no_op"
"#,
        )
        .unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), ["cluster", "nothing", "pile"]);
        assert_eq!(reg.get("pile").map(|f| f.kind_name()), Some("block_pile"));
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn empty_simple_selector_is_rejected() {
        let err = FeatureRegistry::from_toml_str(
            r#"
[features.pick]
type = "simple_random_selector"
features = []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref feature, .. } if feature == "pick"), "{err}");
    }

    #[test]
    fn nested_errors_name_their_path() {
        let err = FeatureRegistry::from_toml_str(
            r#"
[features.coin]
type = "random_boolean_selector"

[features.coin.feature_true]
type = "no_op"

[features.coin.feature_false]
type = "twisting_vines"
min_age = 20
max_age = 18
"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Invalid { feature, reason } => {
                assert_eq!(feature, "coin.feature_false");
                assert!(reason.contains("min_age"));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn zero_root_radius_is_rejected() {
        let err = FeatureRegistry::from_toml_str(
            r#"
[features.roots]
type = "root_system"
root_radius = 0

[features.roots.feature]
type = "no_op"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("root_radius"), "{err}");
    }

    #[test]
    fn unknown_type_is_a_parse_error() {
        let err = FeatureRegistry::from_toml_str("[features.x]\ntype = \"volcano\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
