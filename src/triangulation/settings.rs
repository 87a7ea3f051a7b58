use crate::SettingsError;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings for a [`StaticTriangulation`](crate::triangulation::StaticTriangulation)
///
/// Use [`TriangulationSettingsBuilder`] to override individual fields; string
/// valued fields are checked when the builder is consumed.

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TriangulationSettings {
    ///remove redundant fill-in edges after elimination
    #[builder(default = "false")]
    pub minimality: bool,

    ///record the fill-in edges created at each elimination step
    #[builder(default = "true")]
    pub fill_in_tracking: bool,

    ///elimination sequence method ("weighted_fill", "ordered", "partial_order" or "amd")
    #[builder(default = r#""weighted_fill".to_string()"#)]
    pub elimination_method: String,

    ///junction tree assembly method ("merge" or "none")
    #[builder(default = r#""merge".to_string()"#)]
    pub junction_tree_method: String,

    ///a node whose weighted fill-in is less than this fraction of its
    ///clique weight is eliminated ahead of the min-fill candidates
    #[builder(default = "0.1")]
    pub quasi_ratio: f64,

    ///scaling of the AMD dense row threshold ("amd" method only)
    #[builder(default = "1.0")]
    pub amd_dense_scale: f64,
}

impl Default for TriangulationSettings {
    fn default() -> TriangulationSettings {
        TriangulationSettingsBuilder::default().build().unwrap()
    }
}

impl TriangulationSettings {
    /// Checks that the settings are valid: string fields must name a known
    /// method and numeric parameters must be finite and non-negative.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_elimination_method(&self.elimination_method)?;
        validate_junction_tree_method(&self.junction_tree_method)?;
        validate_quasi_ratio(self.quasi_ratio)?;
        validate_amd_dense_scale(self.amd_dense_scale)?;
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for TriangulationSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        TriangulationSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl TriangulationSettingsBuilder {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref method) = self.elimination_method {
            validate_elimination_method(method)?;
        }
        if let Some(ref method) = self.junction_tree_method {
            validate_junction_tree_method(method)?;
        }
        if let Some(ratio) = self.quasi_ratio {
            validate_quasi_ratio(ratio)?;
        }
        if let Some(scale) = self.amd_dense_scale {
            validate_amd_dense_scale(scale)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_elimination_method(method: &str) -> Result<(), SettingsError> {
    match method {
        "weighted_fill" => Ok(()),
        "ordered" => Ok(()),
        "partial_order" => Ok(()),
        "amd" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("elimination_method")),
    }
}

fn validate_junction_tree_method(method: &str) -> Result<(), SettingsError> {
    match method {
        "merge" => Ok(()),
        "none" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("junction_tree_method")),
    }
}

fn validate_quasi_ratio(ratio: f64) -> Result<(), SettingsError> {
    if ratio.is_finite() && ratio >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("quasi_ratio"))
    }
}

fn validate_amd_dense_scale(scale: f64) -> Result<(), SettingsError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("amd_dense_scale"))
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = TriangulationSettingsBuilder::default().build().unwrap();
    assert_eq!(settings, TriangulationSettings::default());
    assert!(!settings.minimality);
    assert!(settings.fill_in_tracking);

    // fail on unknown methods
    assert!(TriangulationSettingsBuilder::default()
        .elimination_method("foo".to_string())
        .build()
        .is_err());
    assert!(TriangulationSettingsBuilder::default()
        .junction_tree_method("foo".to_string())
        .build()
        .is_err());

    // fail on bad numerical values
    assert!(TriangulationSettingsBuilder::default()
        .quasi_ratio(-1.0)
        .build()
        .is_err());
    assert!(TriangulationSettingsBuilder::default()
        .amd_dense_scale(f64::NAN)
        .build()
        .is_err());

    // accept every known method
    for method in ["weighted_fill", "ordered", "partial_order", "amd"] {
        assert!(TriangulationSettingsBuilder::default()
            .elimination_method(method.to_string())
            .build()
            .is_ok());
    }

    // directly construct a bad TriangulationSettings and manually check
    let settings = TriangulationSettings {
        junction_tree_method: "foo".to_string(),
        ..TriangulationSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("junction_tree_method"))
    );
}
