// Copyright (c) 2023 The MobileCoin Foundation

//! Policy settings for a [`crate::ChainValidator`].

use crate::{ExtensionRequirement, Result};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// The validation policy.
///
/// Supports de/serialization to/from JSON. Unknown JSON fields are flagged as
/// an error:
/// ```
/// use mc_signature_validation::{ExtensionRequirement, KeyUsage, ValidatorSettings};
/// let settings = ValidatorSettings::from_json(
///     r#"{
///         "globalRequiredExtensions": [
///             {"type": "keyUsage", "usages": ["keyCertSign"]}
///         ],
///         "proceedAfterFail": false
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(
///     settings.global_required_extensions(),
///     &[ExtensionRequirement::key_usage([KeyUsage::KeyCertSign])]
/// );
/// assert!(!settings.proceed_after_fail());
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidatorSettings {
    /// Requirements applied to every certificate in the chain except the one
    /// being validated.
    #[serde(default)]
    global_required_extensions: Vec<ExtensionRequirement>,
    /// Whether to keep checking the chain after the first failure.
    #[serde(default = "proceed_after_fail_default")]
    proceed_after_fail: bool,
}

fn proceed_after_fail_default() -> bool {
    true
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            global_required_extensions: Vec::new(),
            proceed_after_fail: proceed_after_fail_default(),
        }
    }
}

impl ValidatorSettings {
    /// Create a new instance.
    pub fn new(
        global_required_extensions: impl IntoIterator<Item = ExtensionRequirement>,
        proceed_after_fail: bool,
    ) -> Self {
        Self {
            global_required_extensions: global_required_extensions.into_iter().collect(),
            proceed_after_fail,
        }
    }

    /// Parse settings from JSON.
    ///
    /// # Errors
    /// `Error::Settings` if `json` isn't valid settings.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Requirements applied to every certificate but the one being validated.
    pub fn global_required_extensions(&self) -> &[ExtensionRequirement] {
        &self.global_required_extensions
    }

    /// Whether to keep checking the chain after the first failure.
    pub fn proceed_after_fail(&self) -> bool {
        self.proceed_after_fail
    }

    pub(crate) fn set_global_required_extensions(
        &mut self,
        requirements: impl IntoIterator<Item = ExtensionRequirement>,
    ) {
        self.global_required_extensions = requirements.into_iter().collect();
    }

    pub(crate) fn set_proceed_after_fail(&mut self, proceed_after_fail: bool) {
        self.proceed_after_fail = proceed_after_fail;
    }
}
