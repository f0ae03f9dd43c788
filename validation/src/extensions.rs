// Copyright (c) 2023 The MobileCoin Foundation

//! Required certificate extension policies.
//!
//! An [`ExtensionRequirement`] names an extension and the value it must
//! have. An [`ExtensionPolicy`] applies a list of requirements in one
//! [`RequirementScope`] to a certificate and reports the first requirement
//! that isn't met.

use crate::certificate::{BASIC_CONSTRAINTS_OID, EXTENDED_KEY_USAGE_OID, KEY_USAGE_OID};
use crate::report::EXTENSIONS_CHECK;
use crate::{Certificate, Extensions, KeyUsage, ReportItem, Severity};
use alloc::collections::BTreeSet;
use alloc::format;
use der::oid::ObjectIdentifier;
use serde::{Deserialize, Serialize};

/// A required extension and the value it must have.
///
/// A missing extension never satisfies a requirement.
///
/// Supports de/serialization to/from JSON, tagged by the `type` field:
/// ```
/// use mc_signature_validation::{ExtensionRequirement, KeyUsage};
/// let json = r#"{"type": "keyUsage", "usages": ["keyCertSign", "crlSign"]}"#;
/// let requirement: ExtensionRequirement = serde_json::from_str(json).unwrap();
/// assert_eq!(
///     requirement,
///     ExtensionRequirement::key_usage([KeyUsage::KeyCertSign, KeyUsage::CrlSign])
/// );
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExtensionRequirement {
    /// Every listed key usage bit must be asserted.
    KeyUsage {
        /// The bits that must be asserted
        usages: BTreeSet<KeyUsage>,
    },
    /// Every listed purpose must be present in the extended key usage.
    ExtendedKeyUsage {
        /// The purposes that must be present
        #[serde(with = "oid_set")]
        purposes: BTreeSet<ObjectIdentifier>,
    },
    /// The CA flag must match, and the path length must allow at least
    /// `min_path_len` intermediates when given.
    BasicConstraints {
        /// The expected CA flag
        ca: bool,
        /// The minimum path length constraint, an unlimited path length
        /// always satisfies it
        #[serde(default, rename = "minPathLen")]
        min_path_len: Option<u8>,
    },
}

impl ExtensionRequirement {
    /// Require the key usage bits in `usages`.
    pub fn key_usage(usages: impl IntoIterator<Item = KeyUsage>) -> Self {
        Self::KeyUsage {
            usages: usages.into_iter().collect(),
        }
    }

    /// Require the extended key usage purposes in `purposes`.
    pub fn extended_key_usage(purposes: impl IntoIterator<Item = ObjectIdentifier>) -> Self {
        Self::ExtendedKeyUsage {
            purposes: purposes.into_iter().collect(),
        }
    }

    /// Require basic constraints with the given CA flag and minimum path
    /// length.
    pub fn basic_constraints(ca: bool, min_path_len: impl Into<Option<u8>>) -> Self {
        Self::BasicConstraints {
            ca,
            min_path_len: min_path_len.into(),
        }
    }

    /// The identifier of the required extension.
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::KeyUsage { .. } => KEY_USAGE_OID,
            Self::ExtendedKeyUsage { .. } => EXTENDED_KEY_USAGE_OID,
            Self::BasicConstraints { .. } => BASIC_CONSTRAINTS_OID,
        }
    }

    /// Returns `true` if `extensions` meet this requirement.
    pub fn is_satisfied_by(&self, extensions: &Extensions) -> bool {
        match self {
            Self::KeyUsage { usages } => extensions
                .key_usage()
                .map_or(false, |actual| usages.is_subset(actual)),
            Self::ExtendedKeyUsage { purposes } => extensions
                .extended_key_usage()
                .map_or(false, |actual| purposes.is_subset(actual)),
            Self::BasicConstraints { ca, min_path_len } => {
                extensions.basic_constraints().map_or(false, |actual| {
                    let path_len_ok = match (min_path_len, actual.path_len_constraint) {
                        (Some(min), Some(len)) => len >= *min,
                        _ => true,
                    };
                    actual.ca == *ca && path_len_ok
                })
            }
        }
    }
}

/// Which certificates a set of requirements applies to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RequirementScope {
    /// Requirements given for one validation call, only applied to the
    /// certificate being validated.
    Call,
    /// Requirements from the validator settings, applied to every other
    /// certificate in the chain.
    Global,
}

/// Applies a list of [`ExtensionRequirement`]s to certificates.
#[derive(Clone, Copy, Debug)]
pub struct ExtensionPolicy<'r> {
    scope: RequirementScope,
    requirements: &'r [ExtensionRequirement],
}

impl<'r> ExtensionPolicy<'r> {
    /// Create a new instance.
    pub fn new(scope: RequirementScope, requirements: &'r [ExtensionRequirement]) -> Self {
        Self {
            scope,
            requirements,
        }
    }

    /// Check `certificate` against the requirements.
    ///
    /// Returns an invalid [`ReportItem`] for the first requirement that isn't
    /// met, or `None` when all are met.
    pub fn check<'a>(&self, certificate: &'a Certificate) -> Option<ReportItem<'a>> {
        let failed = self
            .requirements
            .iter()
            .find(|requirement| !requirement.is_satisfied_by(certificate.extensions()))?;

        let oid = failed.oid();
        let message = match self.scope {
            RequirementScope::Call => format!("Required extension {oid} is missing or incorrect."),
            RequirementScope::Global => {
                format!("Globally required extension {oid} is missing or incorrect.")
            }
        };
        Some(ReportItem::new(
            certificate,
            EXTENSIONS_CHECK,
            message,
            Severity::Invalid,
        ))
    }
}

/// Serialize a set of object identifiers as dotted strings.
mod oid_set {
    use alloc::collections::BTreeSet;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use der::oid::ObjectIdentifier;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        oids: &BTreeSet<ObjectIdentifier>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(oids.iter().map(ToString::to_string))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<ObjectIdentifier>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|oid| ObjectIdentifier::new(oid).map_err(D::Error::custom))
            .collect()
    }
}
