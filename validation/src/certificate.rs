// Copyright (c) 2023 The MobileCoin Foundation

//! The certificate model the chain validator works on.
//!
//! A [`Certificate`] is an already decoded certificate. It exposes the
//! subject and issuer identities, the validity interval and the subset of
//! extensions that validation policies can ask about. See [`crate::x509`] for
//! building one from an X.509 encoding.

use crate::{DistinguishedName, Error, Result};
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::time::Duration;
use der::oid::ObjectIdentifier;
use serde::{Deserialize, Serialize};

/// Key usage extension, `id-ce-keyUsage`
pub const KEY_USAGE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.15");
/// Extended key usage extension, `id-ce-extKeyUsage`
pub const EXTENDED_KEY_USAGE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.37");
/// Basic constraints extension, `id-ce-basicConstraints`
pub const BASIC_CONSTRAINTS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");

/// The bits of the key usage extension as defined in
/// [4.2.1.3](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.3)
/// of RFC5280.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    /// digitalSignature (0)
    DigitalSignature,
    /// nonRepudiation, also known as contentCommitment (1)
    NonRepudiation,
    /// keyEncipherment (2)
    KeyEncipherment,
    /// dataEncipherment (3)
    DataEncipherment,
    /// keyAgreement (4)
    KeyAgreement,
    /// keyCertSign (5)
    KeyCertSign,
    /// cRLSign (6)
    CrlSign,
    /// encipherOnly (7)
    EncipherOnly,
    /// decipherOnly (8)
    DecipherOnly,
}

/// The basic constraints extension.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicConstraints {
    /// Whether the subject is a CA.
    pub ca: bool,
    /// The maximum number of non self-issued intermediates that may follow
    /// this certificate. `None` means unlimited.
    pub path_len_constraint: Option<u8>,
}

/// The extensions present on a certificate.
///
/// Only key usage, extended key usage and basic constraints are decoded,
/// every other extension is only tracked by its identifier.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extensions {
    key_usage: Option<BTreeSet<KeyUsage>>,
    extended_key_usage: Option<BTreeSet<ObjectIdentifier>>,
    basic_constraints: Option<BasicConstraints>,
    present: BTreeSet<ObjectIdentifier>,
}

impl Extensions {
    /// Create an empty extension set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key usage extension with the given bits asserted.
    pub fn with_key_usage(mut self, usages: impl IntoIterator<Item = KeyUsage>) -> Self {
        self.key_usage = Some(usages.into_iter().collect());
        self.present.insert(KEY_USAGE_OID);
        self
    }

    /// Add an extended key usage extension with the given purposes.
    pub fn with_extended_key_usage(
        mut self,
        purposes: impl IntoIterator<Item = ObjectIdentifier>,
    ) -> Self {
        self.extended_key_usage = Some(purposes.into_iter().collect());
        self.present.insert(EXTENDED_KEY_USAGE_OID);
        self
    }

    /// Add a basic constraints extension.
    pub fn with_basic_constraints(mut self, constraints: BasicConstraints) -> Self {
        self.basic_constraints = Some(constraints);
        self.present.insert(BASIC_CONSTRAINTS_OID);
        self
    }

    /// Record an extension that is not otherwise decoded.
    pub fn with_other(mut self, oid: ObjectIdentifier) -> Self {
        self.present.insert(oid);
        self
    }

    /// The asserted key usage bits, `None` when the extension is absent.
    pub fn key_usage(&self) -> Option<&BTreeSet<KeyUsage>> {
        self.key_usage.as_ref()
    }

    /// The extended key usage purposes, `None` when the extension is absent.
    pub fn extended_key_usage(&self) -> Option<&BTreeSet<ObjectIdentifier>> {
        self.extended_key_usage.as_ref()
    }

    /// The basic constraints, `None` when the extension is absent.
    pub fn basic_constraints(&self) -> Option<&BasicConstraints> {
        self.basic_constraints.as_ref()
    }

    /// Returns `true` if an extension with `oid` is present.
    pub fn contains(&self, oid: &ObjectIdentifier) -> bool {
        self.present.contains(oid)
    }

    /// Identifiers of every extension present.
    pub fn oids(&self) -> impl Iterator<Item = &ObjectIdentifier> {
        self.present.iter()
    }
}

/// The validity interval of a certificate, both ends inclusive.
///
/// Times are durations since the UNIX epoch.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Validity {
    not_before: Duration,
    not_after: Duration,
}

impl Validity {
    /// Create a new instance.
    pub fn new(not_before: Duration, not_after: Duration) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    /// Start of the validity interval
    pub fn not_before(&self) -> Duration {
        self.not_before
    }

    /// End of the validity interval
    pub fn not_after(&self) -> Duration {
        self.not_after
    }

    /// Check that `unix_time` falls within the interval.
    ///
    /// # Errors
    /// `Error::CertificateNotYetValid` if `unix_time` is before the start,
    /// `Error::CertificateExpired` if it is after the end.
    pub fn check(&self, unix_time: Duration) -> Result<()> {
        if unix_time < self.not_before {
            Err(Error::CertificateNotYetValid)
        } else if unix_time > self.not_after {
            Err(Error::CertificateExpired)
        } else {
            Ok(())
        }
    }
}

/// A decoded certificate.
///
/// Two certificates are equal when every field is equal. Names compare as
/// RFC5280 distinguished names and the subject public key info compares by
/// its DER encoding, so a copy of a certificate with another key is a
/// different certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate {
    subject: DistinguishedName,
    issuer: DistinguishedName,
    serial_number: Vec<u8>,
    validity: Validity,
    extensions: Extensions,
    public_key_info: Vec<u8>,
}

impl Certificate {
    /// Create a new certificate without extensions or a public key.
    ///
    /// # Arguments:
    /// * `subject` - The subject distinguished name.
    /// * `issuer` - The issuer distinguished name.
    /// * `serial_number` - The big endian serial number bytes.
    /// * `validity` - The validity interval.
    pub fn new(
        subject: DistinguishedName,
        issuer: DistinguishedName,
        serial_number: impl Into<Vec<u8>>,
        validity: Validity,
    ) -> Self {
        Self {
            subject,
            issuer,
            serial_number: serial_number.into(),
            validity,
            extensions: Extensions::default(),
            public_key_info: Vec::new(),
        }
    }

    /// Replace the extensions of this certificate.
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Replace the DER encoded subject public key info of this certificate.
    pub fn with_public_key_info(mut self, public_key_info: impl Into<Vec<u8>>) -> Self {
        self.public_key_info = public_key_info.into();
        self
    }

    /// The subject distinguished name
    pub fn subject(&self) -> &DistinguishedName {
        &self.subject
    }

    /// The issuer distinguished name
    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    /// The serial number bytes
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number
    }

    /// The validity interval
    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// The extensions
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The DER encoded subject public key info, empty when not provided.
    pub fn public_key_info(&self) -> &[u8] {
        &self.public_key_info
    }

    /// Returns `true` if the subject and issuer are the same name.
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }
}

impl Display for Certificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.subject)
    }
}
