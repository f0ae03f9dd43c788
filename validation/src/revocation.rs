// Copyright (c) 2023 The MobileCoin Foundation

//! Revocation checking of certificates in a chain.
//!
//! The chain validator doesn't know where revocation data comes from. It asks
//! a [`RevocationChecker`] about every certificate for which it resolved an
//! issuer, and records whatever item the checker returns.

use crate::report::REVOCATION_CHECK;
use crate::{Certificate, DistinguishedName, Error, ReportItem, Severity};
use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// A source of revocation status.
///
/// Implementations may perform I/O, timeouts and retries are theirs to
/// handle. Failing to obtain revocation data should be reported as an
/// [`Severity::Indeterminate`] item rather than ignored.
pub trait RevocationChecker: Debug {
    /// Check whether `certificate`, issued by `issuer`, is revoked at
    /// `unix_time`.
    ///
    /// Returns `None` when there is nothing to report.
    fn check<'a>(
        &self,
        certificate: &'a Certificate,
        issuer: &'a Certificate,
        unix_time: Duration,
    ) -> Option<ReportItem<'a>>;
}

impl<R: RevocationChecker + ?Sized> RevocationChecker for &R {
    fn check<'a>(
        &self,
        certificate: &'a Certificate,
        issuer: &'a Certificate,
        unix_time: Duration,
    ) -> Option<ReportItem<'a>> {
        (**self).check(certificate, issuer, unix_time)
    }
}

impl<R: RevocationChecker + ?Sized> RevocationChecker for Box<R> {
    fn check<'a>(
        &self,
        certificate: &'a Certificate,
        issuer: &'a Certificate,
        unix_time: Duration,
    ) -> Option<ReportItem<'a>> {
        (**self).check(certificate, issuer, unix_time)
    }
}

/// Skips revocation checking.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoRevocationCheck;

impl RevocationChecker for NoRevocationCheck {
    fn check<'a>(
        &self,
        _certificate: &'a Certificate,
        _issuer: &'a Certificate,
        _unix_time: Duration,
    ) -> Option<ReportItem<'a>> {
        None
    }
}

/// An entry of a certificate revocation list.
///
/// Supports de/serialization to/from JSON. The issuer is an RFC4514 string,
/// the serial number is hex encoded.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RevokedCertificate {
    issuer: DistinguishedName,
    #[serde(with = "hex")]
    serial_number: Vec<u8>,
    revocation_date: Duration,
}

impl RevokedCertificate {
    /// Create a new instance.
    ///
    /// # Arguments:
    /// * `issuer` - The distinguished name of the issuer that revoked the
    ///   certificate.
    /// * `serial_number` - The serial number of the revoked certificate.
    /// * `revocation_date` - When the certificate was revoked, as a duration
    ///   since the UNIX epoch.
    pub fn new(
        issuer: DistinguishedName,
        serial_number: impl Into<Vec<u8>>,
        revocation_date: Duration,
    ) -> Self {
        Self {
            issuer,
            serial_number: serial_number.into(),
            revocation_date,
        }
    }

    /// The issuer distinguished name
    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    /// The serial number of the revoked certificate
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number
    }

    /// When the certificate was revoked
    pub fn revocation_date(&self) -> Duration {
        self.revocation_date
    }

    fn matches(&self, certificate: &Certificate, issuer: &Certificate) -> bool {
        &self.issuer == issuer.subject() && self.serial_number == certificate.serial_number()
    }
}

/// Checks revocation against entries taken from certificate revocation lists.
///
/// The lists are expected to be verified by the caller.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CrlRevocationChecker {
    revoked: Vec<RevokedCertificate>,
}

impl CrlRevocationChecker {
    /// Create a new instance from revoked entries.
    pub fn new(revoked: impl IntoIterator<Item = RevokedCertificate>) -> Self {
        Self {
            revoked: revoked.into_iter().collect(),
        }
    }

    /// Add more revoked entries.
    pub fn extend(&mut self, revoked: impl IntoIterator<Item = RevokedCertificate>) {
        self.revoked.extend(revoked);
    }

    /// The revoked entries
    pub fn revoked(&self) -> &[RevokedCertificate] {
        &self.revoked
    }
}

impl RevocationChecker for CrlRevocationChecker {
    fn check<'a>(
        &self,
        certificate: &'a Certificate,
        issuer: &'a Certificate,
        unix_time: Duration,
    ) -> Option<ReportItem<'a>> {
        let entry = self
            .revoked
            .iter()
            .find(|entry| entry.matches(certificate, issuer))?;

        let subject = certificate.subject();
        let item = if entry.revocation_date <= unix_time {
            ReportItem::new(
                certificate,
                REVOCATION_CHECK,
                format!("Certificate {subject} is revoked."),
                Severity::Invalid,
            )
            .with_cause(Error::CertificateRevoked)
        } else {
            ReportItem::new(
                certificate,
                REVOCATION_CHECK,
                format!("Certificate {subject} was revoked after the validation date."),
                Severity::Info,
            )
        };
        Some(item)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Validity;

    const REVOKED_AT: Duration = Duration::from_secs(500);

    fn name(name: &str) -> DistinguishedName {
        name.parse().expect("Failed to parse name")
    }

    fn certificate(subject: &str, issuer: &str, serial: u8) -> Certificate {
        let validity = Validity::new(Duration::from_secs(0), Duration::from_secs(1_000));
        Certificate::new(name(subject), name(issuer), [serial], validity)
    }

    fn chain() -> (Certificate, Certificate) {
        let issuer = certificate("CN=Root", "CN=Root", 1);
        let leaf = certificate("CN=Leaf", "CN=Root", 2);
        (leaf, issuer)
    }

    fn checker() -> CrlRevocationChecker {
        CrlRevocationChecker::new([RevokedCertificate::new(
            name("CN=Root"),
            [2u8],
            REVOKED_AT,
        )])
    }

    #[test]
    fn no_revocation_check_is_silent() {
        let (leaf, issuer) = chain();
        assert_eq!(NoRevocationCheck.check(&leaf, &issuer, REVOKED_AT), None);
    }

    #[test]
    fn revoked_certificate_is_invalid() {
        let (leaf, issuer) = chain();

        let item = checker()
            .check(&leaf, &issuer, REVOKED_AT)
            .expect("Should be revoked");

        assert_eq!(item.certificate(), &leaf);
        assert_eq!(item.check_name(), "Certificate revocation check.");
        assert_eq!(item.message(), "Certificate CN=Leaf is revoked.");
        assert_eq!(item.severity(), Severity::Invalid);
        assert_eq!(item.cause(), Some(&Error::CertificateRevoked));
    }

    #[test]
    fn revoked_after_validation_time_is_info() {
        let (leaf, issuer) = chain();

        let item = checker()
            .check(&leaf, &issuer, REVOKED_AT - Duration::from_secs(1))
            .expect("Should report the later revocation");

        assert_eq!(item.severity(), Severity::Info);
        assert_eq!(item.cause(), None);
    }

    #[test]
    fn other_serial_is_not_revoked() {
        let (_, issuer) = chain();
        let other = certificate("CN=Other", "CN=Root", 3);

        assert_eq!(checker().check(&other, &issuer, REVOKED_AT), None);
    }

    #[test]
    fn same_serial_from_other_issuer_is_not_revoked() {
        let (leaf, _) = chain();
        let checker = CrlRevocationChecker::new([RevokedCertificate::new(
            name("CN=Other"),
            [2u8],
            REVOKED_AT,
        )]);
        let other_issuer = certificate("CN=Other", "CN=Other", 9);

        let (_, issuer) = chain();
        assert_eq!(checker.check(&leaf, &issuer, REVOKED_AT), None);
        assert!(checker.check(&leaf, &other_issuer, REVOKED_AT).is_some());
    }

    #[test]
    fn issuer_name_matches_ignoring_case() {
        let (leaf, issuer) = chain();
        let checker = CrlRevocationChecker::new([RevokedCertificate::new(
            name("CN=  ROOT"),
            [2u8],
            REVOKED_AT,
        )]);

        assert!(checker.check(&leaf, &issuer, REVOKED_AT).is_some());
    }

    #[test]
    fn boxed_checker_delegates() {
        let (leaf, issuer) = chain();
        let boxed: Box<dyn RevocationChecker> = Box::new(checker());
        assert!(boxed.check(&leaf, &issuer, REVOKED_AT).is_some());
    }

    #[test]
    fn revoked_entry_json() {
        let entry = RevokedCertificate::new(name("CN=Root"), [0x0au8, 0xff], REVOKED_AT);
        let json = serde_json::to_string(&entry).expect("Failed to serialize");
        assert_eq!(
            json,
            r#"{"issuer":"CN=Root","serialNumber":"0aff","revocationDate":{"secs":500,"nanos":0}}"#
        );
        let decoded: RevokedCertificate =
            serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(decoded, entry);
    }
}
