// Copyright (c) 2023 The MobileCoin Foundation

//! Loading certificates and revocation lists from their X.509 encodings.
//!
//! Only the fields used by validation are kept. Signatures are not verified
//! here, certificates and CRLs are expected to come from a source that did.

use crate::certificate::{BASIC_CONSTRAINTS_OID, EXTENDED_KEY_USAGE_OID, KEY_USAGE_OID};
use crate::{
    BasicConstraints, Certificate, CrlRevocationChecker, DistinguishedName, Error, Extensions,
    KeyUsage, Result, RevokedCertificate, Validity,
};
use alloc::vec::Vec;
use x509_cert::crl::CertificateList;
use x509_cert::der::{Decode, DecodePem, Encode};
use x509_cert::ext::pkix::{
    BasicConstraints as X509BasicConstraints, ExtendedKeyUsage as X509ExtendedKeyUsage,
    KeyUsage as X509KeyUsage,
};
use x509_cert::ext::Extension;
use x509_cert::Certificate as X509Certificate;

impl Certificate {
    /// Load a certificate from DER encoded bytes.
    ///
    /// # Errors
    /// `Error::CertificateDecoding` if `der` isn't a valid certificate,
    /// `Error::ExtensionDecoding` if a decoded extension is malformed.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let certificate = X509Certificate::from_der(der)?;
        Self::try_from(&certificate)
    }

    /// Load a certificate from a PEM encoded string.
    ///
    /// # Errors
    /// `Error::CertificateDecoding` if `pem` isn't a valid certificate,
    /// `Error::ExtensionDecoding` if a decoded extension is malformed.
    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<Self> {
        let certificate = X509Certificate::from_pem(pem)?;
        Self::try_from(&certificate)
    }

    /// Load every certificate of a PEM encoded chain, in the order they
    /// appear.
    ///
    /// # Errors
    /// `Error::CertificateDecoding` if any entry isn't a valid certificate.
    pub fn chain_from_pem(pem: impl AsRef<[u8]>) -> Result<Vec<Self>> {
        X509Certificate::load_pem_chain(pem.as_ref())?
            .iter()
            .map(Self::try_from)
            .collect()
    }
}

impl TryFrom<&X509Certificate> for Certificate {
    type Error = Error;

    fn try_from(certificate: &X509Certificate) -> Result<Self> {
        let tbs = &certificate.tbs_certificate;
        let validity = Validity::new(
            tbs.validity.not_before.to_unix_duration(),
            tbs.validity.not_after.to_unix_duration(),
        );

        let mut extensions = Extensions::new();
        for extension in tbs.extensions.iter().flatten() {
            extensions = add_extension(extensions, extension)?;
        }

        Ok(Certificate::new(
            tbs.subject.clone().into(),
            tbs.issuer.clone().into(),
            tbs.serial_number.as_bytes(),
            validity,
        )
        .with_extensions(extensions)
        .with_public_key_info(tbs.subject_public_key_info.to_der()?))
    }
}

fn add_extension(extensions: Extensions, extension: &Extension) -> Result<Extensions> {
    let oid = extension.extn_id;
    let value = extension.extn_value.as_bytes();
    let extensions = if oid == KEY_USAGE_OID {
        let usage = X509KeyUsage::from_der(value).map_err(Error::ExtensionDecoding)?;
        extensions.with_key_usage(key_usages(&usage))
    } else if oid == EXTENDED_KEY_USAGE_OID {
        let usage = X509ExtendedKeyUsage::from_der(value).map_err(Error::ExtensionDecoding)?;
        extensions.with_extended_key_usage(usage.0)
    } else if oid == BASIC_CONSTRAINTS_OID {
        let constraints = X509BasicConstraints::from_der(value).map_err(Error::ExtensionDecoding)?;
        extensions.with_basic_constraints(BasicConstraints {
            ca: constraints.ca,
            path_len_constraint: constraints.path_len_constraint,
        })
    } else {
        extensions.with_other(oid)
    };
    Ok(extensions)
}

fn key_usages(usage: &X509KeyUsage) -> impl Iterator<Item = KeyUsage> {
    [
        (usage.digital_signature(), KeyUsage::DigitalSignature),
        (usage.non_repudiation(), KeyUsage::NonRepudiation),
        (usage.key_encipherment(), KeyUsage::KeyEncipherment),
        (usage.data_encipherment(), KeyUsage::DataEncipherment),
        (usage.key_agreement(), KeyUsage::KeyAgreement),
        (usage.key_cert_sign(), KeyUsage::KeyCertSign),
        (usage.crl_sign(), KeyUsage::CrlSign),
        (usage.encipher_only(), KeyUsage::EncipherOnly),
        (usage.decipher_only(), KeyUsage::DecipherOnly),
    ]
    .into_iter()
    .filter_map(|(asserted, usage)| asserted.then_some(usage))
}

/// The revoked entries of a certificate revocation list.
///
/// The signature of the list is not verified.
pub fn revoked_certificates(crl: &CertificateList) -> Vec<RevokedCertificate> {
    let issuer = DistinguishedName::from(crl.tbs_cert_list.issuer.clone());
    crl.tbs_cert_list
        .revoked_certificates
        .iter()
        .flatten()
        .map(|revoked| {
            RevokedCertificate::new(
                issuer.clone(),
                revoked.serial_number.as_bytes(),
                revoked.revocation_date.to_unix_duration(),
            )
        })
        .collect()
}

impl CrlRevocationChecker {
    /// Add the revoked entries of `crl`.
    pub fn add_crl(&mut self, crl: &CertificateList) {
        self.extend(revoked_certificates(crl));
    }

    /// Add the revoked entries of a DER encoded CRL.
    ///
    /// # Errors
    /// `Error::CertificateDecoding` if `der` isn't a valid CRL.
    pub fn add_der_crl(&mut self, der: &[u8]) -> Result<()> {
        let crl = CertificateList::from_der(der)?;
        self.add_crl(&crl);
        Ok(())
    }
}

impl From<&CertificateList> for CrlRevocationChecker {
    fn from(crl: &CertificateList) -> Self {
        Self::new(revoked_certificates(crl))
    }
}
