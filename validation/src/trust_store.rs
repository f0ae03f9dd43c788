// Copyright (c) 2023 The MobileCoin Foundation

//! Trust anchors and known certificates used to build a chain.

use crate::Certificate;
use alloc::vec::Vec;

/// How a [`TrustStore`] classifies a certificate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TrustClass {
    /// A trust anchor, reaching it ends chain building successfully.
    Trusted,
    /// Usable to resolve the issuer of another certificate, but not trusted
    /// on its own.
    Known,
    /// Neither trusted nor known.
    Unknown,
}

/// The trusted and known certificates available to chain building.
///
/// A certificate in both sets is classified as [`TrustClass::Trusted`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TrustStore {
    trusted: Vec<Certificate>,
    known: Vec<Certificate>,
}

impl TrustStore {
    /// Create an empty trust store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the trust anchors.
    pub fn set_trusted(&mut self, certificates: impl IntoIterator<Item = Certificate>) {
        self.trusted = certificates.into_iter().collect();
    }

    /// Replace the known certificates.
    pub fn set_known(&mut self, certificates: impl IntoIterator<Item = Certificate>) {
        self.known = certificates.into_iter().collect();
    }

    /// The trust anchors
    pub fn trusted(&self) -> &[Certificate] {
        &self.trusted
    }

    /// The known certificates
    pub fn known(&self) -> &[Certificate] {
        &self.known
    }

    /// Classify `certificate`.
    pub fn classify(&self, certificate: &Certificate) -> TrustClass {
        if self.trusted.contains(certificate) {
            TrustClass::Trusted
        } else if self.known.contains(certificate) {
            TrustClass::Known
        } else {
            TrustClass::Unknown
        }
    }

    /// Find a certificate whose subject is the issuer of `certificate`.
    ///
    /// Names are matched as RFC5280 distinguished names. Trust anchors are searched before known certificates. A self-issued
    /// certificate is never returned as its own issuer.
    pub fn find_issuer<'s>(&'s self, certificate: &Certificate) -> Option<&'s Certificate> {
        self.issuer_candidates(certificate).next()
    }

    /// Every certificate whose subject is the issuer of `certificate`, in
    /// lookup order.
    pub fn issuer_candidates<'s, 'c>(
        &'s self,
        certificate: &'c Certificate,
    ) -> impl Iterator<Item = &'s Certificate> + 'c
    where
        's: 'c,
    {
        self.trusted
            .iter()
            .chain(self.known.iter())
            .filter(move |candidate| {
                candidate.subject() == certificate.issuer() && *candidate != certificate
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Validity;
    use core::time::Duration;

    fn certificate(subject: &str, issuer: &str, serial: u8) -> Certificate {
        let validity = Validity::new(Duration::from_secs(0), Duration::from_secs(10));
        Certificate::new(
            subject.parse().expect("Failed to parse subject"),
            issuer.parse().expect("Failed to parse issuer"),
            [serial],
            validity,
        )
        .with_public_key_info([serial])
    }

    #[test]
    fn classify_certificates() {
        let root = certificate("CN=Root", "CN=Root", 1);
        let intermediate = certificate("CN=Intermediate", "CN=Root", 2);
        let leaf = certificate("CN=Leaf", "CN=Intermediate", 3);

        let mut store = TrustStore::new();
        store.set_trusted([root.clone()]);
        store.set_known([intermediate.clone()]);

        assert_eq!(store.classify(&root), TrustClass::Trusted);
        assert_eq!(store.classify(&intermediate), TrustClass::Known);
        assert_eq!(store.classify(&leaf), TrustClass::Unknown);
    }

    #[test]
    fn anchor_copy_with_other_key_is_unknown() {
        let root = certificate("CN=Root", "CN=Root", 1);
        let forged = root.clone().with_public_key_info([0xffu8]);

        let mut store = TrustStore::new();
        store.set_trusted([root]);

        assert_eq!(store.classify(&forged), TrustClass::Unknown);
    }

    #[test]
    fn certificate_in_both_sets_is_trusted() {
        let root = certificate("CN=Root", "CN=Root", 1);

        let mut store = TrustStore::new();
        store.set_trusted([root.clone()]);
        store.set_known([root.clone()]);

        assert_eq!(store.classify(&root), TrustClass::Trusted);
    }

    #[test]
    fn find_issuer_prefers_trusted() {
        let known_root = certificate("CN=Root", "CN=Other", 1);
        let trusted_root = certificate("CN=Root", "CN=Root", 2);
        let leaf = certificate("CN=Leaf", "CN=Root", 3);

        let mut store = TrustStore::new();
        store.set_known([known_root.clone()]);
        store.set_trusted([trusted_root.clone()]);

        assert_eq!(store.find_issuer(&leaf), Some(&trusted_root));
        assert_eq!(store.issuer_candidates(&leaf).count(), 2);
    }

    #[test]
    fn self_issued_certificate_is_not_its_own_issuer() {
        let root = certificate("CN=Root", "CN=Root", 1);

        let mut store = TrustStore::new();
        store.set_known([root.clone()]);

        assert_eq!(store.find_issuer(&root), None);
    }

    #[test]
    fn self_issued_certificate_finds_other_issuer_with_same_name() {
        let old_root = certificate("CN=Root", "CN=Root", 1);
        let new_root = certificate("CN=Root", "CN=Root", 2);

        let mut store = TrustStore::new();
        store.set_known([old_root.clone(), new_root.clone()]);

        assert_eq!(store.find_issuer(&old_root), Some(&new_root));
    }

    #[test]
    fn find_issuer_ignores_case_and_spacing() {
        let intermediate = certificate("CN=Intermediate CA,O=Example", "CN=Root", 1);
        let leaf = certificate("CN=Leaf", "CN=INTERMEDIATE  ca,O=example", 2);

        let mut store = TrustStore::new();
        store.set_known([intermediate.clone()]);

        assert_eq!(store.find_issuer(&leaf), Some(&intermediate));
    }

    #[test]
    fn no_issuer_for_unknown_name() {
        let leaf = certificate("CN=Leaf", "CN=Nobody", 1);

        let mut store = TrustStore::new();
        store.set_trusted([certificate("CN=Root", "CN=Root", 2)]);

        assert_eq!(store.find_issuer(&leaf), None);
    }
}
