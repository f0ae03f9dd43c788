// Copyright (c) 2023 The MobileCoin Foundation

//! Distinguished names of certificate subjects, issuers and CRL issuers.
//!
//! Names are matched as described in
//! [7.1](https://datatracker.ietf.org/doc/html/rfc5280#section-7.1) of
//! RFC5280. Both names must have the same relative distinguished names with
//! the same attribute types, in the same order. Attribute values that are
//! directory strings (`PrintableString`, `UTF8String` or `IA5String`) are
//! compared after [RFC4518](https://www.rfc-editor.org/rfc/rfc4518) string
//! preparation, which makes the comparison case insensitive and ignores
//! insignificant spaces. Any other attribute value must be identically
//! encoded.

use crate::{Error, Result};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unicode_normalization::UnicodeNormalization;
use x509_cert::attr::{AttributeTypeAndValue, AttributeValue};
use x509_cert::der::asn1::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
use x509_cert::der::{Tag, Tagged};
use x509_cert::name::{Name, RelativeDistinguishedName};

/// An X.509 distinguished name.
///
/// Displayed, serialized and parsed as an
/// [RFC4514](https://www.rfc-editor.org/rfc/rfc4514) string, e.g.
/// `CN=Root CA,O=Example`.
#[derive(Clone, Debug)]
pub struct DistinguishedName(Name);

impl DistinguishedName {
    /// The underlying X.509 name
    pub fn as_name(&self) -> &Name {
        &self.0
    }
}

impl From<Name> for DistinguishedName {
    fn from(name: Name) -> Self {
        Self(name)
    }
}

impl FromStr for DistinguishedName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Name::from_str(name).map(Self).map_err(Error::Name)
    }
}

impl Display for DistinguishedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        let rdns_1 = &self.0 .0;
        let rdns_2 = &other.0 .0;
        rdns_1.len() == rdns_2.len()
            && rdns_1
                .iter()
                .zip(rdns_2.iter())
                .all(|(rdn_1, rdn_2)| rdn_eq(rdn_1, rdn_2))
    }
}

impl Eq for DistinguishedName {}

impl Serialize for DistinguishedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DistinguishedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(D::Error::custom)
    }
}

fn rdn_eq(rdn_1: &RelativeDistinguishedName, rdn_2: &RelativeDistinguishedName) -> bool {
    rdn_1.0.len() == rdn_2.0.len()
        && rdn_1
            .0
            .iter()
            .zip(rdn_2.0.iter())
            .all(|(attribute_1, attribute_2)| attribute_eq(attribute_1, attribute_2))
}

fn attribute_eq(attribute_1: &AttributeTypeAndValue, attribute_2: &AttributeTypeAndValue) -> bool {
    if attribute_1.oid != attribute_2.oid {
        return false;
    }
    match (
        prepared_value(&attribute_1.value),
        prepared_value(&attribute_2.value),
    ) {
        (Some(value_1), Some(value_2)) => value_1 == value_2,
        _ => attribute_1.value == attribute_2.value,
    }
}

/// The prepared text of `value` when it's one of the supported directory
/// string types.
fn prepared_value(value: &AttributeValue) -> Option<String> {
    match value.tag() {
        Tag::PrintableString => PrintableStringRef::try_from(value)
            .ok()
            .map(|s| prepare(s.as_str())),
        Tag::Utf8String => Utf8StringRef::try_from(value)
            .ok()
            .map(|s| prepare(s.as_str())),
        Tag::Ia5String => Ia5StringRef::try_from(value)
            .ok()
            .map(|s| prepare(s.as_str())),
        _ => None,
    }
}

/// RFC4518 string preparation for case insensitive matching.
///
/// Characters are mapped, case folded and NFKC normalized. Leading and
/// trailing spaces are dropped and inner runs of spaces collapse to one.
fn prepare(value: &str) -> String {
    let mapped = value.chars().filter_map(map_character).collect::<String>();
    let folded = caseless::default_case_fold_str(&mapped);
    let normalized = folded.chars().nfkc().collect::<String>();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Step 2 of [RFC4518](https://www.rfc-editor.org/rfc/rfc4518#section-2.2).
///
/// Whitespace maps to a space, the listed control and formatting characters
/// map to nothing.
fn map_character(c: char) -> Option<char> {
    match c {
        c if c.is_whitespace() => Some(' '),
        '\u{0000}'..='\u{0008}'
        | '\u{000E}'..='\u{001F}'
        | '\u{007F}'..='\u{0084}'
        | '\u{0086}'..='\u{009F}'
        | '\u{00AD}'
        | '\u{034F}'
        | '\u{06DD}'
        | '\u{070F}'
        | '\u{1806}'
        | '\u{180B}'..='\u{180E}'
        | '\u{200B}'..='\u{200F}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2060}'..='\u{2063}'
        | '\u{206A}'..='\u{206F}'
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{FEFF}'
        | '\u{FFF9}'..='\u{FFFC}'
        | '\u{1D173}'..='\u{1D17A}'
        | '\u{E0001}'
        | '\u{E0020}'..='\u{E0074}' => None,
        c => Some(c),
    }
}
