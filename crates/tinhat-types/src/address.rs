//! Bluetooth hardware addresses.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Length of a textual address: six two-digit groups plus five delimiters.
const ADDRESS_LEN: usize = 17;

/// Returns `true` if `text` is exactly six groups of two hex digits, each
/// pair of groups separated by `:` or `-`.
///
/// The whole string must match. Surrounding whitespace, trailing content and
/// short forms are rejected. Delimiters may be mixed within one address.
///
/// # Examples
///
/// ```
/// use tinhat_types::is_valid_address;
///
/// assert!(is_valid_address("AA:BB:CC:DD:EE:FF"));
/// assert!(is_valid_address("aa-bb-cc-dd-ee-ff"));
/// assert!(!is_valid_address("AA:BB:CC:DD:EE"));
/// assert!(!is_valid_address(" AA:BB:CC:DD:EE:FF"));
/// ```
#[must_use]
pub fn is_valid_address(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != ADDRESS_LEN {
        return false;
    }

    bytes.iter().enumerate().all(|(i, b)| {
        if i % 3 == 2 {
            matches!(b, b':' | b'-')
        } else {
            b.is_ascii_hexdigit()
        }
    })
}

/// A validated Bluetooth address.
///
/// The original text is kept as given so it can be handed to external
/// utilities unchanged. Equality compares the octets, so `aa:bb:..` and
/// `AA-BB-..` are the same address.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct BluetoothAddress {
    text: String,
    octets: [u8; 6],
}

impl BluetoothAddress {
    /// The address exactly as it was parsed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The six address bytes, most significant first.
    #[must_use]
    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }

    /// Canonical upper-case, colon-delimited form.
    #[must_use]
    pub fn canonical(&self) -> String {
        let o = self.octets;
        format!(
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for BluetoothAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_valid_address(s) {
            return Err(ParseError::InvalidAddress(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (slot, group) in octets.iter_mut().zip(s.split([':', '-'])) {
            *slot = u8::from_str_radix(group, 16)
                .map_err(|_| ParseError::InvalidAddress(s.to_string()))?;
        }

        Ok(Self {
            text: s.to_string(),
            octets,
        })
    }
}

impl TryFrom<String> for BluetoothAddress {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BluetoothAddress> for String {
    fn from(address: BluetoothAddress) -> Self {
        address.text
    }
}

impl PartialEq for BluetoothAddress {
    fn eq(&self, other: &Self) -> bool {
        self.octets == other.octets
    }
}

impl std::hash::Hash for BluetoothAddress {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.octets.hash(state);
    }
}

impl fmt::Display for BluetoothAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for BluetoothAddress {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_address("aa-bb-cc-dd-ee-ff"));
        assert!(is_valid_address("00:1a:2B:3c:4D:5e"));
        assert!(is_valid_address("AA:BB-CC:DD-EE:FF"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address("AA:BB:CC:DD:EE"));
        assert!(!is_valid_address("not-an-address"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("AA:BB:CC:DD:EE:FF:00"));
        assert!(!is_valid_address("AA:BB:CC:DD:EE:FG"));
        assert!(!is_valid_address("AA.BB.CC.DD.EE.FF"));
        assert!(!is_valid_address("AABBCCDDEEFF"));
        assert!(!is_valid_address(" AA:BB:CC:DD:EE:FF"));
        assert!(!is_valid_address("AA:BB:CC:DD:EE:FF\n"));
        assert!(!is_valid_address("AAA:BB:CC:DD:EE:F"));
    }

    #[test]
    fn test_parse_keeps_original_text() {
        let addr: BluetoothAddress = "aa-bb-cc-dd-ee-ff".parse().unwrap();
        assert_eq!(addr.as_str(), "aa-bb-cc-dd-ee-ff");
        assert_eq!(addr.to_string(), "aa-bb-cc-dd-ee-ff");
        assert_eq!(addr.canonical(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(addr.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let err = "bad-address".parse::<BluetoothAddress>().unwrap_err();
        assert_eq!(err, ParseError::InvalidAddress("bad-address".to_string()));
        assert!(err.to_string().contains("bad-address"));
    }

    #[test]
    fn test_equality_ignores_case_and_delimiter() {
        let a: BluetoothAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        let b: BluetoothAddress = "aa-bb-cc-dd-ee-ff".parse().unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_string() {
        let addr: BluetoothAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"AA:BB:CC:DD:EE:FF\"");

        let back: BluetoothAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);

        assert!(serde_json::from_str::<BluetoothAddress>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_generated_addresses_are_valid(
            octets in proptest::array::uniform6(any::<u8>()),
            delims in proptest::array::uniform5(prop_oneof![Just(':'), Just('-')]),
            upper in any::<bool>(),
        ) {
            let mut text = String::new();
            for (i, o) in octets.iter().enumerate() {
                if upper {
                    text.push_str(&format!("{:02X}", o));
                } else {
                    text.push_str(&format!("{:02x}", o));
                }
                if i < 5 {
                    text.push(delims[i]);
                }
            }
            prop_assert!(is_valid_address(&text));
            let parsed: BluetoothAddress = text.parse().unwrap();
            prop_assert_eq!(parsed.octets(), octets);
        }

        #[test]
        fn prop_validator_never_panics(s in "\\PC*") {
            let _ = is_valid_address(&s);
        }

        #[test]
        fn prop_wrong_length_is_invalid(s in "[0-9A-F:]{0,16}") {
            prop_assert!(!is_valid_address(&s));
        }
    }
}
