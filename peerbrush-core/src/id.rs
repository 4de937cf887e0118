//! Typed numeric identifiers for bots and peers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Typed ID wrappers keep the operating bot and discovered peers apart.
/// Both are plain account numbers underneath; every external call
/// renders them as decimal strings.
macro_rules! numeric_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw account number.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// The raw account number.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

numeric_id!(BotId, "Account number of the bot running this process.");
numeric_id!(PeerId, "Account number of another bot found through discovery.");

impl PeerId {
    /// Interpret one entry of a discovery response.
    ///
    /// The coordination service has been seen to return both JSON numbers
    /// and numeric strings. Anything else yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_u64().map(Self),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_renders_decimal() {
        assert_eq!(BotId::new(10001).to_string(), "10001");
        assert_eq!(PeerId::from(42).to_string(), "42");
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(" 123 ".parse::<BotId>().unwrap(), BotId(123));
        assert!("abc".parse::<BotId>().is_err());
        assert!("-5".parse::<PeerId>().is_err());
    }

    #[test]
    fn peer_from_json_accepts_numbers_and_strings() {
        assert_eq!(PeerId::from_json(&json!(777)), Some(PeerId(777)));
        assert_eq!(PeerId::from_json(&json!("888")), Some(PeerId(888)));
        assert_eq!(PeerId::from_json(&json!(-1)), None);
        assert_eq!(PeerId::from_json(&json!(1.5)), None);
        assert_eq!(PeerId::from_json(&json!(null)), None);
        assert_eq!(PeerId::from_json(&json!({"uin": 1})), None);
    }

    #[test]
    fn serde_is_transparent() {
        let id: BotId = serde_json::from_value(json!(99)).unwrap();
        assert_eq!(id, BotId(99));
        assert_eq!(serde_json::to_value(PeerId(5)).unwrap(), json!(5));
    }
}
