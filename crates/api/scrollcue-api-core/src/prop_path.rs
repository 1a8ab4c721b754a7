//! PropPath parsing and formatting.
//!
//! Grammar: `target.property`
//! - `target` is an opaque element handle handed out by the host. It may itself
//!   contain dots, so parsing splits on the *last* `.`.
//! - `property` is a camelCase style property (`opacity`, `rotateX`, `clipPath`).
//!
//!   "hero-line#0.rotateX" -> target="hero-line#0", property="rotateX"
//!   "img.profile.opacity"  -> target="img.profile", property="opacity"

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropPath {
    /// Element handle the write applies to.
    pub target: String,
    /// Property name on that element.
    pub property: String,
}

impl PropPath {
    pub fn new(target: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            property: property.into(),
        }
    }

    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("empty path".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err("invalid property path: contains whitespace".to_string());
        }
        let (target, property) = s
            .rsplit_once('.')
            .ok_or_else(|| format!("invalid property path '{s}': missing '.property'"))?;
        if target.is_empty() {
            return Err("invalid property path: empty target".to_string());
        }
        if property.is_empty() {
            return Err("invalid property path: empty property".to_string());
        }
        Ok(Self::new(target, property))
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.property)
    }
}

impl FromStr for PropPath {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for PropPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropPath {
    fn deserialize<D>(deserializer: D) -> Result<PropPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropPath::parse(&s).map_err(de::Error::custom)
    }
}
