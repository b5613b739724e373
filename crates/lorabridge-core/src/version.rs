//! API versions exchanged between the network server and the facade.
//!
//! The set of known versions is fixed at compile time. Parsing a known
//! literal always hands out the same `&'static KnownVersion`, so identity
//! and equality agree for known versions. Anything else parses to
//! [`ApiVersion::Unknown`], which keeps the literal for diagnostics and
//! never orders against other versions.
//!
//! Compatibility is split in two eras: the legacy, unversioned protocol
//! only talks to itself, while dated versions are backward compatible with
//! every earlier dated version.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Query string parameter carrying the version on facade requests.
pub const QUERY_PARAMETER: &str = "api-version";

/// A member of the closed version set.
#[derive(Debug)]
pub struct KnownVersion {
    name: &'static str,
    literal: &'static str,
    /// Chronological position, legacy first
    ordinal: u8,
    /// Oldest ordinal this version can still talk to
    oldest_supported: u8,
}

impl KnownVersion {
    /// Human readable name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wire literal; empty for the legacy version.
    pub fn literal(&self) -> &'static str {
        self.literal
    }

    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }
}

static VERSION_0_2_OR_EARLIER: KnownVersion = KnownVersion {
    name: "0.2-or-earlier",
    literal: "",
    ordinal: 0,
    oldest_supported: 0,
};

static VERSION_2018_12_16_PREVIEW: KnownVersion = KnownVersion {
    name: "2018-12-16-preview",
    literal: "2018-12-16-preview",
    ordinal: 1,
    oldest_supported: 1,
};

static VERSION_2019_02_12_PREVIEW: KnownVersion = KnownVersion {
    name: "2019-02-12-preview",
    literal: "2019-02-12-preview",
    ordinal: 2,
    oldest_supported: 1,
};

static KNOWN_VERSIONS: [&KnownVersion; 3] = [
    &VERSION_0_2_OR_EARLIER,
    &VERSION_2018_12_16_PREVIEW,
    &VERSION_2019_02_12_PREVIEW,
];

/// A negotiated protocol revision.
#[derive(Debug, Clone)]
pub enum ApiVersion {
    /// One of the fixed singletons
    Known(&'static KnownVersion),
    /// Unrecognised literal, or `None` when the value was absent
    Unknown(Option<String>),
}

impl ApiVersion {
    /// The unversioned protocol spoken before version negotiation existed.
    pub fn version_0_2_or_earlier() -> Self {
        Self::Known(&VERSION_0_2_OR_EARLIER)
    }

    pub fn version_2018_12_16_preview() -> Self {
        Self::Known(&VERSION_2018_12_16_PREVIEW)
    }

    pub fn version_2019_02_12_preview() -> Self {
        Self::Known(&VERSION_2019_02_12_PREVIEW)
    }

    /// Newest version this build speaks.
    pub fn latest() -> Self {
        Self::version_2019_02_12_preview()
    }

    /// All known versions, oldest first.
    pub fn known_versions() -> impl Iterator<Item = ApiVersion> {
        KNOWN_VERSIONS.iter().map(|v| ApiVersion::Known(*v))
    }

    /// Parse a wire literal. The empty string is the legacy version.
    pub fn parse(text: &str) -> Self {
        KNOWN_VERSIONS
            .iter()
            .find(|v| v.literal == text)
            .map(|v| ApiVersion::Known(*v))
            .unwrap_or_else(|| ApiVersion::Unknown(Some(text.to_string())))
    }

    /// Parse a possibly absent literal.
    ///
    /// An absent value is unknown rather than legacy: callers that want
    /// the legacy default for a missing parameter pass `Some("")`.
    pub fn parse_optional(text: Option<&str>) -> Self {
        match text {
            Some(text) => Self::parse(text),
            None => ApiVersion::Unknown(None),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ApiVersion::Known(_))
    }

    /// Literal as received or as sent on the wire.
    pub fn version(&self) -> Option<&str> {
        match self {
            ApiVersion::Known(v) => Some(v.literal),
            ApiVersion::Unknown(literal) => literal.as_deref(),
        }
    }

    /// Value for the `api-version` query parameter; the legacy protocol
    /// predates the parameter and omits it.
    pub fn query_value(&self) -> Option<&str> {
        self.version().filter(|v| !v.is_empty())
    }

    /// True when both handles point at the same known singleton.
    pub fn is_same(&self, other: &ApiVersion) -> bool {
        match (self, other) {
            (ApiVersion::Known(a), ApiVersion::Known(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }

    /// Whether a peer speaking `other` can be served by this version.
    pub fn supports_version(&self, other: &ApiVersion) -> bool {
        match (self, other) {
            (ApiVersion::Known(own), ApiVersion::Known(peer)) => {
                (own.oldest_supported..=own.ordinal).contains(&peer.ordinal)
            }
            _ => false,
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::version_0_2_or_earlier()
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ApiVersion::Known(a), ApiVersion::Known(b)) => a.ordinal == b.ordinal,
            (ApiVersion::Unknown(a), ApiVersion::Unknown(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (ApiVersion::Known(a), ApiVersion::Known(b)) => Some(a.ordinal.cmp(&b.ordinal)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl FromStr for ApiVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::Known(v) => write!(f, "{}", v.name),
            ApiVersion::Unknown(Some(literal)) => write!(f, "unknown({})", literal),
            ApiVersion::Unknown(None) => write!(f, "unknown"),
        }
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.version() {
            Some(literal) => serializer.serialize_str(literal),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let literal = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse_optional(literal.as_deref()))
    }
}
