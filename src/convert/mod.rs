//! Conversion routes module
//!
//! Names the six conversion endpoints and maps each one to a converter.
//! Every converter is currently the identity function; the table is the
//! place to plug real notation conversions in later.

mod table;

pub use table::{identity, ConvertFn, ConverterTable};

use std::fmt;
use std::str::FromStr;

/// Path prefix shared by all conversion endpoints
pub const API_PREFIX: &str = "/api/";

/// One of the six conversion endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    FsToIs,
    IsToFs,
    IpToFp,
    IsToIp,
    FsToFp,
    FpToIp,
}

impl Conversion {
    /// All conversions, in route registration order
    pub const ALL: [Self; 6] = [
        Self::FsToIs,
        Self::IsToFs,
        Self::IpToFp,
        Self::IsToIp,
        Self::FsToFp,
        Self::FpToIp,
    ];

    /// Route segment, e.g. `FsToIs` for `/api/FsToIs`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FsToIs => "FsToIs",
            Self::IsToFs => "IsToFs",
            Self::IpToFp => "IpToFp",
            Self::IsToIp => "IsToIp",
            Self::FsToFp => "FsToFp",
            Self::FpToIp => "FpToIp",
        }
    }

    /// Full request path of this endpoint
    pub fn path(self) -> String {
        format!("{API_PREFIX}{}", self.as_str())
    }

    /// Resolve a request path like `/api/IsToIp` to its conversion
    pub fn from_path(path: &str) -> Option<Self> {
        path.strip_prefix(API_PREFIX)?.parse().ok()
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a route segment names no known conversion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversion: {0}")]
pub struct UnknownConversion(pub String);

impl FromStr for Conversion {
    type Err = UnknownConversion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownConversion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for conversion in Conversion::ALL {
            assert_eq!(conversion.as_str().parse::<Conversion>(), Ok(conversion));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("fstois".parse::<Conversion>().is_err());
        assert!("FSTOIS".parse::<Conversion>().is_err());
        assert_eq!(
            "FsToXx".parse::<Conversion>(),
            Err(UnknownConversion("FsToXx".to_string()))
        );
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Conversion::from_path("/api/FsToIs"), Some(Conversion::FsToIs));
        assert_eq!(Conversion::from_path("/api/FpToIp"), Some(Conversion::FpToIp));
        assert_eq!(Conversion::from_path("/api/FsToIs/"), None);
        assert_eq!(Conversion::from_path("/FsToIs"), None);
        assert_eq!(Conversion::from_path("/api/"), None);
        assert_eq!(Conversion::from_path("/"), None);
    }

    #[test]
    fn test_path_round_trip() {
        for conversion in Conversion::ALL {
            assert_eq!(Conversion::from_path(&conversion.path()), Some(conversion));
        }
    }

    #[test]
    fn test_indices_are_distinct() {
        let mut seen = [false; 6];
        for conversion in Conversion::ALL {
            assert!(!seen[conversion.index()]);
            seen[conversion.index()] = true;
        }
    }
}
