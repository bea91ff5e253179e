//! Stream format versions.

use std::fmt;
use std::str::FromStr;

use crate::StreamError;

/// `major.minor.debug` version of the stream format.
///
/// Only `major` and `minor` take part in compatibility checks; `debug`
/// marks fixes that do not change the format.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Default)]
pub struct StreamVersion {
    pub major: u32,
    pub minor: u32,
    pub debug: u32,
}

impl StreamVersion {
    /// Version written by this crate.
    pub const CURRENT: StreamVersion = StreamVersion::new(2, 2, 0);

    pub const fn new(major: u32, minor: u32, debug: u32) -> Self {
        Self {
            major,
            minor,
            debug,
        }
    }

    /// Returns `true` if a reader supporting up to `supported` can read
    /// a stream of this version.
    pub fn is_readable_by(self, supported: StreamVersion) -> bool {
        (self.major, self.minor) <= (supported.major, supported.minor)
    }
}

impl From<[u32; 3]> for StreamVersion {
    fn from([major, minor, debug]: [u32; 3]) -> Self {
        Self::new(major, minor, debug)
    }
}

/// Trailing zero fields are dropped: `2.2.0` prints as `2.2`.
impl fmt::Display for StreamVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if self.minor != 0 || self.debug != 0 {
            write!(f, ".{}", self.minor)?;
        }
        if self.debug != 0 {
            write!(f, ".{}", self.debug)?;
        }
        Ok(())
    }
}

impl FromStr for StreamVersion {
    type Err = StreamError;

    /// One to three dot-separated decimal fields; missing fields are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StreamError::InvalidHeader(format!("invalid version `{s}`"));
        let mut fields = [0u32; 3];
        let mut n = 0;
        for part in s.split('.') {
            let slot = fields.get_mut(n).ok_or_else(invalid)?;
            *slot = part.parse().map_err(|_| invalid())?;
            n += 1;
        }
        Ok(fields.into())
    }
}
