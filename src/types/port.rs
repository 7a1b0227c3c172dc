//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` handles the `start-end` expressions accepted on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(u32::from(value)))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: u32 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;

        u16::try_from(value)
            .ok()
            .and_then(Port::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: '{0}'")]
    InvalidFormat(String),
    #[error("start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses `"start-end"`, or a bare `"port"` as a one-port range.
impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        match s.split_once('-') {
            Some((start, end)) => {
                if end.contains('-') {
                    return Err(PortError::InvalidFormat(s.to_string()));
                }
                Self::new(start.parse()?, end.parse()?)
            }
            None => Ok(Self::single(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(80).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_port_from_str() {
        assert_eq!("443".parse::<Port>().unwrap().as_u16(), 443);
        assert_eq!("0".parse::<Port>(), Err(PortError::OutOfRange(0)));
        assert_eq!("70000".parse::<Port>(), Err(PortError::OutOfRange(70000)));
        assert!(matches!("ssh".parse::<Port>(), Err(PortError::InvalidFormat(_))));
    }

    #[test]
    fn test_port_range_parsing() {
        let range: PortRange = "1-1024".parse().unwrap();
        assert_eq!(range.start().as_u16(), 1);
        assert_eq!(range.end().as_u16(), 1024);
        assert_eq!(range.len(), 1024);

        let range: PortRange = " 20 - 25 ".parse().unwrap();
        assert_eq!(range.len(), 6);

        let range: PortRange = "8080".parse().unwrap();
        assert_eq!(range, PortRange::single(Port::new(8080).unwrap()));
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_port_range_full_span() {
        let range: PortRange = "1-65535".parse().unwrap();
        assert_eq!(range.len(), 65535);
        assert_eq!(range.iter().last().map(Port::as_u16), Some(65535));
    }

    #[test]
    fn test_port_range_rejects_reversed_bounds() {
        assert_eq!(
            "100-50".parse::<PortRange>(),
            Err(PortError::InvalidRange(100, 50))
        );
    }

    #[test]
    fn test_port_range_rejects_malformed() {
        assert!(matches!(
            "abc-100".parse::<PortRange>(),
            Err(PortError::InvalidFormat(_))
        ));
        assert!(matches!(
            "1-2-3".parse::<PortRange>(),
            Err(PortError::InvalidFormat(_))
        ));
        assert!(matches!(
            "-100".parse::<PortRange>(),
            Err(PortError::InvalidFormat(_))
        ));
        assert_eq!("0-10".parse::<PortRange>(), Err(PortError::OutOfRange(0)));
        assert_eq!("".parse::<PortRange>(), Err(PortError::Empty));
    }

    #[test]
    fn test_port_range_iter_is_inclusive() {
        let range: PortRange = "20-25".parse().unwrap();
        let ports: Vec<u16> = range.iter().map(Port::as_u16).collect();
        assert_eq!(ports, vec![20, 21, 22, 23, 24, 25]);
        assert_eq!(range.to_string(), "20-25");
    }
}
