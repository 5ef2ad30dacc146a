//! Output video resolution.

use std::fmt;

/// Error returned when parsing an invalid resolution string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid resolution: {reason}")]
pub struct InvalidResolution {
    reason: &'static str,
}

/// Frame size in pixels, written `WxH`.
///
/// # Examples
///
/// ```
/// use route_animator::domain::Resolution;
///
/// let res = Resolution::parse("1280x720").unwrap();
/// assert_eq!((res.width, res.height), (1280, 720));
/// assert_eq!(res.to_string(), "1280x720");
///
/// assert!(Resolution::parse("1280").is_err());
/// assert!(Resolution::parse("0x720").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Parse `WxH` with positive integer dimensions.
    pub fn parse(s: &str) -> Result<Self, InvalidResolution> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or(InvalidResolution {
                reason: "expected WxH format",
            })?;

        let width: u32 = w.trim().parse().map_err(|_| InvalidResolution {
            reason: "width must be a positive integer",
        })?;
        let height: u32 = h.trim().parse().map_err(|_| InvalidResolution {
            reason: "height must be a positive integer",
        })?;

        if width == 0 || height == 0 {
            return Err(InvalidResolution {
                reason: "dimensions must be non-zero",
            });
        }

        Ok(Self { width, height })
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(
            Resolution::parse("1920x1080").unwrap(),
            Resolution::default()
        );
        assert_eq!(
            Resolution::parse("640X480").unwrap(),
            Resolution {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn reject_malformed() {
        assert!(Resolution::parse("").is_err());
        assert!(Resolution::parse("x").is_err());
        assert!(Resolution::parse("1920x").is_err());
        assert!(Resolution::parse("-1x100").is_err());
        assert!(Resolution::parse("100x0").is_err());
        assert!(Resolution::parse("abcxdef").is_err());
    }
}
