//! Aspect-ratio classification for the remote service's supported set

/// Aspect ratio tags accepted by the remote generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// 1:1
    Square,
    /// 3:4
    Portrait3x4,
    /// 4:3
    Landscape4x3,
    /// 9:16
    Portrait9x16,
    /// 16:9
    Landscape16x9,
}

impl AspectRatio {
    /// Map pixel dimensions to the nearest supported aspect ratio.
    ///
    /// Thresholds are evaluated in this order and the first match wins, so
    /// exact boundary values fall through to the later checks (a ratio of
    /// exactly 1.5 is classified 4:3, not 16:9).
    #[must_use]
    pub fn classify(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);
        if ratio > 1.5 {
            Self::Landscape16x9
        } else if ratio > 1.1 {
            Self::Landscape4x3
        } else if ratio < 0.6 {
            Self::Portrait9x16
        } else if ratio < 0.8 {
            Self::Portrait3x4
        } else {
            Self::Square
        }
    }

    /// Wire tag understood by the service
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
        }
    }
}
