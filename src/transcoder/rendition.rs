//! Rendition ladder: the ordered set of resolution/bitrate variants produced
//! for every upload.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LadderError {
    #[error("rendition ladder is empty")]
    Empty,
    #[error("malformed rendition entry '{0}', expected WIDTHxHEIGHT:BITRATEk[:BANDWIDTH]")]
    Malformed(String),
    #[error("duplicate rendition '{0}'")]
    Duplicate(String),
}

/// One resolution/bitrate variant of the source video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub video_bitrate_kbps: u32,
    /// Advertised peak bandwidth in bits per second.
    pub bandwidth: u64,
}

impl Rendition {
    pub fn new(width: u32, height: u32, video_bitrate_kbps: u32, bandwidth: u64) -> Self {
        Self {
            name: format!("{height}p"),
            width,
            height,
            video_bitrate_kbps,
            bandwidth,
        }
    }

    pub fn playlist_file(&self) -> String {
        format!("{}.m3u8", self.name)
    }

    pub fn segment_pattern(&self) -> String {
        format!("{}_%03d.ts", self.name)
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    pub fn bitrate_arg(&self) -> String {
        format!("{}k", self.video_bitrate_kbps)
    }
}

impl FromStr for Rendition {
    type Err = LadderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let malformed = || LadderError::Malformed(entry.to_string());

        let mut parts = entry.split(':');
        let size = parts.next().ok_or_else(malformed)?;
        let bitrate = parts.next().ok_or_else(malformed)?;
        let bandwidth = parts.next();
        if parts.next().is_some() {
            return Err(malformed());
        }

        let (width, height) = size.split_once(['x', 'X']).ok_or_else(malformed)?;
        let width: u32 = width.trim().parse().map_err(|_| malformed())?;
        let height: u32 = height.trim().parse().map_err(|_| malformed())?;

        let bitrate = bitrate.trim();
        let bitrate = bitrate
            .strip_suffix(['k', 'K'])
            .unwrap_or(bitrate)
            .parse::<u32>()
            .map_err(|_| malformed())?;

        let bandwidth = match bandwidth {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| malformed())?,
            None => u64::from(bitrate) * 1000,
        };

        if width == 0 || height == 0 || bitrate == 0 || bandwidth == 0 {
            return Err(malformed());
        }

        Ok(Rendition::new(width, height, bitrate, bandwidth))
    }
}

impl fmt::Display for Rendition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}k:{}",
            self.resolution(),
            self.video_bitrate_kbps,
            self.bandwidth
        )
    }
}

/// Renditions kept in ascending bandwidth order. Construction sorts, so every
/// consumer can rely on the ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenditionLadder(Vec<Rendition>);

impl RenditionLadder {
    pub fn new(mut renditions: Vec<Rendition>) -> Result<Self, LadderError> {
        if renditions.is_empty() {
            return Err(LadderError::Empty);
        }

        let mut seen = HashSet::new();
        for rendition in &renditions {
            if !seen.insert(rendition.name.clone()) {
                return Err(LadderError::Duplicate(rendition.name.clone()));
            }
        }

        renditions.sort_by_key(|r| r.bandwidth);
        Ok(Self(renditions))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rendition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RenditionLadder {
    fn default() -> Self {
        Self(vec![
            Rendition::new(426, 240, 400, 400_000),
            Rendition::new(640, 360, 800, 800_000),
            Rendition::new(854, 480, 1400, 1_400_000),
        ])
    }
}

impl FromStr for RenditionLadder {
    type Err = LadderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let renditions = s
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Rendition>, _>>()?;
        Self::new(renditions)
    }
}

impl<'a> IntoIterator for &'a RenditionLadder {
    type Item = &'a Rendition;
    type IntoIter = std::slice::Iter<'a, Rendition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
