use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DesignCategory {
    Logo,
    Cover,
    Banner,
    Post,
}

impl DesignCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignCategory::Logo => "Logo",
            DesignCategory::Cover => "Cover",
            DesignCategory::Banner => "Banner",
            DesignCategory::Post => "Post",
        }
    }
}

impl fmt::Display for DesignCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
}

impl AspectRatio {
    /// Selector string understood by ratio-based providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
        }
    }

    /// Pixel size for providers that take explicit width and height.
    /// Every pair is one Titan accepts.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Landscape => (1408, 768),
            AspectRatio::Portrait => (768, 1408),
            AspectRatio::Classic => (1152, 896),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One slot of a batch, produced by [`crate::prompt::expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub category: DesignCategory,
    pub style_suffix: &'static str,
    pub aspect_ratio: AspectRatio,
    pub sequence_index: usize,
    prompt: String,
}

impl GenerationRequest {
    pub(crate) fn new(
        category: DesignCategory,
        style_suffix: &'static str,
        aspect_ratio: AspectRatio,
        sequence_index: usize,
        prompt: String,
    ) -> Self {
        Self {
            category,
            style_suffix,
            aspect_ratio,
            sequence_index,
            prompt,
        }
    }

    /// Full text sent to the image model.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDesign {
    pub id: String,
    pub category: DesignCategory,
    pub aspect_ratio: AspectRatio,
    /// Either a remote URI or a `data:image/...;base64,` URI.
    pub image_locator: String,
    pub resolved_prompt: String,
}

impl GeneratedDesign {
    pub fn is_inline(&self) -> bool {
        self.image_locator.starts_with("data:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_serializes_as_selector() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
        let parsed: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(parsed, AspectRatio::Portrait);
    }

    #[test]
    fn test_dimensions_follow_orientation() {
        for ratio in [
            AspectRatio::Square,
            AspectRatio::Landscape,
            AspectRatio::Portrait,
            AspectRatio::Classic,
        ] {
            let (w, h) = ratio.dimensions();
            match ratio {
                AspectRatio::Square => assert_eq!(w, h),
                AspectRatio::Portrait => assert!(h > w),
                _ => assert!(w > h),
            }
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(DesignCategory::Banner.to_string(), "Banner");
        assert_eq!(DesignCategory::Post.as_str(), "Post");
    }
}
