//! Expands one brand description into the fixed ten-slot batch template.

use crate::models::{AspectRatio, DesignCategory, GenerationRequest};

pub const BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub category: DesignCategory,
    pub style_suffix: &'static str,
    pub aspect_ratio: AspectRatio,
}

const fn entry(
    category: DesignCategory,
    style_suffix: &'static str,
    aspect_ratio: AspectRatio,
) -> TemplateEntry {
    TemplateEntry {
        category,
        style_suffix,
        aspect_ratio,
    }
}

/// 3 logos, 2 covers, 3 banners, 2 posts. Order and ratios are fixed.
pub const DESIGN_TEMPLATE: [TemplateEntry; BATCH_SIZE] = [
    entry(
        DesignCategory::Logo,
        "minimalist vector logo, solid white background, clean design.",
        AspectRatio::Square,
    ),
    entry(
        DesignCategory::Logo,
        "emblem-style logotype, premium and elegant.",
        AspectRatio::Square,
    ),
    entry(
        DesignCategory::Logo,
        "modern logotype with an abstract icon, vibrant colors.",
        AspectRatio::Square,
    ),
    entry(
        DesignCategory::Cover,
        "social media profile cover (Facebook), high-resolution cinematic image.",
        AspectRatio::Landscape,
    ),
    entry(
        DesignCategory::Cover,
        "channel cover art (YouTube), bold and eye-catching graphic design.",
        AspectRatio::Landscape,
    ),
    entry(
        DesignCategory::Banner,
        "wide website banner, professional, with room for text.",
        AspectRatio::Landscape,
    ),
    entry(
        DesignCategory::Banner,
        "promotional banner announcing a special offer, visually striking.",
        AspectRatio::Classic,
    ),
    entry(
        DesignCategory::Banner,
        "vertical banner for a digital ad, focused on conversion.",
        AspectRatio::Portrait,
    ),
    entry(
        DesignCategory::Post,
        "social media post (Instagram), stylized photo of the product or concept.",
        AspectRatio::Square,
    ),
    entry(
        DesignCategory::Post,
        "social media post (Instagram), informative graphic design with strong typography.",
        AspectRatio::Square,
    ),
];

pub fn compose_prompt(base_prompt: &str, category: DesignCategory, style_suffix: &str) -> String {
    format!(
        "For a brand about \"{}\", create a {}: {}",
        base_prompt, category, style_suffix
    )
}

/// Always returns [`BATCH_SIZE`] requests in template order.
///
/// The prompt is used verbatim; rejecting blank input is the caller's job.
pub fn expand(base_prompt: &str) -> Vec<GenerationRequest> {
    DESIGN_TEMPLATE
        .iter()
        .enumerate()
        .map(|(index, template)| {
            GenerationRequest::new(
                template.category,
                template.style_suffix,
                template.aspect_ratio,
                index,
                compose_prompt(base_prompt, template.category, template.style_suffix),
            )
        })
        .collect()
}
