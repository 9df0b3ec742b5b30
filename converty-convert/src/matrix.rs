//! Supported conversion targets per category.

use converty_queue::ConversionCategory;

/// Describes the conversions offered for one category.
#[derive(Debug, Clone, Copy)]
pub struct ConversionDescriptor {
    pub label: &'static str,
    pub category: ConversionCategory,
    pub default_target: &'static str,
    pub supported_targets: &'static [&'static str],
    /// Source file extensions that map onto this category.
    pub extensions: &'static [&'static str],
}

const IMAGE: ConversionDescriptor = ConversionDescriptor {
    label: "Image",
    category: ConversionCategory::Image,
    default_target: "jpg",
    supported_targets: &["jpg", "png", "webp"],
    extensions: &["png", "jpg", "jpeg", "webp", "bmp"],
};

const AUDIO: ConversionDescriptor = ConversionDescriptor {
    label: "Audio",
    category: ConversionCategory::Audio,
    default_target: "wav",
    supported_targets: &["mp3", "wav", "aac", "ogg"],
    extensions: &["mp3", "wav", "aac", "m4a", "ogg"],
};

const VIDEO: ConversionDescriptor = ConversionDescriptor {
    label: "Video",
    category: ConversionCategory::Video,
    default_target: "mp4",
    supported_targets: &["mp4", "webm", "gif"],
    extensions: &["mp4", "mov", "mkv", "webm"],
};

const PDF: ConversionDescriptor = ConversionDescriptor {
    label: "PDF",
    category: ConversionCategory::Pdf,
    default_target: "pdf",
    supported_targets: &["pdf", "images", "split"],
    extensions: &["pdf"],
};

const TEXT: ConversionDescriptor = ConversionDescriptor {
    label: "Text",
    category: ConversionCategory::Text,
    default_target: "txt",
    supported_targets: &["txt", "csv", "json"],
    extensions: &["txt", "csv", "json", "md"],
};

/// All offered conversions, one descriptor per category.
pub const CONVERSION_MATRIX: &[ConversionDescriptor] = &[IMAGE, AUDIO, VIDEO, PDF, TEXT];

/// The descriptor for `category`.
pub fn descriptor_for(category: ConversionCategory) -> &'static ConversionDescriptor {
    CONVERSION_MATRIX
        .iter()
        .find(|d| d.category == category)
        .unwrap_or(&TEXT)
}

/// Infer the conversion category from a source file extension. Unknown
/// extensions fall back to text.
pub fn infer_descriptor(extension: &str) -> &'static ConversionDescriptor {
    let lower = extension.to_ascii_lowercase();
    CONVERSION_MATRIX
        .iter()
        .find(|d| d.extensions.contains(&lower.as_str()))
        .unwrap_or(&TEXT)
}

/// Whether `target` is an offered target format for `category`.
pub fn supports_target(category: ConversionCategory, target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    descriptor_for(category)
        .supported_targets
        .contains(&lower.as_str())
}
