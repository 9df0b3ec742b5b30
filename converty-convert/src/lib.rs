//! Converter implementations and conversion dispatch for Converty.
//!
//! This crate provides the [`Converter`] capability trait, one
//! implementation per conversion category, and the [`Dispatcher`] that
//! routes a claimed job to the right converter and normalizes results and
//! progress.
//!
//! # Categories
//!
//! - `image` - re-encode to jpg / png / webp via the `image` crate
//! - `audio` / `video` - stubbed; always fail until FFmpeg is integrated
//! - `pdf` - assemble supplied images into a PDF, one page per image
//! - `text` - txt / csv / json transforms
//!
//! # Usage
//!
//! ```rust,no_run
//! use converty_convert::{build_dispatcher, OutputWorkspace};
//!
//! let dispatcher = build_dispatcher(OutputWorkspace::new("/tmp/converty"), 85);
//! ```

mod converter;
mod converters;
mod dispatcher;
mod error;
mod matrix;
mod workspace;

pub use converter::Converter;
pub use converters::image::ImageConverter;
pub use converters::media::MediaConverter;
pub use converters::pdf::PdfConverter;
pub use converters::text::TextConverter;
pub use dispatcher::Dispatcher;
pub use error::ConvertError;
pub use matrix::{
    descriptor_for, infer_descriptor, supports_target, ConversionDescriptor, CONVERSION_MATRIX,
};
pub use workspace::OutputWorkspace;

use converty_queue::ConversionCategory;

/// Build a dispatcher with every built-in converter registered.
pub fn build_dispatcher(workspace: OutputWorkspace, image_quality: u8) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(workspace.clone());
    dispatcher.register(ImageConverter::with_default_quality(
        workspace.clone(),
        image_quality,
    ));
    dispatcher.register(MediaConverter::new(ConversionCategory::Audio));
    dispatcher.register(MediaConverter::new(ConversionCategory::Video));
    dispatcher.register(PdfConverter::new(workspace.clone()));
    dispatcher.register(TextConverter::new(workspace));
    dispatcher
}
