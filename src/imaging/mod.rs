//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (content-sniffed) |
//! | **thumbnail / contain** | `resize_exact` to the contained size |
//! | **cover / fit** | `resize_exact` to the fill size + `crop_imm` |
//! | **pad** | contain + `imageops::replace` onto a colored RGBA canvas |
//! | **Encode** | `save_with_format`, format from the output extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing requests
//! - **Transform**: The five resize strategies on decoded images
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Dispatchers, save, and orchestration

pub mod backend;
pub(crate) mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
pub mod transform;

pub use backend::{BackendError, ImageBackend};
pub use operations::{
    ProcessError, ResultImage, process_background_removal, process_resize, remove_background,
    resize_image, save_image,
};
pub use params::{
    AlphaMatting, BackgroundRemovalRequest, EdgeMode, OutputExtension, PadColor, ResampleFilter,
    ResizeMode, ResizeRequest, TargetSize,
};
pub use rust_backend::RustBackend;
