//! Image processing pipeline components.
//!
//! - **validate**: Pre-decode checks (size, magic bytes)
//! - **decode**: Load images into per-channel pixel grids
//! - **blur**: The box-blur kernel
//! - **encode**: Write blurred images as PNG
//! - **codec**: The decode/encode seam used by workers
//! - **paths**: Input-to-output path rewriting
//! - **discovery**: Find image files in the input directory
//! - **hash**: Content hashes for change detection
//! - **processor**: Runs one task through the stages above

pub mod blur;
pub mod codec;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod hash;
pub mod paths;
pub mod processor;
pub mod validate;

// Re-exports for convenient access
pub use blur::{apply_box_blur, blur_image};
pub use codec::{Codec, RasterCodec};
pub use decode::ImageDecoder;
pub use discovery::FileDiscovery;
pub use encode::ImageEncoder;
pub use paths::OutputPathMapper;
pub use processor::ImageProcessor;
pub use validate::Validator;
