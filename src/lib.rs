//! A still-image and texture pixel-format library: pixel-format taxonomy and colour profiles,
//! packed/block decoders, row-reversal, the decode engine's post-filter pipeline, the DDS/KTX/PVR
//! container parsers, the aspect-ratio catalogue, and the `Layer`/`Frame`/`Picture` data model
//! with its resampler.

pub mod aspect;
pub mod block;
pub mod colour;
pub mod containers;
pub mod decode;
pub mod error;
pub mod frame;
pub mod layer;
pub mod packed;
pub mod params;
pub mod picture;
pub mod pixel_format;
pub mod resample;
pub mod row_reverse;
pub mod state;
pub mod types;

pub use colour::{AlphaMode, ChannelType, ColourProfile};
pub use decode::{decode, DecodeOptions};
pub use error::{DecodeError, ParseError};
pub use frame::Frame;
pub use layer::Layer;
pub use picture::Picture;
pub use pixel_format::PixelFormat;
pub use types::{DecodedBuffer, Rgba8, Rgbaf};
