//! Procedural planet texture synthesis.
//!
//! Turns a short description of a celestial body (kind, base color, name)
//! into a deterministic surface texture, or a ring strip, using coherent
//! noise. Rendered textures are persisted in a content-addressed store so a
//! given description is only ever rendered once.
//!
//! ```no_run
//! use planet_forge::{TextureCache, TextureConfig};
//!
//! let cache = TextureCache::open(TextureConfig::default())?;
//! let sun = cache.generate_texture("star", "#FDB813", "Sun", Some(5778))?;
//! println!("{}", sun.url);
//! # Ok::<(), planet_forge::TextureError>(())
//! ```

pub mod blur;
pub mod cache;
pub mod color;
pub mod config;
pub mod craters;
pub mod error;
pub mod noise_field;
pub mod request;
pub mod ring;
pub mod store;
pub mod surface;

pub use cache::{ContentKey, TextureCache, TextureRef};
pub use color::Rgb;
pub use config::TextureConfig;
pub use error::{StorageError, TextureError};
pub use request::{ObjectKind, RingRequest, SurfaceRequest};
pub use ring::RingSynthesizer;
pub use store::{FsStore, TextureStore};
pub use surface::SurfaceSynthesizer;
