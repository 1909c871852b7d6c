pub mod cmp;
mod config;
mod error;
mod filter;
mod fractal;
mod index_map;
mod morph;
mod reduce;
mod shape;
mod stroke;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
pub use config::*;
pub use filter::*;
pub use fractal::*;
pub use index_map::*;
pub use morph::*;
pub use reduce::reduce_containment;
pub use shape::*;
pub use stroke::build_strokes;
