pub mod layer;
pub mod raster;
pub mod signs;
pub mod symbology;

pub use layer::*;
