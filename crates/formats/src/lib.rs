pub mod data_dir;
pub mod entities;
pub mod layout;
pub mod manifest;

pub use data_dir::*;
pub use entities::*;
pub use layout::*;
pub use manifest::*;
