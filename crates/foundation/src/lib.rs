pub mod bounds;
pub mod coords;
pub mod fragment;
pub mod view;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use coords::*;
pub use view::*;
