//! Public configuration surface.

mod options;

pub use options::{NullSubstitution, Options, RewriteOptions};
