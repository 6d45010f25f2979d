pub mod hello_world;
pub mod movies;

pub use hello_world::*;
pub use movies::*;
