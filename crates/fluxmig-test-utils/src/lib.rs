pub mod sandbox;
pub mod snapdir;

pub use snapdir::dir_manifest;
