pub use formation_models::metadata::*;
