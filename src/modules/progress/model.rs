pub use formation_models::progress::*;
