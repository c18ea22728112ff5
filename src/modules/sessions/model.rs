pub use formation_models::sessions::*;
