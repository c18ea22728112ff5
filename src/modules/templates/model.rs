pub use formation_models::templates::*;
