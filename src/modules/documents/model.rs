pub use formation_models::documents::*;
