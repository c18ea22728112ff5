pub use formation_models::tokens::*;
