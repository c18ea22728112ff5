pub use formation_models::audit::*;
