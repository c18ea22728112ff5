pub use formation_models::enrollments::*;
