pub use formation_models::ui_templates::*;
