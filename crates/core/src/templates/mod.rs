pub mod engine;
pub mod expr;
pub mod heading;
pub mod scope;

pub use engine::{TemplateRenderError, render};
pub use heading::{HeadingAction, rewrite_heading};
pub use scope::{DATE_FORMAT_FN, RenderScope, ScopeValue};
