//! Server-side services

pub mod renderer;

pub use renderer::TemplateRenderer;
