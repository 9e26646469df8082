mod component;
mod panels;
mod render;
mod style;

pub use component::SchemaGraph;
