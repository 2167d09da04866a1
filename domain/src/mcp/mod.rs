//! The MCP decision document: entities, builder, validation and model parsing.

pub mod builder;
pub mod entities;
pub mod model_parser;
pub mod validation;
pub mod value_objects;
