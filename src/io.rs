pub mod image;
pub mod scene_parser;
