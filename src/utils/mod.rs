pub mod ids;
pub mod text;
