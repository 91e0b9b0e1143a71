pub mod buffer;
pub mod color;

pub use buffer::MonoBuffer;
