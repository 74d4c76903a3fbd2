mod encoding;
mod primitive;

pub use encoding::Encoding;
pub use primitive::Primitive;
