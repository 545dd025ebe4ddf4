pub mod dense;

pub use dense::{ForwardPass, InitScale, Layer};
