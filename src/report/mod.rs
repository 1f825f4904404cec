pub mod renderer;

pub use renderer::{generate, GenerateFailure, Report};
