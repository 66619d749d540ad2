//! Generation entry points: specification in, toolchain and artifacts out.

pub mod artifact;
pub mod pipeline;

#[cfg(test)]
mod tests;
