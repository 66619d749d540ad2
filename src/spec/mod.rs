pub mod rules;
pub mod specification;
pub mod template;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;
