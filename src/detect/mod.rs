pub mod classifier;
pub mod locator;

#[cfg(test)]
mod tests;
