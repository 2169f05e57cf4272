pub mod errors;
pub mod models;
pub mod state;
pub mod views;

#[cfg(test)]
pub mod test_helpers;
