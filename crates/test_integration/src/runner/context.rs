pub mod doubles;
pub mod test_context;
