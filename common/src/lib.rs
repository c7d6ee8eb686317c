pub mod log_setup;
pub mod parallel;
pub mod test_utils;
