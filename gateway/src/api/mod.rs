pub mod bulk;
pub mod keys;
pub mod utils;
pub mod values;
