//! Algorithm categories and allow-lists
//!
//! A category ties together the remote query command, the test parameter name
//! a test declares, and the allow-list that algorithms are reconciled against.

mod allow_list;
mod category;

pub use allow_list::AllowList;
pub use category::AlgorithmCategory;
