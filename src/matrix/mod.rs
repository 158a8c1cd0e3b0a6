//! Test matrix emission
//!
//! Turns reconciled parameters into the test cases a runner instantiates, and
//! picks the category a test asks for from the parameter names it declares.

mod emitter;
mod select;

pub use emitter::{emit, TestCase, TestMatrix, EXPECTED_FAILURE_REASON};
pub use select::select_category;
