pub mod borrow;
