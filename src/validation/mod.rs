//! Validation utilities: time-honest train/holdout splitting.

mod split;

pub use split::{split_train_test, DEFAULT_HORIZON};
