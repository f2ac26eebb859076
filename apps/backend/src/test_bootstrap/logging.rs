#![cfg(test)]

//! Unit-test logging. Same filter precedence as integration tests, because
//! both go through `hokm_test_support::test_logging`:
//!
//! ```bash
//! TEST_LOG=hokm_backend=debug cargo test -p hokm-backend
//! ```

pub fn init() {
    hokm_test_support::test_logging::init();
}
