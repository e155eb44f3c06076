//! End-to-end tests from environment snapshot to resolved OAuth2 settings.
//!
//! Each test file covers a specific scenario, using an explicit environment
//! snapshot and a scratch directory so tests never depend on the process
//! environment or working directory.

#![cfg(test)]

mod helpers;

mod test_concurrent_first_access;
mod test_defaults;
mod test_env_precedence;
mod test_invalid_env;
mod test_oauth2_broken_file;
mod test_oauth2_disabled_fallback;
mod test_oauth2_memoization;
