//! Test the disabled fallback used when the OAuth2 file is absent.

use std::sync::Arc;

use crate::e2e_tests::helpers::*;

#[test]
fn test_missing_file_disables_oauth2() {
    let test = TestSettings::new(&[]);

    let oauth2 = test.settings.oauth2().expect("missing file is not an error");
    assert!(!oauth2.enabled);
    assert!(oauth2.providers.is_empty());
}

#[test]
fn test_missing_file_result_is_cached() {
    let test = TestSettings::new(&[]);

    let first = test.settings.oauth2().expect("missing file is not an error");
    let second = test.settings.oauth2().expect("missing file is not an error");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_file_created_after_first_access_is_ignored() {
    let test = TestSettings::new(&[]);

    let first = test.settings.oauth2().expect("missing file is not an error");
    test.write_oauth_file(HUGGINGFACE_YAML);

    let second = test.settings.oauth2().expect("cached value");
    assert!(!second.enabled);
    assert!(Arc::ptr_eq(&first, &second));
}
