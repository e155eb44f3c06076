//! Test that concurrent first access resolves OAuth2 settings exactly once.

use std::sync::{Arc, Barrier};
use std::thread;

use crate::e2e_tests::helpers::*;
use crate::security::OAuth2Settings;

const THREADS: usize = 8;

#[test]
fn test_concurrent_first_access_shares_one_instance() {
    let test = Arc::new(TestSettings::with_oauth_yaml(&[], HUGGINGFACE_YAML));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let test = Arc::clone(&test);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                test.settings.oauth2().expect("valid OAuth2 file")
            })
        })
        .collect();

    let results: Vec<Arc<OAuth2Settings>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread panicked"))
        .collect();

    let first = &results[0];
    assert!(first.enabled);
    assert!(results.iter().all(|other| Arc::ptr_eq(first, other)));
}
