use iambic_core::{Dictionary, IambicValidator, Reason};
use std::sync::Arc;
use std::thread;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/cmudict-sample.txt");

#[test]
fn dictionary_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dictionary>();
    assert_send_sync::<IambicValidator>();
}

#[test]
fn concurrent_validation_shares_one_dictionary() {
    let dictionary = Arc::new(Dictionary::load(FIXTURE).unwrap());
    let validator = IambicValidator::new(Arc::clone(&dictionary));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let v = validator.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    if i % 2 == 0 {
                        assert!(v.validate_line("Rough winds do shake the darling buds of May,").ok);
                    } else {
                        assert_eq!(v.validate_line("Tenenbaum").reason, Reason::DoubleStress);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    // Worker clones are gone once joined.
    assert_eq!(Arc::strong_count(&dictionary), 2);
}
