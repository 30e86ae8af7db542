#![no_main]

use libfuzzer_sys::fuzz_target;
use ratestorm::metrics::{DEFAULT_PRECISION, RankEstimator};

fuzz_target!(|data: &[u8]| {
    let Ok(mut estimator) = RankEstimator::new(DEFAULT_PRECISION) else {
        return;
    };

    let mut count = 0u64;
    for chunk in data.chunks_exact(8).take(512) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        estimator.add(u64::from_le_bytes(bytes) >> 16);
        count = count.saturating_add(1);
    }

    debug_assert_eq!(estimator.count(), count);
    let p50 = estimator.query(0.5);
    let p90 = estimator.query(0.9);
    let p99 = estimator.query(0.99);
    debug_assert!(p50 <= p90 && p90 <= p99);
    if count == 0 {
        debug_assert_eq!(p99, 0);
    }
});
