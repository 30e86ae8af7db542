#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(args) = ratestorm::fuzzing::apply_config_from_json(data) {
        debug_assert!(args.rate.get() > 0);
        debug_assert!(!args.per.is_zero());
        debug_assert!(!args.timeout.is_zero());
        if let Some(limit) = args.max_in_flight {
            debug_assert!(limit.get() > 0);
        }
    }
});
