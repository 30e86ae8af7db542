#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(args) = ratestorm::fuzzing::apply_config_from_toml(input) {
            debug_assert!(args.rate.get() > 0);
            debug_assert!(!args.per.is_zero());
            debug_assert!(!args.duration.is_zero());
            debug_assert!((1..=5).contains(&args.precision));
        }
    }
});
