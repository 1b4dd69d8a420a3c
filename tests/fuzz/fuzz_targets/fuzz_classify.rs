#![no_main]
use covbridge::dialect::Dialect;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Classification and span lookup must not panic on any source text.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = covbridge::classify::executable_lines(s, 1, u32::MAX, Dialect::Strict);
        let _ = covbridge::span::find_span_in(s, std::path::Path::new("fuzz.f90"), "f", Dialect::Legacy);
    }
});
