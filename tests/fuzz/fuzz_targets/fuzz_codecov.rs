#![no_main]
use covbridge::parsers::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parser must not panic on any input.
    let _ = covbridge::parsers::codecov::CodecovParser.parse(data);
});
