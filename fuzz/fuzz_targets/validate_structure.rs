#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The structure walk must never panic, regardless of input.
    let findings = certlint_lib::validate_structure(data);
    let _ = findings.worst();
});
