#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let report = certlint_lib::lint(data);
    let _ = certlint_lib::display_text(&report);
    let _ = certlint_lib::to_json(std::slice::from_ref(&report));

    // Exercise the PEM path too.
    let _ = certlint_lib::Linter::default().lint_bytes(data, &[]);
});
