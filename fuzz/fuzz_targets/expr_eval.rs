#![no_main]

use libfuzzer_sys::fuzz_target;
use nrgen::expr::eval_expr;
use nrgen::headers::parse_probe_output;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither parser may panic, whatever the preprocessor hands back
        let _ = eval_expr(input);
        let _ = parse_probe_output(input);
    }
});
