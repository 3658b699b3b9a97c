#![no_main]

use libfuzzer_sys::fuzz_target;
use loglane::parsers::MysqlSlowLogTransformer;
use loglane::LineTransformer;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Errors are fine; we only care about panics or UB.
        let mut transformer = MysqlSlowLogTransformer::new();
        for line in input.lines() {
            let _ = transformer.consume(line);
        }
        let _ = transformer.flush();
    }
});
