#![no_main]

use libfuzzer_sys::fuzz_target;
use loglane::{MapConf, Registry};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let mut conf = MapConf::new();
    conf.set("type", "mysqllog");
    conf.set("workers", "3");
    conf.set("keep_raw_data", "true");
    let Ok(mut parser) = Registry::default().new_parser(&conf) else {
        return;
    };

    let batch: Vec<String> = input.lines().map(str::to_string).collect();
    let outcome = parser.parse(&batch);
    assert!(outcome.records.len() <= batch.len());
    let _ = parser.flush();
});
