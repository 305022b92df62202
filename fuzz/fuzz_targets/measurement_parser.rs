#![no_main]

use benchdiff::regression::{evaluate, RegressionConfig};
use benchdiff::report::Report;
use benchdiff::summary::MeasurementSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must reject bad input with an error, never a panic; whatever
        // parses must evaluate and render against itself.
        if let Ok(set) = MeasurementSet::from_json_str(input) {
            if let Ok(evaluation) = evaluate(&set, &set, &RegressionConfig::default()) {
                let _ = Report::render("fuzz", &evaluation);
            }
        }
    }
});
