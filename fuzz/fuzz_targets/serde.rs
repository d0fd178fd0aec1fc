#![no_main]

use cardinality_sketches::{CardinalitySketch, HyperLogLog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut sketch) = serde_json::from_slice::<HyperLogLog>(data) {
        sketch.add(&1);
        assert!(sketch.estimate() > 0.0);
    }
});
