#![no_main]

use cardinality_sketches::{CardinalitySketch, Sketch, SketchKind};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let kind = if data[0] & 1 == 0 {
        SketchKind::LogLog
    } else {
        SketchKind::HyperLogLog
    };
    let registers = 1 << (data[0] >> 1) % 13;
    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut sketch1 = Sketch::new(kind, registers).unwrap();
    for chunk in first_half.chunks(4) {
        sketch1.add(chunk);
        assert!(sketch1.estimate() > 0.0);
        assert!(!sketch1.is_empty());
    }

    let mut sketch2 = Sketch::new(kind, registers).unwrap();
    for chunk in second_half.chunks(4) {
        sketch2.add(chunk);
        assert!(sketch2.estimate() > 0.0);
    }

    let zeros = sketch1.registers().zeros();
    sketch1.merge(&sketch2).unwrap();
    assert!(sketch1.registers().zeros() <= zeros);
    assert!(sketch1
        .registers()
        .iter()
        .all(|rank| rank <= sketch1.registers().max_rank()));
});
