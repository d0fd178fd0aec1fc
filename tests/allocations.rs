#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use cardinality_sketches::{CardinalitySketch, HyperLogLog, LogLog};
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Record {
    cardinality: usize,
    loglog: String,
    hyperloglog: String,
}

/// Returns `size / bytes / blocks` and whether any allocation happened after construction.
fn measure_memory_usage<T: CardinalitySketch>(
    cardinality: usize,
    create: impl Fn() -> T,
    insert: impl Fn(&mut T, &usize),
) -> (String, bool) {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut sketch = create();
    sketch.estimate();
    let constructed = dhat::HeapStats::get();
    for i in 0..cardinality {
        insert(&mut sketch, &i);
    }
    sketch.estimate();
    let stats = dhat::HeapStats::get();
    let usage = format!(
        "{} / {} / {}",
        sketch.size_of(),
        stats.total_bytes,
        stats.total_blocks
    );
    (usage, stats.total_blocks != constructed.total_blocks)
}

#[test]
fn test_allocations() {
    let results: Vec<Record> = std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= 1 << 16)
        .map(|cardinality| {
            let (loglog, loglog_allocated) = measure_memory_usage(
                cardinality,
                || LogLog::<cardinality_sketches::Sha256Hasher>::new(4096).unwrap(),
                |sketch, i| sketch.add(i),
            );
            let (hyperloglog, hyperloglog_allocated) = measure_memory_usage(
                cardinality,
                || HyperLogLog::<cardinality_sketches::Sha256Hasher>::new(4096).unwrap(),
                |sketch, i| sketch.add(i),
            );
            assert!(!loglog_allocated, "LogLog allocated while inserting");
            assert!(!hyperloglog_allocated, "HyperLogLog allocated while inserting");
            Record {
                cardinality,
                loglog,
                hyperloglog,
            }
        })
        .collect();

    let table_config = Settings::default().with(Style::markdown());
    let markdown = Table::new(results).with(table_config).to_string();
    println!("{}", markdown);
}
