//! Builds a size-bounded telemetry event and tokenizes it back.

use jsonspan::{Emitter, Scanner};

fn main() {
    let mut emitter = Emitter::new(256, 8);
    emitter.open_object();
    emitter.open_property("service");
    emitter.write_str("ingest-gw");
    emitter.close_token();
    emitter.open_property("latency_ms");
    emitter.open_array();
    for sample in [4.2, 3.9, 12.5] {
        emitter.write_f64(sample);
    }
    emitter.close_token();
    emitter.close_token();
    emitter.open_property("dropped");
    emitter.write_u64(0);
    let event = emitter.finish();
    println!("event: {event}");

    let mut scanner = Scanner::new(event, 0, 8);
    while scanner.next() {
        let segment = scanner.token_segment();
        println!(
            "{:?} @ {}..{}  {}",
            scanner.token_kind(),
            segment.offset(),
            segment.end(),
            segment
        );
    }
}
