#![no_main]

use libfuzzer_sys::fuzz_target;
use std::time::Duration;

use memofib_core::calculator::Calculator;
use memofib_core::fibonacci::{IterativeFibonacci, MemoFibonacci};
use memofib_core::options::Options;

fuzz_target!(|data: &[u8]| {
    // Each pair of bytes is one request against a shared cache.
    let fib = MemoFibonacci::new(Options::with_delay(Duration::ZERO));
    let reference = IterativeFibonacci::new();

    for chunk in data.chunks_exact(2) {
        let n = i64::from(i16::from_le_bytes([chunk[0], chunk[1]]));
        assert_eq!(
            fib.calculate(n),
            reference.calculate(n),
            "memo != reference at n={n}"
        );
    }
});
