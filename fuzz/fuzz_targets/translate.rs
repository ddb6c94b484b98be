//! Oplog translation fuzzer.
//!
//! Tests that decoding and SQL generation don't panic on arbitrary input and
//! that every produced statement is terminated.

use honggfuzz::fuzz;
use oplog2sql::testing::test_translate;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_translate(data);
        });
    }
}
