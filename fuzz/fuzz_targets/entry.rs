//! Structured entry fuzzer.
//!
//! Builds oplog entries from arbitrary bytes and tests that SQL generation
//! doesn't panic and keeps statements terminated.

use arbitrary::{Arbitrary, Unstructured};
use honggfuzz::fuzz;
use oplog2sql::OplogEntry;
use oplog2sql::testing::test_entry;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let mut u = Unstructured::new(data);
            if let Ok(entry) = OplogEntry::arbitrary(&mut u) {
                test_entry(&entry);
            }
        });
    }
}
