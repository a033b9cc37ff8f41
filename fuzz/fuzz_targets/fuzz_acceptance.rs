//! Fuzz target: UART acceptance predicates
//!
//! Splits arbitrary bytes into chunks and drives both predicates.  The
//! exact-token check must agree with a plain slice compare; the line check
//! must fire exactly when a line feed has been seen.
//!
//! cargo fuzz run fuzz_acceptance

#![no_main]

use boardcheck::bringup::handshake::{Acceptance, ExactToken, LineTerminated};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&chunk_len, stream)) = data.split_first() else {
        return;
    };
    let chunk_len = usize::from(chunk_len).max(1);

    let mut line = LineTerminated::<96>::new();
    let mut seen_lf = false;
    for chunk in stream.chunks(chunk_len) {
        assert_eq!(ExactToken(b"OK\r").accept(chunk), chunk == b"OK\r");

        seen_lf |= chunk.contains(&b'\n');
        let fired = line.accept(chunk);
        assert_eq!(fired, chunk.contains(&b'\n'));
        assert!(line.first_line().len() <= 96);
        if seen_lf {
            break;
        }
    }
});
