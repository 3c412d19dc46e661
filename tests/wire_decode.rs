//! Decode-robustness properties for the wire protocol.
//!
//! The decoder faces bytes from an arbitrary peer; whatever arrives, it must
//! answer with a typed error or a valid frame, never panic.

use opfuture::wire::{OpCode, Request, Response};
use proptest::prelude::*;

proptest! {
    #[test]
    fn request_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
        let _ = Request::decode(&bytes);
    }

    #[test]
    fn response_decode_never_panics(
        bytes in proptest::collection::vec(any::<u8>(), 0..32),
        op_byte in 1u8..=4,
    ) {
        let op = OpCode::from_u8(op_byte).expect("byte range covers only valid opcodes");
        let _ = Response::decode(&bytes, op);
    }

    #[test]
    fn every_decoded_request_reencodes_to_the_same_frame(
        id in any::<u32>(),
        op_byte in 1u8..=4,
    ) {
        let mut frame = id.to_le_bytes().to_vec();
        frame.push(op_byte);
        let request = Request::decode(&frame).expect("frame is well-formed by construction");
        prop_assert_eq!(request.encode().to_vec(), frame);
    }
}
