use crate::{Hasher, KEY_LEN};

const MAX_MESSAGE_LEN: usize = 16;
const XOF_OUTPUT_LEN: usize = 80;

fn reference_output(mut reference: blake3::Hasher, message: &[u8]) -> [u8; XOF_OUTPUT_LEN] {
    reference.update(message);
    let mut out = [0u8; XOF_OUTPUT_LEN];
    reference.finalize_xof().fill(&mut out);
    out
}

fn our_output(mut ours: Hasher, message: &[u8]) -> [u8; XOF_OUTPUT_LEN] {
    ours.update(message);
    let mut out = [0u8; XOF_OUTPUT_LEN];
    ours.finalize_into(&mut out);
    out
}

#[kani::proof]
#[kani::unwind(32)]
fn hash_matches_reference() {
    let message: [u8; MAX_MESSAGE_LEN] = kani::any();
    let message_len: usize = kani::any();
    kani::assume(message_len <= MAX_MESSAGE_LEN);
    let message = &message[..message_len];

    assert_eq!(
        our_output(Hasher::new(), message),
        reference_output(blake3::Hasher::new(), message)
    );
}

#[kani::proof]
#[kani::unwind(32)]
fn keyed_hash_matches_reference() {
    let key: [u8; KEY_LEN] = kani::any();
    let message: [u8; MAX_MESSAGE_LEN] = kani::any();
    let message_len: usize = kani::any();
    kani::assume(message_len <= MAX_MESSAGE_LEN);
    let message = &message[..message_len];

    assert_eq!(
        our_output(Hasher::new_keyed(&key), message),
        reference_output(blake3::Hasher::new_keyed(&key), message)
    );
}

#[kani::proof]
#[kani::unwind(32)]
fn derive_key_matches_reference() {
    let context_bytes: [u8; 16] = kani::any();
    let context_len: usize = kani::any();
    kani::assume(context_len <= context_bytes.len());
    let Ok(context) = core::str::from_utf8(&context_bytes[..context_len]) else {
        return;
    };

    let message: [u8; MAX_MESSAGE_LEN] = kani::any();
    let message_len: usize = kani::any();
    kani::assume(message_len <= MAX_MESSAGE_LEN);
    let message = &message[..message_len];

    assert_eq!(
        our_output(Hasher::new_derive_key(context), message),
        reference_output(blake3::Hasher::new_derive_key(context), message)
    );
}

#[kani::proof]
#[kani::unwind(32)]
fn keyed_construction_rejects_other_lengths() {
    let key: [u8; 40] = kani::any();
    let key_len: usize = kani::any();
    kani::assume(key_len <= key.len());
    let result = Hasher::try_new_keyed(&key[..key_len]);
    assert_eq!(result.is_ok(), key_len == KEY_LEN);
}
