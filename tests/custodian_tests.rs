//! Key custodian signing tests

mod common;

use common::*;
use sol_swap_executor::common::ErrorKind;
use sol_swap_executor::trading::UnsignedTransaction;
use sol_swap_executor::wallet::KeyCustodian;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;
use std::sync::Arc;

#[test]
fn signing_is_deterministic() {
    let (custodian, keypair) = ready_custodian();
    let unsigned = unsigned_for(&keypair.pubkey());

    let first = custodian.sign(&unsigned).unwrap();
    let second = custodian.sign(&unsigned).unwrap();

    assert_eq!(first.signature(), second.signature());
    assert_eq!(first.to_base64().unwrap(), second.to_base64().unwrap());
}

#[test]
fn same_key_in_two_custodians_signs_identically() {
    let (custodian, keypair) = ready_custodian();
    let twin = KeyCustodian::new();
    twin.initialize(Some(&keypair.to_base58_string()), local_rpc()).unwrap();

    let unsigned = unsigned_for(&keypair.pubkey());
    assert_eq!(custodian.sign(&unsigned).unwrap().signature(), twin.sign(&unsigned).unwrap().signature());
}

#[test]
fn signature_verifies_against_message() {
    let (custodian, keypair) = ready_custodian();
    let signed = custodian.sign(&unsigned_for(&keypair.pubkey())).unwrap();

    let transaction = signed.transaction();
    assert_eq!(transaction.signatures[0], signed.signature());
    assert!(signed.signature().verify(keypair.pubkey().as_ref(), &transaction.message.serialize()));
    assert_eq!(signed.last_valid_block_height(), LAST_VALID_BLOCK_HEIGHT);
}

#[test]
fn transaction_for_another_payer_is_refused() {
    let (custodian, _) = ready_custodian();
    let err = custodian.sign(&unsigned_for(&Pubkey::new_unique())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SigningFailed);
}

#[test]
fn uninitialized_custodian_refuses_to_sign() {
    let custodian = KeyCustodian::new();
    let err = custodian.sign(&unsigned_for(&Pubkey::new_unique())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletNotInitialized);
}

#[test]
fn concurrent_signing_without_locks() {
    let (custodian, keypair) = ready_custodian();
    let unsigned = Arc::new(unsigned_for(&keypair.pubkey()));
    let expected = custodian.sign(&unsigned).unwrap().signature();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let custodian = custodian.clone();
            let unsigned = unsigned.clone();
            std::thread::spawn(move || custodian.sign(&unsigned).unwrap().signature())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn garbage_payload_is_signing_failure() {
    let (custodian, _) = ready_custodian();
    let err = custodian.sign(&UnsignedTransaction::new(vec![0xde, 0xad], 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SigningFailed);
}
