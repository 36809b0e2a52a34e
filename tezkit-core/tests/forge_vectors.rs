//! Golden wire-format vectors
//!
//! Every hex string here is a production fixture; forging must reproduce
//! it byte-for-byte and unforging must reconstruct the exact contents.
//! A deviation in either direction is a different on-chain operation.

use tezkit_core::{
    forge_operation, unforge_operation, BigInt, Delegation, Error, OperationContent, Origination,
    Reveal, Transaction,
};

const BRANCH: &str = "BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk";
const SOURCE: &str = "tz1LSAycAVcNdYnXCy18bwVksXci8gUC2YpA";
const PUBLIC_KEY: &str = "edpktnktxAzmXPD9XVNqAvdCFb76vxzQtkbVkSEtXcTz33QZQdb4JQ";

const TRANSACTION_OP: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36c0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e00b960000008ba0cb2fad622697145cf1665124096d25bc31e006c0008ba0cb2fad622697145cf1665124096d25bc31ed3e7bd1008d3bb0300b1a803000008ba0cb2fad622697145cf1665124096d25bc31e00";
const REVEAL_OP: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36b0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e0000136083897bc97879c53e3e7855838fbbc87303ddd376080fc3d3e136b55d028b6b0008ba0cb2fad622697145cf1665124096d25bc31ed3e7bd1008d3bb030000136083897bc97879c53e3e7855838fbbc87303ddd376080fc3d3e136b55d028b";
const ORIGINATION_OP: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36d0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e00928fe29c01ff0008ba0cb2fad622697145cf1665124096d25bc31e000000c602000000c105000764085e036c055f036d0000000325646f046c000000082564656661756c740501035d050202000000950200000012020000000d03210316051f02000000020317072e020000006a0743036a00000313020000001e020000000403190325072c020000000002000000090200000004034f0327020000000b051f02000000020321034c031e03540348020000001e020000000403190325072c020000000002000000090200000004034f0327034f0326034202000000080320053d036d03420000001a0a000000150008ba0cb2fad622697145cf1665124096d25bc31e";
const DELEGATION_OP: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36e0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e00ff0008ba0cb2fad622697145cf1665124096d25bc31e";

fn transaction_contents() -> Vec<OperationContent> {
    vec![
        OperationContent::Transaction(Transaction {
            source: SOURCE.to_string(),
            fee: 10100u64.into(),
            counter: 10u64.into(),
            gas_limit: 10100u64.into(),
            storage_limit: BigInt::zero(),
            amount: 12345u64.into(),
            destination: SOURCE.to_string(),
            parameters: None,
        }),
        OperationContent::Transaction(Transaction {
            source: SOURCE.to_string(),
            fee: 34567123u64.into(),
            counter: 8u64.into(),
            gas_limit: 56787u64.into(),
            storage_limit: BigInt::zero(),
            amount: 54321u64.into(),
            destination: SOURCE.to_string(),
            parameters: None,
        }),
    ]
}

fn reveal_contents() -> Vec<OperationContent> {
    vec![
        OperationContent::Reveal(Reveal {
            source: SOURCE.to_string(),
            fee: 10100u64.into(),
            counter: 10u64.into(),
            gas_limit: 10100u64.into(),
            storage_limit: BigInt::zero(),
            public_key: PUBLIC_KEY.to_string(),
        }),
        OperationContent::Reveal(Reveal {
            source: SOURCE.to_string(),
            fee: 34567123u64.into(),
            counter: 8u64.into(),
            gas_limit: 56787u64.into(),
            storage_limit: BigInt::zero(),
            public_key: PUBLIC_KEY.to_string(),
        }),
    ]
}

fn origination_contents() -> Vec<OperationContent> {
    vec![OperationContent::Origination(Origination {
        source: SOURCE.to_string(),
        fee: 10100u64.into(),
        counter: 10u64.into(),
        gas_limit: 10100u64.into(),
        storage_limit: BigInt::zero(),
        balance: 328763282u64.into(),
        delegate: Some(SOURCE.to_string()),
        script: None,
    })]
}

fn delegation_contents() -> Vec<OperationContent> {
    vec![OperationContent::Delegation(Delegation {
        source: SOURCE.to_string(),
        fee: 10100u64.into(),
        counter: 10u64.into(),
        gas_limit: 10100u64.into(),
        storage_limit: BigInt::zero(),
        delegate: Some(SOURCE.to_string()),
    })]
}

#[test]
fn forge_transaction_vector() {
    assert_eq!(
        forge_operation(BRANCH, &transaction_contents()).unwrap(),
        TRANSACTION_OP
    );
}

#[test]
fn forge_reveal_vector() {
    assert_eq!(forge_operation(BRANCH, &reveal_contents()).unwrap(), REVEAL_OP);
}

#[test]
fn forge_origination_vector() {
    assert_eq!(
        forge_operation(BRANCH, &origination_contents()).unwrap(),
        ORIGINATION_OP
    );
}

#[test]
fn forge_delegation_vector() {
    assert_eq!(
        forge_operation(BRANCH, &delegation_contents()).unwrap(),
        DELEGATION_OP
    );
}

#[test]
fn unforge_transaction_vector() {
    let (branch, contents) = unforge_operation(TRANSACTION_OP, false).unwrap();
    assert_eq!(branch, BRANCH);
    assert_eq!(contents, transaction_contents());
}

#[test]
fn unforge_reveal_vector() {
    let (branch, contents) = unforge_operation(REVEAL_OP, false).unwrap();
    assert_eq!(branch, BRANCH);
    assert_eq!(contents, reveal_contents());
}

#[test]
fn unforge_origination_vector() {
    let (branch, contents) = unforge_operation(ORIGINATION_OP, false).unwrap();
    assert_eq!(branch, BRANCH);
    assert_eq!(contents, origination_contents());
}

#[test]
fn unforge_delegation_vector() {
    let (branch, contents) = unforge_operation(DELEGATION_OP, false).unwrap();
    assert_eq!(branch, BRANCH);
    assert_eq!(contents, delegation_contents());
}

#[test]
fn all_vectors_roundtrip() {
    for contents in [
        transaction_contents(),
        reveal_contents(),
        origination_contents(),
        delegation_contents(),
    ] {
        let forged = forge_operation(BRANCH, &contents).unwrap();
        let (branch, unforged) = unforge_operation(&forged, false).unwrap();
        assert_eq!(branch, BRANCH);
        assert_eq!(unforged, contents);
    }
}

#[test]
fn truncated_vector_fails_structurally() {
    // Dropping the final byte must surface a structural error for every
    // kind; silent partial parses would reach the signer.
    for vector in [TRANSACTION_OP, REVEAL_OP, ORIGINATION_OP, DELEGATION_OP] {
        let truncated = &vector[..vector.len() - 2];
        assert!(unforge_operation(truncated, false).is_err());
    }
}

#[test]
fn odd_length_hex_rejected() {
    let dangling = format!("{REVEAL_OP}a");
    assert!(matches!(
        unforge_operation(&dangling, false),
        Err(Error::MalformedEncoding(_))
    ));
}

#[test]
fn branch_only_is_not_an_operation() {
    let branch_hex = &TRANSACTION_OP[..64];
    assert!(matches!(
        unforge_operation(branch_hex, false),
        Err(Error::EmptyOperation)
    ));
}
