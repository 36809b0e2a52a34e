//! Operation content codec
//!
//! Serializes an ordered list of typed operation contents plus a branch
//! (reference block hash) into the chain's binary wire format, rendered as
//! lowercase hex, and performs the inverse parse. Content order is part of
//! the signed payload and is preserved exactly in both directions.

use crate::cursor::Cursor;
use crate::zarith::BigInt;
use crate::{address, base58, micheline, Error, Micheline, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tezkit_params::Prefix;

const TAG_REVEAL: u8 = 0x6b;
const TAG_TRANSACTION: u8 = 0x6c;
const TAG_ORIGINATION: u8 = 0x6d;
const TAG_DELEGATION: u8 = 0x6e;

const BRANCH_LEN: usize = 32;
const SIGNATURE_LEN: usize = 64;

/// Longest permitted named entrypoint
const MAX_ENTRYPOINT_LEN: usize = 31;

/// Wire bytes of the fixed manager-contract code forged for originations
/// that carry no script of their own.
pub(crate) const DEFAULT_MANAGER_CODE_HEX: &str = "02000000c105000764085e036c055f036d0000000325646f046c000000082564656661756c740501035d050202000000950200000012020000000d03210316051f02000000020317072e020000006a0743036a00000313020000001e020000000403190325072c020000000002000000090200000004034f0327020000000b051f02000000020321034c031e03540348020000001e020000000403190325072c020000000002000000090200000004034f0327034f0326034202000000080320053d036d0342";

static DEFAULT_MANAGER_CODE: Lazy<Vec<u8>> = Lazy::new(|| {
    hex::decode(DEFAULT_MANAGER_CODE_HEX).expect("manager code constant is valid hex")
});

/// A forgeable operation: branch plus an ordered, non-empty content list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Base58Check block hash the operation is anchored to
    pub branch: String,
    /// Contents, in signing order
    pub contents: Vec<OperationContent>,
}

impl Operation {
    /// Forge to the hex wire form. See [`forge_operation`].
    pub fn forge(&self) -> Result<String> {
        forge_operation(&self.branch, &self.contents)
    }

    /// Parse the hex wire form. See [`unforge_operation`].
    pub fn unforge(hex_str: &str, signed: bool) -> Result<Self> {
        let (branch, contents) = unforge_operation(hex_str, signed)?;
        Ok(Self { branch, contents })
    }
}

/// Operation content, one variant per supported kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationContent {
    /// Publish an account's public key
    Reveal(Reveal),
    /// Transfer an amount to a destination contract
    Transaction(Transaction),
    /// Originate a contract
    Origination(Origination),
    /// Set or clear an account's delegate
    Delegation(Delegation),
}

/// Reveal content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    /// Source address
    pub source: String,
    /// Fee in the chain's smallest unit
    pub fee: BigInt,
    /// Source account counter
    pub counter: BigInt,
    /// Gas limit
    pub gas_limit: BigInt,
    /// Storage limit
    pub storage_limit: BigInt,
    /// Encoded public key being revealed
    pub public_key: String,
}

/// Transaction content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Source address
    pub source: String,
    /// Fee in the chain's smallest unit
    pub fee: BigInt,
    /// Source account counter
    pub counter: BigInt,
    /// Gas limit
    pub gas_limit: BigInt,
    /// Storage limit
    pub storage_limit: BigInt,
    /// Transferred amount
    pub amount: BigInt,
    /// Destination address (implicit or originated)
    pub destination: String,
    /// Smart contract call arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TransactionParameters>,
}

/// Arguments of a smart contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionParameters {
    /// Called entrypoint
    pub entrypoint: Entrypoint,
    /// Argument expression
    pub value: Micheline,
}

/// Contract entrypoint reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entrypoint {
    /// The %default entrypoint
    Default,
    /// The %root entrypoint
    Root,
    /// The %do entrypoint
    Do,
    /// The %set_delegate entrypoint
    SetDelegate,
    /// The %remove_delegate entrypoint
    RemoveDelegate,
    /// Any other entrypoint, by name
    Named(String),
}

/// Origination content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origination {
    /// Source address
    pub source: String,
    /// Fee in the chain's smallest unit
    pub fee: BigInt,
    /// Source account counter
    pub counter: BigInt,
    /// Gas limit
    pub gas_limit: BigInt,
    /// Storage limit
    pub storage_limit: BigInt,
    /// Initial balance of the originated contract
    pub balance: BigInt,
    /// Optional delegate for the originated contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    /// Contract script; `None` forges the fixed manager script with the
    /// source's key hash as storage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,
}

/// Contract script: code and initial storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Contract code expression
    pub code: Micheline,
    /// Initial storage expression
    pub storage: Micheline,
}

/// Delegation content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegation {
    /// Source address
    pub source: String,
    /// Fee in the chain's smallest unit
    pub fee: BigInt,
    /// Source account counter
    pub counter: BigInt,
    /// Gas limit
    pub gas_limit: BigInt,
    /// Storage limit
    pub storage_limit: BigInt,
    /// New delegate; `None` clears the delegation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
}

// ---------------------------------------------------------------------------
// Forging
// ---------------------------------------------------------------------------

/// Forge a branch and content list to the hex wire form.
pub fn forge_operation(branch: &str, contents: &[OperationContent]) -> Result<String> {
    if contents.is_empty() {
        return Err(Error::EmptyOperation);
    }
    tracing::debug!(branch, contents = contents.len(), "forging operation");

    let mut out = Vec::new();
    let branch_bytes = base58::decode_expecting(branch, Prefix::BlockHash)?;
    out.extend_from_slice(&branch_bytes);

    for content in contents {
        forge_content(content, &mut out)?;
    }
    Ok(hex::encode(out))
}

fn forge_content(content: &OperationContent, out: &mut Vec<u8>) -> Result<()> {
    match content {
        OperationContent::Reveal(reveal) => {
            out.push(TAG_REVEAL);
            forge_common(
                out,
                &reveal.source,
                &reveal.fee,
                &reveal.counter,
                &reveal.gas_limit,
                &reveal.storage_limit,
            )?;
            out.extend_from_slice(&address::forge_public_key(&reveal.public_key)?);
        }
        OperationContent::Transaction(transaction) => {
            out.push(TAG_TRANSACTION);
            forge_common(
                out,
                &transaction.source,
                &transaction.fee,
                &transaction.counter,
                &transaction.gas_limit,
                &transaction.storage_limit,
            )?;
            out.extend_from_slice(&transaction.amount.to_bytes_nat()?);
            out.extend_from_slice(&address::forge_contract_id(&transaction.destination)?);
            match &transaction.parameters {
                None => out.push(0x00),
                Some(parameters) => {
                    out.push(0xff);
                    forge_entrypoint(&parameters.entrypoint, out)?;
                    write_dynamic(out, &micheline::encode_node(&parameters.value)?)?;
                }
            }
        }
        OperationContent::Origination(origination) => {
            out.push(TAG_ORIGINATION);
            forge_common(
                out,
                &origination.source,
                &origination.fee,
                &origination.counter,
                &origination.gas_limit,
                &origination.storage_limit,
            )?;
            out.extend_from_slice(&origination.balance.to_bytes_nat()?);
            forge_optional_delegate(origination.delegate.as_deref(), out)?;
            match &origination.script {
                Some(script) => {
                    write_dynamic(out, &micheline::encode_node(&script.code)?)?;
                    write_dynamic(out, &micheline::encode_node(&script.storage)?)?;
                }
                None => {
                    write_dynamic(out, &DEFAULT_MANAGER_CODE)?;
                    let storage =
                        Micheline::Bytes(address::forge_address(&origination.source)?.to_vec());
                    write_dynamic(out, &micheline::encode_node(&storage)?)?;
                }
            }
        }
        OperationContent::Delegation(delegation) => {
            out.push(TAG_DELEGATION);
            forge_common(
                out,
                &delegation.source,
                &delegation.fee,
                &delegation.counter,
                &delegation.gas_limit,
                &delegation.storage_limit,
            )?;
            forge_optional_delegate(delegation.delegate.as_deref(), out)?;
        }
    }
    Ok(())
}

fn forge_common(
    out: &mut Vec<u8>,
    source: &str,
    fee: &BigInt,
    counter: &BigInt,
    gas_limit: &BigInt,
    storage_limit: &BigInt,
) -> Result<()> {
    out.extend_from_slice(&address::forge_address(source)?);
    out.extend_from_slice(&fee.to_bytes_nat()?);
    out.extend_from_slice(&counter.to_bytes_nat()?);
    out.extend_from_slice(&gas_limit.to_bytes_nat()?);
    out.extend_from_slice(&storage_limit.to_bytes_nat()?);
    Ok(())
}

fn forge_optional_delegate(delegate: Option<&str>, out: &mut Vec<u8>) -> Result<()> {
    match delegate {
        None => out.push(0x00),
        Some(delegate) => {
            out.push(0xff);
            out.extend_from_slice(&address::forge_address(delegate)?);
        }
    }
    Ok(())
}

fn forge_entrypoint(entrypoint: &Entrypoint, out: &mut Vec<u8>) -> Result<()> {
    match entrypoint {
        Entrypoint::Default => out.push(0x00),
        Entrypoint::Root => out.push(0x01),
        Entrypoint::Do => out.push(0x02),
        Entrypoint::SetDelegate => out.push(0x03),
        Entrypoint::RemoveDelegate => out.push(0x04),
        Entrypoint::Named(name) => {
            if name.len() > MAX_ENTRYPOINT_LEN {
                return Err(Error::MalformedEncoding(format!(
                    "entrypoint name exceeds {MAX_ENTRYPOINT_LEN} bytes"
                )));
            }
            out.push(0xff);
            out.push(name.len() as u8);
            out.extend_from_slice(name.as_bytes());
        }
    }
    Ok(())
}

fn write_dynamic(out: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| Error::MalformedEncoding("dynamic region exceeds u32 length".to_string()))?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

// ---------------------------------------------------------------------------
// Unforging
// ---------------------------------------------------------------------------

/// Parse the hex wire form back into a branch and content list.
///
/// With `signed`, the trailing 64 bytes are the signature and are excluded
/// from content parsing; the remainder must still hold a whole number of
/// contents or the parse fails with [`Error::TruncatedOperation`].
pub fn unforge_operation(hex_str: &str, signed: bool) -> Result<(String, Vec<OperationContent>)> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| Error::MalformedEncoding(format!("hex decode failed: {e}")))?;

    let body = if signed {
        if bytes.len() < BRANCH_LEN + SIGNATURE_LEN {
            return Err(Error::TruncatedOperation);
        }
        &bytes[..bytes.len() - SIGNATURE_LEN]
    } else {
        &bytes[..]
    };

    let mut cursor = Cursor::new(body);
    let branch = base58::encode(Prefix::BlockHash, cursor.take(BRANCH_LEN)?)?;

    let mut contents = Vec::new();
    while !cursor.is_empty() {
        let content = unforge_content(&mut cursor).map_err(|e| {
            // A field running past the signature boundary means the signed
            // buffer cannot hold a whole number of contents.
            if signed && matches!(e, Error::UnexpectedEndOfInput) {
                Error::TruncatedOperation
            } else {
                e
            }
        })?;
        contents.push(content);
    }
    if contents.is_empty() {
        return Err(Error::EmptyOperation);
    }
    Ok((branch, contents))
}

fn unforge_content(cursor: &mut Cursor<'_>) -> Result<OperationContent> {
    let tag = cursor.take_u8()?;
    match tag {
        TAG_REVEAL => {
            let (source, fee, counter, gas_limit, storage_limit) = unforge_common(cursor)?;
            let (public_key, consumed) = address::unforge_public_key(cursor.remaining())?;
            cursor.advance(consumed);
            Ok(OperationContent::Reveal(Reveal {
                source,
                fee,
                counter,
                gas_limit,
                storage_limit,
                public_key,
            }))
        }
        TAG_TRANSACTION => {
            let (source, fee, counter, gas_limit, storage_limit) = unforge_common(cursor)?;
            let amount = take_nat(cursor)?;
            let destination = address::unforge_contract_id(
                cursor
                    .take(address::CONTRACT_ID_LEN)?
                    .try_into()
                    .expect("take returns the requested length"),
            )?;
            let parameters = if take_presence(cursor)? {
                let entrypoint = unforge_entrypoint(cursor)?;
                let value = take_expression(cursor)?;
                Some(TransactionParameters { entrypoint, value })
            } else {
                None
            };
            Ok(OperationContent::Transaction(Transaction {
                source,
                fee,
                counter,
                gas_limit,
                storage_limit,
                amount,
                destination,
                parameters,
            }))
        }
        TAG_ORIGINATION => {
            let (source, fee, counter, gas_limit, storage_limit) = unforge_common(cursor)?;
            let balance = take_nat(cursor)?;
            let delegate = if take_presence(cursor)? {
                Some(take_address(cursor)?)
            } else {
                None
            };

            let code_bytes = take_dynamic(cursor)?.to_vec();
            let code = parse_expression(&code_bytes)?;
            let storage = take_expression(cursor)?;

            // The fixed manager script with the source's key hash as
            // storage is what a script-less origination forges; fold it
            // back so the round trip is exact.
            let default_storage =
                Micheline::Bytes(address::forge_address(&source)?.to_vec());
            let script = if code_bytes == *DEFAULT_MANAGER_CODE && storage == default_storage {
                None
            } else {
                Some(Script { code, storage })
            };

            Ok(OperationContent::Origination(Origination {
                source,
                fee,
                counter,
                gas_limit,
                storage_limit,
                balance,
                delegate,
                script,
            }))
        }
        TAG_DELEGATION => {
            let (source, fee, counter, gas_limit, storage_limit) = unforge_common(cursor)?;
            let delegate = if take_presence(cursor)? {
                Some(take_address(cursor)?)
            } else {
                None
            };
            Ok(OperationContent::Delegation(Delegation {
                source,
                fee,
                counter,
                gas_limit,
                storage_limit,
                delegate,
            }))
        }
        tag => Err(Error::UnknownOperationKind(tag)),
    }
}

fn unforge_common(
    cursor: &mut Cursor<'_>,
) -> Result<(String, BigInt, BigInt, BigInt, BigInt)> {
    let source = take_address(cursor)?;
    let fee = take_nat(cursor)?;
    let counter = take_nat(cursor)?;
    let gas_limit = take_nat(cursor)?;
    let storage_limit = take_nat(cursor)?;
    Ok((source, fee, counter, gas_limit, storage_limit))
}

fn take_address(cursor: &mut Cursor<'_>) -> Result<String> {
    let bytes: &[u8; address::TAGGED_HASH_LEN] = cursor
        .take(address::TAGGED_HASH_LEN)?
        .try_into()
        .expect("take returns the requested length");
    address::unforge_address(bytes)
}

fn take_nat(cursor: &mut Cursor<'_>) -> Result<BigInt> {
    let (value, consumed) = BigInt::from_bytes_nat(cursor.remaining())?;
    cursor.advance(consumed);
    Ok(value)
}

fn take_presence(cursor: &mut Cursor<'_>) -> Result<bool> {
    match cursor.take_u8()? {
        0x00 => Ok(false),
        0xff => Ok(true),
        byte => Err(Error::MalformedEncoding(format!(
            "invalid presence byte {byte:#04x}"
        ))),
    }
}

fn take_dynamic<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let len = cursor.take_u32_be()? as usize;
    cursor.take(len)
}

/// Parse one expression from a length-prefixed region, requiring the
/// parser to consume the region exactly.
fn take_expression(cursor: &mut Cursor<'_>) -> Result<Micheline> {
    parse_expression(take_dynamic(cursor)?)
}

fn parse_expression(bytes: &[u8]) -> Result<Micheline> {
    let (node, consumed) = micheline::decode_node(bytes)?;
    if consumed != bytes.len() {
        return Err(Error::TrailingBytes);
    }
    Ok(node)
}

fn unforge_entrypoint(cursor: &mut Cursor<'_>) -> Result<Entrypoint> {
    match cursor.take_u8()? {
        0x00 => Ok(Entrypoint::Default),
        0x01 => Ok(Entrypoint::Root),
        0x02 => Ok(Entrypoint::Do),
        0x03 => Ok(Entrypoint::SetDelegate),
        0x04 => Ok(Entrypoint::RemoveDelegate),
        0xff => {
            let len = cursor.take_u8()? as usize;
            let name = String::from_utf8(cursor.take(len)?.to_vec())
                .map_err(|e| Error::MalformedEncoding(format!("invalid entrypoint name: {e}")))?;
            Ok(Entrypoint::Named(name))
        }
        tag => Err(Error::MalformedEncoding(format!(
            "invalid entrypoint tag {tag:#04x}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCH: &str = "BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk";
    const SOURCE: &str = "tz1LSAycAVcNdYnXCy18bwVksXci8gUC2YpA";

    fn transaction(fee: u64, counter: u64, gas: u64, amount: u64) -> OperationContent {
        OperationContent::Transaction(Transaction {
            source: SOURCE.to_string(),
            fee: fee.into(),
            counter: counter.into(),
            gas_limit: gas.into(),
            storage_limit: BigInt::zero(),
            amount: amount.into(),
            destination: SOURCE.to_string(),
            parameters: None,
        })
    }

    #[test]
    fn test_order_is_significant() {
        let a = transaction(10100, 10, 10100, 12345);
        let b = transaction(34567123, 8, 56787, 54321);
        let forward = forge_operation(BRANCH, &[a.clone(), b.clone()]).unwrap();
        let reversed = forge_operation(BRANCH, &[b, a]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_empty_contents_rejected() {
        assert!(matches!(
            forge_operation(BRANCH, &[]),
            Err(Error::EmptyOperation)
        ));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let branch_hex = hex::encode(
            base58::decode_expecting(BRANCH, Prefix::BlockHash).unwrap(),
        );
        let bad = format!("{branch_hex}42");
        assert!(matches!(
            unforge_operation(&bad, false),
            Err(Error::UnknownOperationKind(0x42))
        ));
    }

    #[test]
    fn test_transaction_parameters_roundtrip() {
        let content = OperationContent::Transaction(Transaction {
            source: SOURCE.to_string(),
            fee: 1420u64.into(),
            counter: 11u64.into(),
            gas_limit: 10600u64.into(),
            storage_limit: 300u64.into(),
            amount: BigInt::zero(),
            destination: SOURCE.to_string(),
            parameters: Some(TransactionParameters {
                entrypoint: Entrypoint::Named("transfer".to_string()),
                value: Micheline::Seq(vec![Micheline::Int(5u64.into())]),
            }),
        });

        let forged = forge_operation(BRANCH, std::slice::from_ref(&content)).unwrap();
        let (branch, contents) = unforge_operation(&forged, false).unwrap();
        assert_eq!(branch, BRANCH);
        assert_eq!(contents, vec![content]);
    }

    #[test]
    fn test_custom_script_roundtrip() {
        let script = Script {
            code: Micheline::Seq(vec![Micheline::Prim {
                prim: 0x27,
                args: Vec::new(),
                annots: Vec::new(),
            }]),
            storage: Micheline::Int(42u64.into()),
        };
        let content = OperationContent::Origination(Origination {
            source: SOURCE.to_string(),
            fee: 10100u64.into(),
            counter: 10u64.into(),
            gas_limit: 10100u64.into(),
            storage_limit: BigInt::zero(),
            balance: 1u64.into(),
            delegate: None,
            script: Some(script),
        });

        let forged = forge_operation(BRANCH, std::slice::from_ref(&content)).unwrap();
        let (_, contents) = unforge_operation(&forged, false).unwrap();
        assert_eq!(contents, vec![content]);
    }

    #[test]
    fn test_signed_unforge_strips_signature() {
        let content = transaction(10100, 10, 10100, 12345);
        let forged = forge_operation(BRANCH, std::slice::from_ref(&content)).unwrap();
        let signed = format!("{forged}{}", "00".repeat(SIGNATURE_LEN));

        let (branch, contents) = unforge_operation(&signed, true).unwrap();
        assert_eq!(branch, BRANCH);
        assert_eq!(contents, vec![content]);
    }

    #[test]
    fn test_signed_unforge_rejects_partial_content() {
        let content = transaction(10100, 10, 10100, 12345);
        let forged = forge_operation(BRANCH, std::slice::from_ref(&content)).unwrap();
        // Claiming the buffer is signed swallows the final 64 bytes of
        // content, so a whole content no longer fits.
        assert!(matches!(
            unforge_operation(&forged, true),
            Err(Error::TruncatedOperation) | Err(Error::MalformedInteger(_))
        ));
    }

    #[test]
    fn test_presence_byte_validated() {
        let content = OperationContent::Delegation(Delegation {
            source: SOURCE.to_string(),
            fee: 10100u64.into(),
            counter: 10u64.into(),
            gas_limit: 10100u64.into(),
            storage_limit: BigInt::zero(),
            delegate: None,
        });
        let forged = forge_operation(BRANCH, std::slice::from_ref(&content)).unwrap();
        // The delegate presence byte is the final byte; corrupt it.
        let corrupted = format!("{}7a", &forged[..forged.len() - 2]);
        assert!(matches!(
            unforge_operation(&corrupted, false),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_json_model() {
        let content = transaction(10100, 10, 10100, 12345);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "transaction");
        assert_eq!(json["fee"], "10100");
        assert_eq!(json["destination"], SOURCE);
        assert!(json.get("parameters").is_none());

        let back: OperationContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, content);
    }
}
