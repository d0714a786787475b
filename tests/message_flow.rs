//! End-to-end checks of the author → wire → receive path.

use std::collections::HashSet;

use proptest::prelude::*;
use proptest::sample::Index;

use ixichat::config::Config;
use ixichat::{
    derive_userid, Error, InboundUnit, KeyPair, Message, WirePayload, MAX_PAYLOAD_LENGTH,
};

const CHANNEL: &str = "IXICHAT9LOBBY";
const ISSUED_AT: i64 = 1_700_000_000_000;

fn contacts_of(userids: &[&str]) -> HashSet<String> {
    userids.iter().map(|s| s.to_string()).collect()
}

fn sent(keys: &KeyPair, content: &str) -> (Message, InboundUnit) {
    let message = Message::from_author("alice", content, CHANNEL, keys).unwrap();
    let unit = message.to_wire().unwrap().received_at(ISSUED_AT);
    (message, unit)
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_preserves_wire_fields() {
    let keys = KeyPair::generate();
    let own = keys.userid();
    let (authored, unit) = sent(&keys, "hello ledger");

    let received = Message::from_wire(&unit, &contacts_of(&[&own]), &own).unwrap();

    assert_eq!(received.username(), authored.username());
    assert_eq!(received.content(), authored.content());
    assert_eq!(received.channel(), authored.channel());
    assert_eq!(received.signature(), authored.signature());
    assert_eq!(received.public_key(), authored.public_key());
    assert_eq!(received.userid(), authored.userid());
    assert_eq!(received.userid(), derive_userid(received.public_key()));
    assert!(received.is_trusted());
    assert!(received.is_own());
    assert_eq!(received.timestamp(), ISSUED_AT);
}

#[test]
fn test_stranger_is_neither_trusted_nor_own() {
    let sender = KeyPair::generate();
    let me = KeyPair::generate();
    let (_, unit) = sent(&sender, "hi");

    let received = Message::from_wire(&unit, &contacts_of(&["ABCDEFGH"]), &me.userid()).unwrap();
    assert!(!received.is_trusted());
    assert!(!received.is_own());

    let received =
        Message::from_wire(&unit, &contacts_of(&[&sender.userid()]), &me.userid()).unwrap();
    assert!(received.is_trusted());
    assert!(!received.is_own());
}

#[test]
fn test_authored_ignores_contacts() {
    let keys = KeyPair::generate();
    let message = Message::from_author("alice", "mine", CHANNEL, &keys).unwrap();
    assert!(message.is_own());
    assert!(message.is_trusted());
    assert_eq!(message.to_display().user_id, keys.userid());
}

// ============================================================================
// Tampering and malformed input
// ============================================================================

#[test]
fn test_tampered_content_fails_signature() {
    let keys = KeyPair::generate();
    let (_, mut unit) = sent(&keys, "pay alice 10");

    let mut payload: WirePayload = serde_json::from_str(&unit.body).unwrap();
    payload.message = "pay alice 99".to_string();
    unit.body = serde_json::to_string(&payload).unwrap();

    let result = Message::from_wire(&unit, &HashSet::new(), "");
    assert!(matches!(result, Err(Error::SignatureInvalid(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_any_single_character_change_fails_signature(
        content in "[a-z ]{1,40}",
        position in any::<Index>(),
    ) {
        let keys = KeyPair::generate();
        let (_, mut unit) = sent(&keys, &content);

        let mut chars: Vec<char> = content.chars().collect();
        let at = position.index(chars.len());
        chars[at] = if chars[at] == 'x' { 'y' } else { 'x' };

        let mut payload: WirePayload = serde_json::from_str(&unit.body).unwrap();
        payload.message = chars.into_iter().collect();
        unit.body = serde_json::to_string(&payload).unwrap();

        let result = Message::from_wire(&unit, &HashSet::new(), "");
        prop_assert!(matches!(result, Err(Error::SignatureInvalid(_))), "{:?}", result);
    }
}

#[test]
fn test_swapped_public_key_fails_signature() {
    let keys = KeyPair::generate();
    let impostor = KeyPair::generate();
    let (_, mut unit) = sent(&keys, "hello");

    let mut payload: WirePayload = serde_json::from_str(&unit.body).unwrap();
    payload.public_key = impostor.public_key().to_string();
    unit.body = serde_json::to_string(&payload).unwrap();

    assert!(matches!(
        Message::from_wire(&unit, &HashSet::new(), ""),
        Err(Error::SignatureInvalid(_))
    ));
}

#[test]
fn test_missing_signature_is_format_error() {
    let keys = KeyPair::generate();
    let (_, mut unit) = sent(&keys, "hello");

    let mut value: serde_json::Value = serde_json::from_str(&unit.body).unwrap();
    value.as_object_mut().unwrap().remove("signature");
    unit.body = value.to_string();

    assert!(matches!(
        Message::from_wire(&unit, &HashSet::new(), ""),
        Err(Error::Format(_))
    ));
}

// ============================================================================
// Size ceiling
// ============================================================================

#[test]
fn test_payload_at_ceiling_encodes_one_more_fails() {
    let keys = KeyPair::generate();
    let base = Message::from_author("alice", "", CHANNEL, &keys)
        .unwrap()
        .to_wire()
        .unwrap()
        .body
        .len();
    let room = MAX_PAYLOAD_LENGTH - base;

    let fits = Message::from_author("alice", &"a".repeat(room), CHANNEL, &keys).unwrap();
    let unit = fits.to_wire().unwrap();
    assert_eq!(unit.body.len(), MAX_PAYLOAD_LENGTH);

    let too_long = Message::from_author("alice", &"a".repeat(room + 1), CHANNEL, &keys).unwrap();
    assert_eq!(
        too_long.to_wire(),
        Err(Error::TooLarge {
            len: MAX_PAYLOAD_LENGTH + 1,
            max: MAX_PAYLOAD_LENGTH
        })
    );
}

// ============================================================================
// Config on disk
// ============================================================================

#[tokio::test]
async fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let keys = KeyPair::generate();
    let mut config = Config::new("alice", &keys).unwrap();
    config.add_contact("ABCDEFGH").unwrap();
    config.save(&path).await.unwrap();

    let loaded = Config::load(&path).await.unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.keypair().unwrap().userid(), keys.userid());
}

#[tokio::test]
async fn test_missing_config_mentions_init() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).await.unwrap_err();
    assert!(err.to_string().contains("ixichat init"));
}
