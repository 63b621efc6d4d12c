//! Keys stored in a configuration account and the account’s data layout.
//!
//! Data of a configuration account starts with encoded [`ConfigKeys`] which
//! is followed by arbitrary bytes stored by the account’s owner.

use solana_program::pubkey::{Pubkey, PUBKEY_BYTES};

use crate::error::Malformed;
use crate::{short_vec, Result};

/// A single authorised key and whether it must sign subsequent stores.
pub type KeyEntry = (Pubkey, bool);

/// Length of an encoded [`KeyEntry`]: the key followed by a boolean byte.
pub const KEY_ENTRY_LEN: usize = PUBKEY_BYTES + 1;


/// Appends encoded `entry` to `out`.
pub fn encode_key_entry(entry: &KeyEntry, out: &mut Vec<u8>) {
    out.extend_from_slice(entry.0.as_ref());
    out.push(u8::from(entry.1));
}

/// Decodes a key entry starting at `bytes[offset]`.
///
/// Returns the entry and [`KEY_ENTRY_LEN`] (the number of bytes consumed).
/// The flag must be encoded as 0 or 1; other values are rejected.
pub fn decode_key_entry(
    bytes: &[u8],
    offset: usize,
) -> Result<(KeyEntry, usize)> {
    let rest = bytes.get(offset..).ok_or(Malformed::UnexpectedEnd)?;
    let (key, rest) = rest
        .split_first_chunk::<PUBKEY_BYTES>()
        .ok_or(Malformed::UnexpectedEnd)?;
    let is_signer = match rest.first() {
        Some(0) => false,
        Some(1) => true,
        Some(&byte) => return Err(Malformed::InvalidBool(byte).into()),
        None => return Err(Malformed::UnexpectedEnd.into()),
    };
    Ok(((Pubkey::new_from_array(*key), is_signer), KEY_ENTRY_LEN))
}


/// Ordered list of keys authorised for a configuration account.
///
/// Order matters to the Config program and is preserved when encoding and
/// decoding.  Keys are expected to be unique but this is not checked here;
/// the program rejects duplicates when processing the instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, derive_more::From)]
pub struct ConfigKeys(pub Vec<KeyEntry>);

impl ConfigKeys {
    /// Appends encoded keys to `out`.
    ///
    /// Fails if there are more than `u16::MAX` keys.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result {
        short_vec::encode_seq(&self.0, out, |entry, out| {
            encode_key_entry(entry, out);
            Ok(())
        })
    }

    /// Returns encoded keys.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len()?);
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decodes keys starting at `bytes[offset]`.
    ///
    /// Returns the keys and the number of bytes consumed.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        short_vec::decode_seq(bytes, offset, decode_key_entry)
            .map(|(keys, consumed)| (Self(keys), consumed))
    }

    /// Returns length of the encoded keys.
    ///
    /// Fails if there are more than `u16::MAX` keys.
    pub fn encoded_len(&self) -> Result<usize> {
        let len = short_vec::checked_len(self.0.len())?;
        Ok(short_vec::encoded_len_size(len) + self.0.len() * KEY_ENTRY_LEN)
    }

    /// Returns keys which are flagged as required signers, in order.
    pub fn signers(&self) -> impl Iterator<Item = &Pubkey> + '_ {
        self.0
            .iter()
            .filter(|(_, is_signer)| *is_signer)
            .map(|(key, _)| key)
    }

    /// Returns whether there are no keys.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns number of keys, signers or not.
    pub fn len(&self) -> usize { self.0.len() }
}

impl FromIterator<KeyEntry> for ConfigKeys {
    fn from_iter<I: IntoIterator<Item = KeyEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}


/// Decoded data of a configuration account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigAccountData<'a> {
    /// Keys authorised to modify the account.
    pub keys: ConfigKeys,

    /// Stored bytes which follow the keys.
    ///
    /// Account is usually allocated with some slack space so this may
    /// include trailing bytes which were never written by a store
    /// instruction.
    pub data: &'a [u8],
}

impl<'a> ConfigAccountData<'a> {
    /// Decodes data of a configuration account.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let (keys, consumed) = ConfigKeys::decode(bytes, 0)?;
        Ok(Self { keys, data: &bytes[consumed..] })
    }
}

/// Returns the stored bytes of a configuration account, i.e. everything past
/// the keys.
pub fn get_config_data(bytes: &[u8]) -> Result<&[u8]> {
    ConfigAccountData::decode(bytes).map(|account| account.data)
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{Error, InvalidArgument};

    fn key(byte: u8) -> Pubkey { Pubkey::new_from_array([byte; 32]) }

    #[test]
    fn test_key_entry() {
        let mut buf = Vec::new();
        encode_key_entry(&(key(7), true), &mut buf);
        encode_key_entry(&(key(9), false), &mut buf);
        assert_eq!(2 * KEY_ENTRY_LEN, buf.len());
        assert_eq!(&[7; 32][..], &buf[..32]);
        assert_eq!(1, buf[32]);
        assert_eq!(&[9; 32][..], &buf[33..65]);
        assert_eq!(0, buf[65]);

        assert_eq!(
            Ok(((key(7), true), KEY_ENTRY_LEN)),
            decode_key_entry(&buf, 0)
        );
        assert_eq!(
            Ok(((key(9), false), KEY_ENTRY_LEN)),
            decode_key_entry(&buf, KEY_ENTRY_LEN)
        );
    }

    #[test]
    fn test_key_entry_malformed() {
        let mut buf = [5u8; 34];
        buf[32] = 1;

        // 32 bytes instead of 33.
        assert_eq!(
            Err(Error::from(Malformed::UnexpectedEnd)),
            decode_key_entry(&buf[..32], 0)
        );
        assert_eq!(
            Err(Error::from(Malformed::UnexpectedEnd)),
            decode_key_entry(&buf, 2)
        );
        assert_eq!(
            Err(Error::from(Malformed::UnexpectedEnd)),
            decode_key_entry(&buf, 40)
        );

        buf[32] = 2;
        assert_eq!(
            Err(Error::from(Malformed::InvalidBool(2))),
            decode_key_entry(&buf, 0)
        );
        buf[32] = 0xff;
        assert_eq!(
            Err(Error::from(Malformed::InvalidBool(0xff))),
            decode_key_entry(&buf, 0)
        );
    }

    #[test]
    fn test_config_keys() {
        let keys =
            ConfigKeys(vec![(key(1), true), (key(2), false), (key(3), true)]);
        let bytes = keys.to_vec().unwrap();
        assert_eq!(1 + 3 * KEY_ENTRY_LEN, bytes.len());
        assert_eq!(Ok(bytes.len()), keys.encoded_len());
        assert_eq!(3, bytes[0]);
        assert_eq!(
            Ok((keys.clone(), bytes.len())),
            ConfigKeys::decode(&bytes, 0)
        );

        let signers: Vec<_> = keys.signers().copied().collect();
        assert_eq!(vec![key(1), key(3)], signers);
        assert_eq!(3, keys.len());
        assert!(!keys.is_empty());

        let empty = ConfigKeys::default();
        assert_eq!(0, empty.len());
        assert!(empty.is_empty());
        assert_eq!(Ok(vec![0]), empty.to_vec());
        assert_eq!(Ok((empty, 1)), ConfigKeys::decode(&[0], 0));
    }

    #[test]
    fn test_config_keys_preserve_order_and_duplicates() {
        let keys: ConfigKeys = (0..200u8)
            .map(|n| (key(n % 7), n % 3 == 0))
            .collect();
        let bytes = keys.to_vec().unwrap();
        assert_eq!(&[0xc8, 0x01][..], &bytes[..2]);
        assert_eq!(Ok((keys, bytes.len())), ConfigKeys::decode(&bytes, 0));
    }

    #[test]
    fn test_config_keys_too_many() {
        let keys = ConfigKeys(vec![(key(1), false); 0x10000]);
        let err = Error::from(InvalidArgument::SequenceTooLong(0x10000));
        assert_eq!(Err(err), keys.to_vec());
        assert_eq!(Err(err), keys.encoded_len());

        let keys = ConfigKeys(vec![(key(1), false); 0xffff]);
        assert_eq!(Ok(3 + 0xffff * KEY_ENTRY_LEN), keys.encoded_len());
    }

    #[test]
    fn test_config_keys_long_prefix() {
        let check = |len: u16, prefix: [u8; 3]| {
            let keys: ConfigKeys = (0..len)
                .map(|n| {
                    let mut bytes = [0; 32];
                    bytes[..2].copy_from_slice(&n.to_le_bytes());
                    (Pubkey::new_from_array(bytes), n % 2 == 0)
                })
                .collect();
            let bytes = keys.to_vec().unwrap();
            let prefix_len = short_vec::encoded_len_size(len);
            assert_eq!(&prefix[..prefix_len], &bytes[..prefix_len]);
            assert_eq!(
                prefix_len + usize::from(len) * KEY_ENTRY_LEN,
                bytes.len()
            );
            assert_eq!(
                Ok((keys, bytes.len())),
                ConfigKeys::decode(&bytes, 0),
                "len: {len}"
            );
        };

        check(0x3fff, [0xff, 0x7f, 0]);
        check(0x4000, [0x80, 0x80, 0x01]);
        check(0xffff, [0xff, 0xff, 0x03]);
    }

    #[test]
    fn test_config_keys_truncated_long_prefix() {
        assert_eq!(
            Err(Error::from(Malformed::UnexpectedEnd)),
            ConfigKeys::decode(&[0xff, 0xff, 0x03], 0)
        );
    }

    #[test]
    fn test_config_keys_malformed() {
        let keys = ConfigKeys(vec![(key(1), true), (key(2), false)]);
        let mut bytes = keys.to_vec().unwrap();
        assert_eq!(
            Err(Error::from(Malformed::UnexpectedEnd)),
            ConfigKeys::decode(&bytes[..bytes.len() - 1], 0)
        );
        bytes[1 + KEY_ENTRY_LEN + 32] = 2;
        assert_eq!(
            Err(Error::from(Malformed::InvalidBool(2))),
            ConfigKeys::decode(&bytes, 0)
        );
    }

    #[test]
    fn test_account_data() {
        let keys = ConfigKeys(vec![(key(4), true)]);
        let mut bytes = keys.to_vec().unwrap();
        bytes.extend_from_slice(b"hello\0\0\0");

        let account = ConfigAccountData::decode(&bytes).unwrap();
        assert_eq!(keys, account.keys);
        assert_eq!(b"hello\0\0\0", account.data);
        assert_eq!(Ok(&b"hello\0\0\0"[..]), get_config_data(&bytes));

        assert_eq!(Ok(&[][..]), get_config_data(&[0]));
        assert_eq!(
            Err(Error::from(Malformed::UnexpectedEnd)),
            get_config_data(&[])
        );
    }
}
