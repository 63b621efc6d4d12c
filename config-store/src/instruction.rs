//! Building and parsing the Config program’s Store instruction.
//!
//! Instruction data is the list of authorised keys followed by arbitrary
//! bytes to store in the account:
//!
//! ```text
//! <compact length N> <N × (32-byte key, 1-byte bool)> <data…>
//! ```
//!
//! The data is not length-prefixed; it spans the remainder of the
//! instruction data.  Accounts passed to the instruction are the config
//! account (writable) followed by any additional signers (read-only).

use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

use crate::error::{Error, InvalidArgument};
use crate::state::ConfigKeys;
use crate::Result;


/// Decoded data of a Store instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorePayload {
    /// Keys to record in the config account and whether each needs to sign
    /// subsequent stores.
    pub keys: ConfigKeys,

    /// Arbitrary data to store in the config account.
    pub data: Vec<u8>,
}

impl StorePayload {
    /// Returns encoded instruction data.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf =
            Vec::with_capacity(self.keys.encoded_len()? + self.data.len());
        self.keys.encode(&mut buf)?;
        buf.extend_from_slice(&self.data);
        Ok(buf)
    }

    /// Decodes instruction data.
    ///
    /// Everything past the keys is taken as stored data, including nothing
    /// at all.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (keys, consumed) = ConfigKeys::decode(bytes, 0)?;
        Ok(Self { keys, data: bytes[consumed..].to_vec() })
    }
}


/// Role of an account in an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountRole {
    /// Account is only read.
    Readonly,
    /// Account may be modified.
    Writable,
    /// Account is only read and must sign the transaction.
    ReadonlySigner,
    /// Account may be modified and must sign the transaction.
    WritableSigner,
}

impl AccountRole {
    pub const fn new(is_signer: bool, is_writable: bool) -> Self {
        match (is_signer, is_writable) {
            (false, false) => Self::Readonly,
            (false, true) => Self::Writable,
            (true, false) => Self::ReadonlySigner,
            (true, true) => Self::WritableSigner,
        }
    }

    pub const fn is_signer(self) -> bool {
        matches!(self, Self::ReadonlySigner | Self::WritableSigner)
    }

    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Writable | Self::WritableSigner)
    }
}


/// An account together with its role in an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedAccount {
    /// Address of the account.
    pub pubkey: Pubkey,
    /// How the instruction uses the account.
    pub role: AccountRole,
}

impl ResolvedAccount {
    pub const fn new(pubkey: Pubkey, role: AccountRole) -> Self {
        Self { pubkey, role }
    }
}

impl From<ResolvedAccount> for AccountMeta {
    fn from(account: ResolvedAccount) -> Self {
        Self {
            pubkey: account.pubkey,
            is_signer: account.role.is_signer(),
            is_writable: account.role.is_writable(),
        }
    }
}

impl From<&AccountMeta> for ResolvedAccount {
    fn from(meta: &AccountMeta) -> Self {
        let role = AccountRole::new(meta.is_signer, meta.is_writable);
        Self::new(meta.pubkey, role)
    }
}


/// The config account being modified by a Store instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigAccount {
    /// Account which doesn’t sign the transaction.
    ///
    /// Sufficient once the account records required signers.
    Address(Pubkey),

    /// Account which signs the transaction.
    ///
    /// Required on the first store which initialises the account and when
    /// the account records no required signers.
    Signer(Pubkey),
}

impl ConfigAccount {
    pub const fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        if is_signer {
            Self::Signer(pubkey)
        } else {
            Self::Address(pubkey)
        }
    }

    /// Returns address of the account regardless of whether it signs.
    pub const fn pubkey(&self) -> &Pubkey {
        match self {
            Self::Address(pubkey) | Self::Signer(pubkey) => pubkey,
        }
    }

    /// Returns the account resolved to its role; always writable.
    pub const fn resolve(&self) -> ResolvedAccount {
        match *self {
            Self::Address(pubkey) => {
                ResolvedAccount::new(pubkey, AccountRole::Writable)
            }
            Self::Signer(pubkey) => {
                ResolvedAccount::new(pubkey, AccountRole::WritableSigner)
            }
        }
    }
}


/// Builder of a Store instruction.
///
/// The config account must be set before calling [`StoreBuilder::build`].
/// Additional signers are attached after the config account in the order
/// they were added.
///
/// The builder does not verify that the signers match keys flagged as
/// signers in the payload.  Which keys need to sign depends on the state of
/// the account on chain (e.g. whether it’s being initialised) which isn’t
/// known here.  Use [`store`] to derive the signers from the keys.
///
/// # Example
///
/// ```
/// # use solana_config_store::instruction::{ConfigAccount, StoreBuilder};
/// # use solana_program::pubkey::Pubkey;
/// let config = Pubkey::new_unique();
/// let signer = Pubkey::new_unique();
/// let instruction = StoreBuilder::new()
///     .config_account(ConfigAccount::Signer(config))
///     .keys(vec![(signer, true)])
///     .data(b"hello".to_vec())
///     .signer(signer)
///     .build()
///     .unwrap();
/// assert_eq!(2, instruction.accounts.len());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreBuilder {
    program_id: Pubkey,
    config_account: Option<ConfigAccount>,
    payload: StorePayload,
    signers: Vec<Pubkey>,
}

impl Default for StoreBuilder {
    fn default() -> Self { Self::new() }
}

impl StoreBuilder {
    /// Constructs a builder calling the Config program at [`crate::ID`].
    pub fn new() -> Self {
        Self {
            program_id: crate::ID,
            config_account: None,
            payload: StorePayload::default(),
            signers: Vec::new(),
        }
    }

    /// Overrides address of the Config program.
    pub fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn config_account(mut self, account: ConfigAccount) -> Self {
        self.config_account = Some(account);
        self
    }

    pub fn keys(mut self, keys: impl Into<ConfigKeys>) -> Self {
        self.payload.keys = keys.into();
        self
    }

    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.payload.data = data.into();
        self
    }

    /// Appends an additional signer account.
    pub fn signer(mut self, signer: Pubkey) -> Self {
        self.signers.push(signer);
        self
    }

    /// Appends additional signer accounts.
    pub fn signers(
        mut self,
        signers: impl IntoIterator<Item = Pubkey>,
    ) -> Self {
        self.signers.extend(signers);
        self
    }

    /// Returns resolved accounts of the instruction.
    ///
    /// Fails with [`InvalidArgument::MissingConfigAccount`] if config account
    /// hasn’t been set.
    pub fn accounts(&self) -> Result<Vec<ResolvedAccount>> {
        let config = self
            .config_account
            .as_ref()
            .ok_or(InvalidArgument::MissingConfigAccount)?;
        let signers = self.signers.iter().map(|signer| {
            ResolvedAccount::new(*signer, AccountRole::ReadonlySigner)
        });
        Ok(core::iter::once(config.resolve()).chain(signers).collect())
    }

    /// Builds the instruction.
    ///
    /// Fails if config account hasn’t been set or there are more than
    /// `u16::MAX` keys.
    pub fn build(self) -> Result<Instruction> {
        let accounts = self.accounts()?;
        let data = self.payload.encode()?;
        Ok(Instruction {
            program_id: self.program_id,
            accounts: accounts.into_iter().map(AccountMeta::from).collect(),
            data,
        })
    }
}


/// Constructs a Store instruction with signers derived from the keys.
///
/// Every key flagged as a signer, other than the config account itself, is
/// attached in the order of `keys`.  Signers get the read-only signer role
/// just like ones added with [`StoreBuilder::signer`]; the program never
/// writes to them.  When the config account is one of the signer keys,
/// `is_config_signer` should be set.
pub fn store(
    config_account: &Pubkey,
    is_config_signer: bool,
    keys: ConfigKeys,
    data: impl Into<Vec<u8>>,
) -> Result<Instruction> {
    let signers: Vec<Pubkey> =
        keys.signers().filter(|key| *key != config_account).copied().collect();
    StoreBuilder::new()
        .config_account(ConfigAccount::new(*config_account, is_config_signer))
        .keys(keys)
        .data(data)
        .signers(signers)
        .build()
}


/// Store instruction decomposed into config account and payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedStore {
    pub program_id: Pubkey,

    /// The config account; the first account of the instruction.
    pub config_account: ResolvedAccount,

    pub payload: StorePayload,
}

/// Parses a Store instruction.
///
/// Accounts past the first are ignored.  Matching them against signer keys
/// of the payload is left to the caller.  Program id is returned as is and
/// not checked against [`crate::ID`].
pub fn parse_store(instruction: &Instruction) -> Result<ParsedStore> {
    let config_account =
        instruction.accounts.first().ok_or(Error::NotEnoughAccounts)?;
    let payload = StorePayload::decode(&instruction.data)?;
    Ok(ParsedStore {
        program_id: instruction.program_id,
        config_account: config_account.into(),
        payload,
    })
}


/// Constructs a Store instruction with no keys and no data signed by the
/// config account.
///
/// Used to initialise a freshly created config account.
#[cfg(feature = "client")]
pub fn initialize_account(config_account: &Pubkey) -> Result<Instruction> {
    StoreBuilder::new()
        .config_account(ConfigAccount::Signer(*config_account))
        .build()
}

/// Creates and initialises a new config account.
///
/// Returns a System program instruction allocating the account owned by the
/// Config program followed by an instruction initialising it.  The account
/// is sized to hold `keys` and `max_config_space` bytes of data.  Both
/// `from_account` and `config_account` must sign the transaction.
#[cfg(feature = "client")]
pub fn create_account_with_max_config_space(
    from_account: &Pubkey,
    config_account: &Pubkey,
    lamports: u64,
    max_config_space: u64,
    keys: &ConfigKeys,
) -> Result<Vec<Instruction>> {
    let space = max_config_space.saturating_add(keys.encoded_len()? as u64);
    Ok(vec![
        solana_system_interface::instruction::create_account(
            from_account,
            config_account,
            lamports,
            space,
            &crate::ID,
        ),
        initialize_account(config_account)?,
    ])
}
