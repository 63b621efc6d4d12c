//! Errors returned when encoding, decoding, building or parsing Config
//! program instructions.

use solana_program::program_error::ProgramError;


/// Error returned by the library.
///
/// Every encoding and decoding function either fully succeeds or returns one
/// of these.  Partially decoded values are never returned.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, derive_more::Display, derive_more::From,
)]
pub enum Error {
    /// Byte buffer being decoded is not a valid encoding.
    #[display("malformed input: {_0}")]
    MalformedInput(Malformed),

    /// Value being encoded or instruction being built is invalid.
    #[display("invalid argument: {_0}")]
    InvalidArgument(InvalidArgument),

    /// Instruction being parsed has fewer accounts than required.
    #[display("not enough accounts")]
    #[from(ignore)]
    NotEnoughAccounts,
}

impl std::error::Error for Error {}


/// Reason a byte buffer failed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Malformed {
    /// Buffer ended before the value was fully read.
    #[display("unexpected end of input")]
    UnexpectedEnd,

    /// A boolean was encoded as a byte other than 0 or 1.
    #[display("invalid boolean byte {_0:#04x}")]
    InvalidBool(u8),

    /// Compact length continues past its third byte.
    #[display("compact length longer than three bytes")]
    TooLong,

    /// Compact length is not in its shortest form.
    #[display("non-canonical compact length")]
    Alias,

    /// Compact length encodes a value which does not fit `u16`.
    #[display("compact length overflows u16")]
    Overflow,
}


/// Reason a value could not be encoded or an instruction could not be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum InvalidArgument {
    /// Sequence has more elements than a compact length can express.
    #[display("sequence of {_0} elements exceeds maximum length")]
    SequenceTooLong(usize),

    /// Store instruction built without a config account.
    #[display("missing config account")]
    MissingConfigAccount,
}


impl From<Error> for ProgramError {
    fn from(err: Error) -> Self {
        match err {
            Error::MalformedInput(_) => Self::InvalidInstructionData,
            Error::InvalidArgument(_) => Self::InvalidArgument,
            Error::NotEnoughAccounts => Self::NotEnoughAccountKeys,
        }
    }
}


#[test]
fn test_into_program_error() {
    use pretty_assertions::assert_eq;

    assert_eq!(
        ProgramError::InvalidInstructionData,
        Error::from(Malformed::InvalidBool(2)).into()
    );
    assert_eq!(
        ProgramError::InvalidArgument,
        Error::from(InvalidArgument::MissingConfigAccount).into()
    );
    assert_eq!(
        ProgramError::NotEnoughAccountKeys,
        ProgramError::from(Error::NotEnoughAccounts)
    );
}

#[test]
fn test_display() {
    use pretty_assertions::assert_eq;

    assert_eq!(
        "malformed input: invalid boolean byte 0x02",
        Error::from(Malformed::InvalidBool(2)).to_string()
    );
    assert_eq!(
        "invalid argument: sequence of 65536 elements exceeds maximum length",
        Error::from(InvalidArgument::SequenceTooLong(65536)).to_string()
    );
}
