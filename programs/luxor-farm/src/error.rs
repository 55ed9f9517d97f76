use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Signer is not authorized for this action")]
    InvalidOwner,

    #[msg("Only the pool owner can destroy the pool")]
    NotPoolOwner,

    #[msg("Pool name must be 1-32 characters of [A-Za-z0-9_-]")]
    InvalidPoolName,

    #[msg("Farm pool not found")]
    PoolNotFound,

    #[msg("Farm pool already exists")]
    PoolAlreadyExists,

    #[msg("Token mint is not registered")]
    TokenNotFound,

    #[msg("Owner hasn't locked in this pool")]
    LockNotFound,

    #[msg("Token mint does not match the pool")]
    InvalidDenom,

    #[msg("Amount must be positive")]
    NonPositiveAmount,

    #[msg("Unlock amount exceeds the locked amount")]
    InsufficientLocked,

    #[msg("Locked amount would fall below the pool minimum")]
    BelowMinLockAmount,

    #[msg("Start height must not be earlier than the current height")]
    InvalidStartHeight,

    #[msg("Can't provide repeatedly until remaining amount becomes zero")]
    YieldAlreadyProvided,

    #[msg("Pool not finished: tokens are still locked or yield remains")]
    PoolNotFinished,

    #[msg("Insufficient funds for the transfer")]
    InsufficientFunds,

    #[msg("Insufficient fee coins to create a pool")]
    InsufficientFeeCoins,

    #[msg("Insufficient deposit coins to create a pool")]
    InsufficientDepositCoins,

    #[msg("Lock token has no price path to the quote token")]
    NoPricePath,

    #[msg("Too many token denominations for one pool")]
    TooManyDenoms,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,

    #[msg("Farm record account was not supplied")]
    MissingRecordAccount,

    #[msg("Token account was not supplied")]
    MissingTokenAccount,

    #[msg("Serialized record exceeds its account space")]
    RecordTooLarge,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("Invalid parameter provided")]
    InvalidParam,
}
