use anchor_lang::{AccountDeserialize, Discriminator};
use anyhow::Result;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSendTransactionConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::UiTransactionEncoding;

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: true,
            encoding: Some(UiTransactionEncoding::Base64),
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

/// Fetches and decodes one account, `None` when it does not exist.
pub fn fetch_account<T: AccountDeserialize>(
    client: &RpcClient,
    address: &Pubkey,
) -> Result<Option<T>> {
    let response = client.get_account_with_commitment(address, CommitmentConfig::confirmed())?;
    match response.value {
        Some(account) => Ok(Some(super::utils::deserialize_anchor_account(&account)?)),
        None => Ok(None),
    }
}

/// Every account of type `T` owned by `program_id`.
pub fn get_program_accounts<T>(client: &RpcClient, program_id: &Pubkey) -> Result<Vec<(Pubkey, T)>>
where
    T: AccountDeserialize + Discriminator,
{
    let filters = vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
        0,
        T::DISCRIMINATOR,
    ))];
    let accounts = client.get_program_accounts_with_config(
        program_id,
        RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..Default::default()
            },
            ..Default::default()
        },
    )?;
    accounts
        .into_iter()
        .map(|(address, account)| {
            Ok((address, super::utils::deserialize_anchor_account(&account)?))
        })
        .collect()
}
