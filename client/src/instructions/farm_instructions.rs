use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::{format_err, Result};
use luxor_farm::accounts as farm_accounts;
use luxor_farm::instruction as farm_instructions;
use luxor_farm::states::{FarmConfig, FarmPool, LockInfo, PoolCurrentRewards};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use std::rc::Rc;

use super::rpc::fetch_account;
use super::utils::*;
use super::super::{read_keypair_file, ClientConfig};

fn farm_program(config: &ClientConfig, signer_path: &str) -> Result<Program<Rc<Keypair>>> {
    let signer = read_keypair_file(signer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(signer));
    Ok(client.program(config.luxor_farm_program)?)
}

fn load_config(rpc_client: &RpcClient, program_id: &Pubkey) -> Result<FarmConfig> {
    fetch_account(rpc_client, &get_farm_config_address(program_id))?
        .ok_or_else(|| format_err!("farm config is not initialised"))
}

fn load_pool(rpc_client: &RpcClient, program_id: &Pubkey, pool_name: &str) -> Result<FarmPool> {
    fetch_account(rpc_client, &get_farm_pool_address(program_id, pool_name))?
        .ok_or_else(|| format_err!("pool {pool_name} not found"))
}

/// Reward vault, mint and holder token account for each mint the pool pays.
fn reward_accounts(program_id: &Pubkey, pool: &FarmPool, holder: &Pubkey) -> Vec<AccountMeta> {
    pool.reward_mints()
        .into_iter()
        .flat_map(|mint| {
            [
                AccountMeta::new(get_reward_vault_address(program_id, &pool.name, &mint), false),
                AccountMeta::new_readonly(mint, false),
                AccountMeta::new(get_associated_token_address(holder, &mint), false),
            ]
        })
        .collect()
}

/// Makes sure `holder` can receive every reward mint of the pool.
fn reward_token_accounts(payer: &Pubkey, pool: &FarmPool, holder: &Pubkey) -> Vec<Instruction> {
    pool.reward_mints()
        .iter()
        .map(|mint| {
            create_associated_token_account_idempotent(payer, holder, mint, &spl_token::id())
        })
        .collect()
}

/// Checkpoints and reward accounts a settlement of `owner` touches.
fn settlement_accounts(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    pool: &FarmPool,
    owner: &Pubkey,
) -> Result<Vec<AccountMeta>> {
    let current: PoolCurrentRewards =
        fetch_account(rpc_client, &get_current_rewards_address(program_id, &pool.name))?
            .ok_or_else(|| format_err!("current rewards of {} not found", pool.name))?;
    let lock: Option<LockInfo> =
        fetch_account(rpc_client, &get_lock_info_address(program_id, &pool.name, owner))?;

    let mut periods = vec![current.period - 1, current.period];
    if let Some(lock) = &lock {
        periods.push(lock.reference_period);
    }
    periods.sort_unstable();
    periods.dedup();

    let mut accounts: Vec<AccountMeta> = periods
        .into_iter()
        .map(|period| {
            AccountMeta::new(
                get_historical_rewards_address(program_id, &pool.name, period),
                false,
            )
        })
        .collect();
    if lock.is_some() {
        accounts.extend(reward_accounts(program_id, pool, owner));
    }
    Ok(accounts)
}

pub fn initialise_config_instr(
    config: &ClientConfig,
    admin: Pubkey,
    quote_mint: Pubkey,
    fee_mint: Pubkey,
    pool_creation_fee: u64,
    pool_deposit: u64,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.admin_path)?;
    let instructions = program
        .request()
        .accounts(farm_accounts::InitialiseConfig {
            owner: program.payer(),
            authority: get_authority_address(&program.id()),
            farm_config: get_farm_config_address(&program.id()),
            quote_mint,
            fee_mint,
            deposit_vault: get_deposit_vault_address(&program.id()),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::InitialiseConfig {
            admin,
            pool_creation_fee,
            pool_deposit,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn update_config_instr(
    config: &ClientConfig,
    param: u8,
    value: u64,
    key: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.admin_path)?;
    let mut ixs = program
        .request()
        .accounts(farm_accounts::UpdateConfig {
            owner: program.payer(),
            farm_config: get_farm_config_address(&program.id()),
            system_program: system_program::id(),
        })
        .args(farm_instructions::UpdateConfig { param, value })
        .instructions()?;

    if let Some(key) = key {
        ixs[0].accounts.push(AccountMeta::new_readonly(key, false));
    }
    Ok(ixs)
}

pub fn create_pool_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    pool_name: String,
    lock_mint: Pubkey,
    yield_mint: Pubkey,
    min_lock_amount: u64,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.payer_path)?;
    let program_id = program.id();
    let farm_config = load_config(rpc_client, &program_id)?;
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(farm_accounts::CreatePool {
            owner,
            farm_config: get_farm_config_address(&program_id),
            authority: get_authority_address(&program_id),
            lock_mint,
            yield_mint,
            fee_mint: farm_config.fee_mint,
            owner_fee_token: get_associated_token_address(&owner, &farm_config.fee_mint),
            deposit_vault: farm_config.deposit_vault,
            lock_vault: get_lock_vault_address(&program_id, &pool_name, &lock_mint),
            reward_vault: get_reward_vault_address(&program_id, &pool_name, &yield_mint),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            current_rewards: get_current_rewards_address(&program_id, &pool_name),
            initial_rewards: get_historical_rewards_address(&program_id, &pool_name, 0),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::CreatePool {
            pool_name,
            min_lock_amount,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn destroy_pool_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    pool_name: String,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.payer_path)?;
    let program_id = program.id();
    let farm_config = load_config(rpc_client, &program_id)?;
    let pool = load_pool(rpc_client, &program_id, &pool_name)?;
    let current: PoolCurrentRewards =
        fetch_account(rpc_client, &get_current_rewards_address(&program_id, &pool_name))?
            .ok_or_else(|| format_err!("current rewards of {pool_name} not found"))?;
    let owner = program.payer();

    let mut instructions = reward_token_accounts(&owner, &pool, &owner);
    let mut ixs = program
        .request()
        .accounts(farm_accounts::DestroyPool {
            owner,
            farm_config: get_farm_config_address(&program_id),
            authority: get_authority_address(&program_id),
            fee_mint: farm_config.fee_mint,
            owner_fee_token: get_associated_token_address(&owner, &farm_config.fee_mint),
            deposit_vault: farm_config.deposit_vault,
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            current_rewards: get_current_rewards_address(&program_id, &pool_name),
            whitelist_entry: get_whitelist_address(&program_id, &pool_name),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::DestroyPool {
            pool_name: pool_name.clone(),
        })
        .instructions()?;
    ixs[0].accounts.push(AccountMeta::new(
        get_historical_rewards_address(&program_id, &pool_name, current.period - 1),
        false,
    ));
    ixs[0]
        .accounts
        .extend(reward_accounts(&program_id, &pool, &owner));
    instructions.extend(ixs);
    Ok(instructions)
}

pub fn provide_instr(
    config: &ClientConfig,
    pool_name: String,
    yield_mint: Pubkey,
    amount: u64,
    amount_yielded_per_block: u64,
    start_block_height: u64,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.payer_path)?;
    let program_id = program.id();
    let provider = program.payer();

    let instructions = program
        .request()
        .accounts(farm_accounts::Provide {
            provider,
            authority: get_authority_address(&program_id),
            yield_mint,
            provider_token: get_associated_token_address(&provider, &yield_mint),
            reward_vault: get_reward_vault_address(&program_id, &pool_name, &yield_mint),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::Provide {
            pool_name,
            amount,
            amount_yielded_per_block,
            start_block_height,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn lock_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    pool_name: String,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.payer_path)?;
    let program_id = program.id();
    let pool = load_pool(rpc_client, &program_id, &pool_name)?;
    let owner = program.payer();
    let remaining = settlement_accounts(rpc_client, &program_id, &pool, &owner)?;

    let mut instructions = reward_token_accounts(&owner, &pool, &owner);
    let mut ixs = program
        .request()
        .accounts(farm_accounts::Lock {
            owner,
            authority: get_authority_address(&program_id),
            lock_mint: pool.lock_mint,
            owner_lock_token: get_associated_token_address(&owner, &pool.lock_mint),
            lock_vault: get_lock_vault_address(&program_id, &pool_name, &pool.lock_mint),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            current_rewards: get_current_rewards_address(&program_id, &pool_name),
            lock_info: get_lock_info_address(&program_id, &pool_name, &owner),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::Lock { pool_name, amount })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    instructions.extend(ixs);
    Ok(instructions)
}

pub fn unlock_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    pool_name: String,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.payer_path)?;
    let program_id = program.id();
    let pool = load_pool(rpc_client, &program_id, &pool_name)?;
    let owner = program.payer();
    let remaining = settlement_accounts(rpc_client, &program_id, &pool, &owner)?;

    let mut instructions = reward_token_accounts(&owner, &pool, &owner);
    let mut ixs = program
        .request()
        .accounts(farm_accounts::Unlock {
            owner,
            authority: get_authority_address(&program_id),
            lock_mint: pool.lock_mint,
            owner_lock_token: get_associated_token_address(&owner, &pool.lock_mint),
            lock_vault: get_lock_vault_address(&program_id, &pool_name, &pool.lock_mint),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            current_rewards: get_current_rewards_address(&program_id, &pool_name),
            lock_info: get_lock_info_address(&program_id, &pool_name, &owner),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::Unlock { pool_name, amount })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    instructions.extend(ixs);
    Ok(instructions)
}

pub fn claim_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    pool_name: String,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.payer_path)?;
    let program_id = program.id();
    let pool = load_pool(rpc_client, &program_id, &pool_name)?;
    let owner = program.payer();
    let remaining = settlement_accounts(rpc_client, &program_id, &pool, &owner)?;

    let mut instructions = reward_token_accounts(&owner, &pool, &owner);
    let mut ixs = program
        .request()
        .accounts(farm_accounts::Claim {
            owner,
            authority: get_authority_address(&program_id),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            current_rewards: get_current_rewards_address(&program_id, &pool_name),
            lock_info: get_lock_info_address(&program_id, &pool_name, &owner),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::Claim { pool_name })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    instructions.extend(ixs);
    Ok(instructions)
}

pub fn credit_rewards_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    pool_name: String,
    reward_mint: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.admin_path)?;
    let program_id = program.id();
    let admin = program.payer();
    let current: PoolCurrentRewards =
        fetch_account(rpc_client, &get_current_rewards_address(&program_id, &pool_name))?
            .ok_or_else(|| format_err!("current rewards of {pool_name} not found"))?;
    let last_closed = get_historical_rewards_address(&program_id, &pool_name, current.period - 1);

    let mut instructions = program
        .request()
        .accounts(farm_accounts::CreditRewards {
            admin,
            farm_config: get_farm_config_address(&program_id),
            authority: get_authority_address(&program_id),
            reward_mint,
            admin_token: get_associated_token_address(&admin, &reward_mint),
            reward_vault: get_reward_vault_address(&program_id, &pool_name, &reward_mint),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            current_rewards: get_current_rewards_address(&program_id, &pool_name),
            token_program: spl_token::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::CreditRewards { pool_name, amount })
        .instructions()?;
    instructions[0]
        .accounts
        .push(AccountMeta::new_readonly(last_closed, false));
    Ok(instructions)
}

pub fn add_to_whitelist_instr(
    config: &ClientConfig,
    pool_name: String,
    price_sources: &[PriceSource],
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.admin_path)?;
    let program_id = program.id();

    let mut ixs = program
        .request()
        .accounts(farm_accounts::AddToWhitelist {
            admin: program.payer(),
            farm_config: get_farm_config_address(&program_id),
            farm_pool: get_farm_pool_address(&program_id, &pool_name),
            whitelist_entry: get_whitelist_address(&program_id, &pool_name),
            system_program: system_program::id(),
        })
        .args(farm_instructions::AddToWhitelist { pool_name })
        .instructions()?;
    for source in price_sources {
        ixs[0].accounts.extend([
            AccountMeta::new_readonly(source.vault_0, false),
            AccountMeta::new_readonly(source.vault_1, false),
            AccountMeta::new_readonly(source.lp_mint, false),
        ]);
    }
    Ok(ixs)
}

pub fn remove_from_whitelist_instr(
    config: &ClientConfig,
    pool_name: String,
) -> Result<Vec<Instruction>> {
    let program = farm_program(config, &config.admin_path)?;
    let program_id = program.id();

    let instructions = program
        .request()
        .accounts(farm_accounts::RemoveFromWhitelist {
            admin: program.payer(),
            farm_config: get_farm_config_address(&program_id),
            whitelist_entry: get_whitelist_address(&program_id, &pool_name),
            system_program: system_program::id(),
        })
        .args(farm_instructions::RemoveFromWhitelist { pool_name })
        .instructions()?;
    Ok(instructions)
}
