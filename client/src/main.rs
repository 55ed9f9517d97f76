use anyhow::{format_err, Result};
use clap::Parser;
use configparser::ini::Ini;
use luxor_farm::engine::{
    locked_pool_value, query_earnings, split_rewards_by_value, ReservePairsOracle,
};
use luxor_farm::math::{Coin, Coins};
use luxor_farm::states::{FarmConfig, FarmPool, LockInfo, WhitelistEntry};
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

mod instructions;
use instructions::farm_instructions::*;
use instructions::rpc::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    luxor_farm_program: Pubkey,
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config.load(client_config).map_err(|e| format_err!(e))?;
    let get = |key: &str| -> Result<String> {
        match config.get("Global", key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(format_err!("{key} must not be empty")),
        }
    };

    Ok(ClientConfig {
        http_url: get("http_url")?,
        ws_url: get("ws_url")?,
        payer_path: get("payer_path")?,
        admin_path: get("admin_path")?,
        luxor_farm_program: Pubkey::from_str(&get("luxor_farm_program")?)?,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: FarmCommands,
}

#[derive(Debug, Parser)]
pub enum FarmCommands {
    InitialiseConfig {
        #[arg(long)]
        admin: Pubkey,
        #[arg(long)]
        quote_mint: Pubkey,
        #[arg(long)]
        fee_mint: Pubkey,
        #[arg(long)]
        pool_creation_fee: u64,
        #[arg(long)]
        pool_deposit: u64,
    },
    /// 0: admin (--key), 1: creation fee, 2: deposit, 3: quote mint (--key)
    UpdateConfig {
        #[arg(long)]
        param: u8,
        #[arg(long, default_value_t = 0)]
        value: u64,
        #[arg(long)]
        key: Option<Pubkey>,
    },
    CreatePool {
        #[arg(long)]
        name: String,
        #[arg(long)]
        lock_mint: Pubkey,
        #[arg(long)]
        yield_mint: Pubkey,
        #[arg(long, default_value_t = 0)]
        min_lock_amount: u64,
    },
    DestroyPool {
        #[arg(long)]
        name: String,
    },
    Provide {
        #[arg(long)]
        name: String,
        #[arg(long)]
        yield_mint: Pubkey,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        amount_per_block: u64,
        /// Defaults to the current slot.
        #[arg(long)]
        start_height: Option<u64>,
    },
    Lock {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: u64,
    },
    Unlock {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: u64,
    },
    Claim {
        #[arg(long)]
        name: String,
    },
    CreditRewards {
        #[arg(long)]
        name: String,
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    AddToWhitelist {
        #[arg(long)]
        name: String,
        /// AMM price source as `vault_0,vault_1,lp_mint`; repeatable.
        #[arg(long = "pair", value_parser = parse_price_source)]
        pairs: Vec<PriceSource>,
    },
    RemoveFromWhitelist {
        #[arg(long)]
        name: String,
    },
    Config,
    Pool {
        #[arg(long)]
        name: String,
    },
    Pools,
    LockInfo {
        #[arg(long)]
        name: String,
        /// Defaults to the payer.
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    Earnings {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    Whitelist,
    /// Splits `amount` of `reward_mint` across whitelisted pools by locked value.
    Distribute {
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        amount: u64,
        #[arg(long = "pair", value_parser = parse_price_source)]
        pairs: Vec<PriceSource>,
        #[arg(long)]
        dry_run: bool,
    },
}

fn send_instructions(
    rpc_client: &RpcClient,
    payer: &Keypair,
    signers: &[&Keypair],
    instructions: &[Instruction],
) -> Result<()> {
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        signers,
        recent_hash,
    );
    let signature = send_txn(rpc_client, &txn, true)?;
    println!("{}", signature);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ConfigView {
    admin: String,
    quote_mint: String,
    fee_mint: String,
    deposit_vault: String,
    pool_creation_fee: u64,
    pool_deposit: u64,
}

#[derive(Serialize)]
struct EarningsView {
    pool_name: String,
    owner: String,
    height: u64,
    rewards: Vec<CoinView>,
}

#[derive(Serialize)]
struct ShareView {
    pool_name: String,
    locked_value: String,
    amount: u64,
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let pool_config = load_cfg(client_config)?;
    let payer = read_keypair_file(&pool_config.payer_path)?;
    let rpc_client = RpcClient::new(pool_config.http_url.to_string());
    let program_id = pool_config.luxor_farm_program;

    let opts = Opts::parse();
    match opts.command {
        FarmCommands::InitialiseConfig {
            admin,
            quote_mint,
            fee_mint,
            pool_creation_fee,
            pool_deposit,
        } => {
            let signer = read_keypair_file(&pool_config.admin_path)?;
            let ixs = initialise_config_instr(
                &pool_config,
                admin,
                quote_mint,
                fee_mint,
                pool_creation_fee,
                pool_deposit,
            )?;
            send_instructions(&rpc_client, &payer, &[&payer, &signer], &ixs)?;
        }
        FarmCommands::UpdateConfig { param, value, key } => {
            let signer = read_keypair_file(&pool_config.admin_path)?;
            let ixs = update_config_instr(&pool_config, param, value, key)?;
            send_instructions(&rpc_client, &payer, &[&payer, &signer], &ixs)?;
        }
        FarmCommands::CreatePool {
            name,
            lock_mint,
            yield_mint,
            min_lock_amount,
        } => {
            let ixs = create_pool_instr(
                &pool_config,
                &rpc_client,
                name,
                lock_mint,
                yield_mint,
                min_lock_amount,
            )?;
            send_instructions(&rpc_client, &payer, &[&payer], &ixs)?;
        }
        FarmCommands::DestroyPool { name } => {
            let ixs = destroy_pool_instr(&pool_config, &rpc_client, name)?;
            send_instructions(&rpc_client, &payer, &[&payer], &ixs)?;
        }
        FarmCommands::Provide {
            name,
            yield_mint,
            amount,
            amount_per_block,
            start_height,
        } => {
            let start_height = match start_height {
                Some(height) => height,
                // leave room for the transaction to land
                None => rpc_client.get_slot()? + 150,
            };
            let ixs = provide_instr(
                &pool_config,
                name,
                yield_mint,
                amount,
                amount_per_block,
                start_height,
            )?;
            send_instructions(&rpc_client, &payer, &[&payer], &ixs)?;
        }
        FarmCommands::Lock { name, amount } => {
            let ixs = lock_instr(&pool_config, &rpc_client, name, amount)?;
            send_instructions(&rpc_client, &payer, &[&payer], &ixs)?;
        }
        FarmCommands::Unlock { name, amount } => {
            let ixs = unlock_instr(&pool_config, &rpc_client, name, amount)?;
            send_instructions(&rpc_client, &payer, &[&payer], &ixs)?;
        }
        FarmCommands::Claim { name } => {
            let ixs = claim_instr(&pool_config, &rpc_client, name)?;
            send_instructions(&rpc_client, &payer, &[&payer], &ixs)?;
        }
        FarmCommands::CreditRewards {
            name,
            reward_mint,
            amount,
        } => {
            let signer = read_keypair_file(&pool_config.admin_path)?;
            let ixs = credit_rewards_instr(&pool_config, &rpc_client, name, reward_mint, amount)?;
            send_instructions(&rpc_client, &payer, &[&payer, &signer], &ixs)?;
        }
        FarmCommands::AddToWhitelist { name, pairs } => {
            let signer = read_keypair_file(&pool_config.admin_path)?;
            let ixs = add_to_whitelist_instr(&pool_config, name, &pairs)?;
            send_instructions(&rpc_client, &payer, &[&payer, &signer], &ixs)?;
        }
        FarmCommands::RemoveFromWhitelist { name } => {
            let signer = read_keypair_file(&pool_config.admin_path)?;
            let ixs = remove_from_whitelist_instr(&pool_config, name)?;
            send_instructions(&rpc_client, &payer, &[&payer, &signer], &ixs)?;
        }
        FarmCommands::Config => {
            let config: FarmConfig =
                fetch_account(&rpc_client, &get_farm_config_address(&program_id))?
                    .ok_or_else(|| format_err!("farm config is not initialised"))?;
            print_json(&ConfigView {
                admin: config.admin.to_string(),
                quote_mint: config.quote_mint.to_string(),
                fee_mint: config.fee_mint.to_string(),
                deposit_vault: config.deposit_vault.to_string(),
                pool_creation_fee: config.pool_creation_fee,
                pool_deposit: config.pool_deposit,
            })?;
        }
        FarmCommands::Pool { name } => {
            let pool: FarmPool =
                fetch_account(&rpc_client, &get_farm_pool_address(&program_id, &name))?
                    .ok_or_else(|| format_err!("pool {name} not found"))?;
            print_json(&PoolView::from(&pool))?;
        }
        FarmCommands::Pools => {
            let pools = get_program_accounts::<FarmPool>(&rpc_client, &program_id)?;
            let views: Vec<PoolView> = pools.iter().map(|(_, pool)| PoolView::from(pool)).collect();
            print_json(&views)?;
        }
        FarmCommands::LockInfo { name, owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let lock: LockInfo =
                fetch_account(&rpc_client, &get_lock_info_address(&program_id, &name, &owner))?
                    .ok_or_else(|| format_err!("{owner} has no lock in {name}"))?;
            print_json(&LockView::from(&lock))?;
        }
        FarmCommands::Earnings { name, owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let store = load_settlement_snapshot(&rpc_client, &program_id, &name, &owner)?;
            let height = rpc_client.get_slot()?;
            let rewards = query_earnings(&store, &name, &owner, height)?;
            print_json(&EarningsView {
                pool_name: name,
                owner: owner.to_string(),
                height,
                rewards: coin_views(&rewards),
            })?;
        }
        FarmCommands::Whitelist => {
            let entries = get_program_accounts::<WhitelistEntry>(&rpc_client, &program_id)?;
            let names: Vec<String> = entries.into_iter().map(|(_, entry)| entry.pool_name).collect();
            print_json(&names)?;
        }
        FarmCommands::Distribute {
            reward_mint,
            amount,
            pairs,
            dry_run,
        } => {
            let config: FarmConfig =
                fetch_account(&rpc_client, &get_farm_config_address(&program_id))?
                    .ok_or_else(|| format_err!("farm config is not initialised"))?;
            let oracle = ReservePairsOracle::new(load_reserve_pairs(&rpc_client, &pairs)?);

            let mut values = Vec::new();
            for (_, entry) in get_program_accounts::<WhitelistEntry>(&rpc_client, &program_id)? {
                let pool: FarmPool = fetch_account(
                    &rpc_client,
                    &get_farm_pool_address(&program_id, &entry.pool_name),
                )?
                .ok_or_else(|| format_err!("whitelisted pool {} not found", entry.pool_name))?;
                let value = locked_pool_value(&oracle, &pool, &config.quote_mint)?;
                values.push((entry.pool_name, value));
            }
            let total = Coins::from_coin(Coin::new(reward_mint, amount));
            let shares = split_rewards_by_value(&total, &values)?;

            let plan: Vec<ShareView> = shares
                .iter()
                .map(|(pool_name, coins)| ShareView {
                    pool_name: pool_name.clone(),
                    locked_value: values
                        .iter()
                        .find(|(name, _)| name == pool_name)
                        .map(|(_, value)| value.to_string())
                        .unwrap_or_default(),
                    amount: coins.amount_of(&reward_mint),
                })
                .collect();
            print_json(&plan)?;
            if dry_run {
                return Ok(());
            }

            let signer = read_keypair_file(&pool_config.admin_path)?;
            for share in plan.into_iter().filter(|share| share.amount > 0) {
                let ixs = credit_rewards_instr(
                    &pool_config,
                    &rpc_client,
                    share.pool_name,
                    reward_mint,
                    share.amount,
                )?;
                send_instructions(&rpc_client, &payer, &[&payer, &signer], &ixs)?;
            }
        }
    }
    Ok(())
}
