//! The closed set of farm operations and their dispatch.

use crate::engine::{
    add_to_whitelist, claim, create_pool, credit_rewards, destroy_pool, lock, provide,
    remove_from_whitelist, unlock, FarmParams, FarmStore, PoolRefund, PricingOracle,
    TokenRegistry, TransferLedger,
};
use crate::math::{Coin, Coins};
use anchor_lang::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FarmOperation {
    CreatePool {
        owner: Pubkey,
        pool_name: String,
        lock_mint: Pubkey,
        min_lock_amount: u64,
        yield_mint: Pubkey,
    },
    DestroyPool {
        owner: Pubkey,
        pool_name: String,
    },
    Provide {
        provider: Pubkey,
        pool_name: String,
        amount: Coin,
        amount_yielded_per_block: u64,
        start_block_height: u64,
    },
    Lock {
        owner: Pubkey,
        pool_name: String,
        amount: Coin,
    },
    Unlock {
        owner: Pubkey,
        pool_name: String,
        amount: Coin,
    },
    Claim {
        owner: Pubkey,
        pool_name: String,
    },
    CreditRewards {
        funder: Pubkey,
        pool_name: String,
        rewards: Coins,
    },
    AddToWhitelist {
        pool_name: String,
    },
    RemoveFromWhitelist {
        pool_name: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    /// Rewards paid to the locker.
    Rewards(Coins),
    Refund(PoolRefund),
}

/// Collaborators and settings shared by every operation.
pub struct FarmEnv<'a, R: ?Sized, O: ?Sized> {
    pub registry: &'a R,
    pub oracle: &'a O,
    pub params: FarmParams,
}

pub fn execute<S, L, R, O>(
    store: &mut S,
    ledger: &mut L,
    env: &FarmEnv<'_, R, O>,
    operation: FarmOperation,
    height: u64,
) -> Result<OperationOutcome>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
    R: TokenRegistry + ?Sized,
    O: PricingOracle + ?Sized,
{
    let outcome = match operation {
        FarmOperation::CreatePool {
            owner,
            pool_name,
            lock_mint,
            min_lock_amount,
            yield_mint,
        } => {
            create_pool(
                store,
                ledger,
                env.registry,
                &env.params,
                &owner,
                &pool_name,
                lock_mint,
                min_lock_amount,
                yield_mint,
                height,
            )?;
            OperationOutcome::Completed
        }
        FarmOperation::DestroyPool { owner, pool_name } => {
            OperationOutcome::Refund(destroy_pool(store, ledger, &owner, &pool_name, height)?)
        }
        FarmOperation::Provide {
            provider,
            pool_name,
            amount,
            amount_yielded_per_block,
            start_block_height,
        } => {
            provide(
                store,
                ledger,
                &provider,
                &pool_name,
                amount,
                amount_yielded_per_block,
                start_block_height,
                height,
            )?;
            OperationOutcome::Completed
        }
        FarmOperation::Lock {
            owner,
            pool_name,
            amount,
        } => OperationOutcome::Rewards(lock(store, ledger, &owner, &pool_name, amount, height)?),
        FarmOperation::Unlock {
            owner,
            pool_name,
            amount,
        } => OperationOutcome::Rewards(unlock(store, ledger, &owner, &pool_name, amount, height)?),
        FarmOperation::Claim { owner, pool_name } => {
            OperationOutcome::Rewards(claim(store, ledger, &owner, &pool_name, height)?)
        }
        FarmOperation::CreditRewards {
            funder,
            pool_name,
            rewards,
        } => {
            credit_rewards(store, ledger, &funder, &pool_name, &rewards)?;
            OperationOutcome::Completed
        }
        FarmOperation::AddToWhitelist { pool_name } => {
            add_to_whitelist(store, env.oracle, &env.params, &pool_name)?;
            OperationOutcome::Completed
        }
        FarmOperation::RemoveFromWhitelist { pool_name } => {
            remove_from_whitelist(store, &pool_name)?;
            OperationOutcome::Completed
        }
    };
    Ok(outcome)
}

/// Runs `operation` on copies of the store and ledger and keeps the result
/// only if it succeeds.
pub fn apply<S, L, R, O>(
    store: &mut S,
    ledger: &mut L,
    env: &FarmEnv<'_, R, O>,
    operation: FarmOperation,
    height: u64,
) -> Result<OperationOutcome>
where
    S: FarmStore + Clone,
    L: TransferLedger + Clone,
    R: TokenRegistry + ?Sized,
    O: PricingOracle + ?Sized,
{
    let mut staged_store = store.clone();
    let mut staged_ledger = ledger.clone();
    let outcome = execute(&mut staged_store, &mut staged_ledger, env, operation, height)?;
    *store = staged_store;
    *ledger = staged_ledger;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Escrow, KnownMints, MemoryLedger, MemoryStore, ReservePairsOracle};
    use crate::error::ErrorCode;

    /// Ledger whose reward escrow refuses to pay out.
    #[derive(Clone, Default)]
    struct FrozenRewards(MemoryLedger);

    impl TransferLedger for FrozenRewards {
        fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
            self.0.balance(owner, mint)
        }

        fn move_to_escrow(
            &mut self,
            owner: &Pubkey,
            pool_name: &str,
            escrow: Escrow,
            coins: &Coins,
        ) -> Result<()> {
            self.0.move_to_escrow(owner, pool_name, escrow, coins)
        }

        fn move_from_escrow(
            &mut self,
            pool_name: &str,
            escrow: Escrow,
            owner: &Pubkey,
            coins: &Coins,
        ) -> Result<()> {
            if escrow == Escrow::Rewards {
                return err!(ErrorCode::InsufficientFunds);
            }
            self.0.move_from_escrow(pool_name, escrow, owner, coins)
        }

        fn burn(&mut self, owner: &Pubkey, coins: &Coins) -> Result<()> {
            self.0.burn(owner, coins)
        }
    }

    #[test]
    fn failed_payout_rolls_back_every_write() {
        let owner = Pubkey::new_unique();
        let lock_mint = Pubkey::new_unique();
        let yield_mint = Pubkey::new_unique();
        let registry = KnownMints::new([lock_mint, yield_mint]);
        let oracle = ReservePairsOracle::default();
        let env = FarmEnv {
            registry: &registry,
            oracle: &oracle,
            params: FarmParams::default(),
        };
        let mut store = MemoryStore::new();
        let mut ledger = FrozenRewards::default();
        ledger.0.mint_to(&owner, Coin::new(lock_mint, 100));
        ledger.0.mint_to(&owner, Coin::new(yield_mint, 100));

        let steps = [
            FarmOperation::CreatePool {
                owner,
                pool_name: "frozen".to_string(),
                lock_mint,
                min_lock_amount: 0,
                yield_mint,
            },
            FarmOperation::Provide {
                provider: owner,
                pool_name: "frozen".to_string(),
                amount: Coin::new(yield_mint, 100),
                amount_yielded_per_block: 10,
                start_block_height: 0,
            },
            FarmOperation::Lock {
                owner,
                pool_name: "frozen".to_string(),
                amount: Coin::new(lock_mint, 10),
            },
        ];
        for step in steps {
            apply(&mut store, &mut ledger, &env, step, 0).unwrap();
        }

        let before = store.clone();
        let result = apply(
            &mut store,
            &mut ledger,
            &env,
            FarmOperation::Claim {
                owner,
                pool_name: "frozen".to_string(),
            },
            5,
        );
        assert!(result.is_err());
        assert_eq!(store, before);
    }
}
