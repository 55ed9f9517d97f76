pub mod events;
pub use events::*;

pub mod farm_config;
pub use farm_config::*;

pub mod farm_pool;
pub use farm_pool::*;

pub mod pool_rewards;
pub use pool_rewards::*;

pub mod lock_info;
pub use lock_info::*;

pub mod whitelist;
pub use whitelist::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Coin, Coins, DecCoin, DecCoins};
    use anchor_lang::prelude::*;

    fn serialized_len<T: AccountSerialize>(value: &T) -> usize {
        let mut data = Vec::new();
        value.try_serialize(&mut data).unwrap();
        data.len()
    }

    fn mint(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    fn full_name() -> String {
        "p".repeat(MAX_POOL_NAME_LEN)
    }

    #[test]
    fn test_farm_config_len() {
        assert_eq!(serialized_len(&FarmConfig::default()), FarmConfig::LEN);
    }

    #[test]
    fn test_farm_pool_len() {
        let pool = FarmPool {
            name: full_name(),
            yielded_token_infos: (0..MAX_YIELDED_TOKENS as u8)
                .map(|i| YieldedTokenInfo::new(mint(i)))
                .collect(),
            total_accumulated_rewards: Coins::from_coins(
                (1..=MAX_REWARD_DENOMS as u8).map(|i| Coin::new(mint(i), 1)),
            )
            .unwrap(),
            ..Default::default()
        };
        assert_eq!(serialized_len(&pool), FarmPool::LEN);
    }

    #[test]
    fn test_pool_rewards_len() {
        let current = PoolCurrentRewards {
            rewards: Coins::from_coins(
                (1..=MAX_REWARD_DENOMS as u8).map(|i| Coin::new(mint(i), 1)),
            )
            .unwrap(),
            ..Default::default()
        };
        assert_eq!(serialized_len(&current), PoolCurrentRewards::LEN);

        let mut ratio = DecCoins::empty();
        for i in 1..=MAX_REWARD_DENOMS as u8 {
            ratio = ratio
                .checked_add(&DecCoins::quo_truncate(
                    &Coins::from_coin(Coin::new(mint(i), 1)),
                    1,
                )
                .unwrap())
                .unwrap();
        }
        assert_eq!(ratio.len(), MAX_REWARD_DENOMS);
        let historical = PoolHistoricalRewards {
            cumulative_reward_ratio: ratio,
            reference_count: 2,
        };
        assert_eq!(serialized_len(&historical), PoolHistoricalRewards::LEN);
        assert_eq!(DecCoin::LEN, 48);
    }

    #[test]
    fn test_lock_info_len() {
        let lock = LockInfo {
            pool_name: full_name(),
            ..Default::default()
        };
        assert_eq!(serialized_len(&lock), LockInfo::LEN);
    }

    #[test]
    fn test_whitelist_entry_len() {
        let entry = WhitelistEntry {
            pool_name: full_name(),
        };
        assert_eq!(serialized_len(&entry), WhitelistEntry::LEN);
    }
}
