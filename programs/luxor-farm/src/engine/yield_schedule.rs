use crate::math::{Coin, Coins};
use crate::states::YieldedTokenInfo;
use anchor_lang::prelude::*;

/// Releases everything the schedules emitted between `last_settled` and `target`.
///
/// Each schedule pays `amount_yielded_per_block` per block over
/// `[max(start, last_settled), target]`, capped by its remaining amount,
/// which is reduced in place. The caller persists the updated schedules.
pub fn advance_yield(
    infos: &mut [YieldedTokenInfo],
    last_settled: u64,
    target: u64,
) -> Result<Coins> {
    let mut released = Coins::empty();
    for info in infos.iter_mut() {
        if info.remaining_amount == 0 || info.amount_yielded_per_block == 0 {
            continue;
        }
        let start = info.start_block_height_to_yield.max(last_settled);
        if target <= start {
            continue;
        }
        let blocks = (target - start) as u128;
        let amount = (info.amount_yielded_per_block as u128)
            .saturating_mul(blocks)
            .min(info.remaining_amount as u128) as u64;
        info.remaining_amount -= amount;
        released.add_coin(Coin::new(info.mint, amount))?;
    }
    Ok(released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn schedule(start: u64, rate: u64, remaining: u64) -> YieldedTokenInfo {
        YieldedTokenInfo {
            mint: Pubkey::new_from_array([7; 32]),
            start_block_height_to_yield: start,
            amount_yielded_per_block: rate,
            remaining_amount: remaining,
        }
    }

    #[test]
    fn test_advance_yield() {
        // exhausted schedule yields nothing
        let mut infos = vec![schedule(0, 0, 0)];
        assert!(advance_yield(&mut infos, 0, 100).unwrap().is_zero());
        assert_eq!(infos[0], schedule(0, 0, 0));

        // schedule starting in the future
        let mut infos = vec![schedule(50, 1, 10)];
        assert!(advance_yield(&mut infos, 10, 40).unwrap().is_zero());
        assert_eq!(infos[0].remaining_amount, 10);

        // partial release from the schedule start
        let released = advance_yield(&mut infos, 10, 53).unwrap();
        assert_eq!(released.amount_of(&infos[0].mint), 3);
        assert_eq!(infos[0].remaining_amount, 7);

        // capped by remaining amount
        let released = advance_yield(&mut infos, 53, 1_000).unwrap();
        assert_eq!(released.amount_of(&infos[0].mint), 7);
        assert_eq!(infos[0].remaining_amount, 0);
    }

    #[test]
    fn no_schedules_release_nothing() {
        let mut infos: Vec<YieldedTokenInfo> = vec![];
        assert!(advance_yield(&mut infos, 0, 10).unwrap().is_zero());
    }

    proptest! {
        #[test]
        fn split_advance_matches_single_advance(
            start in 0u64..1_000,
            rate in 1u64..1_000,
            remaining in 0u64..1_000_000,
            last in 0u64..1_000,
            mid in 0u64..2_000,
            end in 0u64..3_000,
        ) {
            let mid = last.max(mid);
            let end = mid.max(end);
            let mut once = vec![schedule(start, rate, remaining)];
            let total = advance_yield(&mut once, last, end).unwrap();

            let mut twice = vec![schedule(start, rate, remaining)];
            let first = advance_yield(&mut twice, last, mid).unwrap();
            let second = advance_yield(&mut twice, mid, end).unwrap();

            prop_assert_eq!(first.checked_add(&second).unwrap(), total);
            prop_assert_eq!(once, twice);
        }
    }
}
