// League keeper rules: pure functions from a pick's own fields to keeper
// cost, next-season eligibility, and value. All thresholds come from
// config so a different league is a config edit, not a code change.

use crate::config::{EligibilityPolicy, KeeperConfig};
use crate::data::draft::DraftPick;

/// The rule set for one league, built from `[keeper]` config.
#[derive(Debug, Clone)]
pub struct KeeperRules {
    ranks_per_round: u32,
    waiver_keeper_round: u32,
    round_discount: u32,
    min_keeper_round: u32,
    policy: EligibilityPolicy,
    round_floor: u32,
    value_threshold: i64,
}

impl KeeperRules {
    pub fn from_config(config: &KeeperConfig) -> Self {
        KeeperRules {
            ranks_per_round: config.ranks_per_round,
            waiver_keeper_round: config.waiver_keeper_round,
            round_discount: config.round_discount,
            min_keeper_round: config.min_keeper_round,
            policy: config.eligibility,
            round_floor: config.round_floor,
            value_threshold: config.value_threshold,
        }
    }

    /// The round a pick would cost to keep next season.
    ///
    /// Waiver pickups keep at the flat waiver round. Drafted players keep
    /// `round_discount` rounds earlier than they were drafted, never above
    /// `min_keeper_round`. A pick with no round that wasn't a waiver pickup
    /// has no keeper cost.
    pub fn keeper_round(&self, pick: &DraftPick) -> Option<u32> {
        if pick.waiver_pickup {
            return Some(self.waiver_keeper_round);
        }
        pick.round
            .map(|round| round.saturating_sub(self.round_discount).max(self.min_keeper_round))
    }

    /// The draft round a player's overall rank projects to.
    pub fn projected_round(&self, rank: u32) -> u32 {
        rank.div_ceil(self.ranks_per_round)
    }

    /// Whether league rules permit keeping this pick next season.
    ///
    /// The draft file's explicit eligibility flag is final when false.
    /// Beyond that, the configured policy decides what being a current
    /// keeper means for next season.
    pub fn eligible(&self, pick: &DraftPick) -> bool {
        if !pick.next_keeper_eligible {
            return false;
        }
        match self.policy {
            EligibilityPolicy::NoConsecutive => !pick.keeper_status,
            EligibilityPolicy::RoundFloor => {
                !(pick.keeper_status
                    && self
                        .keeper_round(pick)
                        .is_some_and(|round| round <= self.round_floor))
            }
        }
    }

    /// Rounds of surplus: how much cheaper the keeper slot is than the
    /// round the market expects the player to go in. Positive means the
    /// player's projected output exceeds the keeper cost.
    pub fn keeper_value(&self, projected_round: u32, keeper_round: u32) -> i64 {
        i64::from(keeper_round) - i64::from(projected_round)
    }

    /// Whether a surplus clears the league's value bar.
    pub fn is_value(&self, keeper_value: i64) -> bool {
        keeper_value > self.value_threshold
    }
}
