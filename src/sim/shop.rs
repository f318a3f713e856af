//! Pause-menu upgrades bought with coins

use serde::Serialize;
use thiserror::Error;

use super::boost::BoostTuning;
use super::player::{Player, PlayerStats};
use crate::config::ShopConfig;

/// Upgradable items, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    MoveSpeed,
    MaxHp,
    CoinValue,
    ClockTime,
    EnergyDuration,
}

impl ShopItem {
    pub const ALL: [ShopItem; 5] = [
        ShopItem::MoveSpeed,
        ShopItem::MaxHp,
        ShopItem::CoinValue,
        ShopItem::ClockTime,
        ShopItem::EnergyDuration,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            ShopItem::MoveSpeed => "MOVE SPEED",
            ShopItem::MaxHp => "MAX HP",
            ShopItem::CoinValue => "COIN VALUE",
            ShopItem::ClockTime => "CLOCK TIME",
            ShopItem::EnergyDuration => "ENERGY DURATION",
        }
    }

    pub fn cost(self, config: &ShopConfig) -> u32 {
        match self {
            ShopItem::MoveSpeed => config.move_speed.cost,
            ShopItem::MaxHp => config.max_hp.cost,
            ShopItem::CoinValue => config.coin_value.cost,
            ShopItem::ClockTime => config.clock_time.cost,
            ShopItem::EnergyDuration => config.energy_duration.cost,
        }
    }

    fn value_text(self, config: &ShopConfig) -> String {
        match self {
            ShopItem::MoveSpeed => format!("+{} m/s", config.move_speed.amount),
            ShopItem::MaxHp => format!("+{}", config.max_hp.amount),
            ShopItem::CoinValue => {
                format!("+{}-{}", config.coin_value.add_min, config.coin_value.add_max)
            }
            ShopItem::ClockTime => format!("+{}s", config.clock_time.amount),
            ShopItem::EnergyDuration => format!("+{}s", config.energy_duration.amount),
        }
    }
}

/// Purchase rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("the shop is only open while paused")]
    Closed,
    #[error("the run is over")]
    GameOver,
    #[error("{item:?} costs {cost} coins, only {coins} available")]
    InsufficientCoins { item: ShopItem, cost: u32, coins: u32 },
}

/// One row of the shop menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopOffer {
    pub item: ShopItem,
    pub label: &'static str,
    pub value: String,
    pub cost: u32,
    pub level: u32,
    pub affordable: bool,
}

/// Purchase levels for the current run
#[derive(Debug, Clone, Default)]
pub struct Shop {
    levels: [u32; ShopItem::ALL.len()],
}

impl Shop {
    pub fn level(&self, item: ShopItem) -> u32 {
        self.levels[item.index()]
    }

    pub fn offers(&self, config: &ShopConfig, coins: u32) -> Vec<ShopOffer> {
        ShopItem::ALL
            .iter()
            .map(|&item| {
                let cost = item.cost(config);
                ShopOffer {
                    item,
                    label: item.label(),
                    value: item.value_text(config),
                    cost,
                    level: self.level(item),
                    affordable: coins >= cost,
                }
            })
            .collect()
    }

    /// Deduct the cost and apply the upgrade
    ///
    /// The caller checks that the run is paused; this only checks coins.
    pub fn purchase(
        &mut self,
        item: ShopItem,
        config: &ShopConfig,
        player: &mut Player,
        stats: &mut PlayerStats,
        tuning: &mut BoostTuning,
    ) -> Result<(), ShopError> {
        let cost = item.cost(config);
        if player.coins < cost {
            return Err(ShopError::InsufficientCoins {
                item,
                cost,
                coins: player.coins,
            });
        }
        player.coins -= cost;

        match item {
            ShopItem::MoveSpeed => stats.raise_move_speed(config.move_speed.amount),
            ShopItem::MaxHp => {
                let add = config.max_hp.amount;
                stats.max_hp += add;
                player.heal(add, stats.max_hp);
            }
            ShopItem::CoinValue => {
                tuning.coin_min = tuning.coin_min.saturating_add(config.coin_value.add_min);
                tuning.coin_max = tuning.coin_max.saturating_add(config.coin_value.add_max);
            }
            ShopItem::ClockTime => tuning.clock_seconds += config.clock_time.amount,
            ShopItem::EnergyDuration => {
                tuning.energy_duration_sec += config.energy_duration.amount
            }
        }

        self.levels[item.index()] += 1;
        log::info!("Bought {:?} (level {})", item, self.level(item));
        Ok(())
    }
}
