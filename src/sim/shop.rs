//! Upgrade shop: a fixed catalogue of modifiers bought with score

use super::modifiers::{Evasion, Modifier};
use super::player::Player;
use super::state::{Prompt, PromptAction};
use crate::consts::{SHOP_RESERVE, SHOP_UPGRADE_PRICE_GROWTH};

/// One catalogue entry
#[derive(Debug, Clone, PartialEq)]
pub struct ShopItem {
    pub name: &'static str,
    /// Price of the next level
    pub price: f32,
    /// Levels bought so far
    pub level: u32,
    pub max_level: u32,
    /// Modifier installed on the first purchase
    pub modifier: Modifier,
    /// Where the installed modifier sits in the player's list
    installed: Option<usize>,
}

impl ShopItem {
    pub fn new(price: f32, name: &'static str, modifier: Modifier, max_level: u32) -> Self {
        Self {
            name,
            price,
            level: 0,
            max_level: max_level.max(1),
            modifier,
            installed: None,
        }
    }

    /// Button label; multi-level items show the level on offer
    pub fn label(&self) -> String {
        if self.max_level > 1 {
            format!("{} {}", self.name, (self.level + 1).min(self.max_level))
        } else {
            self.name.to_string()
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.level >= self.max_level
    }
}

/// Result of a confirmed purchase
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Bought { label: String, price: f32 },
    Upgraded { label: String, price: f32 },
    CannotAfford,
    SoldOut,
    NoSuchItem,
}

impl PurchaseOutcome {
    /// Toast text for a completed sale
    pub fn toast(&self) -> Option<String> {
        match self {
            PurchaseOutcome::Bought { label, price } => {
                Some(format!("You bought '{}' for {} points!", label, price))
            }
            PurchaseOutcome::Upgraded { label, price } => {
                Some(format!("You upgraded '{}' for {} points!", label, price))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shop {
    pub items: Vec<ShopItem>,
}

impl Default for Shop {
    fn default() -> Self {
        Self {
            items: vec![
                ShopItem::new(500.0, "Efficient Engine", Modifier::EfficientEngine, 4),
                ShopItem::new(2000.0, "Laser Sight", Modifier::LaserSight, 2),
                ShopItem::new(6000.0, "Automatic Gun", Modifier::AutomaticGun, 1),
                ShopItem::new(1000.0, "Bigger Bullets", Modifier::LargerBullets, 4),
                ShopItem::new(2000.0, "Rapid Fire", Modifier::RapidFire, 3),
                ShopItem::new(20000.0, "Auto Evasion", Modifier::AutoEvasion(Evasion::default()), 1),
            ],
        }
    }
}

impl Shop {
    /// Confirmation prompt for the item in `slot`, if it is still on sale
    pub fn offer(&self, slot: usize) -> Option<Prompt> {
        let item = self.items.get(slot)?;
        if item.is_sold_out() {
            return None;
        }
        let verb = if item.level == 0 { "Purchase" } else { "Upgrade" };
        Some(Prompt::confirm(
            format!("{} {} ({} points)?", verb, item.label(), item.price),
            PromptAction::Purchase(slot),
        ))
    }

    /// Sell the item in `slot` to `player`
    pub fn purchase(&mut self, slot: usize, player: &mut Player) -> PurchaseOutcome {
        let Some(item) = self.items.get_mut(slot) else {
            return PurchaseOutcome::NoSuchItem;
        };
        if item.is_sold_out() {
            return PurchaseOutcome::SoldOut;
        }
        if player.score < item.price + SHOP_RESERVE {
            return PurchaseOutcome::CannotAfford;
        }

        let label = item.label();
        let price = item.price;
        let installed = item.installed;
        let outcome = match installed {
            Some(index) if player.upgrade_modifier(index).is_some() => {
                item.price *= SHOP_UPGRADE_PRICE_GROWTH;
                PurchaseOutcome::Upgraded { label, price }
            }
            _ => {
                item.installed = Some(player.add_modifier(item.modifier.clone()));
                PurchaseOutcome::Bought { label, price }
            }
        };
        player.score -= price;
        item.level += 1;
        log::info!(
            "shop: {} level {}/{} for {} points",
            item.name,
            item.level,
            item.max_level,
            price
        );
        outcome
    }

    /// Forget everything sold (new round)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
