//! Collision category registry
//!
//! Every body carries exactly one category bit. The collision and contact-test
//! masks below are the only place the pair rules are defined.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of categories, one bit per kind
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategoryMask: u32 {
        const PLAYER = 1 << 0;
        const OBSTACLE = 1 << 1;
        const TRIGGER_ZONE = 1 << 2;
        const GROUND = 1 << 3;
    }
}

/// Kind of physical body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Obstacle,
    TriggerZone,
    Ground,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Player,
        Category::Obstacle,
        Category::TriggerZone,
        Category::Ground,
    ];

    /// Category bit
    pub const fn mask(self) -> CategoryMask {
        match self {
            Category::Player => CategoryMask::PLAYER,
            Category::Obstacle => CategoryMask::OBSTACLE,
            Category::TriggerZone => CategoryMask::TRIGGER_ZONE,
            Category::Ground => CategoryMask::GROUND,
        }
    }

    /// Categories this one is physically blocked by
    pub const fn collision_mask(self) -> CategoryMask {
        match self {
            Category::Player => CategoryMask::OBSTACLE.union(CategoryMask::GROUND),
            Category::Obstacle | Category::Ground => CategoryMask::PLAYER,
            Category::TriggerZone => CategoryMask::empty(),
        }
    }

    /// Categories that raise a contact notification with this one
    pub const fn contact_test_mask(self) -> CategoryMask {
        match self {
            Category::Player => CategoryMask::OBSTACLE
                .union(CategoryMask::TRIGGER_ZONE)
                .union(CategoryMask::GROUND),
            Category::Obstacle | Category::TriggerZone | Category::Ground => {
                CategoryMask::PLAYER
            }
        }
    }

    /// Whether this category is blocked by `other`
    pub const fn collides_with(self, other: Category) -> bool {
        self.collision_mask().contains(other.mask())
    }

    /// Whether contact between the two categories is reported (either side asks)
    pub const fn notifies(self, other: Category) -> bool {
        self.contact_test_mask().contains(other.mask())
            || other.contact_test_mask().contains(self.mask())
    }

    /// Map a raw category value back to its kind. Multi-bit or unknown values yield `None`.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.mask().bits() == bits)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Player => "player",
            Category::Obstacle => "obstacle",
            Category::TriggerZone => "trigger_zone",
            Category::Ground => "ground",
        }
    }
}

impl CategoryMask {
    /// Categories contained in this mask, in registry order
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |c| self.contains(c.mask()))
    }
}
