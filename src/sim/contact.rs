//! Contact resolution
//!
//! Turns contact events reported by the simulation collaborator into gameplay
//! effects. The category pair alone decides the effect; the only state
//! involved is the one-shot flag on each pair's trigger zone.

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::category::Category;
use super::obstacle::ObstaclePair;

/// Gameplay consequence of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    None,
    ScoreIncrement,
    Fatal,
}

/// Effect of contact between two categories, in either order
pub fn resolve_contact(a: Category, b: Category) -> Effect {
    use Category::*;
    match (a, b) {
        (Player, TriggerZone) | (TriggerZone, Player) => Effect::ScoreIncrement,
        (Player, Obstacle) | (Obstacle, Player) => Effect::Fatal,
        (Player, Ground) | (Ground, Player) => Effect::Fatal,
        _ => Effect::None,
    }
}

/// One contact as reported by a physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    /// Raw category bits of each side
    pub category_a: u32,
    pub category_b: u32,
    pub body_a: BodyId,
    pub body_b: BodyId,
}

impl ContactEvent {
    pub fn between(a: &Body, b: &Body) -> Self {
        Self {
            category_a: a.category.mask().bits(),
            category_b: b.category.mask().bits(),
            body_a: a.id,
            body_b: b.id,
        }
    }

    /// Both categories, if both are known
    pub fn categories(&self) -> Option<(Category, Category)> {
        Some((
            Category::from_bits(self.category_a)?,
            Category::from_bits(self.category_b)?,
        ))
    }

    /// Body on the side with the given category
    pub fn body_of(&self, category: Category) -> Option<BodyId> {
        let bits = category.mask().bits();
        if self.category_a == bits {
            Some(self.body_a)
        } else if self.category_b == bits {
            Some(self.body_b)
        } else {
            None
        }
    }
}

/// Resolve one event against the active pairs, consuming a trigger on first score
pub fn resolve_event(event: &ContactEvent, pairs: &mut [ObstaclePair]) -> Effect {
    let Some((a, b)) = event.categories() else {
        log::debug!(
            "Ignoring contact with unknown category bits {:#x}/{:#x}",
            event.category_a,
            event.category_b
        );
        return Effect::None;
    };

    match resolve_contact(a, b) {
        Effect::ScoreIncrement => {
            let Some(trigger_id) = event.body_of(Category::TriggerZone) else {
                return Effect::None;
            };
            match pairs.iter_mut().find(|p| p.trigger.id == trigger_id) {
                Some(pair) if !pair.trigger_consumed => {
                    pair.trigger_consumed = true;
                    Effect::ScoreIncrement
                }
                Some(_) => Effect::None,
                None => {
                    log::debug!("Contact with retired trigger {:?}", trigger_id);
                    Effect::None
                }
            }
        }
        effect => effect,
    }
}

/// Combined effect of one tick's contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactOutcome {
    pub score_increments: u32,
    /// Category the player hit fatally, if any
    pub fatal: Option<Category>,
}

/// Resolve a batch of events; the totals do not depend on event order
pub fn resolve_all(events: &[ContactEvent], pairs: &mut [ObstaclePair]) -> ContactOutcome {
    let mut outcome = ContactOutcome::default();
    for event in events {
        match resolve_event(event, pairs) {
            Effect::ScoreIncrement => outcome.score_increments += 1,
            Effect::Fatal => {
                let partner = event
                    .categories()
                    .map(|(a, b)| if a == Category::Player { b } else { a });
                // Lowest category wins so the report does not depend on event order
                outcome.fatal = match (outcome.fatal, partner) {
                    (Some(current), Some(new)) => Some(current.min(new)),
                    (current, new) => current.or(new),
                };
            }
            Effect::None => {}
        }
    }
    outcome
}
