//! Item types and related helpers.
//!
//! Items are the movable objects of the world. Where an item is lives in its
//! `container` tag; `World` derives location contents and the inventory from it.

use crate::style::GameStyle;
use crate::view::{View, ViewItem};
use crate::world::{Container, LocationId, WorldObject};

use serde::{Deserialize, Serialize};

/// A named, ownable object the player can pick up, drop and hold.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Item {
    /// The item's name, which is also its identifier.
    pub name: String,
    pub description: String,
    /// Where the item is right now.
    pub container: Container,
    /// Location the item started the session at.
    pub start: LocationId,
    /// Location where delivering the item scores points.
    pub target: Option<LocationId>,
    pub target_points: usize,
    /// Set once the delivery award has been paid.
    pub delivered: bool,
    /// Pick-up order stamp; only meaningful while carried.
    pub acquired: u64,
}

impl WorldObject for Item {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
}

impl Item {
    /// A bare item that is not yet in play.
    pub fn new(name: impl Into<String>, start: LocationId) -> Item {
        Item {
            name: name.into(),
            start,
            ..Item::default()
        }
    }

    /// Returns true if the item is owned by the player (held or not).
    pub fn is_carried(&self) -> bool {
        self.container.is_carried()
    }

    /// Returns true if the item occupies the held slot.
    pub fn is_held(&self) -> bool {
        self.container.is_held()
    }

    /// Returns true if dropping the item at `location` should pay its delivery award.
    pub fn delivers_at(&self, location: LocationId) -> bool {
        !self.delivered && self.target_points > 0 && self.target == Some(location)
    }

    /// Show item description.
    pub fn show(&self, view: &mut View) {
        view.push(ViewItem::ItemDescription {
            name: self.name.item_style().to_string(),
            description: self.description.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug() -> Item {
        Item {
            description: "A chipped travel mug.".into(),
            container: Container::Location(9),
            target: Some(1),
            target_points: 15,
            ..Item::new("mug", 9)
        }
    }

    #[test]
    fn new_item_is_out_of_play() {
        let item = Item::new("potion", 11);
        assert!(item.container.is_nowhere());
        assert!(!item.is_carried());
        assert_eq!(item.start, 11);
    }

    #[test]
    fn held_item_counts_as_carried() {
        let mut item = mug();
        assert!(!item.is_carried());
        item.container = Container::Held;
        assert!(item.is_carried());
        assert!(item.is_held());
    }

    #[test]
    fn delivery_pays_only_at_target_and_only_once() {
        let mut item = mug();
        assert!(!item.delivers_at(9));
        assert!(item.delivers_at(1));
        item.delivered = true;
        assert!(!item.delivers_at(1));
    }

    #[test]
    fn items_without_points_never_deliver() {
        let mut item = mug();
        item.target_points = 0;
        assert!(!item.delivers_at(1));
    }

    #[test]
    fn show_pushes_description() {
        let mut view = View::new();
        mug().show(&mut view);
        assert!(view.items.iter().any(|entry| matches!(
            entry,
            ViewItem::ItemDescription { description, .. } if description == "A chipped travel mug."
        )));
    }
}
