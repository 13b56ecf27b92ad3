use serde::{Deserialize, Serialize};

use crate::player_state::PlayerId;

/// The pair bound by Cupid. Unordered: `(a, b)` and `(b, a)` are the same bond.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LoverBond(PlayerId, PlayerId);

impl LoverBond {
    /// Returns `None` when both ids are the same player.
    pub fn new(first: PlayerId, second: PlayerId) -> Option<Self> {
        (first != second).then_some(Self(first, second))
    }

    pub fn members(&self) -> [PlayerId; 2] {
        [self.0, self.1]
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.0 == id || self.1 == id
    }

    pub fn partner_of(&self, id: PlayerId) -> Option<PlayerId> {
        if id == self.0 {
            Some(self.1)
        } else if id == self.1 {
            Some(self.0)
        } else {
            None
        }
    }
}

impl PartialEq for LoverBond {
    fn eq(&self, other: &Self) -> bool {
        (self.0 == other.0 && self.1 == other.1) || (self.0 == other.1 && self.1 == other.0)
    }
}

impl Eq for LoverBond {}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn bond_is_unordered() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(LoverBond::new(a, b), LoverBond::new(b, a));
    }

    #[test]
    fn cannot_bond_a_player_to_themselves() {
        let a = Uuid::new_v4();
        assert!(LoverBond::new(a, a).is_none());
    }

    #[test]
    fn partner_lookup() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let bond = LoverBond::new(a, b).unwrap();
        assert_eq!(bond.partner_of(a), Some(b));
        assert_eq!(bond.partner_of(b), Some(a));
        assert_eq!(bond.partner_of(c), None);
        assert!(!bond.contains(c));
    }
}
