use crate::error::RosterError;
use crate::model::Combatant;

/// One trainer's team and which member is currently battling.
///
/// Empty (level 0) slots never get this far; see [`crate::model::build_combatant`].
/// The active index only moves through [`Roster::substitute`], which refuses
/// fainted or already-active members. Nothing here swaps automatically.
#[derive(Debug, Clone)]
pub struct Roster {
    trainer: String,
    members: Vec<Combatant>,
    active: Option<usize>,
}

impl Roster {
    pub fn new(trainer: impl Into<String>, members: Vec<Combatant>) -> Self {
        let mut roster = Roster {
            trainer: trainer.into(),
            members,
            active: None,
        };
        roster.active = roster.next_alive_idx();
        roster
    }

    pub fn trainer(&self) -> &str {
        &self.trainer
    }

    pub fn members(&self) -> &[Combatant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn active_idx(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Combatant> {
        self.active.map(|idx| &self.members[idx])
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Combatant> {
        match self.active {
            Some(idx) => self.members.get_mut(idx),
            None => None,
        }
    }

    pub fn next_alive_idx(&self) -> Option<usize> {
        self.members.iter().position(Combatant::is_alive)
    }

    pub fn has_alive(&self) -> bool {
        self.members.iter().any(Combatant::is_alive)
    }

    pub fn is_defeated(&self) -> bool {
        !self.has_alive()
    }

    /// Alive members other than the active one, with their indices.
    pub fn eligible_substitutes(&self) -> Vec<(usize, &Combatant)> {
        self.members
            .iter()
            .enumerate()
            .filter(|(idx, m)| m.is_alive() && Some(*idx) != self.active)
            .collect()
    }

    pub fn substitute(&mut self, idx: usize) -> Result<&Combatant, RosterError> {
        let len = self.members.len();
        let member = self
            .members
            .get(idx)
            .ok_or(RosterError::OutOfRange { index: idx, len })?;
        if member.is_fainted() {
            return Err(RosterError::Fainted {
                name: member.name.clone(),
            });
        }
        if self.active == Some(idx) {
            return Err(RosterError::AlreadyActive {
                name: member.name.clone(),
            });
        }
        self.active = Some(idx);
        Ok(&self.members[idx])
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| {
                if m.is_alive() {
                    m.name.clone()
                } else {
                    format!("{} (Fainted)", m.name)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon(name: &str, hp: u32) -> Combatant {
        Combatant::new(name, 10, 100).unwrap().with_hp(hp)
    }

    #[test]
    fn first_alive_member_starts_active() {
        let roster = Roster::new("Ash", vec![mon("Caterpie", 0), mon("Pikachu", 100)]);
        assert_eq!(roster.active_idx(), Some(1));
        assert_eq!(roster.active().map(|m| m.name.as_str()), Some("Pikachu"));
    }

    #[test]
    fn empty_roster_has_no_active() {
        let roster = Roster::new("Nobody", Vec::new());
        assert!(roster.active().is_none());
        assert!(roster.is_defeated());
    }

    #[test]
    fn substitution_rejects_fainted_active_and_out_of_range() {
        let mut roster = Roster::new(
            "Misty",
            vec![mon("Staryu", 100), mon("Psyduck", 0), mon("Starmie", 80)],
        );
        assert_eq!(
            roster.substitute(0).unwrap_err(),
            RosterError::AlreadyActive {
                name: "Staryu".to_string()
            }
        );
        assert_eq!(
            roster.substitute(1).unwrap_err(),
            RosterError::Fainted {
                name: "Psyduck".to_string()
            }
        );
        assert_eq!(
            roster.substitute(7).unwrap_err(),
            RosterError::OutOfRange { index: 7, len: 3 }
        );
        assert_eq!(roster.active_idx(), Some(0));
        assert_eq!(roster.substitute(2).unwrap().name, "Starmie");
        assert_eq!(roster.active_idx(), Some(2));
    }

    #[test]
    fn eligible_substitutes_skip_active_and_fainted() {
        let roster = Roster::new(
            "Brock",
            vec![mon("Geodude", 100), mon("Onix", 0), mon("Vulpix", 40)],
        );
        let eligible: Vec<usize> = roster.eligible_substitutes().iter().map(|(i, _)| *i).collect();
        assert_eq!(eligible, vec![2]);
    }

    #[test]
    fn status_lines_mark_fainted() {
        let roster = Roster::new("Gary", vec![mon("Eevee", 0), mon("Pidgey", 5)]);
        assert_eq!(roster.status_lines(), vec!["Eevee (Fainted)", "Pidgey"]);
        assert!(!roster.is_defeated());
    }
}
