#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Survivor {
    pub name: String,
    pub remaining_hp: u32,
}

impl Survivor {
    pub fn new(name: impl Into<String>, remaining_hp: u32) -> Self {
        Survivor {
            name: name.into(),
            remaining_hp,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Win {
        side: Side,
        winner: Survivor,
        loser: Survivor,
    },
    /// Both sides knocked out.
    Draw { a: String, b: String },
}

/// Result of resolving one pairing. Callers apply it; nothing here mutates
/// the combatants it was computed from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BattleOutcome {
    pub verdict: Verdict,
    pub log: Vec<String>,
}

impl BattleOutcome {
    pub fn win(side: Side, winner: Survivor, loser_name: impl Into<String>) -> Self {
        BattleOutcome {
            verdict: Verdict::Win {
                side,
                winner,
                loser: Survivor::new(loser_name, 0),
            },
            log: Vec::new(),
        }
    }

    pub fn draw(a: impl Into<String>, b: impl Into<String>) -> Self {
        BattleOutcome {
            verdict: Verdict::Draw {
                a: a.into(),
                b: b.into(),
            },
            log: Vec::new(),
        }
    }

    pub fn with_log(mut self, log: Vec<String>) -> Self {
        self.log = log;
        self
    }

    pub fn winning_side(&self) -> Option<Side> {
        match &self.verdict {
            Verdict::Win { side, .. } => Some(*side),
            Verdict::Draw { .. } => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self.verdict, Verdict::Draw { .. })
    }

    pub fn remaining_hp(&self, side: Side) -> u32 {
        match &self.verdict {
            Verdict::Win {
                side: won, winner, ..
            } if *won == side => winner.remaining_hp,
            _ => 0,
        }
    }

    pub fn winner(&self) -> Option<&Survivor> {
        match &self.verdict {
            Verdict::Win { winner, .. } => Some(winner),
            Verdict::Draw { .. } => None,
        }
    }
}
