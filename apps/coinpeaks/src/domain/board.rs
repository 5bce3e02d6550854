//! Board model: tableau with covering relationships, stock pile and waste.
//!
//! Cards live in an arena owned by the board and are addressed by [`CardId`].
//! Covering is a DAG encoded as back-references: `covered_by` on each card
//! lists the cards currently stacked on top of it. `covers` is the static
//! layout relation (the cards this one sits on), used to find what a play
//! uncovers. `covered_by` is kept sorted so that undo restores it exactly.
//!
//! Every card is in exactly one of: `tableau`, `stock` (top = last), the
//! active `waste` card, or `discard` (earlier waste cards, most recent last).

use serde::{Deserialize, Serialize};

use super::cards_types::{CardFace, Rank};
use super::errors::MoveRejected;
use super::moves::MoveRecord;
use crate::layout::DesignPoint;

/// Card size in design units, used for pointer hit testing.
pub const CARD_WIDTH: f64 = 140.0;
pub const CARD_HEIGHT: f64 = 190.0;

/// Design position of the waste pile.
pub const DEFAULT_WASTE_SLOT: Placement = Placement {
    x: 960.0,
    y: 930.0,
    angle: 0.0,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct CardId(pub usize);

impl CardId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a card's center in design coordinates; `angle` in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Placement {
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    /// Whether `p` falls inside the (rotated) card rectangle placed here.
    pub fn contains(&self, p: DesignPoint) -> bool {
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        let (sin, cos) = (-self.angle.to_radians()).sin_cos();
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        local_x.abs() <= CARD_WIDTH / 2.0 && local_y.abs() <= CARD_HEIGHT / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub face: CardFace,
    pub face_up: bool,
    pub placement: Placement,
    /// Cards currently on top of this one. Sorted.
    pub covered_by: Vec<CardId>,
    /// Cards this one sits on, from the level layout.
    pub covers: Vec<CardId>,
}

impl Card {
    pub fn rank(&self) -> Rank {
        self.face.rank
    }

    pub fn is_uncovered(&self) -> bool {
        self.covered_by.is_empty()
    }
}

/// Where a card currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Tableau,
    Stock,
    Waste,
    Discard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cards: Vec<Card>,
    tableau: Vec<CardId>,
    stock: Vec<CardId>,
    waste: CardId,
    discard: Vec<CardId>,
    waste_slot: Placement,
}

impl Board {
    pub fn builder(waste: CardFace) -> BoardBuilder {
        BoardBuilder::new(waste)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn tableau(&self) -> &[CardId] {
        &self.tableau
    }

    pub fn stock(&self) -> &[CardId] {
        &self.stock
    }

    pub fn discard(&self) -> &[CardId] {
        &self.discard
    }

    pub fn waste_card(&self) -> CardId {
        self.waste
    }

    pub fn waste_rank(&self) -> Rank {
        self.cards[self.waste.index()].face.rank
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn location(&self, id: CardId) -> Option<Location> {
        if id == self.waste {
            Some(Location::Waste)
        } else if self.tableau.contains(&id) {
            Some(Location::Tableau)
        } else if self.stock.contains(&id) {
            Some(Location::Stock)
        } else if self.discard.contains(&id) {
            Some(Location::Discard)
        } else {
            None
        }
    }

    /// Rule check for a tableau card against a waste rank.
    pub fn check_play(&self, id: CardId, waste_rank: Rank) -> Result<(), MoveRejected> {
        if !self.tableau.contains(&id) {
            return Err(MoveRejected::NotInTableau(id));
        }
        let card = self.card(id).ok_or(MoveRejected::NotInTableau(id))?;
        if !card.covered_by.is_empty() {
            return Err(MoveRejected::Covered(id));
        }
        if !card.face_up {
            return Err(MoveRejected::FaceDown(id));
        }
        if !card.face.rank.is_adjacent(waste_rank) {
            return Err(MoveRejected::NotAdjacent(id));
        }
        Ok(())
    }

    /// Uncovered, face up and rank-adjacent (with King/Ace wraparound).
    pub fn can_play(&self, id: CardId, waste_rank: Rank) -> bool {
        self.check_play(id, waste_rank).is_ok()
    }

    pub fn playable_cards(&self) -> Vec<CardId> {
        let waste_rank = self.waste_rank();
        self.tableau
            .iter()
            .copied()
            .filter(|id| self.can_play(*id, waste_rank))
            .collect()
    }

    pub fn has_any_move(&self, waste_rank: Rank) -> bool {
        self.tableau.iter().any(|id| self.can_play(*id, waste_rank))
    }

    /// Tableau cleared. Cards left in the stock are a completion bonus.
    pub fn is_complete(&self) -> bool {
        self.tableau.is_empty()
    }

    /// Move a tableau card onto the waste, flipping every card it alone was
    /// covering. Returns the record needed to reverse the move.
    pub fn play(&mut self, id: CardId) -> Result<MoveRecord, MoveRejected> {
        self.check_play(id, self.waste_rank())?;

        let tableau_index = self
            .tableau
            .iter()
            .position(|c| *c == id)
            .ok_or(MoveRejected::NotInTableau(id))?;
        self.tableau.remove(tableau_index);

        let covers = self.cards[id.index()].covers.clone();
        let mut covered = Vec::with_capacity(covers.len());
        let mut flipped = Vec::new();
        for beneath in covers {
            let card = &mut self.cards[beneath.index()];
            let Ok(pos) = card.covered_by.binary_search(&id) else {
                continue;
            };
            card.covered_by.remove(pos);
            covered.push(beneath);
            if card.covered_by.is_empty() && !card.face_up {
                card.face_up = true;
                flipped.push(beneath);
            }
        }

        let card = &mut self.cards[id.index()];
        let original = card.placement;
        card.placement = self.waste_slot;

        let previous_waste = self.waste;
        self.discard.push(previous_waste);
        self.waste = id;

        Ok(MoveRecord::Tableau {
            played: id,
            previous_waste,
            flipped,
            covered,
            original,
            tableau_index,
        })
    }

    /// Turn the top stock card into the new waste card.
    pub fn draw_from_stock(&mut self) -> Result<MoveRecord, MoveRejected> {
        let top = self.stock.pop().ok_or(MoveRejected::StockEmpty)?;
        self.cards[top.index()].face_up = true;

        let previous_waste = self.waste;
        self.discard.push(previous_waste);
        self.waste = top;

        Ok(MoveRecord::Stock {
            played: top,
            previous_waste,
        })
    }

    /// Reverse one move. `record` must be the most recent move applied to
    /// this board; `MoveHistory` guarantees that ordering.
    pub(crate) fn revert(&mut self, record: &MoveRecord) {
        match record {
            MoveRecord::Tableau {
                played,
                previous_waste,
                flipped,
                covered,
                original,
                tableau_index,
            } => {
                debug_assert_eq!(self.waste, *played);
                self.restore_waste(*previous_waste);

                self.cards[played.index()].placement = *original;
                let at = (*tableau_index).min(self.tableau.len());
                self.tableau.insert(at, *played);

                for beneath in covered {
                    let list = &mut self.cards[beneath.index()].covered_by;
                    if let Err(pos) = list.binary_search(played) {
                        list.insert(pos, *played);
                    }
                }
                for id in flipped {
                    self.cards[id.index()].face_up = false;
                }
            }
            MoveRecord::Stock {
                played,
                previous_waste,
            } => {
                debug_assert_eq!(self.waste, *played);
                self.restore_waste(*previous_waste);
                self.cards[played.index()].face_up = false;
                self.stock.push(*played);
            }
        }
    }

    fn restore_waste(&mut self, previous: CardId) {
        let popped = self.discard.pop();
        debug_assert_eq!(popped, Some(previous));
        self.waste = previous;
    }

    /// Topmost tableau card under a design-space point. Uncovered cards win
    /// over covered ones; otherwise later tableau entries are on top.
    pub fn hit_test(&self, p: DesignPoint) -> Option<CardId> {
        let hits = || {
            self.tableau
                .iter()
                .rev()
                .copied()
                .filter(move |id| self.cards[id.index()].placement.contains(p))
        };
        hits()
            .find(|id| self.cards[id.index()].is_uncovered())
            .or_else(|| hits().next())
    }

    /// Every card is in exactly one place and no card is missing.
    pub fn check_partition(&self) -> bool {
        let mut seen = vec![false; self.cards.len()];
        let all = self
            .tableau
            .iter()
            .chain(self.stock.iter())
            .chain(self.discard.iter())
            .chain(std::iter::once(&self.waste));
        let mut count = 0usize;
        for id in all {
            match seen.get_mut(id.index()) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
            count += 1;
        }
        count == self.cards.len()
    }
}

/// Builds a board from level data. Covering edges are added explicitly; the
/// initial face state is derived in [`BoardBuilder::build`].
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    cards: Vec<Card>,
    tableau: Vec<CardId>,
    stock: Vec<CardId>,
    waste: CardId,
    waste_slot: Placement,
}

impl BoardBuilder {
    pub fn new(waste: CardFace) -> Self {
        let mut builder = Self {
            cards: Vec::new(),
            tableau: Vec::new(),
            stock: Vec::new(),
            waste: CardId(0),
            waste_slot: DEFAULT_WASTE_SLOT,
        };
        builder.waste = builder.push_card(waste, DEFAULT_WASTE_SLOT);
        builder
    }

    fn push_card(&mut self, face: CardFace, placement: Placement) -> CardId {
        let id = CardId(self.cards.len());
        self.cards.push(Card {
            id,
            face,
            face_up: false,
            placement,
            covered_by: Vec::new(),
            covers: Vec::new(),
        });
        id
    }

    pub fn waste_slot(mut self, slot: Placement) -> Self {
        self.waste_slot = slot;
        self.cards[self.waste.index()].placement = slot;
        self
    }

    pub fn tableau_card(&mut self, face: CardFace, placement: Placement) -> CardId {
        let id = self.push_card(face, placement);
        self.tableau.push(id);
        id
    }

    /// Stock cards are pushed bottom-first; the last one pushed is drawn first.
    pub fn stock_card(&mut self, face: CardFace) -> CardId {
        let slot = self.waste_slot;
        let id = self.push_card(face, slot);
        self.stock.push(id);
        id
    }

    /// `top` sits on `beneath`. Self-edges and duplicates are ignored, as are
    /// edges that touch non-tableau cards.
    pub fn cover(&mut self, top: CardId, beneath: CardId) {
        if top == beneath || !self.tableau.contains(&top) || !self.tableau.contains(&beneath) {
            return;
        }
        let below = &mut self.cards[beneath.index()].covered_by;
        if let Err(pos) = below.binary_search(&top) {
            below.insert(pos, top);
            self.cards[top.index()].covers.push(beneath);
        }
    }

    pub fn build(mut self) -> Board {
        for id in &self.tableau {
            let card = &mut self.cards[id.index()];
            card.face_up = card.covered_by.is_empty();
        }
        self.cards[self.waste.index()].face_up = true;
        Board {
            cards: self.cards,
            tableau: self.tableau,
            stock: self.stock,
            waste: self.waste,
            discard: Vec::new(),
            waste_slot: self.waste_slot,
        }
    }
}
