//! Core card-related types: Card, Rank, Suit, and the played-card record

use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];
}

/// Natural rank of the wildcard: playable on any pile top, optionally under
/// an assigned rank.
pub const WILDCARD_RANK: Rank = Rank::Two;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

// Note: Ord on Card is the hand-sort order: rank first, then suit. Legality
// comparisons use effective ranks only, never whole-card ordering.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.rank.cmp(&other.rank) {
            std::cmp::Ordering::Equal => self.suit.cmp(&other.suit),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Card {
    pub fn is_wildcard(&self) -> bool {
        self.rank == WILDCARD_RANK
    }
}

/// A card that has been played onto the pile.
///
/// Carries the optional wildcard rank override (used only for that play) and
/// a fresh identity token stamped at play time so a presentation layer can
/// track individual pile entries across polls.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayedCard {
    pub card: Card,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned: Option<Rank>,
    pub play_id: Uuid,
}

impl PlayedCard {
    /// The rank used for legality comparison: the wildcard override if one
    /// was assigned, else the natural rank.
    pub fn effective_rank(&self) -> Rank {
        self.assigned.unwrap_or(self.card.rank)
    }
}
