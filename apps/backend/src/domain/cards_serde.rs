//! Serialization and deserialization for card types

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Card, Rank, Suit};

// Suit serde: lowercase names
impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| D::Error::custom(format!("Invalid suit: {s}")))
    }
}

// Rank serde: "2".."10", "J", "Q", "K", "A"
impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| D::Error::custom(format!("Invalid rank: {s}")))
    }
}

// Card serde: `{ "suit", "rank", "id" }`; `id` is derived and ignored on input.
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = serializer.serialize_struct("Card", 3)?;
        st.serialize_field("suit", &self.suit)?;
        st.serialize_field("rank", &self.rank)?;
        st.serialize_field("id", &self.id())?;
        st.end()
    }
}

#[derive(Deserialize)]
struct CardRepr {
    suit: Suit,
    rank: Rank,
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let CardRepr { suit, rank } = CardRepr::deserialize(deserializer)?;
        Ok(Card { suit, rank })
    }
}
