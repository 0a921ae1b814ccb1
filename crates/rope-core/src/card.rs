//! Card configuration.
//!
//! A card is one logical channel strip: it reads one kind of value from one
//! MIDI source and adds it to one CV output. The bank holds a fixed number of
//! cards; a card's identity is its position in the bank.
//!
//! Every setter clamps to the field's legal range. Nothing here can fail.

use rope_macros::EnumParameter;

use crate::parameters::EnumParameterValue;
use crate::types::{CardIndex, MidiChannel, CARD_COUNT, CC_COUNT, MIDI_CHANNEL_COUNT, OUTPUT_COUNT};

/// CC number a fresh card listens to (mod wheel).
pub const DEFAULT_CC_NUMBER: u8 = 1;

// =============================================================================
// CardFunction
// =============================================================================

/// What a card derives from its MIDI source.
///
/// The discriminant is the host parameter code. `from_code`, `code` and
/// `name` come from the derive; unknown codes decode as [`CardFunction::Off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumParameter)]
#[repr(u8)]
pub enum CardFunction {
    #[default]
    Off = 0,
    Gate = 1,
    Pitch = 2,
    Velocity = 3,
    #[name = "Pitch Bend"]
    PitchBend = 4,
    Aftertouch = 5,
    #[name = "CC"]
    Cc = 6,
}

impl Default for CardFunction {
    fn default() -> Self {
        Self::default_value()
    }
}

// =============================================================================
// CardSource
// =============================================================================

/// Which MIDI state a card reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardSource {
    /// The aggregate "any channel" view.
    #[default]
    Any,
    /// A single channel.
    Channel(MidiChannel),
}

impl CardSource {
    /// Decode the 0-16 parameter encoding (0 = any, 1-16 = channel),
    /// clamping out-of-range values.
    pub fn from_code(code: i64) -> Self {
        let code = code.clamp(0, MIDI_CHANNEL_COUNT as i64) as u8;
        match code.checked_sub(1).and_then(MidiChannel::new) {
            Some(channel) => Self::Channel(channel),
            None => Self::Any,
        }
    }

    /// The 0-16 parameter encoding.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::Any => 0,
            Self::Channel(channel) => channel.number(),
        }
    }
}

// =============================================================================
// Card
// =============================================================================

/// Configuration of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    function: CardFunction,
    cc_number: u8,
    source: CardSource,
    output_number: u8,
}

impl Card {
    /// An inactive card routed to `output_number`.
    pub fn new(output_number: i64) -> Self {
        let mut card = Self {
            function: CardFunction::Off,
            cc_number: DEFAULT_CC_NUMBER,
            source: CardSource::Any,
            output_number: 1,
        };
        card.set_output_number(output_number);
        card
    }

    pub fn with_function(mut self, function: CardFunction) -> Self {
        self.function = function;
        self
    }

    pub fn with_cc_number(mut self, cc_number: i64) -> Self {
        self.set_cc_number(cc_number);
        self
    }

    pub fn with_source(mut self, source: CardSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    pub fn function(&self) -> CardFunction {
        self.function
    }

    #[inline]
    pub fn cc_number(&self) -> u8 {
        self.cc_number
    }

    #[inline]
    pub fn source(&self) -> CardSource {
        self.source
    }

    /// One-based output bus this card sums into (1-16).
    #[inline]
    pub fn output_number(&self) -> u8 {
        self.output_number
    }

    pub fn set_function(&mut self, function: CardFunction) {
        self.function = function;
    }

    /// Set the controller number, clamped to 0-127.
    pub fn set_cc_number(&mut self, cc_number: i64) {
        self.cc_number = cc_number.clamp(0, CC_COUNT as i64 - 1) as u8;
    }

    pub fn set_source(&mut self, source: CardSource) {
        self.source = source;
    }

    /// Set the output number, clamped to 1-16.
    pub fn set_output_number(&mut self, output_number: i64) {
        self.output_number = output_number.clamp(1, OUTPUT_COUNT as i64) as u8;
    }
}

// =============================================================================
// CardBank
// =============================================================================

/// The fixed bank of cards owned by the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBank {
    cards: [Card; CARD_COUNT],
}

impl CardBank {
    /// A bank where every card is an inactive slot routed to its own output.
    pub fn empty() -> Self {
        Self {
            cards: std::array::from_fn(Self::empty_slot),
        }
    }

    /// Start-up layout: an any-channel gate on output 1 and pitch on output 2,
    /// every other card off.
    pub fn new() -> Self {
        let mut bank = Self::empty();
        bank.cards[0].set_function(CardFunction::Gate);
        bank.cards[1].set_function(CardFunction::Pitch);
        bank
    }

    fn empty_slot(index: usize) -> Card {
        Card::new(index as i64 + 1)
    }

    /// Return one card to the empty-slot configuration (off, CC 1, any
    /// channel, its own output).
    pub fn reset_card(&mut self, index: CardIndex) {
        self.cards[index.index()] = Self::empty_slot(index.index());
    }

    #[inline]
    pub fn card(&self, index: CardIndex) -> &Card {
        &self.cards[index.index()]
    }

    #[inline]
    pub fn card_mut(&mut self, index: CardIndex) -> &mut Card {
        &mut self.cards[index.index()]
    }

    /// Cards in bank order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cards routed to `output_number`.
    pub fn routed_to(&self, output_number: u8) -> impl Iterator<Item = &Card> {
        self.cards
            .iter()
            .filter(move |card| card.output_number == output_number)
    }
}

impl Default for CardBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_codes() {
        assert_eq!(CardFunction::COUNT, 7);
        assert_eq!(CardFunction::from_code(0), CardFunction::Off);
        assert_eq!(CardFunction::from_code(4), CardFunction::PitchBend);
        assert_eq!(CardFunction::from_code(6), CardFunction::Cc);
        assert_eq!(CardFunction::Cc.code(), 6);
        for function in [CardFunction::Gate, CardFunction::Aftertouch] {
            assert_eq!(CardFunction::from_code(function.code() as i64), function);
        }
    }

    #[test]
    fn test_function_out_of_range_is_off() {
        assert_eq!(CardFunction::from_code(7), CardFunction::Off);
        assert_eq!(CardFunction::from_code(1000), CardFunction::Off);
        assert_eq!(CardFunction::from_code(-1), CardFunction::Off);
    }

    #[test]
    fn test_function_names() {
        assert_eq!(CardFunction::PitchBend.name(), "Pitch Bend");
        assert_eq!(CardFunction::Cc.name(), "CC");
        assert_eq!(
            CardFunction::names(),
            &["Off", "Gate", "Pitch", "Velocity", "Pitch Bend", "Aftertouch", "CC"]
        );
    }

    #[test]
    fn test_source_codes() {
        assert_eq!(CardSource::from_code(0), CardSource::Any);
        assert_eq!(
            CardSource::from_code(1),
            CardSource::Channel(MidiChannel::new(0).unwrap())
        );
        assert_eq!(CardSource::from_code(16).code(), 16);
        assert_eq!(CardSource::from_code(17).code(), 16);
        assert_eq!(CardSource::from_code(-3), CardSource::Any);
    }

    #[test]
    fn test_card_setters_clamp() {
        let mut card = Card::new(1);
        card.set_cc_number(-5);
        assert_eq!(card.cc_number(), 0);
        card.set_cc_number(300);
        assert_eq!(card.cc_number(), 127);
        card.set_output_number(0);
        assert_eq!(card.output_number(), 1);
        card.set_output_number(99);
        assert_eq!(card.output_number(), 16);
    }

    #[test]
    fn test_default_bank_layout() {
        let bank = CardBank::new();
        let first = bank.card(CardIndex::new(0).unwrap());
        let second = bank.card(CardIndex::new(1).unwrap());
        assert_eq!(first.function(), CardFunction::Gate);
        assert_eq!(second.function(), CardFunction::Pitch);

        for (i, card) in bank.iter().enumerate() {
            assert_eq!(card.output_number() as usize, i + 1);
            assert_eq!(card.cc_number(), DEFAULT_CC_NUMBER);
            assert_eq!(card.source(), CardSource::Any);
            if i >= 2 {
                assert_eq!(card.function(), CardFunction::Off);
            }
        }
    }

    #[test]
    fn test_reset_card() {
        let mut bank = CardBank::new();
        let index = CardIndex::new(5).unwrap();
        *bank.card_mut(index) = Card::new(1)
            .with_function(CardFunction::Cc)
            .with_cc_number(74)
            .with_source(CardSource::from_code(3));
        assert_eq!(bank.routed_to(1).count(), 2);

        bank.reset_card(index);
        assert_eq!(*bank.card(index), Card::new(6));
        assert_eq!(bank.routed_to(1).count(), 1);
    }
}
