//! Host parameter address space.
//!
//! Each card field owns a contiguous block of addresses, one per card:
//!
//! | Field          | Addresses | Legal values        |
//! |----------------|-----------|---------------------|
//! | Function       | 0-15      | 0-6 (else Off)      |
//! | CC number      | 100-115   | 0-127               |
//! | Source channel | 200-215   | 0-16 (0 = any)      |
//! | Output number  | 300-315   | 1-16                |
//!
//! Writes clamp, never fail. Writes to unknown addresses do nothing and reads
//! of unknown addresses return 0.
//!
//! Host values are floats. They are truncated toward zero before clamping;
//! NaN reads as 0 and infinities saturate.

use std::ops::RangeInclusive;

use crate::card::{CardBank, CardFunction, CardSource};
use crate::types::{CardIndex, ParameterAddress, ParameterValue, CARD_COUNT, CC_COUNT, OUTPUT_COUNT};

// =============================================================================
// EnumParameterValue
// =============================================================================

/// A unit enum carried through an indexed host parameter.
///
/// Implement with `#[derive(EnumParameter)]`.
pub trait EnumParameterValue: Copy + PartialEq + Send + Sync + 'static {
    /// Number of variants.
    const COUNT: usize;

    /// Index of the variant used for out-of-range codes.
    const DEFAULT_INDEX: usize;

    /// Convert variant index (0-based) to enum value.
    fn from_index(index: usize) -> Option<Self>;

    /// Convert enum value to variant index.
    fn to_index(self) -> usize;

    /// The variant marked `#[default]`, or the first variant.
    fn default_value() -> Self;

    /// Display names in variant order, suitable as host value strings.
    fn names() -> &'static [&'static str];
}

// =============================================================================
// CardField
// =============================================================================

/// A configurable field of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Function,
    CcNumber,
    SourceChannel,
    OutputNumber,
}

impl CardField {
    pub const ALL: [CardField; 4] = [
        CardField::Function,
        CardField::CcNumber,
        CardField::SourceChannel,
        CardField::OutputNumber,
    ];

    /// First address of this field's block.
    pub const fn base_address(self) -> ParameterAddress {
        match self {
            Self::Function => 0,
            Self::CcNumber => 100,
            Self::SourceChannel => 200,
            Self::OutputNumber => 300,
        }
    }

    /// Address of this field for one card.
    #[inline]
    pub const fn address(self, card: CardIndex) -> ParameterAddress {
        self.base_address() + card.index() as ParameterAddress
    }

    /// Legal integer values for this field.
    pub const fn range(self) -> RangeInclusive<i64> {
        match self {
            Self::Function => 0..=(CardFunction::COUNT as i64 - 1),
            Self::CcNumber => 0..=(CC_COUNT as i64 - 1),
            Self::SourceChannel => 0..=16,
            Self::OutputNumber => 1..=(OUTPUT_COUNT as i64),
        }
    }
}

/// Split an address into the field and card it refers to.
pub fn decode_address(address: ParameterAddress) -> Option<(CardField, CardIndex)> {
    CardField::ALL.into_iter().find_map(|field| {
        let offset = address.checked_sub(field.base_address())?;
        if offset >= CARD_COUNT as ParameterAddress {
            return None;
        }
        CardIndex::new(offset as u8).map(|card| (field, card))
    })
}

/// Truncate a host value toward zero. `as` saturates and maps NaN to 0.
#[inline]
fn integer_value(value: ParameterValue) -> i64 {
    value as i64
}

impl CardBank {
    /// Apply a host parameter write.
    pub fn set_parameter(&mut self, address: ParameterAddress, value: ParameterValue) {
        let Some((field, index)) = decode_address(address) else {
            return;
        };
        let value = integer_value(value);
        let card = self.card_mut(index);
        match field {
            CardField::Function => card.set_function(CardFunction::from_code(value)),
            CardField::CcNumber => card.set_cc_number(value),
            CardField::SourceChannel => card.set_source(CardSource::from_code(value)),
            CardField::OutputNumber => card.set_output_number(value),
        }
    }

    /// Read a host parameter. Unknown addresses read as 0.
    pub fn parameter(&self, address: ParameterAddress) -> ParameterValue {
        let Some((field, index)) = decode_address(address) else {
            return 0.0;
        };
        let card = self.card(index);
        let value = match field {
            CardField::Function => card.function().code(),
            CardField::CcNumber => card.cc_number(),
            CardField::SourceChannel => card.source().code(),
            CardField::OutputNumber => card.output_number(),
        };
        value as ParameterValue
    }
}
