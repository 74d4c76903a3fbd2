use derive_more::IsVariant;

/// How consecutive bitfields are packed into storage units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, IsVariant)]
pub enum BitfieldPolicy {
    /// A bitfield lands at the bit cursor unless it would straddle an aligned
    /// unit of its own type. Later fields may use the rest of the unit.
    #[default]
    Itanium,

    /// A run of bitfields owns whole storage units. A change of underlying
    /// type, an overflowing bitfield, a zero-width bitfield, or any ordinary
    /// field closes the unit and skips to its end.
    StrictUnits,
}
