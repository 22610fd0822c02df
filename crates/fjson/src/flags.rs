use bitflags::bitflags;

bitflags! {
    /// Presentation flags for the layout engine. Combinable with `|`.
    ///
    /// The "simple" entry point ([`crate::to_string`]) defaults to
    /// [`SerializeFlags::SPACED`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SerializeFlags: u8 {
        /// Insert newlines after `{`, `[`, and `,`, and indent nested levels.
        const PRETTY = 0b0001;
        /// With `PRETTY`, indent with a tab per level instead of two spaces.
        const PRETTY_TAB = 0b0010;
        /// Insert a space after `:`, after `[`/`{`, and before `]`/`}`.
        const SPACED = 0b0100;
        /// Trim trailing zeros off finite doubles, keeping exactly one digit
        /// after the decimal point.
        const NO_TRAILING_ZERO = 0b1000;
    }
}

impl Default for SerializeFlags {
    fn default() -> Self {
        SerializeFlags::SPACED
    }
}
