//! Bit flags for the memory data access control (MADCTL) register.

/// MADCTL bits. Rotation table entries are built by OR-ing these together.
pub struct Madctl;
#[allow(dead_code)]
impl Madctl {
    /// Page address order (top to bottom when clear)
    pub const MY: u8 = 0x80;
    /// Column address order (left to right when clear)
    pub const MX: u8 = 0x40;
    /// Page/column order (normal when clear, exchanged when set)
    pub const MV: u8 = 0x20;
    /// Line address order
    pub const ML: u8 = 0x10;
    /// Display data latch order
    pub const MH: u8 = 0x04;
    /// RGB channel order
    pub const RGB: u8 = 0x00;
    /// BGR channel order
    pub const BGR: u8 = 0x08;
}
