// src/mbc.rs

/// Defines the Memory Bank Controller type used by the cartridge.
///
/// `Mbc2` and `Mbc5` are minimal stubs: ROM bank switching only, none of
/// MBC2's built-in-RAM quirks (4-bit nibble RAM, address bit 8 bank select)
/// or MBC5's rumble-motor control are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcType {
    NoMbc,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl MbcType {
    /// Determines MBC Type, RAM presence, and Battery presence from the cartridge
    /// type byte at header offset 0x0147. Unrecognized codes are a load error,
    /// not a panic: a corrupt or unsupported ROM must not take the process down.
    pub fn from_header(cartridge_type_code: u8) -> Result<(Self, bool, bool), String> {
        match cartridge_type_code {
            0x00 => Ok((MbcType::NoMbc, false, false)),
            0x01 => Ok((MbcType::Mbc1, false, false)),
            0x02 => Ok((MbcType::Mbc1, true, false)),
            0x03 => Ok((MbcType::Mbc1, true, true)),
            0x05 => Ok((MbcType::Mbc2, true, false)),  // MBC2 (built-in RAM)
            0x06 => Ok((MbcType::Mbc2, true, true)),   // MBC2+BATT
            0x08 => Ok((MbcType::NoMbc, true, false)), // ROM+RAM
            0x09 => Ok((MbcType::NoMbc, true, true)),  // ROM+RAM+BATT
            0x0F => Ok((MbcType::Mbc3, false, true)),  // MBC3+TIMER+BATT
            0x10 => Ok((MbcType::Mbc3, true, true)),   // MBC3+TIMER+RAM+BATT
            0x11 => Ok((MbcType::Mbc3, false, false)), // MBC3
            0x12 => Ok((MbcType::Mbc3, true, false)),  // MBC3+RAM
            0x13 => Ok((MbcType::Mbc3, true, true)),   // MBC3+RAM+BATT
            0x19 => Ok((MbcType::Mbc5, false, false)), // MBC5
            0x1A => Ok((MbcType::Mbc5, true, false)),  // MBC5+RAM
            0x1B => Ok((MbcType::Mbc5, true, true)),   // MBC5+RAM+BATT
            0x1C => Ok((MbcType::Mbc5, false, false)), // MBC5+RUMBLE
            0x1D => Ok((MbcType::Mbc5, true, false)),  // MBC5+RUMBLE+RAM
            0x1E => Ok((MbcType::Mbc5, true, true)),   // MBC5+RUMBLE+RAM+BATT
            other => Err(format!("unsupported cartridge type byte {other:#04X}")),
        }
    }
}
