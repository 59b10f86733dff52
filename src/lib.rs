//! A Game Boy (DMG) core: Sharp SM83 CPU interpreter, memory-mapped address
//! bus, and APU register file. PPU, non-battery-RTC cartridge quirks beyond
//! NoMBC/MBC1/MBC3 (MBC2/MBC5 are ROM-banking-only stubs here), audio
//! mixing, and any windowing/GUI layer are host concerns outside this crate;
//! see [`GameBoy`] for the narrow surface a host drives it through.

pub mod apu;
pub mod cpu;
pub mod error;
pub mod gameboy;
pub mod interrupt;
pub mod joypad;
pub mod mbc;
pub mod memory_bus;
pub mod memory_map;
pub mod rtc;
pub mod savestate;
pub mod timer;

pub use apu::{Apu, AudioSink, Channel, NullSink};
pub use cpu::Cpu;
pub use error::FaultKind;
pub use gameboy::GameBoy;
pub use joypad::Button;
pub use memory_bus::MemoryBus;
