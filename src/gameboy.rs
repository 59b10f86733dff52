//! Top-level host-facing handle tying the CPU, address bus, and APU together.

use crate::cpu::Cpu;
use crate::error::FaultKind;
use crate::joypad::Button;
use crate::memory_bus::MemoryBus;

/// A DMG core instance. A host drives emulation by repeatedly calling
/// [`step_instruction`](Self::step_instruction) and feeding button events and
/// interrupt requests (from its own PPU/serial/joypad-scan implementation)
/// through [`request_interrupt`](Self::request_interrupt).
pub struct GameBoy {
    pub cpu: Cpu,
    pub bus: MemoryBus,
}

impl GameBoy {
    /// Creates a new instance. `skip_boot_rom` selects post-boot register
    /// values (the common case for a host that doesn't ship a boot ROM).
    pub fn new(skip_boot_rom: bool) -> Self {
        let cpu = Cpu::new(skip_boot_rom);
        let mut bus = MemoryBus::new();
        if skip_boot_rom {
            Cpu::initialize_post_boot_io(&mut bus);
        }
        GameBoy { cpu, bus }
    }

    /// Loads a ROM image, configuring the cartridge's MBC from its header.
    pub fn load_cartridge(&mut self, rom_data: &[u8]) -> Result<(), String> {
        self.bus.load_rom(rom_data)
    }

    /// Resets to the post-boot power-up state, discarding all cartridge RAM
    /// and register state along with CPU state.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus = MemoryBus::new();
        Cpu::initialize_post_boot_io(&mut self.bus);
    }

    /// Executes one CPU instruction (including any interrupt dispatch that
    /// preempts it) and advances every bus-owned subsystem — OAM DMA, the
    /// DIV/TIMA timer, and the APU frame sequencer — by the resulting T-cycle
    /// count. Returns that cycle count.
    pub fn step_instruction(&mut self) -> u16 {
        let cycles = self.cpu.step(&mut self.bus);
        self.bus.step_timer(cycles);
        self.bus.step_dma(cycles);
        self.bus.step_apu(cycles);
        cycles
    }

    /// The fatal condition latched by the CPU, if any (see `Cpu::is_fatal`).
    pub fn is_fatal(&self) -> Option<FaultKind> {
        self.cpu.is_fatal()
    }

    /// Requests an interrupt (bit 0-4, see `memory_map::*_INTERRUPT_BIT`) on
    /// behalf of an external subsystem such as a host-driven PPU or serial
    /// port.
    pub fn request_interrupt(&mut self, bit: u8) {
        self.bus.request_interrupt(bit);
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bus.read_byte(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bus.write_byte(addr, value);
    }

    pub fn key_down(&mut self, button: Button) {
        self.bus.key_down(button);
    }

    pub fn key_up(&mut self, button: Button) {
        self.bus.key_up(button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_map;

    #[test]
    fn step_instruction_advances_timer_and_dma_together() {
        let mut gb = GameBoy::new(true);
        gb.bus.write_byte(memory_map::TAC_ADDR, 0x05); // enabled, fastest divider
        gb.write(0x0100, 0x00); // NOP at reset PC
        let cycles = gb.step_instruction();
        assert_eq!(cycles, 4);
    }

    #[test]
    fn request_interrupt_is_visible_through_if_register() {
        let mut gb = GameBoy::new(true);
        gb.request_interrupt(memory_map::VBLANK_INTERRUPT_BIT);
        assert_ne!(gb.read(memory_map::IF_ADDR) & 0x01, 0);
    }
}
