use crate::apu::Apu;
use crate::interrupt::InterruptController;
use crate::joypad::{Button, Joypad};
use crate::mbc::MbcType;
use crate::memory_map::*;
use crate::rtc::RtcRegisters;
use crate::timer::Timer;
use std::fmt;

/// Represents the Game Boy's memory map with MBC1/MBC3 support and input handling.
#[derive(Clone)]
pub struct MemoryBus {
    // Core Memory Areas
    rom_bank_0: Box<[u8; ROM_BANK_0_SIZE]>,
    vram: Box<[u8; VRAM_SIZE]>,
    wram_bank_0: Box<[u8; WRAM_BANK_0_SIZE]>,
    wram_bank_n: Box<[u8; WRAM_BANK_N_SIZE]>, // Always Bank 1 for DMG/CGB in non-CGB mode
    oam: Box<[u8; OAM_SIZE]>,
    io_registers: Box<[u8; IO_REGISTERS_SIZE]>,
    hram: Box<[u8; HRAM_SIZE]>,
    interrupts: InterruptController, // IE (0xFFFF) and IF (0xFF0F)

    // Cartridge Data & State
    full_rom_data: Vec<u8>,
    external_ram: Vec<u8>,
    mbc_type: MbcType,
    has_ram: bool,
    has_battery: bool, // For saving RAM/RTC state

    // MBC State
    current_rom_bank: usize,
    current_ram_bank: usize, // Also used for RTC register select in MBC3
    ram_enabled: bool,
    banking_mode: u8, // 0=ROM Banking Mode, 1=RAM Banking Mode (MBC1)

    // MBC1 specific intermediate registers
    mbc1_rom_bank_lower: u8,
    mbc1_bank_upper: u8, // RAM bank or ROM bank upper bits

    // MBC5 ROM bank is 9 bits wide, split across two write registers.
    mbc5_rom_bank_high_bit: bool,

    // MBC3 specific RTC state
    rtc: RtcRegisters,
    rtc_latched: RtcRegisters,
    rtc_latch_state: u8,     // 0: Ready, 1: 0x00 written, 2: 0x01 written (latch)
    rtc_mapped_register: u8, // Which RTC reg (0x08-0x0C) is mapped via RAM bank select

    // Input State (delegated to Joypad struct)
    pub joypad: Joypad,

    // Sound register file and channel state machines (see `crate::apu`).
    pub apu: Apu,

    // Calculated sizes (from ROM header)
    num_rom_banks: usize,
    num_ram_banks: usize,

    // --- OAM DMA state ---
    dma_active: bool,
    dma_source_high: u8,
    dma_progress: u16, // bytes copied so far, 0..OAM_SIZE

    timer: Timer,
}

impl MemoryBus {
    pub fn new() -> Self {
        let mut io_regs = [0u8; IO_REGISTERS_SIZE];
        io_regs[(SB_ADDR - IO_REGISTERS_START) as usize] = 0x00;
        io_regs[(SC_ADDR - IO_REGISTERS_START) as usize] = 0x7E;
        // DIV/TIMA/TMA/TAC are owned by `Timer`, not mirrored here.
        // IF is owned by `InterruptController`, not mirrored here.
        // Sound registers (0xFF10-0xFF26) are owned by `Apu`, not mirrored here.
        io_regs[(LCDC_ADDR - IO_REGISTERS_START) as usize] = 0x91;
        io_regs[(STAT_ADDR - IO_REGISTERS_START) as usize] = 0x85;
        io_regs[(SCY_ADDR - IO_REGISTERS_START) as usize] = 0x00;
        io_regs[(SCX_ADDR - IO_REGISTERS_START) as usize] = 0x00;
        io_regs[(LY_ADDR - IO_REGISTERS_START) as usize] = 0x00;
        io_regs[(LYC_ADDR - IO_REGISTERS_START) as usize] = 0x00;
        io_regs[(DMA_ADDR - IO_REGISTERS_START) as usize] = 0xFF;
        io_regs[(BGP_ADDR - IO_REGISTERS_START) as usize] = 0xFC;
        io_regs[(OBP0_ADDR - IO_REGISTERS_START) as usize] = 0xFF;
        io_regs[(OBP1_ADDR - IO_REGISTERS_START) as usize] = 0xFF;
        io_regs[(WY_ADDR - IO_REGISTERS_START) as usize] = 0x00;
        io_regs[(WX_ADDR - IO_REGISTERS_START) as usize] = 0x00;

        let mut bus = MemoryBus {
            rom_bank_0: Box::new([0; ROM_BANK_0_SIZE]),
            vram: Box::new([0; VRAM_SIZE]),
            wram_bank_0: Box::new([0; WRAM_BANK_0_SIZE]),
            wram_bank_n: Box::new([0; WRAM_BANK_N_SIZE]),
            oam: Box::new([0; OAM_SIZE]),
            io_registers: Box::new(io_regs),
            hram: Box::new([0; HRAM_SIZE]),
            interrupts: InterruptController::new(),

            full_rom_data: Vec::new(),
            external_ram: Vec::new(),
            mbc_type: MbcType::NoMbc,
            has_ram: false,
            has_battery: false,

            current_rom_bank: 1,
            current_ram_bank: 0,
            ram_enabled: false,
            banking_mode: 0,

            mbc1_rom_bank_lower: 1,
            mbc1_bank_upper: 0,

            mbc5_rom_bank_high_bit: false,

            rtc: RtcRegisters::new(),
            rtc_latched: RtcRegisters::default(),
            rtc_latch_state: 0,
            rtc_mapped_register: 0,

            joypad: Joypad::new(),
            apu: Apu::new(),

            num_rom_banks: 2,
            num_ram_banks: 0,

            dma_active: false,
            dma_source_high: 0,
            dma_progress: 0,

            timer: Timer::new(),
        };

        let joyp_val = bus.joypad.read_p1();
        bus.io_registers[(P1_JOYP_ADDR - IO_REGISTERS_START) as usize] = joyp_val;

        bus
    }

    /// Loads ROM data and configures MBC based on the header. Returns an error
    /// instead of panicking on a malformed or unsupported cartridge.
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<(), String> {
        if rom_data.len() < 0x150 {
            return Err("ROM data is too small to contain a valid header".to_string());
        }

        let cartridge_type_code = rom_data[0x0147];
        let rom_size_code = rom_data[0x0148];
        let ram_size_code = rom_data[0x0149];

        (self.mbc_type, self.has_ram, self.has_battery) =
            MbcType::from_header(cartridge_type_code)?;

        self.num_rom_banks = match rom_size_code {
            0x00..=0x08 => 2usize << rom_size_code,
            0x52 => 72,
            0x53 => 80,
            0x54 => 96,
            other => return Err(format!("unsupported ROM size code {other:#04X}")),
        };
        let expected_rom_size = self.num_rom_banks * ROM_BANK_N_SIZE;
        if rom_data.len() < expected_rom_size {
            log::warn!(
                "ROM file size ({}) is smaller than expected ({}) based on header",
                rom_data.len(),
                expected_rom_size
            );
        }

        let ram_size = match ram_size_code {
            0x00 => 0,
            0x01 => 2 * 1024,
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            other => return Err(format!("unsupported RAM size code {other:#04X}")),
        };

        self.full_rom_data = rom_data.to_vec();
        if self.full_rom_data.len() >= ROM_BANK_0_SIZE {
            self.rom_bank_0
                .copy_from_slice(&self.full_rom_data[0..ROM_BANK_0_SIZE]);
        } else {
            return Err("ROM is smaller than 16KB, cannot load into Bank 0".to_string());
        }

        if self.has_ram && ram_size > 0 {
            self.external_ram = vec![0u8; ram_size];
            self.num_ram_banks = ram_size.max(EXT_RAM_SIZE) / EXT_RAM_SIZE;
        } else {
            self.has_ram = false;
            self.external_ram = Vec::new();
            self.num_ram_banks = 0;
        }

        self.current_rom_bank = 1;
        self.current_ram_bank = 0;
        self.ram_enabled = false;
        self.banking_mode = 0;
        self.mbc1_rom_bank_lower = 1;
        self.mbc1_bank_upper = 0;
        self.mbc5_rom_bank_high_bit = false;
        self.rtc = RtcRegisters::new();
        self.rtc_latched = RtcRegisters::default();
        self.rtc_latch_state = 0;
        self.rtc_mapped_register = 0;

        log::info!(
            "loaded ROM: {} bytes, type {:?} ({:02X}), {} ROM bank(s), {} RAM bank(s), battery={}",
            self.full_rom_data.len(),
            self.mbc_type,
            cartridge_type_code,
            self.num_rom_banks,
            self.num_ram_banks,
            self.has_battery
        );
        Ok(())
    }

    // --- MBC Helper Logic ---

    fn update_mbc1_rom_bank(&mut self) {
        let mut bank = self.mbc1_rom_bank_lower as usize;
        if self.banking_mode == 0 {
            bank |= (self.mbc1_bank_upper as usize) << 5;
        }
        if bank == 0 || bank == 0x20 || bank == 0x40 || bank == 0x60 {
            bank += 1;
        }
        self.current_rom_bank = bank & (self.num_rom_banks.max(1) - 1);
    }

    fn update_mbc1_ram_bank(&mut self) {
        if self.banking_mode == 1 {
            self.current_ram_bank = self.mbc1_bank_upper as usize;
        } else {
            self.current_ram_bank = 0;
        }
        if self.num_ram_banks > 0 {
            self.current_ram_bank &= self.num_ram_banks - 1;
        } else {
            self.current_ram_bank = 0;
        }
    }

    // --- Interrupt Request Helper ---
    /// Sets the corresponding interrupt flag bit (0-4) in the IF register (0xFF0F).
    pub fn request_interrupt(&mut self, bit: u8) {
        self.interrupts.request(bit);
    }

    // --- Read/Write ---

    pub fn read_byte(&self, addr: u16) -> u8 {
        // During an active OAM DMA transfer, the CPU can only see HRAM; every
        // other address reads back 0xFF.
        if self.dma_active && !(HRAM_START..=HRAM_END).contains(&addr) {
            return 0xFF;
        }
        self.read_byte_raw(addr)
    }

    /// The actual memory read, bypassing the DMA-active CPU lockout. Used by
    /// `read_byte` once the lockout check passes, and by the DMA copy itself
    /// (which must read the true source address, not the locked-out 0xFF).
    fn read_byte_raw(&self, addr: u16) -> u8 {
        match addr {
            ROM_BANK_0_START..=ROM_BANK_0_END => self.rom_bank_0[addr as usize],
            ROM_BANK_N_START..=ROM_BANK_N_END => {
                let effective_rom_bank = self.current_rom_bank % self.num_rom_banks.max(1);
                let rom_offset =
                    (effective_rom_bank * ROM_BANK_N_SIZE) + (addr - ROM_BANK_N_START) as usize;
                if rom_offset < self.full_rom_data.len() {
                    self.full_rom_data[rom_offset]
                } else {
                    0xFF
                }
            }
            VRAM_START..=VRAM_END => self.vram[(addr - VRAM_START) as usize],
            EXT_RAM_START..=EXT_RAM_END => {
                if !self.ram_enabled {
                    return 0xFF;
                }
                match self.mbc_type {
                    MbcType::Mbc3
                        if self.rtc_mapped_register >= 0x08 && self.rtc_mapped_register <= 0x0C =>
                    {
                        self.rtc_latched.read(self.rtc_mapped_register)
                    }
                    _ => {
                        if !self.has_ram || self.external_ram.is_empty() || self.num_ram_banks == 0
                        {
                            return 0xFF;
                        }
                        let effective_ram_bank = self.current_ram_bank % self.num_ram_banks;
                        let ram_offset =
                            (effective_ram_bank * EXT_RAM_SIZE) + (addr - EXT_RAM_START) as usize;
                        if ram_offset < self.external_ram.len() {
                            self.external_ram[ram_offset]
                        } else {
                            0xFF
                        }
                    }
                }
            }
            WRAM_BANK_0_START..=WRAM_BANK_0_END => {
                self.wram_bank_0[(addr - WRAM_BANK_0_START) as usize]
            }
            WRAM_BANK_N_START..=WRAM_BANK_N_END => {
                self.wram_bank_n[(addr - WRAM_BANK_N_START) as usize]
            }
            ECHO_RAM_START..=ECHO_RAM_END => self.read_byte(addr - 0x2000),
            OAM_START..=OAM_END => self.oam[(addr - OAM_START) as usize],
            NOT_USABLE_START..=NOT_USABLE_END => 0xFF,
            IO_REGISTERS_START..=IO_REGISTERS_END => {
                let offset = (addr - IO_REGISTERS_START) as usize;
                match addr {
                    P1_JOYP_ADDR => self.joypad.read_p1(),
                    STAT_ADDR => self.io_registers[offset] | 0x80,
                    IF_ADDR => self.interrupts.read_if(),
                    DIV_ADDR => self.timer.read_div(),
                    TIMA_ADDR => self.timer.read_tima(),
                    TMA_ADDR => self.timer.read_tma(),
                    TAC_ADDR => self.timer.read_tac(),
                    0xFF10..=0xFF26 | 0xFF30..=0xFF3F => self.apu.read_byte(addr),
                    _ => self.io_registers[offset],
                }
            }
            HRAM_START..=HRAM_END => self.hram[(addr - HRAM_START) as usize],
            INTERRUPT_ENABLE_REGISTER => self.interrupts.read_ie(),
        }
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => match self.mbc_type {
                MbcType::Mbc1 | MbcType::Mbc3 => {
                    if self.has_ram || (self.has_battery && self.mbc_type == MbcType::Mbc3) {
                        self.ram_enabled = (value & 0x0F) == 0x0A;
                    }
                }
                MbcType::Mbc2 | MbcType::Mbc5 => {
                    if self.has_ram {
                        self.ram_enabled = (value & 0x0F) == 0x0A;
                    }
                }
                _ => {}
            },
            0x2000..=0x3FFF => match self.mbc_type {
                MbcType::Mbc1 => {
                    let bank_low = value & 0x1F;
                    self.mbc1_rom_bank_lower = if bank_low == 0 { 1 } else { bank_low };
                    self.update_mbc1_rom_bank();
                }
                MbcType::Mbc3 => {
                    let bank = value & 0x7F;
                    self.current_rom_bank = if bank == 0 { 1 } else { bank as usize };
                    self.current_rom_bank &= self.num_rom_banks.max(1) - 1;
                }
                // Stub: 4-bit ROM bank register, no RAM-enable-vs-bank address
                // bit 8 quirk modeled.
                MbcType::Mbc2 => {
                    let bank = value & 0x0F;
                    self.current_rom_bank = if bank == 0 { 1 } else { bank as usize };
                    self.current_rom_bank &= self.num_rom_banks.max(1) - 1;
                }
                // Stub: 9-bit ROM bank, low byte at 0x2000-0x2FFF, high bit at
                // 0x3000-0x3FFF. No rumble-motor modeling.
                MbcType::Mbc5 => {
                    if addr <= 0x2FFF {
                        let low = value as usize;
                        let bank = low | ((self.mbc5_rom_bank_high_bit as usize) << 8);
                        self.current_rom_bank = bank & (self.num_rom_banks.max(1) - 1);
                    } else {
                        self.mbc5_rom_bank_high_bit = value & 0x01 != 0;
                        let low = self.current_rom_bank & 0xFF;
                        let bank = low | ((self.mbc5_rom_bank_high_bit as usize) << 8);
                        self.current_rom_bank = bank & (self.num_rom_banks.max(1) - 1);
                    }
                }
                _ => {}
            },
            0x4000..=0x5FFF => match self.mbc_type {
                MbcType::Mbc1 => {
                    self.mbc1_bank_upper = value & 0x03;
                    self.update_mbc1_rom_bank();
                    self.update_mbc1_ram_bank();
                }
                MbcType::Mbc3 => {
                    if value <= 0x07 {
                        self.current_ram_bank = value as usize;
                        self.rtc_mapped_register = 0;
                        if self.num_ram_banks > 0 {
                            self.current_ram_bank &= self.num_ram_banks - 1;
                        } else {
                            self.current_ram_bank = 0;
                        }
                    } else if (0x08..=0x0C).contains(&value) {
                        self.rtc_mapped_register = value;
                    }
                }
                MbcType::Mbc5 => {
                    self.current_ram_bank = (value & 0x0F) as usize;
                    if self.num_ram_banks > 0 {
                        self.current_ram_bank &= self.num_ram_banks - 1;
                    } else {
                        self.current_ram_bank = 0;
                    }
                }
                _ => {}
            },
            0x6000..=0x7FFF => match self.mbc_type {
                MbcType::Mbc1 => {
                    self.banking_mode = value & 0x01;
                    self.update_mbc1_rom_bank();
                    self.update_mbc1_ram_bank();
                }
                MbcType::Mbc3 => {
                    if self.rtc_latch_state == 0 && value == 0x00 {
                        self.rtc_latch_state = 1;
                    } else if self.rtc_latch_state == 1 && value == 0x01 {
                        self.rtc.update();
                        self.rtc_latched = self.rtc.clone();
                        self.rtc_latch_state = 0;
                    } else {
                        self.rtc_latch_state = 0;
                    }
                }
                _ => {}
            },

            VRAM_START..=VRAM_END => self.vram[(addr - VRAM_START) as usize] = value,
            EXT_RAM_START..=EXT_RAM_END => {
                if !self.ram_enabled {
                    return;
                }
                match self.mbc_type {
                    MbcType::Mbc3 if self.rtc_mapped_register >= 0x08 => {
                        self.rtc.write(self.rtc_mapped_register, value);
                    }
                    _ => {
                        if !self.has_ram || self.external_ram.is_empty() || self.num_ram_banks == 0
                        {
                            return;
                        }
                        let effective_ram_bank = self.current_ram_bank % self.num_ram_banks;
                        let ram_offset =
                            (effective_ram_bank * EXT_RAM_SIZE) + (addr - EXT_RAM_START) as usize;
                        if ram_offset < self.external_ram.len() {
                            self.external_ram[ram_offset] = value;
                        }
                    }
                }
            }
            WRAM_BANK_0_START..=WRAM_BANK_0_END => {
                self.wram_bank_0[(addr - WRAM_BANK_0_START) as usize] = value;
            }
            WRAM_BANK_N_START..=WRAM_BANK_N_END => {
                self.wram_bank_n[(addr - WRAM_BANK_N_START) as usize] = value;
            }
            ECHO_RAM_START..=ECHO_RAM_END => self.write_byte(addr - 0x2000, value),
            OAM_START..=OAM_END => self.oam[(addr - OAM_START) as usize] = value,
            NOT_USABLE_START..=NOT_USABLE_END => {}
            IO_REGISTERS_START..=IO_REGISTERS_END => {
                let offset = (addr - IO_REGISTERS_START) as usize;
                match addr {
                    P1_JOYP_ADDR => self.joypad.write_p1(value),
                    DIV_ADDR => self.timer.write_div(),
                    TIMA_ADDR => self.timer.write_tima(value),
                    TMA_ADDR => self.timer.write_tma(value),
                    TAC_ADDR => self.timer.write_tac(value),
                    IF_ADDR => self.interrupts.write_if(value),
                    LCDC_ADDR | SCY_ADDR | SCX_ADDR | LYC_ADDR | BGP_ADDR | OBP0_ADDR
                    | OBP1_ADDR | WY_ADDR | WX_ADDR => {
                        self.io_registers[offset] = value;
                    }
                    STAT_ADDR => {
                        // Only bits 3-6 (interrupt source enables) are writable;
                        // the PPU, not this bus, owns bits 0-2 and bit 7 reads 1.
                        self.io_registers[offset] =
                            (value & 0b0111_1000) | (self.io_registers[offset] & 0b1000_0111);
                    }
                    DMA_ADDR => {
                        self.io_registers[offset] = value;
                        self.start_dma_transfer(value);
                    }
                    0xFF10..=0xFF26 | 0xFF30..=0xFF3F => {
                        self.apu.write_byte(addr, value);
                    }
                    _ => {
                        self.io_registers[offset] = value;
                    }
                }
            }
            HRAM_START..=HRAM_END => self.hram[(addr - HRAM_START) as usize] = value,
            INTERRUPT_ENABLE_REGISTER => self.interrupts.write_ie(value),
        }
    }

    // --- Helper methods ---

    /// Begins an OAM DMA transfer. The actual copy is paced by `step_dma`, one
    /// byte per 4 T-cycles, matching real hardware timing; while active, the
    /// CPU's view of the bus is restricted to HRAM (see `read_byte`).
    fn start_dma_transfer(&mut self, source_high_byte: u8) {
        let source_start_addr = (source_high_byte as u16) << 8;
        if source_start_addr >= 0xFE00 {
            log::warn!(
                "DMA transfer requested from restricted area {:#06X}, ignoring",
                source_start_addr
            );
            return;
        }
        self.dma_active = true;
        self.dma_source_high = source_high_byte;
        self.dma_progress = 0;
    }

    /// Advances an in-progress OAM DMA transfer by `cycles` T-cycles. Copies
    /// one byte per 4 T-cycles until all 160 OAM bytes have moved.
    pub fn step_dma(&mut self, cycles: u16) {
        if !self.dma_active {
            return;
        }
        let source_start_addr = (self.dma_source_high as u16) << 8;
        let bytes_to_copy = ((cycles / 4) as usize).max(1);
        for _ in 0..bytes_to_copy {
            if self.dma_progress as usize >= OAM_SIZE {
                self.dma_active = false;
                break;
            }
            let src = source_start_addr.wrapping_add(self.dma_progress);
            let byte = self.read_byte_raw(src);
            self.oam[self.dma_progress as usize] = byte;
            self.dma_progress += 1;
        }
        if self.dma_progress as usize >= OAM_SIZE {
            self.dma_active = false;
        }
    }

    pub fn dma_active(&self) -> bool {
        self.dma_active
    }

    /// Advances the DIV/TIMA/TMA/TAC timer by `cycles` T-cycles, requesting a
    /// timer interrupt on TIMA overflow.
    pub fn step_timer(&mut self, cycles: u16) {
        if self.timer.step(cycles) {
            self.request_interrupt(TIMER_INTERRUPT_BIT);
        }
    }

    /// Advances the APU's frame sequencer and channel state machines.
    pub fn step_apu(&mut self, cycles: u16) {
        self.apu.step(cycles as u32);
    }

    /// Reads a 16-bit word (Little Endian).
    pub fn read_word(&self, addr: u16) -> u16 {
        let low = self.read_byte(addr) as u16;
        let high = self.read_byte(addr.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    /// Writes a 16-bit word (Little Endian).
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let low = (value & 0xFF) as u8;
        let high = (value >> 8) as u8;
        self.write_byte(addr, low);
        self.write_byte(addr.wrapping_add(1), high);
    }

    /// Called periodically to update RTC state.
    pub fn tick_rtc(&mut self) {
        if self.mbc_type == MbcType::Mbc3 {
            self.rtc.update();
        }
    }

    // --- Public Input Handling Methods (Delegate to Joypad) ---

    pub fn key_down(&mut self, button: Button) {
        if self.joypad.key_down(button) {
            self.request_interrupt(JOYPAD_INTERRUPT_BIT);
        }
        let p1_val = self.joypad.read_p1();
        self.io_registers[(P1_JOYP_ADDR - IO_REGISTERS_START) as usize] = p1_val;
    }

    pub fn key_up(&mut self, button: Button) {
        self.joypad.key_up(button);
        let p1_val = self.joypad.read_p1();
        self.io_registers[(P1_JOYP_ADDR - IO_REGISTERS_START) as usize] = p1_val;
    }

    // --- Debug / Accessor methods ---
    pub fn get_io_reg(&self, addr: u16) -> u8 {
        self.read_byte(addr)
    }

    pub fn set_io_reg_direct(&mut self, addr: u16, value: u8) {
        self.write_byte(addr, value);
    }

    /// Test-only constructor: identical to `new()`, named for readability in
    /// `#[cfg(test)]` modules that never touch cartridge loading.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new()
    }

    /// Test-only direct write that bypasses MBC gating, for poking opcodes
    /// straight into ROM Bank 0 without a full cartridge header.
    #[cfg(test)]
    pub fn poke(&mut self, addr: u16, value: u8) {
        match addr {
            ROM_BANK_0_START..=ROM_BANK_0_END => self.rom_bank_0[addr as usize] = value,
            _ => self.write_byte(addr, value),
        }
    }

    pub fn get_vram(&self) -> &[u8; VRAM_SIZE] {
        &self.vram
    }
    pub fn get_oam(&self) -> &[u8; OAM_SIZE] {
        &self.oam
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBus")
            .field("mbc_type", &self.mbc_type)
            .field("rom_banks", &self.num_rom_banks)
            .field("ram_banks", &self.num_ram_banks)
            .field("has_ram", &self.has_ram)
            .field("has_battery", &self.has_battery)
            .field("ram_enabled", &self.ram_enabled)
            .field("current_rom_bank", &self.current_rom_bank)
            .field("current_ram_bank", &self.current_ram_bank)
            .field("banking_mode(MBC1)", &self.banking_mode)
            .field("rtc_mapped(MBC3)", &self.rtc_mapped_register)
            .field("dma_active", &self.dma_active)
            .field("IE", &format_args!("{:#04X}", self.interrupts.read_ie()))
            .field("IF", &format_args!("{:#04X}", self.interrupts.read_if()))
            .field("joypad", &self.joypad)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ie_unused_bits_read_as_one() {
        let mut bus = MemoryBus::new_for_test();
        bus.write_byte(INTERRUPT_ENABLE_REGISTER, 0x00);
        assert_eq!(bus.read_byte(INTERRUPT_ENABLE_REGISTER), 0xE0);
        bus.write_byte(INTERRUPT_ENABLE_REGISTER, 0x1F);
        assert_eq!(bus.read_byte(INTERRUPT_ENABLE_REGISTER), 0xFF);
    }

    #[test]
    fn if_unused_bits_read_as_one() {
        let mut bus = MemoryBus::new_for_test();
        bus.write_byte(IF_ADDR, 0x00);
        assert_eq!(bus.read_byte(IF_ADDR), 0xE0);
    }

    #[test]
    fn dma_locks_out_non_hram_reads_until_complete() {
        let mut bus = MemoryBus::new_for_test();
        bus.poke(0x0000, 0xAB);
        bus.hram[0] = 0x42;
        bus.write_byte(DMA_ADDR, 0x00); // source = 0x0000
        assert!(bus.dma_active());
        assert_eq!(bus.read_byte(0x0000), 0xFF); // locked out mid-transfer
        assert_eq!(bus.read_byte(HRAM_START), 0x42); // HRAM still visible

        // 160 bytes at 1 byte/4 cycles = 640 cycles to finish.
        bus.step_dma(640);
        assert!(!bus.dma_active());
        assert_eq!(bus.read_byte(0x0000), 0xAB);
        assert_eq!(bus.get_oam()[0], 0xAB);
    }

    #[test]
    fn timer_overflow_reloads_from_tma_and_requests_interrupt() {
        let mut bus = MemoryBus::new_for_test();
        bus.write_byte(TAC_ADDR, 0x05); // enabled, divider = 16 cycles/tick
        bus.write_byte(TMA_ADDR, 0x10);
        bus.write_byte(TIMA_ADDR, 0xFF);
        bus.step_timer(16); // one tick: 0xFF -> overflow -> reload 0x10
        assert_eq!(bus.get_io_reg(TIMA_ADDR), 0x10);
        assert_eq!(bus.read_byte(IF_ADDR) & (1 << TIMER_INTERRUPT_BIT), 1 << TIMER_INTERRUPT_BIT);
    }

    fn rom_with_header(cartridge_type: u8, rom_size_code: u8, ram_size_code: u8) -> Vec<u8> {
        let mut rom = vec![0u8; ROM_BANK_N_SIZE * 4];
        rom[0x0147] = cartridge_type;
        rom[0x0148] = rom_size_code;
        rom[0x0149] = ram_size_code;
        rom
    }

    #[test]
    fn mbc5_switches_rom_bank_across_both_registers() {
        let mut bus = MemoryBus::new_for_test();
        let rom = rom_with_header(0x19, 0x03, 0x00); // MBC5, 8 banks (64KB)
        bus.load_rom(&rom).unwrap();
        bus.write_byte(0x2000, 0x03); // low byte of bank
        bus.write_byte(0x3000, 0x00); // high bit clear
        assert_eq!(bus.read_byte(ROM_BANK_N_START), rom[3 * ROM_BANK_N_SIZE]);
    }

    #[test]
    fn mbc2_switches_rom_bank_with_four_bit_register() {
        let mut bus = MemoryBus::new_for_test();
        let rom = rom_with_header(0x05, 0x01, 0x00); // MBC2, 4 banks
        bus.load_rom(&rom).unwrap();
        bus.write_byte(0x2000, 0x02);
        assert_eq!(bus.read_byte(ROM_BANK_N_START), rom[2 * ROM_BANK_N_SIZE]);
    }
}
