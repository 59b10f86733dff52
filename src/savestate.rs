//! Flat byte-stream save/restore of CPU register and mode state. VRAM/OAM,
//! cartridge RAM, MBC banking registers, and PPU-owned state are a host
//! concern (or a separate future stream) and are not part of this one.

use crate::cpu::{Cpu, CpuMode, Ime};
use crate::error::FaultKind;

const MAGIC: u32 = 0x424F_4241; // "ABOB" in little-endian bytes, arbitrary.
const VERSION: u8 = 1;

/// Serializes CPU register/mode state into a flat byte stream.
///
/// Layout: magic(u32 LE), version(u8), a,f,b,c,d,e,h,l (u8 each), sp,pc (u16
/// LE each), ime(u8 tag), mode(u8 tag), fatal(u8 present-flag + payload).
pub fn save_cpu_state(cpu: &Cpu) -> Vec<u8> {
    let mut out = Vec::with_capacity(32);
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.push(VERSION);

    let (a, f, b, c, d, e, h, l) = cpu.registers();
    out.extend_from_slice(&[a, f, b, c, d, e, h, l]);
    out.extend_from_slice(&cpu.sp().to_le_bytes());
    out.extend_from_slice(&cpu.pc().to_le_bytes());

    out.push(match cpu.ime_state() {
        Ime::Disabled => 0,
        Ime::PendingEnable => 1,
        Ime::Enabled => 2,
    });
    out.push(match cpu.mode() {
        CpuMode::Running => 0,
        CpuMode::Halted => 1,
        CpuMode::Stopped => 2,
        CpuMode::HaltBug => 3,
    });

    match cpu.is_fatal() {
        None => out.push(0),
        Some(FaultKind::InvalidOpcode(opcode, pc)) => {
            out.push(1);
            out.push(opcode);
            out.extend_from_slice(&pc.to_le_bytes());
        }
    }

    out
}

/// Errors that can occur while restoring a save state byte stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("save state too short: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("bad magic number {0:#010X}")]
    BadMagic(u32),
    #[error("unsupported save state version {0}")]
    UnsupportedVersion(u8),
}

/// A restored CPU snapshot, ready to be written into a fresh `Cpu` by the
/// host (the core exposes no public field setters, by design — see DESIGN.md).
pub struct CpuSnapshot {
    pub registers: (u8, u8, u8, u8, u8, u8, u8, u8),
    pub sp: u16,
    pub pc: u16,
    pub ime: Ime,
    pub mode: CpuMode,
    pub fatal: Option<FaultKind>,
}

pub fn load_cpu_state(bytes: &[u8]) -> Result<CpuSnapshot, LoadError> {
    const HEADER_LEN: usize = 4 + 1 + 8 + 2 + 2 + 1 + 1 + 1;
    if bytes.len() < HEADER_LEN {
        return Err(LoadError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let magic = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
    if magic != MAGIC {
        return Err(LoadError::BadMagic(magic));
    }
    let version = bytes[4];
    if version != VERSION {
        return Err(LoadError::UnsupportedVersion(version));
    }

    let regs = (
        bytes[5], bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11], bytes[12],
    );
    let sp = u16::from_le_bytes(bytes[13..15].try_into().unwrap());
    let pc = u16::from_le_bytes(bytes[15..17].try_into().unwrap());
    let ime = match bytes[17] {
        0 => Ime::Disabled,
        1 => Ime::PendingEnable,
        _ => Ime::Enabled,
    };
    let mode = match bytes[18] {
        1 => CpuMode::Halted,
        2 => CpuMode::Stopped,
        3 => CpuMode::HaltBug,
        _ => CpuMode::Running,
    };
    let fatal = match bytes.get(19) {
        Some(1) if bytes.len() >= 23 => {
            let opcode = bytes[20];
            let fault_pc = u16::from_le_bytes(bytes[21..23].try_into().unwrap());
            Some(FaultKind::InvalidOpcode(opcode, fault_pc))
        }
        _ => None,
    };

    Ok(CpuSnapshot {
        registers: regs,
        sp,
        pc,
        ime,
        mode,
        fatal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_running_cpu_state() {
        let mut cpu = Cpu::new(true);
        cpu.reset();
        let bytes = save_cpu_state(&cpu);
        let snapshot = load_cpu_state(&bytes).unwrap();
        assert_eq!(snapshot.pc, cpu.pc());
        assert_eq!(snapshot.sp, cpu.sp());
        assert_eq!(snapshot.ime, Ime::Disabled);
        assert_eq!(snapshot.mode, CpuMode::Running);
        assert!(snapshot.fatal.is_none());
    }

    #[test]
    fn rejects_truncated_stream() {
        assert!(matches!(
            load_cpu_state(&[1, 2, 3]),
            Err(LoadError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = save_cpu_state(&Cpu::new(true));
        bytes[0] = 0xFF;
        assert!(matches!(load_cpu_state(&bytes), Err(LoadError::BadMagic(_))));
    }
}
