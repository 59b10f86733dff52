//! APU register file and channel state machines (NR10-NR52, wave RAM).
//!
//! This models the digital side of the four channels — length counters,
//! volume envelopes, the channel 1 sweep unit, and trigger/DAC-off behavior —
//! well enough that a host's mixer can read back accurate channel-active and
//! register state. Actual sample synthesis/output is a host concern.

const CPU_FREQ: u32 = 4_194_304;
const FRAME_SEQUENCER_FREQ_HZ: u32 = 512;
const FRAME_SEQUENCER_DIVIDER: u32 = CPU_FREQ / FRAME_SEQUENCER_FREQ_HZ;

const NR10_ADDR: u16 = 0xFF10;
const NR11_ADDR: u16 = 0xFF11;
const NR12_ADDR: u16 = 0xFF12;
const NR13_ADDR: u16 = 0xFF13;
const NR14_ADDR: u16 = 0xFF14;

const NR21_ADDR: u16 = 0xFF16;
const NR22_ADDR: u16 = 0xFF17;
const NR23_ADDR: u16 = 0xFF18;
const NR24_ADDR: u16 = 0xFF19;

const NR30_ADDR: u16 = 0xFF1A;
const NR31_ADDR: u16 = 0xFF1B;
const NR32_ADDR: u16 = 0xFF1C;
const NR33_ADDR: u16 = 0xFF1D;
const NR34_ADDR: u16 = 0xFF1E;
pub const WAVE_RAM_START: u16 = 0xFF30;
pub const WAVE_RAM_END: u16 = 0xFF3F;

const NR41_ADDR: u16 = 0xFF20;
const NR42_ADDR: u16 = 0xFF21;
const NR43_ADDR: u16 = 0xFF22;
const NR44_ADDR: u16 = 0xFF23;

const NR50_ADDR: u16 = 0xFF24;
const NR51_ADDR: u16 = 0xFF25;
const NR52_ADDR: u16 = 0xFF26;

/// Clocked at 256 Hz (frame sequencer steps 0,2,4,6). Ticking it to zero with
/// `enabled` set silences the channel.
#[derive(Clone, Copy, Debug, Default)]
struct LengthCounter {
    enabled: bool,
    counter: u16,
}

impl LengthCounter {
    fn load(&mut self, full_scale: u16, raw: u8) {
        let len = raw as u16 & (full_scale - 1);
        self.counter = full_scale - len;
    }
    fn trigger_reload_if_expired(&mut self, full_scale: u16) {
        if self.counter == 0 {
            self.counter = full_scale;
        }
    }
    /// Returns true if the channel should be silenced.
    fn clock(&mut self) -> bool {
        if !self.enabled || self.counter == 0 {
            return false;
        }
        self.counter -= 1;
        self.counter == 0
    }
}

/// Volume envelope, clocked at 64 Hz (frame sequencer step 7).
#[derive(Clone, Copy, Debug, Default)]
struct Envelope {
    initial_volume: u8,
    increasing: bool,
    period: u8,
    timer: u8,
    volume: u8,
}

impl Envelope {
    fn load(&mut self, nrx2: u8) {
        self.initial_volume = nrx2 >> 4;
        self.increasing = nrx2 & 0x08 != 0;
        self.period = nrx2 & 0x07;
    }
    fn dac_enabled(nrx2: u8) -> bool {
        nrx2 & 0xF8 != 0
    }
    fn trigger(&mut self) {
        self.volume = self.initial_volume;
        self.timer = self.period;
    }
    fn clock(&mut self) {
        if self.period == 0 {
            return;
        }
        if self.timer > 0 {
            self.timer -= 1;
        }
        if self.timer == 0 {
            self.timer = self.period;
            if self.increasing && self.volume < 15 {
                self.volume += 1;
            } else if !self.increasing && self.volume > 0 {
                self.volume -= 1;
            }
        }
    }
}

/// Channel 1's frequency sweep unit, clocked at 128 Hz.
#[derive(Clone, Copy, Debug, Default)]
struct Sweep {
    period: u8,
    negate: bool,
    shift: u8,
    timer: u8,
    shadow_freq: u16,
    enabled: bool,
}

impl Sweep {
    fn load(&mut self, nr10: u8) {
        self.period = (nr10 >> 4) & 0x07;
        self.negate = nr10 & 0x08 != 0;
        self.shift = nr10 & 0x07;
    }
    fn calculate(&self, freq: u16) -> u16 {
        let delta = freq >> self.shift;
        if self.negate {
            freq.wrapping_sub(delta)
        } else {
            freq.wrapping_add(delta)
        }
    }
    fn trigger(&mut self, current_freq: u16) -> bool {
        self.shadow_freq = current_freq;
        self.timer = if self.period == 0 { 8 } else { self.period };
        self.enabled = self.period != 0 || self.shift != 0;
        if self.shift != 0 {
            self.calculate(self.shadow_freq) <= 2047
        } else {
            true
        }
    }
    /// Returns `Some(new_freq)` on a successful sweep, or `None` if the
    /// channel should be disabled by frequency overflow.
    fn clock(&mut self) -> Option<Option<u16>> {
        if !self.enabled || self.timer == 0 {
            return None;
        }
        self.timer -= 1;
        if self.timer != 0 {
            return None;
        }
        self.timer = if self.period == 0 { 8 } else { self.period };
        if self.period == 0 {
            return None;
        }
        let new_freq = self.calculate(self.shadow_freq);
        if new_freq > 2047 {
            return Some(None);
        }
        if self.shift != 0 {
            self.shadow_freq = new_freq;
        }
        Some(Some(new_freq))
    }
}

const DUTY_TABLE: [[u8; 8]; 4] = [
    [0, 0, 0, 0, 0, 0, 0, 1], // 12.5%
    [1, 0, 0, 0, 0, 0, 0, 1], // 25%
    [1, 0, 0, 0, 0, 1, 1, 1], // 50%
    [0, 1, 1, 1, 1, 1, 1, 0], // 75%
];

#[derive(Clone, Copy, Debug, Default)]
struct PulseChannel {
    active: bool,
    length: LengthCounter,
    envelope: Envelope,
    sweep: Sweep, // unused (all-zero) on channel 2
    frequency: u16,
    freq_timer: i32,
    duty_pos: u8,
}

impl PulseChannel {
    fn step_waveform(&mut self, cycles: u32, duty: u8) {
        self.freq_timer -= cycles as i32;
        while self.freq_timer <= 0 {
            let period = (2048 - self.frequency as i32).max(1) * 4;
            self.freq_timer += period;
            self.duty_pos = (self.duty_pos + 1) % 8;
        }
        let _ = duty;
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct WaveChannel {
    active: bool,
    dac_enabled: bool,
    length: LengthCounter,
    frequency: u16,
    freq_timer: i32,
    position: u8, // 0..32, two samples per wave RAM byte
}

impl WaveChannel {
    fn step_waveform(&mut self, cycles: u32) {
        self.freq_timer -= cycles as i32;
        while self.freq_timer <= 0 {
            let period = (2048 - self.frequency as i32).max(1) * 2;
            self.freq_timer += period;
            self.position = (self.position + 1) % 32;
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct NoiseChannel {
    active: bool,
    length: LengthCounter,
    envelope: Envelope,
    lfsr: u16,
    freq_timer: i32,
}

const NOISE_DIVISORS: [i32; 8] = [8, 16, 32, 48, 64, 80, 96, 112];

impl NoiseChannel {
    fn step_waveform(&mut self, cycles: u32, nr43: u8) {
        if self.lfsr == 0 {
            self.lfsr = 0x7FFF;
        }
        self.freq_timer -= cycles as i32;
        while self.freq_timer <= 0 {
            let divisor = NOISE_DIVISORS[(nr43 & 0x07) as usize];
            let shift = nr43 >> 4;
            self.freq_timer += divisor << shift;
            let xor_bit = (self.lfsr & 0x01) ^ ((self.lfsr >> 1) & 0x01);
            self.lfsr >>= 1;
            self.lfsr |= xor_bit << 14;
            if nr43 & 0x08 != 0 {
                self.lfsr &= !(1 << 6);
                self.lfsr |= xor_bit << 6;
            }
        }
    }
}

pub struct Apu {
    cycle_counter: u32,
    frame_sequencer_step: u8,

    apu_enabled: bool,
    nr50: u8,
    nr51: u8,

    // Raw mirrored register bytes for fields with no dedicated state above
    // (sweep shift/period, duty, frequency lo/hi, etc.) — read back with the
    // read-only-bit masks the real hardware applies.
    nr10: u8,
    nr11: u8,
    nr12: u8,
    nr13: u8,
    nr14: u8,
    nr21: u8,
    nr22: u8,
    nr23: u8,
    nr24: u8,
    nr30: u8,
    nr32: u8,
    nr33: u8,
    nr34: u8,
    nr42: u8,
    nr43: u8,
    nr44: u8,

    wave_ram: [u8; 16],

    ch1: PulseChannel,
    ch2: PulseChannel,
    ch3: WaveChannel,
    ch4: NoiseChannel,
}

impl Apu {
    pub fn new() -> Self {
        Apu {
            cycle_counter: 0,
            frame_sequencer_step: 0,
            apu_enabled: false,
            nr50: 0x77,
            nr51: 0xF3,
            nr10: 0x80,
            nr11: 0xBF,
            nr12: 0xF3,
            nr13: 0xFF,
            nr14: 0xBF,
            nr21: 0x3F,
            nr22: 0x00,
            nr23: 0xFF,
            nr24: 0xBF,
            nr30: 0x7F,
            nr32: 0x9F,
            nr33: 0xFF,
            nr34: 0xBF,
            nr42: 0x00,
            nr43: 0x00,
            nr44: 0xBF,
            wave_ram: [0; 16],
            ch1: PulseChannel::default(),
            ch2: PulseChannel::default(),
            ch3: WaveChannel::default(),
            ch4: NoiseChannel::default(),
        }
    }

    /// Advances the frame sequencer by `cycles` T-cycles, clocking length
    /// counters (256 Hz), the channel 1 sweep unit (128 Hz), and volume
    /// envelopes (64 Hz) on their respective steps.
    pub fn step(&mut self, cycles: u32) {
        if !self.apu_enabled {
            return;
        }
        let duty1 = (self.nr11 >> 6) & 0x03;
        let duty2 = (self.nr21 >> 6) & 0x03;
        self.ch1.step_waveform(cycles, duty1);
        self.ch2.step_waveform(cycles, duty2);
        self.ch3.step_waveform(cycles);
        self.ch4.step_waveform(cycles, self.nr43);

        self.cycle_counter += cycles;
        while self.cycle_counter >= FRAME_SEQUENCER_DIVIDER {
            self.cycle_counter -= FRAME_SEQUENCER_DIVIDER;
            match self.frame_sequencer_step {
                0 | 4 => self.clock_length_counters(),
                2 | 6 => {
                    self.clock_length_counters();
                    self.clock_sweep();
                }
                7 => self.clock_envelopes(),
                _ => {}
            }
            self.frame_sequencer_step = (self.frame_sequencer_step + 1) % 8;
        }
    }

    fn clock_length_counters(&mut self) {
        if self.ch1.length.clock() {
            self.ch1.active = false;
        }
        if self.ch2.length.clock() {
            self.ch2.active = false;
        }
        if self.ch3.length.clock() {
            self.ch3.active = false;
        }
        if self.ch4.length.clock() {
            self.ch4.active = false;
        }
    }

    fn clock_sweep(&mut self) {
        if let Some(result) = self.ch1.sweep.clock() {
            match result {
                Some(new_freq) => {
                    self.ch1.frequency = new_freq;
                    self.nr13 = (new_freq & 0xFF) as u8;
                    self.nr14 = (self.nr14 & !0x07) | ((new_freq >> 8) as u8 & 0x07);
                }
                None => self.ch1.active = false,
            }
        }
    }

    fn clock_envelopes(&mut self) {
        if self.ch1.active {
            self.ch1.envelope.clock();
        }
        if self.ch2.active {
            self.ch2.envelope.clock();
        }
        if self.ch4.active {
            self.ch4.envelope.clock();
        }
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            NR10_ADDR => self.nr10 | 0x80,
            NR11_ADDR => self.nr11 | 0x3F,
            NR12_ADDR => self.nr12,
            NR13_ADDR => 0xFF,
            NR14_ADDR => self.nr14 | 0xBF,

            NR21_ADDR => self.nr21 | 0x3F,
            NR22_ADDR => self.nr22,
            NR23_ADDR => 0xFF,
            NR24_ADDR => self.nr24 | 0xBF,

            NR30_ADDR => self.nr30 | 0x7F,
            NR31_ADDR => 0xFF,
            NR32_ADDR => self.nr32 | 0x9F,
            NR33_ADDR => 0xFF,
            NR34_ADDR => self.nr34 | 0xBF,

            NR41_ADDR => 0xFF,
            NR42_ADDR => self.nr42,
            NR43_ADDR => self.nr43,
            NR44_ADDR => self.nr44 | 0xBF,

            NR50_ADDR => self.nr50,
            NR51_ADDR => self.nr51,
            NR52_ADDR => {
                let mut nr52 = 0u8;
                if self.apu_enabled {
                    nr52 |= 0x80;
                }
                if self.ch1.active {
                    nr52 |= 0x01;
                }
                if self.ch2.active {
                    nr52 |= 0x02;
                }
                if self.ch3.active {
                    nr52 |= 0x04;
                }
                if self.ch4.active {
                    nr52 |= 0x08;
                }
                nr52 | 0x70
            }
            WAVE_RAM_START..=WAVE_RAM_END => self.wave_ram[(addr - WAVE_RAM_START) as usize],
            _ => 0xFF,
        }
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        if addr == NR52_ADDR {
            let was_enabled = self.apu_enabled;
            self.apu_enabled = value & 0x80 != 0;
            if was_enabled && !self.apu_enabled {
                self.power_off();
            }
            return;
        }

        if (WAVE_RAM_START..=WAVE_RAM_END).contains(&addr) {
            self.wave_ram[(addr - WAVE_RAM_START) as usize] = value;
            return;
        }

        if !self.apu_enabled {
            // Length counters keep running (and can be reloaded) on real
            // hardware even while NR52.power = 0; everything else is blocked.
            match addr {
                NR11_ADDR => self.ch1.length.load(64, value & 0x3F),
                NR21_ADDR => self.ch2.length.load(64, value & 0x3F),
                NR31_ADDR => self.ch3.length.load(256, value),
                NR41_ADDR => self.ch4.length.load(64, value & 0x3F),
                _ => {}
            }
            return;
        }

        match addr {
            NR10_ADDR => {
                self.nr10 = value;
                self.ch1.sweep.load(value);
            }
            NR11_ADDR => {
                self.nr11 = value;
                self.ch1.length.load(64, value & 0x3F);
            }
            NR12_ADDR => {
                self.nr12 = value;
                self.ch1.envelope.load(value);
                if !Envelope::dac_enabled(value) {
                    self.ch1.active = false;
                }
            }
            NR13_ADDR => {
                self.nr13 = value;
                self.ch1.frequency = (self.ch1.frequency & 0x700) | value as u16;
            }
            NR14_ADDR => {
                self.nr14 = value;
                self.ch1.frequency = (self.ch1.frequency & 0xFF) | ((value as u16 & 0x07) << 8);
                self.ch1.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.trigger_ch1();
                }
            }

            NR21_ADDR => {
                self.nr21 = value;
                self.ch2.length.load(64, value & 0x3F);
            }
            NR22_ADDR => {
                self.nr22 = value;
                self.ch2.envelope.load(value);
                if !Envelope::dac_enabled(value) {
                    self.ch2.active = false;
                }
            }
            NR23_ADDR => {
                self.nr23 = value;
                self.ch2.frequency = (self.ch2.frequency & 0x700) | value as u16;
            }
            NR24_ADDR => {
                self.nr24 = value;
                self.ch2.frequency = (self.ch2.frequency & 0xFF) | ((value as u16 & 0x07) << 8);
                self.ch2.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.trigger_ch2();
                }
            }

            NR30_ADDR => {
                self.nr30 = value;
                self.ch3.dac_enabled = value & 0x80 != 0;
                if !self.ch3.dac_enabled {
                    self.ch3.active = false;
                }
            }
            NR31_ADDR => self.ch3.length.load(256, value),
            NR32_ADDR => self.nr32 = value,
            NR33_ADDR => {
                self.nr33 = value;
                self.ch3.frequency = (self.ch3.frequency & 0x700) | value as u16;
            }
            NR34_ADDR => {
                self.nr34 = value;
                self.ch3.frequency = (self.ch3.frequency & 0xFF) | ((value as u16 & 0x07) << 8);
                self.ch3.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.trigger_ch3();
                }
            }

            NR41_ADDR => self.ch4.length.load(64, value & 0x3F),
            NR42_ADDR => {
                self.nr42 = value;
                self.ch4.envelope.load(value);
                if !Envelope::dac_enabled(value) {
                    self.ch4.active = false;
                }
            }
            NR43_ADDR => self.nr43 = value,
            NR44_ADDR => {
                self.nr44 = value;
                self.ch4.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.trigger_ch4();
                }
            }

            NR50_ADDR => self.nr50 = value,
            NR51_ADDR => self.nr51 = value,
            _ => {}
        }
    }

    fn trigger_ch1(&mut self) {
        self.ch1.length.trigger_reload_if_expired(64);
        self.ch1.envelope.trigger();
        self.ch1.freq_timer = (2048 - self.ch1.frequency as i32).max(1) * 4;
        self.ch1.active = self.ch1.sweep.trigger(self.ch1.frequency) && Envelope::dac_enabled(self.nr12);
    }
    fn trigger_ch2(&mut self) {
        self.ch2.length.trigger_reload_if_expired(64);
        self.ch2.envelope.trigger();
        self.ch2.freq_timer = (2048 - self.ch2.frequency as i32).max(1) * 4;
        self.ch2.active = Envelope::dac_enabled(self.nr22);
    }
    fn trigger_ch3(&mut self) {
        self.ch3.length.trigger_reload_if_expired(256);
        self.ch3.freq_timer = (2048 - self.ch3.frequency as i32).max(1) * 2;
        self.ch3.position = 0;
        self.ch3.active = self.ch3.dac_enabled;
    }
    fn trigger_ch4(&mut self) {
        self.ch4.length.trigger_reload_if_expired(64);
        self.ch4.envelope.trigger();
        self.ch4.lfsr = 0x7FFF;
        self.ch4.active = Envelope::dac_enabled(self.nr42);
    }

    fn power_off(&mut self) {
        log::info!("APU powered off: resetting registers and channel state");
        self.cycle_counter = 0;
        self.frame_sequencer_step = 0;
        self.nr10 = 0;
        self.nr11 = 0;
        self.nr12 = 0;
        self.nr13 = 0;
        self.nr14 = 0;
        self.nr21 = 0;
        self.nr22 = 0;
        self.nr23 = 0;
        self.nr24 = 0;
        self.nr30 = 0;
        self.nr32 = 0;
        self.nr33 = 0;
        self.nr34 = 0;
        self.nr42 = 0;
        self.nr43 = 0;
        self.nr44 = 0;
        self.ch1 = PulseChannel::default();
        self.ch2 = PulseChannel::default();
        self.ch3 = WaveChannel::default();
        self.ch4 = NoiseChannel::default();
        // Wave RAM and NR50/NR51 survive a power-off on real hardware.
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

/// One of the four DMG sound channels, for [`Apu::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Pulse1,
    Pulse2,
    Wave,
    Noise,
}

impl Apu {
    /// Renders the current instantaneous output of one channel as a signed
    /// sample, `0` when the channel is inactive. This is an optional internal
    /// render path — the spec leaves sample mixing and output to the host's
    /// own sink; nothing in this crate calls it.
    pub fn sample(&self, channel: Channel) -> i16 {
        match channel {
            Channel::Pulse1 => {
                if !self.ch1.active {
                    return 0;
                }
                let duty = (self.nr11 >> 6) & 0x03;
                let bit = DUTY_TABLE[duty as usize][self.ch1.duty_pos as usize];
                pulse_sample(bit, self.ch1.envelope.volume)
            }
            Channel::Pulse2 => {
                if !self.ch2.active {
                    return 0;
                }
                let duty = (self.nr21 >> 6) & 0x03;
                let bit = DUTY_TABLE[duty as usize][self.ch2.duty_pos as usize];
                pulse_sample(bit, self.ch2.envelope.volume)
            }
            Channel::Wave => {
                if !self.ch3.active {
                    return 0;
                }
                let byte = self.wave_ram[(self.ch3.position / 2) as usize];
                let nibble = if self.ch3.position % 2 == 0 {
                    byte >> 4
                } else {
                    byte & 0x0F
                };
                let shift = match (self.nr32 >> 5) & 0x03 {
                    0 => 4, // mute
                    1 => 0, // 100%
                    2 => 1, // 50%
                    _ => 2, // 25%
                };
                ((nibble >> shift) as i16 - 8) * 256
            }
            Channel::Noise => {
                if !self.ch4.active {
                    return 0;
                }
                let bit = (!self.ch4.lfsr) & 0x01;
                pulse_sample(bit as u8, self.ch4.envelope.volume)
            }
        }
    }
}

fn pulse_sample(bit: u8, volume: u8) -> i16 {
    if bit != 0 {
        volume as i16 * 256
    } else {
        -(volume as i16 * 256)
    }
}

/// A destination for synthesized PCM samples. The core ships only
/// [`NullSink`]; a host that wants audio output implements this over its
/// own mixer/device.
pub trait AudioSink {
    fn submit(&mut self, samples: &[(i16, i16)]);
}

/// An `AudioSink` that discards everything, for tests and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn submit(&mut self, _samples: &[(i16, i16)]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nr52_reports_channel_active_after_trigger() {
        let mut apu = Apu::new();
        apu.write_byte(NR52_ADDR, 0x80); // power on
        apu.write_byte(NR12_ADDR, 0xF0); // max volume, DAC on
        apu.write_byte(NR14_ADDR, 0x80); // trigger
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x01, 0x01);
    }

    #[test]
    fn dac_off_prevents_trigger_from_activating_channel() {
        let mut apu = Apu::new();
        apu.write_byte(NR52_ADDR, 0x80);
        apu.write_byte(NR12_ADDR, 0x00); // DAC off (top 5 bits zero)
        apu.write_byte(NR14_ADDR, 0x80); // trigger
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x01, 0x00);
    }

    #[test]
    fn length_counter_silences_channel_when_expired() {
        let mut apu = Apu::new();
        apu.write_byte(NR52_ADDR, 0x80);
        apu.write_byte(NR12_ADDR, 0xF0);
        apu.write_byte(NR11_ADDR, 0x3F); // length load = 63 -> counter = 1
        apu.write_byte(NR14_ADDR, 0xC0); // length-enable + trigger
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x01, 0x01);

        // One 256 Hz length clock (frame sequencer steps 0,2,4,6) expires it.
        apu.step(FRAME_SEQUENCER_DIVIDER);
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x01, 0x00);
    }

    #[test]
    fn length_counter_write_accepted_while_powered_off() {
        let mut apu = Apu::new();
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x80, 0x00); // starts powered off
        apu.write_byte(NR11_ADDR, 0x3F); // length load = 63 -> counter = 1, should not be dropped

        apu.write_byte(NR52_ADDR, 0x80); // power on
        apu.write_byte(NR12_ADDR, 0xF0);
        apu.write_byte(NR14_ADDR, 0xC0); // length-enable + trigger
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x01, 0x01);

        apu.step(FRAME_SEQUENCER_DIVIDER);
        assert_eq!(apu.read_byte(NR52_ADDR) & 0x01, 0x00); // the pre-loaded counter expired
    }

    #[test]
    fn sample_is_zero_for_inactive_channel() {
        let apu = Apu::new();
        assert_eq!(apu.sample(Channel::Pulse1), 0);
        assert_eq!(apu.sample(Channel::Wave), 0);
    }

    #[test]
    fn sample_is_nonzero_for_active_pulse_channel() {
        let mut apu = Apu::new();
        apu.write_byte(NR52_ADDR, 0x80);
        apu.write_byte(NR12_ADDR, 0xF0);
        apu.write_byte(NR14_ADDR, 0x80);
        assert_ne!(apu.sample(Channel::Pulse1), 0);
    }

    #[test]
    fn null_sink_accepts_samples_without_panicking() {
        let mut sink = NullSink;
        sink.submit(&[(100, -100), (0, 0)]);
    }

    #[test]
    fn power_off_clears_registers_but_not_wave_ram() {
        let mut apu = Apu::new();
        apu.write_byte(NR52_ADDR, 0x80);
        apu.write_byte(WAVE_RAM_START, 0xAB);
        apu.write_byte(NR12_ADDR, 0xF0);
        apu.write_byte(NR52_ADDR, 0x00); // power off
        assert_eq!(apu.read_byte(NR12_ADDR), 0x00);
        assert_eq!(apu.read_byte(WAVE_RAM_START), 0xAB);
    }
}
