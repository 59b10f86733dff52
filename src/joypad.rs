/// A physical Game Boy button. The host translates whatever input source it
/// has (keyboard, gamepad, network) into these before calling into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

/// Represents the state of the Game Boy's buttons.
/// True = pressed, False = released (internal representation)
#[derive(Clone, Debug, Default)]
pub struct JoypadState {
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
}

/// Manages Joypad state and interaction with the P1 register.
#[derive(Clone, Debug, Default)]
pub struct Joypad {
    state: JoypadState,
    // Store the P1 register's selectable bits (written by the game)
    p1_register_selection: u8, // Bits 4 and 5
}

impl Joypad {
    pub fn new() -> Self {
        Joypad {
            state: JoypadState::default(),
            // P1 defaults to 0xCF (often, depends post-bootrom),
            // means bits 4 and 5 are high (no selection) initially.
            // Store only the writable bits 4,5.
            p1_register_selection: 0x30,
        }
    }

    /// Reads the P1 (Joypad) register based on current state and selection.
    pub fn read_p1(&self) -> u8 {
        let mut joypad_value = 0x0F; // Start with lower nibble high (released)

        if self.p1_register_selection & 0x20 == 0 {
            // Bit 5 Low: Select Action buttons (A, B, Select, Start)
            if self.state.a {
                joypad_value &= 0b1110;
            }
            if self.state.b {
                joypad_value &= 0b1101;
            }
            if self.state.select {
                joypad_value &= 0b1011;
            }
            if self.state.start {
                joypad_value &= 0b0111;
            }
        }
        if self.p1_register_selection & 0x10 == 0 {
            // Bit 4 Low: Select Direction buttons (Right, Left, Up, Down)
            if self.state.right {
                joypad_value &= 0b1110;
            }
            if self.state.left {
                joypad_value &= 0b1101;
            }
            if self.state.up {
                joypad_value &= 0b1011;
            }
            if self.state.down {
                joypad_value &= 0b0111;
            }
        }

        // Combine input bits (0-3) with selection bits (4-5) and unused high bits (reads 1)
        joypad_value | self.p1_register_selection | 0xC0
    }

    /// Writes to the P1 (Joypad) register (only bits 4, 5 are writable).
    pub fn write_p1(&mut self, value: u8) {
        self.p1_register_selection = value & 0x30;
    }

    fn set_pressed(&mut self, button: Button, pressed: bool) -> bool {
        let (slot, group_selected) = match button {
            Button::Right => (&mut self.state.right, self.p1_register_selection & 0x10 == 0),
            Button::Left => (&mut self.state.left, self.p1_register_selection & 0x10 == 0),
            Button::Up => (&mut self.state.up, self.p1_register_selection & 0x10 == 0),
            Button::Down => (&mut self.state.down, self.p1_register_selection & 0x10 == 0),
            Button::A => (&mut self.state.a, self.p1_register_selection & 0x20 == 0),
            Button::B => (&mut self.state.b, self.p1_register_selection & 0x20 == 0),
            Button::Select => (&mut self.state.select, self.p1_register_selection & 0x20 == 0),
            Button::Start => (&mut self.state.start, self.p1_register_selection & 0x20 == 0),
        };
        let newly_pressed = pressed && !*slot;
        *slot = pressed;
        newly_pressed && group_selected
    }

    /// Handles a button press. Returns true if a Joypad interrupt should be requested
    /// (the button transitioned released->pressed while its group is selected).
    pub fn key_down(&mut self, button: Button) -> bool {
        self.set_pressed(button, true)
    }

    /// Handles a button release.
    pub fn key_up(&mut self, button: Button) {
        self.set_pressed(button, false);
    }

    pub fn get_state(&self) -> &JoypadState {
        &self.state
    }
}
