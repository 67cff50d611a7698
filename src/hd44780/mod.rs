//! HD44780 controller driver, 4-bit mode through a PCF8574 expander.
//!
//! One [`Lcd`] exclusively owns the state of one physical display. The
//! driver mirrors the controller's three mode registers (function set,
//! display control, entry mode) in memory; every toggle re-sends the full
//! composite register so the hardware can never diverge from the mirrored
//! value. There is no internal locking: concurrent calls on one instance
//! must be serialized by the caller.

mod commands;
mod ext;

use crate::expander::{Pcf8574, REGISTER_SELECT};
use crate::{I2cBus, LcdError, LcdResult};
use commands::*;
use log::debug;

/// DDRAM base address of each physical row. Hardware constant; rows 2 and 3
/// continue rows 0 and 1 in address space, hence the interleaving.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Character cell size. Most panels are 5x8; some single-row panels carry
/// the taller 5x10 font.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum CharSize {
    #[default]
    Dots5x8,
    Dots5x10,
}

/// Display geometry and addressing, fixed after construction.
#[derive(Debug, Copy, Clone)]
pub struct Config {
    /// 7-bit I2C address of the expander.
    pub addr: u8,
    /// Visible columns per row.
    pub cols: u8,
    /// Physical rows, 1 through 4.
    pub rows: u8,
    pub char_size: CharSize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: 0x27,
            cols: 16,
            rows: 2,
            char_size: CharSize::Dots5x8,
        }
    }
}

/// Driver for one HD44780 display behind a PCF8574 expander.
#[derive(Debug)]
pub struct Lcd<'a> {
    bus: Pcf8574<'a>,
    cols: u8,
    rows: u8,
    /// Function-set register; fixed once the init sequence has run.
    function: u8,
    /// Display-control register: display, cursor and blink bits.
    control: u8,
    /// Entry-mode register: text direction and autoscroll bits.
    entry_mode: u8,
}

impl<'a> Lcd<'a> {
    /// Validates `config`, then runs the controller init sequence and
    /// returns the ready driver. Validation failures surface as
    /// [`LcdError::InvalidConfig`] before any bus traffic.
    pub fn new(bus: &'a mut dyn I2cBus, config: Config) -> LcdResult<Self> {
        if config.cols == 0 {
            return Err(LcdError::InvalidConfig("column count must be at least 1"));
        }
        if config.rows == 0 || config.rows as usize > ROW_OFFSETS.len() {
            return Err(LcdError::InvalidConfig("row count must be between 1 and 4"));
        }

        // 4-bit width is the zero bit; only line count and font vary.
        let mut function = 0;
        if config.rows > 1 {
            function |= TWO_LINE;
        } else if config.char_size == CharSize::Dots5x10 {
            function |= DOTS_5X10;
        }

        let mut lcd = Lcd {
            bus: Pcf8574::new(bus, config.addr),
            cols: config.cols,
            rows: config.rows,
            function,
            control: 0,
            entry_mode: 0,
        };
        lcd.init()?;
        Ok(lcd)
    }

    /// Configured column count.
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Configured row count.
    pub fn rows(&self) -> u8 {
        self.rows
    }

    // The datasheet procedure for forcing the controller out of its unknown
    // power-on state. Strictly linear: each step relies on the state the
    // previous one left behind, so it must never be reordered or shortened.
    fn init(&mut self) -> LcdResult<()> {
        debug!("initializing controller, function set {:#04x}", self.function);

        // The controller may be in 8-bit mode, in 4-bit mode, or halfway
        // through a 4-bit transfer. Three "8-bit mode" half-commands land it
        // in 8-bit mode from any of those, then one more commits to 4-bit.
        for _ in 0..3 {
            self.bus.send_nibble(0x30)?;
        }
        self.bus.send_nibble(0x20)?;

        self.command(FUNCTION_SET | self.function)?;

        self.control = DISPLAY_ON;
        self.command(DISPLAY_CONTROL | self.control)?;

        self.clear()?;

        self.entry_mode = ENTRY_LEFT;
        self.command(ENTRY_MODE_SET | self.entry_mode)?;

        self.home()?;
        debug!("controller ready");
        Ok(())
    }

    fn command(&mut self, value: u8) -> LcdResult<()> {
        self.bus.send_byte(value, 0)
    }

    fn write(&mut self, value: u8) -> LcdResult<()> {
        self.bus.send_byte(value, REGISTER_SELECT)
    }

    /// Clears the whole display and homes the cursor.
    pub fn clear(&mut self) -> LcdResult<()> {
        self.command(CLEAR_DISPLAY)
    }

    /// Moves the cursor to the origin and undoes any display scroll.
    pub fn home(&mut self) -> LcdResult<()> {
        self.command(RETURN_HOME)
    }

    /// Moves the cursor to `col` in `row`. A row past the configured count
    /// clamps to the last row rather than wrapping.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> LcdResult<()> {
        let row = row.min(self.rows - 1);
        self.command(SET_DDRAM_ADDR | (col + ROW_OFFSETS[row as usize]))
    }

    /// Turns the display output on.
    pub fn display(&mut self) -> LcdResult<()> {
        self.control |= DISPLAY_ON;
        self.command(DISPLAY_CONTROL | self.control)
    }

    /// Blanks the display without losing its contents.
    pub fn no_display(&mut self) -> LcdResult<()> {
        self.control &= !DISPLAY_ON;
        self.command(DISPLAY_CONTROL | self.control)
    }

    /// Shows the underline cursor.
    pub fn cursor(&mut self) -> LcdResult<()> {
        self.control |= CURSOR_ON;
        self.command(DISPLAY_CONTROL | self.control)
    }

    /// Hides the underline cursor.
    pub fn no_cursor(&mut self) -> LcdResult<()> {
        self.control &= !CURSOR_ON;
        self.command(DISPLAY_CONTROL | self.control)
    }

    /// Blinks the character cell at the cursor.
    pub fn blink(&mut self) -> LcdResult<()> {
        self.control |= BLINK_ON;
        self.command(DISPLAY_CONTROL | self.control)
    }

    /// Stops the cursor cell blinking.
    pub fn no_blink(&mut self) -> LcdResult<()> {
        self.control &= !BLINK_ON;
        self.command(DISPLAY_CONTROL | self.control)
    }

    /// Shifts the visible window one cell left without touching DDRAM.
    pub fn scroll_display_left(&mut self) -> LcdResult<()> {
        self.command(CURSOR_SHIFT | DISPLAY_MOVE | MOVE_LEFT)
    }

    /// Shifts the visible window one cell right without touching DDRAM.
    pub fn scroll_display_right(&mut self) -> LcdResult<()> {
        self.command(CURSOR_SHIFT | DISPLAY_MOVE | MOVE_RIGHT)
    }

    /// Makes written text flow left to right.
    pub fn left_to_right(&mut self) -> LcdResult<()> {
        self.entry_mode |= ENTRY_LEFT;
        self.command(ENTRY_MODE_SET | self.entry_mode)
    }

    /// Makes written text flow right to left.
    pub fn right_to_left(&mut self) -> LcdResult<()> {
        self.entry_mode &= !ENTRY_LEFT;
        self.command(ENTRY_MODE_SET | self.entry_mode)
    }

    /// Shifts the display on every write, right-justifying text from the
    /// cursor.
    pub fn autoscroll(&mut self) -> LcdResult<()> {
        self.entry_mode |= ENTRY_SHIFT_INCREMENT;
        self.command(ENTRY_MODE_SET | self.entry_mode)
    }

    /// Moves only the cursor on writes.
    pub fn no_autoscroll(&mut self) -> LcdResult<()> {
        self.entry_mode &= !ENTRY_SHIFT_INCREMENT;
        self.command(ENTRY_MODE_SET | self.entry_mode)
    }

    /// Turns the backlight on.
    pub fn backlight(&mut self) -> LcdResult<()> {
        self.bus.set_backlight(true)
    }

    /// Turns the backlight off.
    pub fn no_backlight(&mut self) -> LcdResult<()> {
        self.bus.set_backlight(false)
    }

    /// Uploads a glyph bitmap into one of the eight CGRAM slots, where it
    /// persists until overwritten or the controller resets. `bitmap` holds
    /// one byte per pixel row, low 5 bits significant; fewer than 8 rows
    /// are padded with blank rows. An out-of-range slot or a bitmap taller
    /// than 8 rows is rejected before any hardware write, never masked.
    pub fn create_char(&mut self, slot: u8, bitmap: &[u8]) -> LcdResult<()> {
        if slot > 7 {
            return Err(LcdError::InvalidArgument(
                "glyph slot must be between 0 and 7",
            ));
        }
        if bitmap.len() > 8 {
            return Err(LcdError::InvalidArgument(
                "glyph bitmaps cannot be taller than 8 rows",
            ));
        }

        self.command(SET_CGRAM_ADDR | (slot << 3))?;
        // The controller auto-increments the CGRAM pointer after each data
        // write, so the rows follow without re-addressing.
        for row in 0..8 {
            self.write(bitmap.get(row).copied().unwrap_or(0))?;
        }
        Ok(())
    }

    /// Writes the text at the cursor, one character code per cell, with no
    /// interpretation. Code points above `0xFF` truncate to their low byte;
    /// the controller is byte-oriented.
    pub fn print(&mut self, text: &str) -> LcdResult<()> {
        for ch in text.chars() {
            self.write(ch as u8)?;
        }
        Ok(())
    }

    /// Like [`Lcd::print`], but decodes embedded `{0xHH}` tokens into raw
    /// character-table codes, reaching the glyphs that have no literal
    /// spelling (custom CGRAM slots, the upper character table). Anything
    /// that is not an exact token passes through as literal text.
    pub fn print_ext(&mut self, text: &str) -> LcdResult<()> {
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0;
        while pos < chars.len() {
            match ext::escape_code(&chars[pos..]) {
                Some(code) => {
                    self.write(code)?;
                    pos += 6;
                }
                None => {
                    self.write(chars[pos] as u8)?;
                    pos += 1;
                }
            }
        }
        Ok(())
    }
}
