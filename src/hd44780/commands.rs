//! HD44780 instruction words and their flag bits, fixed by the datasheet.

pub(crate) const CLEAR_DISPLAY: u8 = 0b0000_0001;
pub(crate) const RETURN_HOME: u8 = 0b0000_0010;
pub(crate) const ENTRY_MODE_SET: u8 = 0b0000_0100;
pub(crate) const DISPLAY_CONTROL: u8 = 0b0000_1000;
pub(crate) const CURSOR_SHIFT: u8 = 0b0001_0000;
pub(crate) const FUNCTION_SET: u8 = 0b0010_0000;
pub(crate) const SET_CGRAM_ADDR: u8 = 0b0100_0000;
pub(crate) const SET_DDRAM_ADDR: u8 = 0b1000_0000;

// entry mode set flags; the cleared bit means the opposite direction
pub(crate) const ENTRY_LEFT: u8 = 0b0000_0010;
pub(crate) const ENTRY_SHIFT_INCREMENT: u8 = 0b0000_0001;

// display control flags
pub(crate) const DISPLAY_ON: u8 = 0b0000_0100;
pub(crate) const CURSOR_ON: u8 = 0b0000_0010;
pub(crate) const BLINK_ON: u8 = 0b0000_0001;

// cursor/display shift flags
pub(crate) const DISPLAY_MOVE: u8 = 0b0000_1000;
pub(crate) const MOVE_RIGHT: u8 = 0b0000_0100;
pub(crate) const MOVE_LEFT: u8 = 0b0000_0000;

// function set flags; 4-bit width, one line and 5x8 font are the zero bits
pub(crate) const TWO_LINE: u8 = 0b0000_1000;
pub(crate) const DOTS_5X10: u8 = 0b0000_0100;
