//! Test doubles: a recording I2C bus and a decoder that folds the raw
//! expander byte log back into controller transactions.

use crate::expander::{ENABLE, REGISTER_SELECT};
use crate::hd44780::{Config, Lcd};
use crate::{I2cBus, LcdError, LcdResult};

#[derive(Debug, Default)]
pub(crate) struct MockBus {
    /// Every `(addr, byte)` the driver wrote, in order.
    pub(crate) writes: Vec<(u8, u8)>,
    /// When set, the write with this index fails with a broken pipe.
    pub(crate) fail_at: Option<usize>,
}

impl I2cBus for MockBus {
    fn write(&mut self, addr: u8, byte: u8) -> LcdResult<()> {
        if self.fail_at == Some(self.writes.len()) {
            return Err(LcdError::Io(std::io::ErrorKind::BrokenPipe));
        }
        self.writes.push((addr, byte));
        Ok(())
    }
}

/// Runs `op` against a freshly initialized driver and returns only the raw
/// writes the operation itself produced, with the init preamble stripped.
pub(crate) fn writes_for(
    config: Config,
    op: impl FnOnce(&mut Lcd) -> LcdResult<()>,
) -> Vec<(u8, u8)> {
    let mut baseline = MockBus::default();
    Lcd::new(&mut baseline, config).unwrap();
    let skip = baseline.writes.len();

    let mut bus = MockBus::default();
    {
        let mut lcd = Lcd::new(&mut bus, config).unwrap();
        op(&mut lcd).unwrap();
    }
    bus.writes.split_off(skip)
}

/// Folds nibble frames back into `(byte, rs)` transactions.
pub(crate) fn decode(writes: &[(u8, u8)]) -> Vec<(u8, bool)> {
    let nibbles = decode_nibbles(writes);
    assert!(
        nibbles.len() % 2 == 0,
        "every transaction is two nibble frames"
    );
    nibbles
        .chunks(2)
        .map(|pair| {
            let (hi, hi_rs) = pair[0];
            let (lo, lo_rs) = pair[1];
            assert_eq!(hi_rs, lo_rs, "register select changed mid-byte");
            (hi | (lo >> 4), hi_rs)
        })
        .collect()
}

/// Checks the present / EN-high / EN-low shape of each frame and returns
/// the presented nibble (in the high half) and its RS bit.
pub(crate) fn decode_nibbles(writes: &[(u8, u8)]) -> Vec<(u8, bool)> {
    assert!(
        writes.len() % 3 == 0,
        "every nibble frame is three raw writes"
    );
    writes
        .chunks(3)
        .map(|frame| {
            let presented = frame[0].1;
            assert_eq!(frame[1].1, presented | ENABLE, "EN must rise second");
            assert_eq!(frame[2].1, presented & !ENABLE, "EN must fall third");
            (presented & 0xF0, presented & REGISTER_SELECT != 0)
        })
        .collect()
}
