//! Register-file I²C stand-in for driver unit tests.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

/// 256-byte register file with an auto-incrementing pointer, the way
/// most I²C sensors expose their registers.
pub struct FakeI2c {
    regs: [u8; 256],
    pointer: u8,
    /// Make every transaction fail with a bus error.
    pub fail: bool,
}

impl FakeI2c {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            pointer: 0,
            fail: false,
        }
    }

    pub fn set(&mut self, reg: u8, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.regs[usize::from(reg.wrapping_add(i as u8))] = *b;
        }
    }

    pub fn get(&self, reg: u8) -> u8 {
        self.regs[usize::from(reg)]
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, data)) = bytes.split_first() {
                        self.pointer = reg;
                        self.set(reg, data);
                    }
                }
                Operation::Read(buf) => {
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = self.regs[usize::from(self.pointer.wrapping_add(i as u8))];
                    }
                }
            }
        }
        Ok(())
    }
}
