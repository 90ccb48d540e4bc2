//! Register access for I2C devices with an 8-bit register map.
//!
//! Every helper addresses the device by its 7-bit address, selects a
//! register by writing its number, then reads or writes from there on.
//! Bus errors come back unchanged as the bus's own error type.

use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};

pub fn read_byte<I: I2c>(i2c: &mut I, address: SevenBitAddress, register: u8) -> Result<u8, I::Error> {
    let mut byte = [0u8];
    read_bytes(i2c, address, register, &mut byte)?;
    Ok(byte[0])
}

pub fn write_byte<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    value: u8,
) -> Result<(), I::Error> {
    write_bytes(i2c, address, register, &[value])
}

/// Fills `buf` starting at `register`, with a repeated start between the
/// register select and the read.
pub fn read_bytes<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    buf: &mut [u8],
) -> Result<(), I::Error> {
    i2c.write_read(address, &[register], buf)
}

/// Writes `data` starting at `register` in one transfer.
pub fn write_bytes<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    data: &[u8],
) -> Result<(), I::Error> {
    // adjacent writes in one transaction go out back to back
    i2c.transaction(address, &mut [Operation::Write(&[register]), Operation::Write(data)])
}

/// `bit` counts from the least significant bit and must be below 8.
pub fn read_bit<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    bit: u8,
) -> Result<bool, I::Error> {
    debug_assert!(bit < 8);
    Ok(read_byte(i2c, address, register)? & (1 << bit) != 0)
}

/// Read-modify-write of a single bit. The other bits are written back as read.
pub fn write_bit<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    bit: u8,
    value: bool,
) -> Result<(), I::Error> {
    debug_assert!(bit < 8);
    let byte = read_byte(i2c, address, register)?;
    let byte = if value { byte | (1 << bit) } else { byte & !(1 << bit) };
    write_byte(i2c, address, register, byte)
}

/// The register value with every bit outside `mask` cleared.
pub fn read_bits<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    mask: u8,
) -> Result<u8, I::Error> {
    Ok(read_byte(i2c, address, register)? & mask)
}

/// Overwrites the bits set in `mask` with the same bits of `data`.
pub fn write_bits<I: I2c>(
    i2c: &mut I,
    address: SevenBitAddress,
    register: u8,
    mask: u8,
    data: u8,
) -> Result<(), I::Error> {
    let byte = read_byte(i2c, address, register)?;
    write_byte(i2c, address, register, (byte & !mask) | (data & mask))
}

/// Whether a device acknowledges `address`. Any bus error counts as absent.
pub fn device_responds<I: I2c>(i2c: &mut I, address: SevenBitAddress) -> bool {
    i2c.write(address, &[]).is_ok()
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource};

    use super::*;

    const DEVICE: SevenBitAddress = 0x68;

    /// A device with 256 registers and an auto-incrementing register pointer.
    struct MockBus {
        registers: [u8; 256],
        pointer: u8,
        transactions: usize,
    }

    impl MockBus {
        fn new() -> Self {
            MockBus { registers: [0; 256], pointer: 0, transactions: 0 }
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != DEVICE {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            self.transactions += 1;
            let mut selected = false;
            for operation in operations.iter_mut() {
                match operation {
                    Operation::Write(bytes) => {
                        for &byte in bytes.iter() {
                            if selected {
                                self.registers[self.pointer as usize] = byte;
                                self.pointer = self.pointer.wrapping_add(1);
                            } else {
                                self.pointer = byte;
                                selected = true;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = self.registers[self.pointer as usize];
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_byte_access() {
        let mut bus = MockBus::new();
        bus.registers[0x75] = 0x71;
        assert_eq!(read_byte(&mut bus, DEVICE, 0x75), Ok(0x71));

        write_byte(&mut bus, DEVICE, 0x6B, 0x80).unwrap();
        assert_eq!(bus.registers[0x6B], 0x80);
        assert_eq!(bus.transactions, 2);
    }

    #[test]
    fn test_multi_byte_access_starts_at_register() {
        let mut bus = MockBus::new();
        write_bytes(&mut bus, DEVICE, 0x10, &[1, 2, 3]).unwrap();
        assert_eq!(&bus.registers[0x10..0x13], &[1, 2, 3]);
        assert_eq!(bus.registers[0x0F], 0);
        assert_eq!(bus.registers[0x13], 0);

        let mut buf = [0u8; 2];
        read_bytes(&mut bus, DEVICE, 0x11, &mut buf).unwrap();
        assert_eq!(buf, [2, 3]);
    }

    #[test]
    fn test_single_bits() {
        let mut bus = MockBus::new();
        bus.registers[0x20] = 0b0000_0100;
        assert_eq!(read_bit(&mut bus, DEVICE, 0x20, 2), Ok(true));
        assert_eq!(read_bit(&mut bus, DEVICE, 0x20, 3), Ok(false));

        write_bit(&mut bus, DEVICE, 0x20, 7, true).unwrap();
        assert_eq!(bus.registers[0x20], 0b1000_0100);
        write_bit(&mut bus, DEVICE, 0x20, 2, false).unwrap();
        assert_eq!(bus.registers[0x20], 0b1000_0000);
    }

    #[test]
    fn test_masked_bits_leave_the_rest_alone() {
        let mut bus = MockBus::new();
        bus.registers[0x1A] = 0b1010_1010;
        assert_eq!(read_bits(&mut bus, DEVICE, 0x1A, 0x0F), Ok(0b0000_1010));

        // bits of `data` outside the mask are ignored
        write_bits(&mut bus, DEVICE, 0x1A, 0x0F, 0b1111_0101).unwrap();
        assert_eq!(bus.registers[0x1A], 0b1010_0101);
    }

    #[test]
    fn test_absent_device() {
        let mut bus = MockBus::new();
        assert!(device_responds(&mut bus, DEVICE));
        assert!(!device_responds(&mut bus, 0x42));

        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        assert_eq!(read_byte(&mut bus, 0x42, 0x00), Err(nack));
        assert_eq!(write_bits(&mut bus, 0x42, 0x00, 0xFF, 0x01), Err(nack));
        assert_eq!(bus.transactions, 1);
    }
}
