//! BIF dispatcher: translates a BIF id plus register-held arguments into a
//! HAL call, re-validating argument values against domain ranges.

use crate::consts::*;
use crate::error::Status;
use crate::hal::Hal;
use crate::vm::Vm;

/// Closed set of built-in functions callable via `CALL_BIF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum Bif {
    GpioWrite = 1,
    PwmSetDuty = 2,
    I2cReadReg = 3,
    MonotonicMs = 4,
    GpioRead = 5,
    I2cWriteReg = 6,
    PwmConfig = 7,
}

impl Bif {
    /// Required `argc` for this BIF.
    const fn arity(self) -> usize {
        match self {
            Bif::GpioWrite => 2,
            Bif::PwmSetDuty => 2,
            Bif::I2cReadReg => 3,
            Bif::MonotonicMs => 0,
            Bif::GpioRead => 1,
            Bif::I2cWriteReg => 4,
            Bif::PwmConfig => 2,
        }
    }
}

fn in_range(value: i32, lo: i32, hi: i32) -> bool {
    value >= lo && value <= hi
}

impl<'p, H: Hal> Vm<'p, H> {
    /// Dispatch one BIF call. `argv` holds register *indices*; argument
    /// values are read from those registers and re-validated here even
    /// though the mailbox already validated any command they originated
    /// from, per the BIF layer's explicit precondition contract.
    ///
    /// `dst` is left unmodified on any error.
    pub(crate) fn call_bif(&mut self, bif_id: u8, argc: usize, argv: &[usize], dst: usize) -> Result<(), Status> {
        let bif = Bif::from_repr(bif_id).ok_or(Status::BadBif)?;
        if argc != bif.arity() {
            return Err(Status::BadArgc);
        }
        let mut v = [0i32; MAX_BIF_ARGC];
        for (slot, &r) in v.iter_mut().zip(argv.iter()) {
            *slot = self.registers[r];
        }

        let result: Result<i32, Status> = match bif {
            Bif::GpioWrite => {
                let (pin, level) = (v[0], v[1]);
                if !in_range(pin, 0, GPIO_MAX_PIN) || (level != 0 && level != 1) {
                    return Err(Status::BadArgument);
                }
                Ok(self.hal.gpio_write(pin as u8, level as u8))
            }
            Bif::PwmSetDuty => {
                let (channel, permille) = (v[0], v[1]);
                if !in_range(channel, 0, PWM_MAX_CHANNEL) || !in_range(permille, 0, PWM_MAX_PERMILLE) {
                    return Err(Status::BadArgument);
                }
                Ok(self.hal.pwm_set_duty(channel as u8, permille as u16))
            }
            Bif::I2cReadReg => {
                let (bus, addr, reg) = (v[0], v[1], v[2]);
                if !in_range(bus, 0, I2C_MAX_BUS) || !in_range(addr, 0, I2C_MAX_ADDR) || !in_range(reg, 0, U8_MAX) {
                    return Err(Status::BadArgument);
                }
                Ok(match self.hal.i2c_read_reg(bus as u8, addr as u8, reg as u8) {
                    Ok(byte) => byte as i32,
                    Err(code) => code,
                })
            }
            Bif::MonotonicMs => Ok(self.hal.monotonic_ms() as i32),
            Bif::GpioRead => {
                let pin = v[0];
                if !in_range(pin, 0, GPIO_MAX_PIN) {
                    return Err(Status::BadArgument);
                }
                Ok(match self.hal.gpio_read(pin as u8) {
                    Ok(level) => level as i32,
                    Err(code) => code,
                })
            }
            Bif::I2cWriteReg => {
                let (bus, addr, reg, value) = (v[0], v[1], v[2], v[3]);
                if !in_range(bus, 0, I2C_MAX_BUS)
                    || !in_range(addr, 0, I2C_MAX_ADDR)
                    || !in_range(reg, 0, U8_MAX)
                    || !in_range(value, 0, U8_MAX)
                {
                    return Err(Status::BadArgument);
                }
                Ok(self.hal.i2c_write_reg(bus as u8, addr as u8, reg as u8, value as u8))
            }
            Bif::PwmConfig => {
                let (channel, freq) = (v[0], v[1]);
                if !in_range(channel, 0, PWM_MAX_CHANNEL) || !in_range(freq, 1, PWM_MAX_FREQUENCY_HZ) {
                    return Err(Status::BadArgument);
                }
                Ok(self.hal.pwm_config(channel as u8, freq as u32))
            }
        };

        let value = result?;
        self.registers[dst] = value;
        tracing::trace!(bif = ?bif, dst, value, "bif dispatched");
        Ok(())
    }
}
