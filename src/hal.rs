//! Hardware abstraction layer consumed by BIF calls.
//!
//! The VM never touches board drivers directly; every side effect is routed
//! through a [`Hal`] implementation, which is injected into [`crate::Vm`] as
//! a generic parameter rather than called through a free-function
//! namespace. This is what lets a host substitute [`StubHal`] (or any other
//! implementation) for tests without linking board drivers.

/// Seven-operation capability surface a board back-end implements.
///
/// Every method returns `0` on success and a negative or nonzero error code
/// otherwise (except the two read operations, which surface the error code
/// as `Err` and the read value as `Ok`, and `monotonic_ms`, which cannot
/// fail). Implementations must be reentrant-safe with respect to the VM's
/// single-threaded use and must not write to out-parameters on failure —
/// expressed here as "don't populate `Ok` unless the read succeeded".
pub trait Hal {
    /// Drive a digital output pin. Returns the HAL's raw status code.
    fn gpio_write(&mut self, pin: u8, level: u8) -> i32;

    /// Read a digital input pin. `Ok` carries the level (0 or 1); `Err`
    /// carries the HAL's nonzero status code.
    fn gpio_read(&mut self, pin: u8) -> Result<u8, i32>;

    /// Set PWM duty cycle in permille (0..=1000). Returns the HAL's raw
    /// status code.
    fn pwm_set_duty(&mut self, channel: u8, permille: u16) -> i32;

    /// Configure a PWM channel's base frequency in Hz. Returns the HAL's raw
    /// status code.
    fn pwm_config(&mut self, channel: u8, frequency_hz: u32) -> i32;

    /// Read one I2C register. `Ok` carries the byte read; `Err` carries the
    /// HAL's nonzero status code.
    fn i2c_read_reg(&mut self, bus: u8, addr: u8, reg: u8) -> Result<u8, i32>;

    /// Write one I2C register. Returns the HAL's raw status code.
    fn i2c_write_reg(&mut self, bus: u8, addr: u8, reg: u8, value: u8) -> i32;

    /// Monotonic millisecond clock.
    fn monotonic_ms(&mut self) -> u32;

    /// Blocking delay. The VM's only suspension point.
    fn delay_ms(&mut self, ms: u32);
}

/// Deterministic in-memory [`Hal`] used by this crate's own tests and the
/// `demo` binary. Not a board HAL.
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Default)]
pub struct StubHal {
    start: Option<std::time::Instant>,
}

#[cfg(any(test, feature = "std"))]
impl StubHal {
    /// A fresh stub HAL whose monotonic clock starts counting from now.
    pub fn new() -> Self {
        Self {
            start: Some(std::time::Instant::now()),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl Hal for StubHal {
    fn gpio_write(&mut self, pin: u8, level: u8) -> i32 {
        tracing::trace!(pin, level, "hal gpio_write");
        0
    }

    fn gpio_read(&mut self, pin: u8) -> Result<u8, i32> {
        let level = pin & 0x1;
        tracing::trace!(pin, level, "hal gpio_read");
        Ok(level)
    }

    fn pwm_set_duty(&mut self, channel: u8, permille: u16) -> i32 {
        if permille > 1000 {
            return -1;
        }
        tracing::trace!(channel, permille, "hal pwm_set_duty");
        0
    }

    fn pwm_config(&mut self, channel: u8, frequency_hz: u32) -> i32 {
        if frequency_hz == 0 || frequency_hz > 40_000 {
            return -1;
        }
        tracing::trace!(channel, frequency_hz, "hal pwm_config");
        0
    }

    fn i2c_read_reg(&mut self, bus: u8, addr: u8, reg: u8) -> Result<u8, i32> {
        let synthetic = addr ^ reg ^ bus;
        tracing::trace!(bus, addr, reg, synthetic, "hal i2c_read_reg");
        Ok(synthetic)
    }

    fn i2c_write_reg(&mut self, bus: u8, addr: u8, reg: u8, value: u8) -> i32 {
        tracing::trace!(bus, addr, reg, value, "hal i2c_write_reg");
        0
    }

    fn monotonic_ms(&mut self) -> u32 {
        let elapsed = self
            .start
            .get_or_insert_with(std::time::Instant::now)
            .elapsed();
        elapsed.as_millis() as u32
    }

    fn delay_ms(&mut self, ms: u32) {
        tracing::trace!(ms, "hal delay_ms");
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_gpio_read_is_parity_of_pin() {
        let mut hal = StubHal::new();
        assert_eq!(hal.gpio_read(2).unwrap(), 0);
        assert_eq!(hal.gpio_read(3).unwrap(), 1);
    }

    #[test]
    fn stub_i2c_read_reg_is_deterministic_xor() {
        let mut hal = StubHal::new();
        assert_eq!(hal.i2c_read_reg(0, 0x68, 0x75).unwrap(), 0x68 ^ 0x75 ^ 0);
    }

    #[test]
    fn stub_pwm_rejects_out_of_range_duty() {
        let mut hal = StubHal::new();
        assert_eq!(hal.pwm_set_duty(0, 1500), -1);
    }
}
