//! VM-wide constants.
//!
//! Centralizes the magic numbers named throughout the ABI tables so opcode
//! and BIF implementations can refer to them instead of repeating literals.

/// Number of signed 32-bit registers in the register file.
pub const REGISTER_COUNT: usize = 16;

/// Fixed mailbox capacity (number of queued commands).
pub const MAILBOX_CAPACITY: usize = 32;

/// Maximum `argc` accepted by `CALL_BIF`.
pub const MAX_BIF_ARGC: usize = 8;

/// Width in bytes of an `i32le` instruction operand.
pub const I32_OPERAND_WIDTH: usize = 4;

/// Highest valid GPIO pin number.
pub const GPIO_MAX_PIN: i32 = 39;

/// Highest valid PWM channel number.
pub const PWM_MAX_CHANNEL: i32 = 7;

/// Highest valid PWM duty cycle, in permille.
pub const PWM_MAX_PERMILLE: i32 = 1000;

/// Highest valid PWM base frequency, in Hz.
pub const PWM_MAX_FREQUENCY_HZ: i32 = 40_000;

/// Highest valid I2C bus index.
pub const I2C_MAX_BUS: i32 = 3;

/// Highest valid I2C 7-bit address.
pub const I2C_MAX_ADDR: i32 = 127;

/// Highest value representable in an unsigned byte argument (I2C register,
/// I2C value).
pub const U8_MAX: i32 = 255;
