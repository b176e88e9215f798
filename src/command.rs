//! Command ABI: the typed records a host pushes into the VM mailbox.

use crate::consts::*;
use crate::error::Status;

/// Closed set of command types a host may enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum CommandType {
    /// No-op command; accepted, carries no arguments.
    None = 0,
    /// `a`=pin, `b`=level.
    GpioWrite = 1,
    /// `a`=channel, `b`=permille.
    PwmSetDuty = 2,
    /// `a`=bus, `b`=addr, `c`=reg, `d`=opaque sensor id.
    I2cRead = 3,
    /// `a`=pin.
    GpioRead = 4,
    /// `a`=bus, `b`=addr, `c`=reg, `d`=value.
    I2cWrite = 5,
    /// `a`=channel, `b`=frequency_hz.
    PwmConfig = 6,
}

/// A fixed five-field command record exchanged between host and VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    /// Raw command type discriminant (see [`CommandType`]).
    pub r#type: i32,
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
}

impl Command {
    /// Construct a command of the given type with packed arguments.
    pub const fn new(r#type: CommandType, a: i32, b: i32, c: i32, d: i32) -> Self {
        Self {
            r#type: r#type as i32,
            a,
            b,
            c,
            d,
        }
    }

    /// The empty/no-op command.
    pub const NONE: Self = Self {
        r#type: CommandType::None as i32,
        a: 0,
        b: 0,
        c: 0,
        d: 0,
    };
}

fn in_range(value: i32, lo: i32, hi: i32) -> bool {
    value >= lo && value <= hi
}

fn is_bool(value: i32) -> bool {
    value == 0 || value == 1
}

fn is_u8(value: i32) -> bool {
    in_range(value, 0, U8_MAX)
}

/// Validate a command's type and, for known types, its per-type argument
/// ranges. Called at `push` time (fatal on failure) and again after `pop`
/// inside `RECV_CMD` (non-fatal, reported in-band).
pub fn validate_command(cmd: &Command) -> Result<(), Status> {
    let ty = CommandType::from_repr(cmd.r#type).ok_or(Status::InvalidCommand)?;
    let ok = match ty {
        CommandType::None => true,
        CommandType::GpioWrite => in_range(cmd.a, 0, GPIO_MAX_PIN) && is_bool(cmd.b),
        CommandType::GpioRead => in_range(cmd.a, 0, GPIO_MAX_PIN),
        CommandType::PwmSetDuty => in_range(cmd.a, 0, PWM_MAX_CHANNEL) && in_range(cmd.b, 0, PWM_MAX_PERMILLE),
        CommandType::PwmConfig => in_range(cmd.a, 0, PWM_MAX_CHANNEL) && in_range(cmd.b, 1, PWM_MAX_FREQUENCY_HZ),
        CommandType::I2cRead => {
            in_range(cmd.a, 0, I2C_MAX_BUS) && in_range(cmd.b, 0, I2C_MAX_ADDR) && is_u8(cmd.c)
        }
        CommandType::I2cWrite => {
            in_range(cmd.a, 0, I2C_MAX_BUS)
                && in_range(cmd.b, 0, I2C_MAX_ADDR)
                && is_u8(cmd.c)
                && is_u8(cmd.d)
        }
    };
    if ok {
        Ok(())
    } else {
        Err(Status::BadArgument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_always_valid() {
        assert!(validate_command(&Command::NONE).is_ok());
    }

    #[test]
    fn unknown_type_is_invalid_command() {
        let cmd = Command {
            r#type: 999,
            a: 0,
            b: 0,
            c: 0,
            d: 0,
        };
        assert_eq!(validate_command(&cmd), Err(Status::InvalidCommand));
    }

    #[test]
    fn gpio_write_out_of_range_pin_is_bad_argument() {
        let cmd = Command::new(CommandType::GpioWrite, 100, 1, 0, 0);
        assert_eq!(validate_command(&cmd), Err(Status::BadArgument));
    }

    #[test]
    fn gpio_write_valid() {
        let cmd = Command::new(CommandType::GpioWrite, 2, 1, 0, 0);
        assert!(validate_command(&cmd).is_ok());
    }

    #[test]
    fn pwm_config_rejects_zero_frequency() {
        let cmd = Command::new(CommandType::PwmConfig, 0, 0, 0, 0);
        assert_eq!(validate_command(&cmd), Err(Status::BadArgument));
    }

    #[test]
    fn i2c_write_requires_all_bytes_in_range() {
        let cmd = Command::new(CommandType::I2cWrite, 0, 0x68, 0x75, 256);
        assert_eq!(validate_command(&cmd), Err(Status::BadArgument));
    }
}
