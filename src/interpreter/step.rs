//! Instruction interpreter and the bounded run loop.
//!
//! Decode failures are fatal to the current step: `last_error` is set, the
//! status is returned, the halt flag is left untouched, and `pc` freezes at
//! the position where decoding stopped. `CALL_BIF` and `RECV_CMD` are the
//! two opcodes that set `last_error` on success as well as failure — every
//! other opcode leaves `last_error` exactly as the previous step left it.

use crate::command::{validate_command, CommandType};
use crate::consts::MAX_BIF_ARGC;
use crate::error::Status;
use crate::hal::Hal;
use crate::interpreter::opcode::Opcode;
use crate::vm::Vm;

impl<'p, H: Hal> Vm<'p, H> {
    /// Execute one instruction. A no-op returning `Ok` once halted.
    pub fn step(&mut self) -> Result<(), Status> {
        if self.halted {
            return Ok(());
        }
        match self.step_inner() {
            Ok(()) => Ok(()),
            Err(status) => {
                self.last_error = status;
                tracing::warn!(pc = self.pc, error = ?status, "step failed");
                Err(status)
            }
        }
    }

    /// Execute up to `max_steps` instructions. Stops early on halt or on a
    /// step returning a non-`Ok` status; a halt mid-slice counts as
    /// success. `max_steps == 0` is a no-op.
    pub fn run(&mut self, max_steps: u32) -> Result<(), Status> {
        let mut steps = 0;
        while !self.halted && steps < max_steps {
            self.step()?;
            steps += 1;
        }
        Ok(())
    }

    fn step_inner(&mut self) -> Result<(), Status> {
        let op_byte = self.fetch_u8()?;
        let opcode = Opcode::try_from(op_byte)?;

        match opcode {
            Opcode::Nop => Ok(()),

            Opcode::ConstI32 => {
                let dst_raw = self.fetch_u8()?;
                let value = self.fetch_i32_le()?;
                let dst = Self::valid_reg(dst_raw)?;
                self.registers[dst] = value;
                Ok(())
            }

            Opcode::Move => {
                // All three operand bytes are fetched unconditionally before
                // any register index is validated, so a fetch failure (not a
                // bad index) wins when the buffer is truncated partway
                // through the operand tail.
                let dst_raw = self.fetch_u8()?;
                let a_raw = self.fetch_u8()?;
                // Third operand is decoded and validated but unused; it
                // keeps all three-register opcodes uniformly sized.
                let b_raw = self.fetch_u8()?;
                let dst = Self::valid_reg(dst_raw)?;
                let a = Self::valid_reg(a_raw)?;
                let _b = Self::valid_reg(b_raw)?;
                self.registers[dst] = self.registers[a];
                Ok(())
            }

            Opcode::Add => {
                let dst_raw = self.fetch_u8()?;
                let a_raw = self.fetch_u8()?;
                let b_raw = self.fetch_u8()?;
                let dst = Self::valid_reg(dst_raw)?;
                let a = Self::valid_reg(a_raw)?;
                let b = Self::valid_reg(b_raw)?;
                self.registers[dst] = self.registers[a].wrapping_add(self.registers[b]);
                Ok(())
            }

            Opcode::Sub => {
                let dst_raw = self.fetch_u8()?;
                let a_raw = self.fetch_u8()?;
                let b_raw = self.fetch_u8()?;
                let dst = Self::valid_reg(dst_raw)?;
                let a = Self::valid_reg(a_raw)?;
                let b = Self::valid_reg(b_raw)?;
                self.registers[dst] = self.registers[a].wrapping_sub(self.registers[b]);
                Ok(())
            }

            Opcode::CallBif => {
                let bif_id = self.fetch_u8()?;
                let argc = self.fetch_u8()? as usize;
                if argc > MAX_BIF_ARGC {
                    return Err(Status::BadArgc);
                }
                let mut argv = [0usize; MAX_BIF_ARGC];
                for slot in argv.iter_mut().take(argc) {
                    *slot = Self::valid_reg(self.fetch_u8()?)?;
                }
                let dst = Self::valid_reg(self.fetch_u8()?)?;
                let outcome = self.call_bif(bif_id, argc, &argv[..argc], dst);
                self.last_error = *outcome.as_ref().err().unwrap_or(&Status::Ok);
                outcome
            }

            Opcode::RecvCmd => self.exec_recv_cmd(),

            Opcode::Jmp => {
                let offset = self.fetch_i32_le()?;
                self.apply_jump(offset)
            }

            Opcode::JmpIfZero => {
                // Both operands are fetched unconditionally before `reg` is
                // validated, so a truncated buffer yields `EndOfStream` from
                // the offset fetch rather than `BadRegister`.
                let reg_raw = self.fetch_u8()?;
                let offset = self.fetch_i32_le()?;
                let reg = Self::valid_reg(reg_raw)?;
                if self.registers[reg] == 0 {
                    self.apply_jump(offset)
                } else {
                    Ok(())
                }
            }

            Opcode::SleepMs => {
                let reg = Self::valid_reg(self.fetch_u8()?)?;
                // A negative register value is reinterpreted as an unsigned
                // 32-bit quantity, producing a very long delay. This is the
                // source behaviour.
                let ms = self.registers[reg] as u32;
                self.hal.delay_ms(ms);
                Ok(())
            }

            Opcode::Halt => {
                self.halted = true;
                Ok(())
            }
        }
    }

    /// `RECV_CMD`: pop one command and report it through five named
    /// registers. Mailbox emptiness and post-pop revalidation failure are
    /// non-fatal — they're reported in-band and the step still returns
    /// `Ok`. Only a decode failure on the five register operands is fatal.
    fn exec_recv_cmd(&mut self) -> Result<(), Status> {
        let r_type = self.fetch_u8()?;
        let r_a = self.fetch_u8()?;
        let r_b = self.fetch_u8()?;
        let r_c = self.fetch_u8()?;
        let r_d = self.fetch_u8()?;
        let r_type = Self::valid_reg(r_type)?;
        let r_a = Self::valid_reg(r_a)?;
        let r_b = Self::valid_reg(r_b)?;
        let r_c = Self::valid_reg(r_c)?;
        let r_d = Self::valid_reg(r_d)?;

        match self.mailbox.pop() {
            Ok(cmd) => match validate_command(&cmd) {
                Ok(()) => {
                    self.registers[r_type] = cmd.r#type;
                    self.registers[r_a] = cmd.a;
                    self.registers[r_b] = cmd.b;
                    self.registers[r_c] = cmd.c;
                    self.registers[r_d] = cmd.d;
                    self.last_error = Status::Ok;
                    tracing::debug!(r#type = cmd.r#type, "recv_cmd delivered");
                }
                Err(status) => {
                    self.registers[r_type] = CommandType::None as i32;
                    self.registers[r_a] = status.code();
                    self.registers[r_b] = 0;
                    self.registers[r_c] = 0;
                    self.registers[r_d] = 0;
                    self.last_error = status;
                    tracing::debug!(error = ?status, "recv_cmd revalidation failed");
                }
            },
            Err(status) => {
                self.registers[r_type] = CommandType::None as i32;
                self.registers[r_a] = status.code();
                self.registers[r_b] = 0;
                self.registers[r_c] = 0;
                self.registers[r_d] = 0;
                self.last_error = status;
                tracing::debug!(error = ?status, "recv_cmd on empty mailbox");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::hal::StubHal;

    fn i32le(v: i32) -> [u8; 4] {
        v.to_le_bytes()
    }

    #[test]
    fn nop_is_a_no_op() {
        let mut v = Vm::init(&[0x00], StubHal::new());
        v.step().unwrap();
        assert_eq!(v.registers(), &[0; 16]);
        assert_eq!(v.pc(), 1);
    }

    #[test]
    fn const_i32_sets_register() {
        let mut program = vec![0x01, 0x03];
        program.extend_from_slice(&i32le(42));
        let mut v = Vm::init(&program, StubHal::new());
        v.step().unwrap();
        assert_eq!(v.registers()[3], 42);
    }

    #[test]
    fn const_i32_bad_register_is_bad_register_and_freezes_pc() {
        let mut program = vec![0x01, 77];
        program.extend_from_slice(&i32le(1));
        let mut v = Vm::init(&program, StubHal::new());
        assert_eq!(v.run(8), Err(Status::BadRegister));
        assert_eq!(v.last_error(), Status::BadRegister);
        assert_eq!(v.pc(), 2);
    }

    #[test]
    fn single_unknown_byte_program_is_bad_opcode() {
        let mut v = Vm::init(&[0x7E], StubHal::new());
        assert_eq!(v.run(8), Err(Status::BadOpcode));
    }

    #[test]
    fn add_and_sub_wrap_on_overflow() {
        let program = [0x03, 2, 0, 1]; // ADD r2, r0, r1
        let mut v = Vm::init(&program, StubHal::new());
        v.registers[0] = i32::MAX;
        v.registers[1] = 1;
        v.step().unwrap();
        assert_eq!(v.registers()[2], i32::MIN);
    }

    #[test]
    fn move_decodes_and_validates_unused_third_operand() {
        let program = [0x02, 1, 0, 16]; // MOVE r1, r0, r16(invalid)
        let mut v = Vm::init(&program, StubHal::new());
        assert_eq!(v.step(), Err(Status::BadRegister));
    }

    #[test]
    fn jmp_zero_offset_is_fallthrough() {
        let mut program = vec![0x30];
        program.extend_from_slice(&i32le(0));
        program.push(0xFF);
        let mut v = Vm::init(&program, StubHal::new());
        v.step().unwrap();
        assert_eq!(v.pc(), 5);
        v.step().unwrap();
        assert!(v.is_halted());
    }

    #[test]
    fn jmp_if_zero_branches_only_when_register_is_zero() {
        // r0 = 0; JMP_IF_ZERO r0, +6 (skip CONST_I32 r1,9); CONST_I32 r1,1; HALT
        let mut program = vec![0x31, 0];
        program.extend_from_slice(&i32le(6));
        program.push(0x01);
        program.push(1);
        program.extend_from_slice(&i32le(9));
        program.push(0x01);
        program.push(2);
        program.extend_from_slice(&i32le(1));
        program.push(0xFF);
        let mut v = Vm::init(&program, StubHal::new());
        v.run(16).unwrap();
        assert_eq!(v.registers()[1], 0);
        assert_eq!(v.registers()[2], 1);
    }

    #[test]
    fn halt_is_a_fixed_point() {
        let mut v = Vm::init(&[0xFF], StubHal::new());
        v.step().unwrap();
        assert!(v.is_halted());
        let regs_before = *v.registers();
        let pc_before = v.pc();
        for _ in 0..5 {
            assert_eq!(v.step(), Ok(()));
        }
        assert_eq!(v.registers(), &regs_before);
        assert_eq!(v.pc(), pc_before);
    }

    #[test]
    fn run_zero_steps_is_a_no_op() {
        let mut v = Vm::init(&[0x00], StubHal::new());
        v.run(0).unwrap();
        assert_eq!(v.pc(), 0);
        assert_eq!(v.registers(), &[0; 16]);
    }

    #[test]
    fn recv_cmd_on_valid_push_scenario_s1() {
        // program: RECV_CMD 0 1 2 3 4; HALT
        let program = [0x20, 0, 1, 2, 3, 4, 0xFF];
        let mut v = Vm::init(&program, StubHal::new());
        v.push(Command::new(CommandType::GpioWrite, 2, 1, 0, 0)).unwrap();
        v.run(16).unwrap();
        assert_eq!(v.registers()[0], CommandType::GpioWrite as i32);
        assert_eq!(v.registers()[1], 2);
        assert_eq!(v.registers()[2], 1);
        assert_eq!(v.registers()[3], 0);
        assert_eq!(v.registers()[4], 0);
        assert!(v.is_halted());
    }

    #[test]
    fn recv_cmd_on_empty_mailbox_scenario_s2() {
        let program = [0x20, 0, 1, 2, 3, 4, 0xFF];
        let mut v = Vm::init(&program, StubHal::new());
        v.run(16).unwrap();
        assert_eq!(v.registers()[0], 0);
        assert_eq!(v.registers()[1], Status::MailboxEmpty.code());
        assert_eq!(v.last_error(), Status::MailboxEmpty);
        assert!(v.is_halted());
    }

    #[test]
    fn call_bif_sets_last_error_even_on_success() {
        let program = [0x10, 4, 0, 5, 0xFF]; // CALL_BIF MONOTONIC_MS, argc=0, dst=5
        let mut v = Vm::init(&program, StubHal::new());
        v.last_error = Status::BadArgument;
        v.step().unwrap();
        assert_eq!(v.last_error(), Status::Ok);
    }

    #[test]
    fn call_bif_argc_over_eight_is_bad_argc() {
        let program = [0x10, 1, 9];
        let mut v = Vm::init(&program, StubHal::new());
        assert_eq!(v.step(), Err(Status::BadArgc));
    }
}
