//! Control flow: self-relative jumps with bounds checking.
//!
//! Control flow is encoded entirely as self-relative byte offsets; there are
//! no cyclic program graphs to resolve. Target PCs are computed in a wider
//! signed integer to avoid overflow at the boundary before bounds-checking
//! against `program_size`.

use crate::error::Status;
use crate::hal::Hal;
use crate::vm::Vm;

impl<'p, H: Hal> Vm<'p, H> {
    /// Apply a self-relative jump from the current `pc`. A landing PC
    /// exactly equal to `program_size` is allowed (the next fetch then
    /// fails cleanly); anything else out of bounds — including a negative
    /// offset whose magnitude exceeds the current `pc` — yields
    /// `EndOfStream` and leaves `pc` unchanged.
    pub(crate) fn apply_jump(&mut self, offset: i32) -> Result<(), Status> {
        let target = self.pc as i64 + offset as i64;
        if target < 0 || target > self.program.len() as i64 {
            return Err(Status::EndOfStream);
        }
        self.pc = target as usize;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::StubHal;

    fn vm_at(program_len: usize, pc: usize) -> Vm<'static, StubHal> {
        let program: &'static [u8] = Box::leak(vec![0u8; program_len].into_boxed_slice());
        let mut v = Vm::init(program, StubHal::new());
        v.pc = pc;
        v
    }

    #[test]
    fn zero_offset_is_pure_fallthrough() {
        let mut v = vm_at(10, 4);
        v.apply_jump(0).unwrap();
        assert_eq!(v.pc(), 4);
    }

    #[test]
    fn landing_exactly_at_program_size_succeeds() {
        let mut v = vm_at(10, 5);
        v.apply_jump(5).unwrap();
        assert_eq!(v.pc(), 10);
    }

    #[test]
    fn negative_offset_past_start_is_end_of_stream_and_does_not_move_pc() {
        let mut v = vm_at(10, 2);
        assert_eq!(v.apply_jump(-3), Err(Status::EndOfStream));
        assert_eq!(v.pc(), 2);
    }

    #[test]
    fn offset_past_program_size_is_end_of_stream() {
        let mut v = vm_at(10, 8);
        assert_eq!(v.apply_jump(5), Err(Status::EndOfStream));
        assert_eq!(v.pc(), 8);
    }
}
