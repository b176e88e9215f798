//! Property-based checks for the quantified invariants in the VM's testable
//! properties list: PC never exceeds program_size, mailbox head/tail/count
//! stay consistent, HALT is a fixed point, and no BIF error leaves its
//! destination register modified.

use firmvm::hal::StubHal;
use firmvm::prelude::*;
use quickcheck_macros::quickcheck;

fn const_i32(dst: u8, value: i32) -> Vec<u8> {
    let mut b = vec![0x01, dst];
    b.extend(value.to_le_bytes());
    b
}

#[quickcheck]
fn pc_never_exceeds_program_size_across_random_byte_streams(bytes: Vec<u8>, max_steps: u8) -> bool {
    let mut vm = Vm::init(&bytes, StubHal::new());
    let _ = vm.run(max_steps as u32);
    vm.pc() <= vm.program_size()
}

#[quickcheck]
fn mailbox_invariants_hold_after_arbitrary_push_pop_sequence(ops: Vec<(bool, i32)>) -> bool {
    let mut vm = Vm::init(&[], StubHal::new());
    for (push, pin) in ops {
        if push {
            let _ = vm.push(Command::new(CommandType::GpioWrite, pin.rem_euclid(40), 1, 0, 0));
        } else {
            let _ = vm.pop();
        }
    }
    vm.mailbox().len() <= 32
}

#[quickcheck]
fn halt_is_a_fixed_point_for_any_post_halt_step_count(extra_steps: u8) -> bool {
    let mut vm = Vm::init(&[0xFF], StubHal::new());
    vm.step().unwrap();
    let regs = *vm.registers();
    let pc = vm.pc();
    for _ in 0..extra_steps {
        if vm.step() != Ok(()) {
            return false;
        }
    }
    vm.registers() == &regs && vm.pc() == pc && vm.is_halted()
}

#[quickcheck]
fn bif_bad_argument_never_writes_destination_register(pin: i32, level: i32, sentinel: i32) -> bool {
    // r0 = pin (possibly out of [0,39]), r1 = level (possibly not 0/1),
    // r5 = sentinel; CALL_BIF GPIO_WRITE argv=[r0,r1] dst=r5.
    let pin = pin.rem_euclid(200) - 50;
    let level = level.rem_euclid(4) - 1;
    let mut program = const_i32(0, pin);
    program.extend(const_i32(1, level));
    program.extend(const_i32(5, sentinel));
    program.extend([0x10, 1, 2, 0, 1, 5]); // CALL_BIF GPIO_WRITE argc=2 argv=[0,1] dst=5

    let mut vm = Vm::init(&program, StubHal::new());
    vm.run(4).ok();

    let is_valid = (0..=39).contains(&pin) && (level == 0 || level == 1);
    if is_valid {
        vm.registers()[5] == 0
    } else {
        vm.registers()[5] == sentinel
    }
}
