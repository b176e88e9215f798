//! Runs the two demo programs against [`firmvm::hal::StubHal`]: a
//! BIF-calling program (ported from the original board's host demo) and a
//! mailbox dispatch program.

use firmvm::hal::StubHal;
use firmvm::prelude::*;

fn i32le(v: i32) -> [u8; 4] {
    v.to_le_bytes()
}

fn bif_demo_program() -> Vec<u8> {
    let mut p = Vec::new();

    // r0=2, r1=1 -> gpio_write
    p.extend([0x01, 0]);
    p.extend(i32le(2));
    p.extend([0x01, 1]);
    p.extend(i32le(1));
    p.extend([0x10, Bif::GpioWrite as u8, 2, 0, 1, 15]);

    // r2=0, r3=600 -> pwm_set_duty
    p.extend([0x01, 2]);
    p.extend(i32le(0));
    p.extend([0x01, 3]);
    p.extend(i32le(600));
    p.extend([0x10, Bif::PwmSetDuty as u8, 2, 2, 3, 15]);

    // r4=0, r5=0x68, r6=0x75 -> i2c_read_reg
    p.extend([0x01, 4]);
    p.extend(i32le(0));
    p.extend([0x01, 5]);
    p.extend(i32le(0x68));
    p.extend([0x01, 6]);
    p.extend(i32le(0x75));
    p.extend([0x10, Bif::I2cReadReg as u8, 3, 4, 5, 6, 7]);

    // r9=2 -> gpio_read
    p.extend([0x01, 9]);
    p.extend(i32le(2));
    p.extend([0x10, Bif::GpioRead as u8, 1, 9, 10]);

    // r11=1000 -> pwm_config(channel=r2, freq=r11)
    p.extend([0x01, 11]);
    p.extend(i32le(1000));
    p.extend([0x10, Bif::PwmConfig as u8, 2, 2, 11, 15]);

    // r12=0x1C -> i2c_write_reg(bus=r4, addr=r5, reg=r6, value=r12)
    p.extend([0x01, 12]);
    p.extend(i32le(0x1C));
    p.extend([0x10, Bif::I2cWriteReg as u8, 4, 4, 5, 6, 12, 15]);

    // r8=50 -> sleep
    p.extend([0x01, 8]);
    p.extend(i32le(50));
    p.extend([0x40, 8]);

    p.push(0xFF); // HALT
    p
}

fn mailbox_demo_program() -> Vec<u8> {
    vec![0x20, 0, 1, 2, 3, 4, 0xFF]
}

fn main() {
    let program = bif_demo_program();
    let mut vm = Vm::init(&program, StubHal::new());
    if let Err(status) = vm.run(1024) {
        eprintln!("vm failed: err={:?} pc={}", status, vm.pc());
        std::process::exit(1);
    }
    println!(
        "bif demo done: i2c_value_reg7={} gpio_level_reg10={}",
        vm.registers()[7],
        vm.registers()[10]
    );

    let mailbox_program = mailbox_demo_program();
    let mut vm = Vm::init(&mailbox_program, StubHal::new());
    vm.push(Command::new(CommandType::I2cWrite, 0, 0x68, 0x75, 0x1C))
        .expect("push should succeed");
    if let Err(status) = vm.run(8) {
        eprintln!("vm failed: err={:?} pc={}", status, vm.pc());
        std::process::exit(1);
    }
    let r = vm.registers();
    println!(
        "mailbox recv: type={} a={} b={} c={} d={}",
        r[0], r[1], r[2], r[3], r[4]
    );

    let rejected = vm.push(Command {
        r#type: 999,
        a: 0,
        b: 0,
        c: 0,
        d: 0,
    });
    println!(
        "invalid command push status={:?} (expected {:?})",
        rejected, Status::InvalidCommand
    );
}
