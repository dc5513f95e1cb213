//! End-to-end tests driving the public API the way a host binary would:
//! load a flat program image, run it to the halt loop, inspect final state.

use avrtiny_core::{loader, Machine};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn halt_words() -> [u8; 2] {
    // rjmp .-0 (RJMP with k = -1, i.e. all-ones 12-bit field).
    0xCFFFu16.to_le_bytes()
}

#[test]
fn loads_and_runs_a_small_add_program() {
    init_logging();

    // LDI R16, 0x05 ; LDI R17, 0x03 ; ADD R16, R17 ; halt
    // LDI only reaches R16..R31, so the ADD below targets that same pair.
    let mut image = Vec::new();
    image.extend_from_slice(&0xE005u16.to_le_bytes()); // LDI R16, 5 (1110_0000_0000_0101, d=0 -> R16)
    image.extend_from_slice(&0xE013u16.to_le_bytes()); // LDI R17, 3 (d=1 -> R17)
    image.extend_from_slice(&0x0F01u16.to_le_bytes()); // ADD R16, R17 (0000_11rd_dddd_rrrr)
    image.extend_from_slice(&halt_words());

    let mut m = Machine::new();
    loader::load(&mut m, &image).unwrap();
    m.run().unwrap();

    assert_eq!(m.r[16], 8);
    assert_eq!(m.get_pc(), 3);
}

#[test]
fn call_and_ret_preserve_stack_across_a_full_run() {
    init_logging();

    // RCALL +1 (skip over the halt at word 1, land on word 2) ; halt ; RET ; halt
    let mut image = Vec::new();
    image.extend_from_slice(&0b1101_0000_0000_0001u16.to_le_bytes()); // RCALL k=1
    image.extend_from_slice(&halt_words());
    image.extend_from_slice(&0b1001_0101_0000_1000u16.to_le_bytes()); // RET
    image.extend_from_slice(&halt_words());

    let mut m = Machine::new();
    loader::load(&mut m, &image).unwrap();
    let sp0 = m.sp;
    m.run().unwrap();

    assert_eq!(m.sp, sp0);
    assert_eq!(m.get_pc(), 1);
}

#[test]
fn snapshot_restore_round_trips_full_state() {
    let mut m = Machine::new();
    m.r[5] = 0x7E;
    m.set_status_flag(avrtiny_core::machine::FLAG_Z);
    m.set_pc(10);
    let snapshot = m.snapshot();

    let mut fresh = Machine::new();
    fresh.restore(&snapshot);

    assert_eq!(fresh.r[5], 0x7E);
    assert!(fresh.get_status_flag(avrtiny_core::machine::FLAG_Z));
    assert_eq!(fresh.get_pc(), 10);
}
