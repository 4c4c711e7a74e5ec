//! Performance benchmarks for `arm_writer`.
//!
//! Measures:
//! - Single instruction latency
//! - Literal-heavy workloads (full 100-entry batches, distinct and repeated)
//! - A realistic hook trampoline
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use arm_writer::{ArmReg, ArmWriter, TargetOs, MAX_LITERAL_COUNT};

// ─── Single-Instruction Latency ──────────────────────────────────────────────

fn bench_single_instruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_instruction");
    let mut code = [0u8; 16];

    group.bench_function("nop", |b| {
        b.iter(|| {
            let mut w = ArmWriter::new(&mut code, 0x1000, TargetOs::Linux);
            w.put_nop().unwrap();
        })
    });

    group.bench_function("b_imm", |b| {
        b.iter(|| {
            let mut w = ArmWriter::new(&mut code, 0x1000, TargetOs::Linux);
            w.put_b_imm(black_box(0x8000)).unwrap();
        })
    });

    group.bench_function("ldr_u32_flush", |b| {
        b.iter(|| {
            let mut w = ArmWriter::new(&mut code, 0x1000, TargetOs::Linux);
            w.put_ldr_reg_u32(ArmReg::R0, black_box(0xDEAD_BEEF)).unwrap();
            w.flush().unwrap();
        })
    });

    group.finish();
}

// ─── Literal Pools ───────────────────────────────────────────────────────────

fn bench_literal_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal_pool");
    group.throughput(Throughput::Elements(MAX_LITERAL_COUNT as u64));
    let mut code = vec![0u8; 1024];

    group.bench_function("distinct_full_batch", |b| {
        b.iter(|| {
            let mut w = ArmWriter::new(&mut code, 0x1000, TargetOs::Linux);
            for i in 0..MAX_LITERAL_COUNT as u32 {
                w.put_ldr_reg_u32(ArmReg::R0, black_box(i)).unwrap();
            }
            w.flush().unwrap();
        })
    });

    group.bench_function("repeated_full_batch", |b| {
        b.iter(|| {
            let mut w = ArmWriter::new(&mut code, 0x1000, TargetOs::Linux);
            for _ in 0..MAX_LITERAL_COUNT {
                w.put_ldr_reg_u32(ArmReg::R0, black_box(7)).unwrap();
            }
            w.flush().unwrap();
        })
    });

    group.finish();
}

// ─── Realistic Workloads ─────────────────────────────────────────────────────

fn bench_realistic(c: &mut Criterion) {
    let mut group = c.benchmark_group("realistic");
    let mut code = [0u8; 64];

    group.bench_function("hook_trampoline", |b| {
        b.iter(|| {
            let mut w = ArmWriter::new(&mut code, 0x7000_0000, TargetOs::Linux);
            w.put_ldr_reg_address(ArmReg::R12, black_box(0x7001_0000)).unwrap();
            w.put_add_reg_reg_imm(ArmReg::R12, ArmReg::R12, 4).unwrap();
            w.put_ldr_reg_reg_imm(ArmReg::R0, ArmReg::Sp, 8).unwrap();
            w.put_bx_reg(ArmReg::R12).unwrap();
            w.put_b_imm(black_box(0x7000_1000)).unwrap();
            w.finish().unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_instruction,
    bench_literal_pool,
    bench_realistic,
);
criterion_main!(benches);
