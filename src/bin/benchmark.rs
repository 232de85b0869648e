//! Throughput benchmark for the generation engine.
//!
//! Runs Conway's Life over randomized planes of growing row counts and
//! reports serial vs row-parallel cost per generation, then prints a short
//! glider run so the output is visibly a cellular automaton and not just a
//! table.

use std::time::Instant;

use ndlife::{BitPlane, Ruleset, presets, rules};

fn benchmark_serial(shape: &[usize], ruleset: &Ruleset, iterations: u32) -> f64 {
    let mut plane = BitPlane::new(shape).unwrap();
    plane.randomize();

    let start = Instant::now();
    for _ in 0..iterations {
        ruleset.apply(&mut plane).unwrap();
    }
    start.elapsed().as_secs_f64() * 1000.0 / f64::from(iterations)
}

fn benchmark_parallel(shape: &[usize], ruleset: &Ruleset, iterations: u32) -> f64 {
    let mut plane = BitPlane::new(shape).unwrap();
    plane.randomize();

    let start = Instant::now();
    for _ in 0..iterations {
        ruleset.apply_parallel(&mut plane).unwrap();
    }
    start.elapsed().as_secs_f64() * 1000.0 / f64::from(iterations)
}

fn render(plane: &BitPlane) -> String {
    let &[height, width] = plane.shape() else {
        unreachable!("render expects a 2D plane");
    };
    let mut out = String::new();
    for r in 0..height as i64 {
        for c in 0..width as i64 {
            out.push(if plane.get(&[r, c]).unwrap() == 1 { 'O' } else { '.' });
        }
        out.push('\n');
    }
    out
}

fn main() {
    println!("=== ndlife generation benchmark (B3/S23) ===\n");

    let iterations = 20;
    println!("{:>12} {:>12} {:>12} {:>12}", "Shape", "Serial", "Parallel", "Speedup");
    println!("{:-<52}", "");

    for rows in [64usize, 512, 4096] {
        let shape = [rows, 64];
        let ruleset = rules::conway_life(&shape).unwrap();

        let serial_ms = benchmark_serial(&shape, &ruleset, iterations);
        let parallel_ms = benchmark_parallel(&shape, &ruleset, iterations);

        println!(
            "{:>12} {:>10.2}ms {:>10.2}ms {:>11.1}x",
            format!("{}x64", rows),
            serial_ms,
            parallel_ms,
            serial_ms / parallel_ms
        );
    }

    let cells = 4096 * 64;
    let ruleset = rules::conway_life(&[4096, 64]).unwrap();
    let per_gen = benchmark_parallel(&[4096, 64], &ruleset, iterations);
    println!(
        "\nParallel at 4096x64: {:.2} ms/gen, {:.1}M cells/sec",
        per_gen,
        cells as f64 / (per_gen / 1000.0) / 1_000_000.0
    );

    println!("\n=== glider, 8x8 torus ===\n");
    let shape = [8, 8];
    let ruleset = rules::conway_life(&shape).unwrap();
    let mut plane = BitPlane::new(&shape).unwrap();
    presets::glider().place_on(&mut plane, (1, 1)).unwrap();

    for generation in 0..3 {
        println!("gen {generation}:\n{}", render(&plane));
        ruleset.apply(&mut plane).unwrap();
    }
}
