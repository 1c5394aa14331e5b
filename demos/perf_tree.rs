use std::time::Instant;

use unibots::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f64 {
    (lcg(seed) as f64 / u32::MAX as f64).clamp(1e-9, 1.0 - 1e-9)
}

fn main() {
    let n = 20_000usize;
    let range = 0.02;
    let mut seed = 1u32;
    let positions: Vec<Coord> = (0..n)
        .map(|_| Coord::new(unit(&mut seed), unit(&mut seed)))
        .collect();

    for max_leaves in [10usize, 32, 128] {
        let mut tree = QuadTree::unit(max_leaves);
        for frame in 0..3 {
            let t0 = Instant::now();
            let mut dropped = 0;
            for (i, p) in positions.iter().enumerate() {
                if !tree.insert(RobotId(i as u32), *p) {
                    dropped += 1;
                }
            }
            let insert_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let t1 = Instant::now();
            let found: usize = positions
                .iter()
                .map(|p| tree.find_in_range_at(*p, range).len())
                .sum();
            let query_ms = t1.elapsed().as_secs_f64() * 1000.0;

            let stats = tree.stats();
            println!(
                "N={} max_leaves={} frame={} insert={:.3}ms query={:.3}ms found={} dropped={} \
                 nodes={} depth={}",
                n,
                max_leaves,
                frame,
                insert_ms,
                query_ms,
                found,
                dropped,
                stats.nodes,
                stats.max_depth
            );
            tree.flush();
        }
    }
}
